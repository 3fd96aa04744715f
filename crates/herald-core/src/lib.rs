// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Herald Core
//!
//! A minimal, typed publish/subscribe emitter. An [`Emitter`] owns a
//! [`Registry`] mapping event keys to ordered handler lists, plus one
//! separately managed wildcard list that observes every emitted event.
//!
//! Dispatch is synchronous: [`Emitter::emit`] runs every handler on the
//! calling thread before it returns.
//!
//! ```rust
//! use herald_core::{Emitter, Handler, WildcardHandler};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let emitter: Emitter<i32> = Emitter::new();
//!
//! let sink = seen.clone();
//! emitter.on("tick", Handler::new(move |n: &i32| sink.lock().unwrap().push(*n)));
//!
//! let sink = seen.clone();
//! emitter.on_any(WildcardHandler::new(move |_key, n: &i32| {
//!     sink.lock().unwrap().push(n * 10)
//! }));
//!
//! emitter.emit("tick", &4).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec![4, 40]);
//! ```

#![warn(missing_docs)]

pub mod event;

pub use event::{
    EmitError, Emitter, EventKey, EventType, Handler, HandlerError, HandlerOutput, Registry,
    Symbol, WeakEmitter, WildcardHandler,
};
