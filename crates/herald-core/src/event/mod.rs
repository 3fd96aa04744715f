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

//! Provides the synchronous event emitter and its building blocks.
//!
//! The primary component is the [`Emitter`], a thin set of operations
//! (`on`, `off`, `emit`, `once`) over a shared [`Registry`]. Handlers are
//! reference-counted callables compared by identity, so the same
//! [`Handler`] value that was registered can later be used to remove it.
//!
//! The wildcard channel is not a reserved key: it is a distinct list of
//! [`WildcardHandler`]s that receive both the event key and its payload,
//! and can never collide with an application key.

mod emitter;
mod error;
mod handler;
mod key;
mod registry;

pub use self::emitter::{Emitter, WeakEmitter};
pub use self::error::EmitError;
pub use self::handler::{Handler, HandlerError, HandlerOutput, WildcardHandler};
pub use self::key::{EventKey, EventType, Symbol};
pub use self::registry::Registry;
