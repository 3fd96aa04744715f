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

//! Defines the callable handles stored in a [`Registry`](super::Registry).
//!
//! A handler is a reference-counted callable. Cloning it clones the handle,
//! not the callable, and equality is identity: two handles are equal only
//! when they point at the same registration-ready callable. This is what
//! lets `off` remove exactly the value that was passed to `on`.

use std::fmt;
use std::sync::Arc;

/// The error type a failing handler reports back through `emit`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The return types a handler closure may have.
///
/// Plain `()` handlers never fail. Handlers returning `Result<(), E>` fail
/// with their error converted into a [`HandlerError`].
pub trait HandlerOutput {
    /// Converts the handler's return value into a dispatch result.
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E: Into<HandlerError>> HandlerOutput for Result<(), E> {
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(Into::into)
    }
}

/// Object-safe form of a single-payload handler.
pub(crate) trait Callback<P>: Send + Sync {
    fn call(&self, payload: &P) -> Result<(), HandlerError>;
}

/// Object-safe form of a wildcard handler.
pub(crate) trait WildcardCallback<K, P>: Send + Sync {
    fn call(&self, key: &K, payload: &P) -> Result<(), HandlerError>;
}

struct Func<F>(F);

impl<P, F> Callback<P> for Func<F>
where
    F: Fn(&P) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(&self, payload: &P) -> Result<(), HandlerError> {
        (self.0)(payload)
    }
}

impl<K, P, F> WildcardCallback<K, P> for Func<F>
where
    F: Fn(&K, &P) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(&self, key: &K, payload: &P) -> Result<(), HandlerError> {
        (self.0)(key, payload)
    }
}

/// Compares two trait objects by the address of their data, ignoring vtables.
fn same_allocation<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// A handler invoked with the payload of the event it is registered for.
///
/// # Example
///
/// ```rust
/// use herald_core::{Emitter, Handler};
///
/// let emitter: Emitter<String> = Emitter::new();
/// let greet = Handler::new(|name: &String| println!("hello {name}"));
///
/// emitter.on("greet", greet.clone());
/// emitter.off("greet", Some(&greet));
/// assert_eq!(emitter.registry().handlers(&"greet".into()), Some(vec![]));
/// ```
pub struct Handler<P> {
    callback: Arc<dyn Callback<P>>,
}

impl<P: 'static> Handler<P> {
    /// Wraps a closure into a new handler with its own identity.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self {
            callback: Arc::new(Func(move |payload: &P| f(payload).into_result())),
        }
    }
}

impl<P> Handler<P> {
    pub(crate) fn from_callback(callback: Arc<dyn Callback<P>>) -> Self {
        Self { callback }
    }

    /// Invokes the handler directly, outside of any dispatch pass.
    pub fn call(&self, payload: &P) -> Result<(), HandlerError> {
        self.callback.call(payload)
    }

    /// Returns `true` if both handles refer to the same registration.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        same_allocation(&self.callback, &other.callback)
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> PartialEq for Handler<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<P> Eq for Handler<P> {}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.callback).cast::<()>())
    }
}

/// A handler invoked for every emitted event, with the event key and payload.
pub struct WildcardHandler<K, P> {
    callback: Arc<dyn WildcardCallback<K, P>>,
}

impl<K: 'static, P: 'static> WildcardHandler<K, P> {
    /// Wraps a closure into a new wildcard handler with its own identity.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&K, &P) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self {
            callback: Arc::new(Func(move |key: &K, payload: &P| {
                f(key, payload).into_result()
            })),
        }
    }
}

impl<K, P> WildcardHandler<K, P> {
    pub(crate) fn from_callback(callback: Arc<dyn WildcardCallback<K, P>>) -> Self {
        Self { callback }
    }

    /// Invokes the handler directly, outside of any dispatch pass.
    pub fn call(&self, key: &K, payload: &P) -> Result<(), HandlerError> {
        self.callback.call(key, payload)
    }

    /// Returns `true` if both handles refer to the same registration.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        same_allocation(&self.callback, &other.callback)
    }
}

impl<K, P> Clone for WildcardHandler<K, P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<K, P> PartialEq for WildcardHandler<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K, P> Eq for WildcardHandler<K, P> {}

impl<K, P> fmt::Debug for WildcardHandler<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WildcardHandler({:p})",
            Arc::as_ptr(&self.callback).cast::<()>()
        )
    }
}
