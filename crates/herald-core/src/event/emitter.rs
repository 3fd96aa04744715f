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

//! The [`Emitter`]: registration, removal and synchronous dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::error::EmitError;
use super::handler::{Callback, Handler, HandlerError, WildcardCallback, WildcardHandler};
use super::key::{EventKey, EventType};
use super::registry::{Registry, WeakRegistry};

/// A synchronous publish/subscribe emitter.
///
/// `P` is the payload type handed to every handler and `K` the key type,
/// [`EventKey`] by default. All operations take `&self`; the backing
/// [`Registry`] is shared, so clones of an emitter (and handlers holding
/// one) register into and dispatch from the same table.
///
/// # Re-entrancy
///
/// [`Emitter::emit`] copies the key's handler list before calling the
/// first handler, and copies the wildcard list once the key's pass is done.
/// Registrations and removals made by handlers only affect later passes.
///
/// A handler that captures a clone of its own emitter keeps the registry
/// alive through the registry itself, so the table is never freed. Capture
/// a [`WeakEmitter`] from [`Emitter::downgrade`] instead.
pub struct Emitter<P, K = EventKey> {
    registry: Registry<K, P>,
}

impl<P: 'static, K: EventType> Emitter<P, K> {
    /// Creates an emitter over a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Creates an emitter backed by an existing registry.
    ///
    /// The registry is shared, not copied: mutations made through either
    /// side are visible to the other.
    #[must_use]
    pub fn with_registry(registry: Registry<K, P>) -> Self {
        Self { registry }
    }

    /// Returns a handle that does not keep the registry alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakEmitter<P, K> {
        WeakEmitter {
            registry: self.registry.downgrade(),
        }
    }

    /// Returns the backing registry for inspection or direct mutation.
    pub fn registry(&self) -> &Registry<K, P> {
        &self.registry
    }

    /// Appends `handler` to the list for `key`.
    ///
    /// Registering the same handler twice creates two independent entries.
    pub fn on(&self, key: impl Into<K>, handler: Handler<P>) {
        let key = key.into();
        log::trace!("Registering {handler:?} for {key:?}.");
        self.registry.push(key, handler);
    }

    /// Appends `handler` to the wildcard list.
    pub fn on_any(&self, handler: WildcardHandler<K, P>) {
        log::trace!("Registering wildcard {handler:?}.");
        self.registry.push_wildcard(handler);
    }

    /// Removes a handler from the list for `key`.
    ///
    /// With `Some(handler)`, the first entry identical to `handler` is
    /// removed. With `None`, the key's list is reset to empty. Unknown
    /// keys and unregistered handlers are ignored.
    pub fn off(&self, key: impl Into<K>, handler: Option<&Handler<P>>) {
        let key = key.into();
        match handler {
            Some(handler) => {
                if !self.registry.remove_first(&key, handler) {
                    log::trace!("{handler:?} is not registered for {key:?}; ignored.");
                }
            }
            None => {
                log::trace!("Clearing all handlers for {key:?}.");
                self.registry.clear_key(&key);
            }
        }
    }

    /// Removes a wildcard handler, or every wildcard handler when `None`.
    pub fn off_any(&self, handler: Option<&WildcardHandler<K, P>>) {
        match handler {
            Some(handler) => {
                if !self.registry.remove_first_wildcard(handler) {
                    log::trace!("Wildcard {handler:?} is not registered; ignored.");
                }
            }
            None => {
                log::trace!("Clearing all wildcard handlers.");
                self.registry.clear_wildcard();
            }
        }
    }

    /// Invokes every handler for `key`, then every wildcard handler.
    ///
    /// Handlers run in registration order on the calling thread. The first
    /// handler to fail aborts the call: later handlers in the same pass, and
    /// the wildcard pass if it had not started, are skipped.
    ///
    /// ## Arguments
    /// * `key` - The event to dispatch.
    /// * `payload` - Passed to each handler; use `P = ()` for events without one.
    ///
    /// ## Returns
    /// `Ok(())` once every handler has run, or the first handler failure.
    pub fn emit(&self, key: impl Into<K>, payload: &P) -> Result<(), EmitError> {
        let key = key.into();

        if let Some(handlers) = self.registry.handlers(&key) {
            log::trace!("Dispatching {key:?} to {} handler(s).", handlers.len());
            for (position, handler) in handlers.iter().enumerate() {
                handler.call(payload).map_err(|source| {
                    log::debug!("Handler #{position} for {key:?} failed: {source}. Aborting.");
                    EmitError::Handler {
                        event: format!("{key:?}"),
                        position,
                        source,
                    }
                })?;
            }
        }

        let wildcard = self.registry.wildcard_handlers();
        if !wildcard.is_empty() {
            log::trace!("Dispatching {key:?} to {} wildcard(s).", wildcard.len());
        }
        for (position, handler) in wildcard.iter().enumerate() {
            handler.call(&key, payload).map_err(|source| {
                log::debug!("Wildcard handler #{position} on {key:?} failed: {source}. Aborting.");
                EmitError::Wildcard {
                    event: format!("{key:?}"),
                    position,
                    source,
                }
            })?;
        }

        Ok(())
    }

    /// Registers `handler` to run on the next emission of `key` only.
    ///
    /// The registry stores a wrapper, not `handler` itself, and the wrapper
    /// is returned. Passing the original `handler` to [`Emitter::off`] does
    /// not cancel the registration; passing the returned wrapper does.
    ///
    /// The wrapper removes itself after `handler` returns successfully. If
    /// `handler` fails, the error propagates and the wrapper stays registered.
    /// Concurrent emissions that both snapshot the wrapper still run
    /// `handler` only once.
    pub fn once(&self, key: impl Into<K>, handler: Handler<P>) -> Handler<P> {
        let key = key.into();
        let wrapper: Arc<OnceHandler<K, P>> = Arc::new_cyclic(|this| OnceHandler {
            key: key.clone(),
            handler,
            registry: self.registry.downgrade(),
            this: this.clone(),
            fired: AtomicBool::new(false),
        });
        let wrapper = Handler::from_callback(wrapper);
        self.on(key, wrapper.clone());
        wrapper
    }

    /// Registers a wildcard `handler` to run on the next emission of any key.
    ///
    /// Behaves like [`Emitter::once`]; the returned wrapper cancels it via
    /// [`Emitter::off_any`].
    pub fn once_any(&self, handler: WildcardHandler<K, P>) -> WildcardHandler<K, P> {
        let wrapper: Arc<OnceWildcardHandler<K, P>> =
            Arc::new_cyclic(|this| OnceWildcardHandler {
                handler,
                registry: self.registry.downgrade(),
                this: this.clone(),
                fired: AtomicBool::new(false),
            });
        let wrapper = WildcardHandler::from_callback(wrapper);
        self.on_any(wrapper.clone());
        wrapper
    }
}

impl<P: 'static, K: EventType> Default for Emitter<P, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, K> Clone for Emitter<P, K> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<P, K: EventType> fmt::Debug for Emitter<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("registry", &self.registry)
            .finish()
    }
}

/// A non-owning handle to an [`Emitter`]'s registry.
///
/// Handlers that need to call back into their own emitter should hold one
/// of these; see [`Emitter::downgrade`].
pub struct WeakEmitter<P, K = EventKey> {
    registry: WeakRegistry<K, P>,
}

impl<P: 'static, K: EventType> WeakEmitter<P, K> {
    /// Returns the emitter, or `None` once every strong handle is gone.
    pub fn upgrade(&self) -> Option<Emitter<P, K>> {
        self.registry.upgrade().map(Emitter::with_registry)
    }
}

impl<P, K> Clone for WeakEmitter<P, K> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<P, K> fmt::Debug for WeakEmitter<P, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEmitter").finish_non_exhaustive()
    }
}

/// Claims the single run of a once-wrapper. Returns `false` if another
/// dispatch already claimed it.
fn claim(fired: &AtomicBool) -> bool {
    fired
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

/// Self-removing wrapper stored by [`Emitter::once`].
///
/// `this` is bound by `Arc::new_cyclic` before registration, so the wrapper
/// can remove exactly its own entry. The registry is held weakly so a
/// pending wrapper never keeps its own table alive. `fired` is released
/// again if the wrapped handler fails.
struct OnceHandler<K, P> {
    key: K,
    handler: Handler<P>,
    registry: WeakRegistry<K, P>,
    this: Weak<OnceHandler<K, P>>,
    fired: AtomicBool,
}

impl<K: EventType, P: 'static> Callback<P> for OnceHandler<K, P> {
    fn call(&self, payload: &P) -> Result<(), HandlerError> {
        if !claim(&self.fired) {
            return Ok(());
        }
        if let Err(e) = self.handler.call(payload) {
            self.fired.store(false, Ordering::Release);
            return Err(e);
        }

        let registry = self.registry.upgrade();
        if let (Some(registry), Some(this)) = (registry, self.this.upgrade()) {
            registry.remove_first(&self.key, &Handler::from_callback(this));
        }
        Ok(())
    }
}

struct OnceWildcardHandler<K, P> {
    handler: WildcardHandler<K, P>,
    registry: WeakRegistry<K, P>,
    this: Weak<OnceWildcardHandler<K, P>>,
    fired: AtomicBool,
}

impl<K: EventType, P: 'static> WildcardCallback<K, P> for OnceWildcardHandler<K, P> {
    fn call(&self, key: &K, payload: &P) -> Result<(), HandlerError> {
        if !claim(&self.fired) {
            return Ok(());
        }
        if let Err(e) = self.handler.call(key, payload) {
            self.fired.store(false, Ordering::Release);
            return Err(e);
        }

        let registry = self.registry.upgrade();
        if let (Some(registry), Some(this)) = (registry, self.this.upgrade()) {
            registry.remove_first_wildcard(&WildcardHandler::from_callback(this));
        }
        Ok(())
    }
}
