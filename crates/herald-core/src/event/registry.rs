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

//! The shared table backing every [`Emitter`](super::Emitter).
//!
//! A [`Registry`] is a handle: cloning it aliases the same table, so a
//! registry seeded by the caller and later handed to an emitter observes
//! every mutation the emitter makes, and vice versa.
//!
//! All reads hand out snapshot copies, and the lock is released before any
//! handler runs. Handlers are therefore free to call back into the registry
//! while a dispatch pass is in progress.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::handler::{Handler, WildcardHandler};
use super::key::EventType;

struct Table<K, P> {
    events: HashMap<K, Vec<Handler<P>>>,
    wildcard: Vec<WildcardHandler<K, P>>,
}

/// A mapping from event key to an ordered, duplicate-permitting list of
/// handlers, plus the separate wildcard list.
///
/// A key may be absent or present with an empty list; both dispatch
/// identically. [`Registry::handlers`] distinguishes the two states.
///
/// # Example
///
/// ```rust
/// use herald_core::{Emitter, Handler, Registry};
///
/// let registry: Registry<&'static str, u8> = Registry::new();
/// registry.insert("foo", vec![Handler::new(|_: &u8| {})]);
///
/// let emitter = Emitter::with_registry(registry.clone());
/// emitter.off("foo", None);
///
/// assert_eq!(registry.handlers(&"foo"), Some(vec![]));
/// ```
pub struct Registry<K, P> {
    table: Arc<RwLock<Table<K, P>>>,
}

/// A non-owning handle used by once-wrappers living inside the table.
pub(crate) struct WeakRegistry<K, P> {
    table: Weak<RwLock<Table<K, P>>>,
}

impl<K, P> Clone for WeakRegistry<K, P> {
    fn clone(&self) -> Self {
        Self {
            table: Weak::clone(&self.table),
        }
    }
}

impl<K, P> WeakRegistry<K, P> {
    pub(crate) fn upgrade(&self) -> Option<Registry<K, P>> {
        self.table.upgrade().map(|table| Registry { table })
    }
}

impl<K: EventType, P> Registry<K, P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        log::debug!("Handler registry created.");
        Self {
            table: Arc::new(RwLock::new(Table {
                events: HashMap::new(),
                wildcard: Vec::new(),
            })),
        }
    }

    // A panic can only surface from a user `Hash`/`Eq` impl, and every
    // mutation below is a single step, so a poisoned table is still valid.
    fn read(&self) -> RwLockReadGuard<'_, Table<K, P>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table<K, P>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry<K, P> {
        WeakRegistry {
            table: Arc::downgrade(&self.table),
        }
    }

    /// Returns a snapshot of the handlers registered under `key`.
    ///
    /// `None` means the key was never registered (or was removed with
    /// [`Registry::remove`]); `Some(vec![])` means it was cleared.
    #[must_use]
    pub fn handlers(&self, key: &K) -> Option<Vec<Handler<P>>> {
        self.read().events.get(key).cloned()
    }

    /// Returns a snapshot of the wildcard handlers.
    #[must_use]
    pub fn wildcard_handlers(&self) -> Vec<WildcardHandler<K, P>> {
        self.read().wildcard.clone()
    }

    /// Returns `true` if `key` has an entry, even an empty one.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.read().events.contains_key(key)
    }

    /// Replaces the list registered under `key`, returning the previous one.
    pub fn insert(&self, key: K, handlers: Vec<Handler<P>>) -> Option<Vec<Handler<P>>> {
        log::trace!("Seeding {} handler(s) for {key:?}.", handlers.len());
        self.write().events.insert(key, handlers)
    }

    /// Removes the entry for `key` entirely, returning its list.
    pub fn remove(&self, key: &K) -> Option<Vec<Handler<P>>> {
        self.write().events.remove(key)
    }

    /// Replaces the wildcard list, returning the previous one.
    pub fn set_wildcard_handlers(
        &self,
        handlers: Vec<WildcardHandler<K, P>>,
    ) -> Vec<WildcardHandler<K, P>> {
        std::mem::replace(&mut self.write().wildcard, handlers)
    }

    /// Returns the keys that currently have an entry, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.read().events.keys().cloned().collect()
    }

    /// Returns the number of keys with an entry. The wildcard list is not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    /// Returns `true` if no key has an entry and no wildcard handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let table = self.read();
        table.events.is_empty() && table.wildcard.is_empty()
    }

    /// Drops every entry and every wildcard handler.
    pub fn clear(&self) {
        let mut table = self.write();
        table.events.clear();
        table.wildcard.clear();
    }

    /// Returns `true` if both handles alias the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    pub(crate) fn push(&self, key: K, handler: Handler<P>) {
        self.write().events.entry(key).or_default().push(handler);
    }

    /// Removes the first occurrence of `handler`. Returns whether one was found.
    pub(crate) fn remove_first(&self, key: &K, handler: &Handler<P>) -> bool {
        let mut table = self.write();
        let Some(handlers) = table.events.get_mut(key) else {
            return false;
        };
        match handlers.iter().position(|h| h.ptr_eq(handler)) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Resets an existing entry to an empty list. Absent keys stay absent.
    pub(crate) fn clear_key(&self, key: &K) {
        if let Some(handlers) = self.write().events.get_mut(key) {
            handlers.clear();
        }
    }

    pub(crate) fn push_wildcard(&self, handler: WildcardHandler<K, P>) {
        self.write().wildcard.push(handler);
    }

    pub(crate) fn remove_first_wildcard(&self, handler: &WildcardHandler<K, P>) -> bool {
        let mut table = self.write();
        match table.wildcard.iter().position(|h| h.ptr_eq(handler)) {
            Some(index) => {
                table.wildcard.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_wildcard(&self) {
        self.write().wildcard.clear();
    }
}

impl<K: EventType, P> Default for Registry<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> Clone for Registry<K, P> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<K, P> fmt::Debug for Registry<K, P>
where
    K: EventType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.read();
        f.debug_struct("Registry")
            .field(
                "events",
                &table
                    .events
                    .iter()
                    .map(|(key, handlers)| (key, handlers.len()))
                    .collect::<Vec<_>>(),
            )
            .field("wildcard", &table.wildcard.len())
            .finish()
    }
}
