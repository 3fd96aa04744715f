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

//! Defines the keys under which handlers are grouped.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Any type usable as an event key in a [`Registry`](super::Registry).
///
/// Keys are compared with `Eq` only; nothing is normalized. This trait is
/// implemented for every type meeting the bounds, so `&'static str`,
/// `String`, [`EventKey`] or an application enum all work.
pub trait EventType: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> EventType for T where T: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

/// A unique, opaque event identifier.
///
/// Every call to [`Symbol::new`] yields a fresh identity, even when the
/// description is reused. The description only appears in `Debug` output.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Creates a new symbol with a human-readable description.
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(description.into()),
        }
    }

    /// Creates a new symbol without a description.
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    /// Returns the description given at creation, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "Symbol({description})"),
            None => write!(f, "Symbol()"),
        }
    }
}

/// The default event key: either a name or a [`Symbol`].
///
/// A name and a symbol are always distinct keys, even when the symbol's
/// description spells the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A string event name, compared byte-for-byte.
    Name(Cow<'static, str>),
    /// An opaque symbol, compared by identity.
    Symbol(Symbol),
}

impl EventKey {
    /// Returns the name if this key is [`EventKey::Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            EventKey::Name(name) => Some(name),
            EventKey::Symbol(_) => None,
        }
    }
}

impl From<&'static str> for EventKey {
    fn from(name: &'static str) -> Self {
        EventKey::Name(Cow::Borrowed(name))
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        EventKey::Name(Cow::Owned(name))
    }
}

impl From<Symbol> for EventKey {
    fn from(symbol: Symbol) -> Self {
        EventKey::Symbol(symbol)
    }
}

impl From<&Symbol> for EventKey {
    fn from(symbol: &Symbol) -> Self {
        EventKey::Symbol(symbol.clone())
    }
}
