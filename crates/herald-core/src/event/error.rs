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

//! Defines the error returned when a dispatch pass is aborted.

use std::fmt;

use super::handler::HandlerError;

/// A handler failed during [`Emitter::emit`](super::Emitter::emit).
///
/// Dispatch is fail-fast: the first failing handler ends the call, and every
/// handler ordered after it is skipped, including the whole wildcard pass
/// when the failure happened in the key's own pass.
#[derive(Debug)]
pub enum EmitError {
    /// A handler registered under the emitted key failed.
    Handler {
        /// `Debug` rendering of the emitted key.
        event: String,
        /// Index of the failing handler within the snapshotted pass.
        position: usize,
        /// The error the handler returned.
        source: HandlerError,
    },
    /// A wildcard handler failed.
    Wildcard {
        /// `Debug` rendering of the emitted key.
        event: String,
        /// Index of the failing handler within the snapshotted wildcard pass.
        position: usize,
        /// The error the handler returned.
        source: HandlerError,
    },
}

impl EmitError {
    /// Returns the `Debug` rendering of the key being emitted.
    pub fn event(&self) -> &str {
        match self {
            EmitError::Handler { event, .. } | EmitError::Wildcard { event, .. } => event,
        }
    }

    /// Returns the index of the failing handler within its pass.
    pub fn position(&self) -> usize {
        match self {
            EmitError::Handler { position, .. } | EmitError::Wildcard { position, .. } => {
                *position
            }
        }
    }

    /// Returns `true` if the failure happened during the wildcard pass.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, EmitError::Wildcard { .. })
    }

    /// Consumes the error, returning what the handler reported.
    pub fn into_source(self) -> HandlerError {
        match self {
            EmitError::Handler { source, .. } | EmitError::Wildcard { source, .. } => source,
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Handler {
                event,
                position,
                source,
            } => {
                write!(f, "Handler #{position} for event {event} failed: {source}")
            }
            EmitError::Wildcard {
                event,
                position,
                source,
            } => {
                write!(
                    f,
                    "Wildcard handler #{position} failed while dispatching {event}: {source}"
                )
            }
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::Handler { source, .. } | EmitError::Wildcard { source, .. } => {
                Some(source.as_ref())
            }
        }
    }
}
