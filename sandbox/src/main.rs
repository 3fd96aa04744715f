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

//! Small walkthrough of the emitter: keyed handlers, a wildcard audit trail,
//! a one-shot listener and a failing handler. Run with `RUST_LOG=trace` to
//! see the dispatch log.

use anyhow::Result;
use herald_core::{Emitter, EventKey, Handler, Symbol, WildcardHandler};

#[derive(Debug, Clone)]
enum Payload {
    Login { user: String },
    Resize { width: u32, height: u32 },
    Shutdown,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let emitter: Emitter<Payload> = Emitter::new();
    let shutdown = Symbol::new("shutdown");

    emitter.on(
        "login",
        Handler::new(|payload: &Payload| {
            if let Payload::Login { user } = payload {
                log::info!("Welcome, {user}.");
            }
        }),
    );

    emitter.once(
        "resize",
        Handler::new(|payload: &Payload| {
            if let Payload::Resize { width, height } = payload {
                log::info!("First resize to {width}x{height}.");
            }
        }),
    );

    emitter.on(
        &shutdown,
        Handler::new(|_: &Payload| -> Result<()> {
            anyhow::bail!("refusing to shut down while work is pending")
        }),
    );

    emitter.on_any(WildcardHandler::new(|key: &EventKey, payload: &Payload| {
        log::info!("[audit] {key:?} -> {payload:?}");
    }));

    emitter.emit(
        "login",
        &Payload::Login {
            user: "ada".to_string(),
        },
    )?;
    emitter.emit(
        "resize",
        &Payload::Resize {
            width: 1280,
            height: 720,
        },
    )?;
    emitter.emit(
        "resize",
        &Payload::Resize {
            width: 1920,
            height: 1080,
        },
    )?;

    if let Err(e) = emitter.emit(&shutdown, &Payload::Shutdown) {
        log::warn!("Dispatch aborted: {e}");
    }

    log::info!("Final registry: {:?}", emitter.registry());
    Ok(())
}
