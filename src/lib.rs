//! Task Recorder - record desktop input as portable tasks and replay them.
//!
//! Raw mouse and keyboard events are folded into a compact action log whose
//! coordinates live in a fixed virtual resolution. Saved tasks are replayed
//! through a single executor that announces, waits, acts, and verifies every
//! step with a screenshot.

pub mod capture;
pub mod config;
pub mod error;
pub mod executor;
pub mod playback;
pub mod recorder;
pub mod task;

pub use error::{Error, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_recorder=debug,task_recorder_lib=debug,executor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Task Recorder v{}", env!("CARGO_PKG_VERSION"));
}
