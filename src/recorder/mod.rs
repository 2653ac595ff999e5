//! Recording sessions
//!
//! An [`InputSource`] pushes messages onto an unbounded queue; a single tokio
//! task drains it through an [`EventRecorder`]. Both stop paths (the abort key
//! arriving as an event, or [`Recording::stop`] enqueuing a stop message) go
//! through the same ordered queue, so pending text is always flushed first.

pub mod session;
pub mod state;

pub use session::{Control, EventRecorder, DEFAULT_ABORT_KEY, MOVE_NOISE_THRESHOLD, TEXT_TIMEOUT};
pub use state::RecordingState;

use crate::capture::input::{InputMessage, InputSource};
use crate::capture::resolution::CoordinateScaler;
use crate::error::{Error, Result};
use crate::task::types::Action;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub struct TaskRecorder {
    source: Arc<dyn InputSource>,
    scaler: CoordinateScaler,
    abort_key: String,
}

impl TaskRecorder {
    pub fn new(source: Arc<dyn InputSource>, scaler: CoordinateScaler) -> Self {
        Self {
            source,
            scaler,
            abort_key: DEFAULT_ABORT_KEY.to_string(),
        }
    }

    pub fn with_abort_key(mut self, key: impl Into<String>) -> Self {
        self.abort_key = key.into();
        self
    }

    /// Begin a session. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<Recording> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut recorder = EventRecorder::new(self.scaler).with_abort_key(self.abort_key.clone());
        recorder.start(Instant::now())?;
        self.source.subscribe(sender.clone())?;

        tracing::info!(
            "Recording started (abort key '{}', virtual={})",
            self.abort_key,
            self.scaler.virtual_resolution()
        );

        let handle = tokio::spawn(drain(receiver, recorder, self.source.clone()));
        Ok(Recording { sender, handle })
    }
}

/// Handle to a running session
pub struct Recording {
    sender: UnboundedSender<InputMessage>,
    handle: JoinHandle<Vec<Action>>,
}

impl Recording {
    /// Stop explicitly, flushing pending text
    pub async fn stop(self) -> Result<Vec<Action>> {
        // Fails only if the session already ended via the abort key
        let _ = self.sender.send(InputMessage::Stop { at: Instant::now() });
        self.wait().await
    }

    /// Wait for the abort key to end the session
    pub async fn wait(self) -> Result<Vec<Action>> {
        self.handle
            .await
            .map_err(|e| Error::Input(format!("recording task failed: {}", e)))
    }
}

async fn drain(
    mut receiver: UnboundedReceiver<InputMessage>,
    mut recorder: EventRecorder,
    source: Arc<dyn InputSource>,
) -> Vec<Action> {
    let actions = loop {
        match receiver.recv().await {
            Some(InputMessage::Event(event)) => {
                if recorder.handle(&event) == Control::Stop {
                    break recorder.stop(event.at);
                }
            }
            Some(InputMessage::Stop { at }) => break recorder.stop(at),
            None => break recorder.stop(Instant::now()),
        }
    };
    source.unsubscribe();
    tracing::info!("Recording stopped ({} actions)", actions.len());
    actions
}
