//! Folding raw input into a sparse action log
//!
//! [`EventRecorder`] is pure: it consumes time-stamped input events in arrival
//! order and never touches the OS, so the coalescing rules can be exercised
//! with synthetic event streams.

use crate::capture::input::types::{InputEvent, RawInput};
use crate::capture::resolution::CoordinateScaler;
use crate::error::{Error, Result};
use crate::executor::types::ActionKind;
use crate::recorder::state::RecordingState;
use crate::task::types::Action;
use std::time::{Duration, Instant};

/// Pointer moves within this many virtual units of the last recorded move are dropped
pub const MOVE_NOISE_THRESHOLD: i32 = 10;

/// A character arriving this long after the previous key starts a new `type` action
pub const TEXT_TIMEOUT: Duration = Duration::from_secs(1);

/// Symbolic key that ends a recording; never recorded itself
pub const DEFAULT_ABORT_KEY: &str = "esc";

/// What the session loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub struct EventRecorder {
    scaler: CoordinateScaler,
    abort_key: String,
    state: RecordingState,
    started: Option<Instant>,
    actions: Vec<Action>,
    text_buffer: String,
    last_key_at: Option<Instant>,
    last_timestamp: f64,
}

impl EventRecorder {
    pub fn new(scaler: CoordinateScaler) -> Self {
        Self {
            scaler,
            abort_key: DEFAULT_ABORT_KEY.to_string(),
            state: RecordingState::Idle,
            started: None,
            actions: Vec::new(),
            text_buffer: String::new(),
            last_key_at: None,
            last_timestamp: 0.0,
        }
    }

    pub fn with_abort_key(mut self, key: impl Into<String>) -> Self {
        self.abort_key = key.into();
        self
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Actions recorded so far, excluding buffered text
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// idle -> recording; clears everything from a previous session
    pub fn start(&mut self, at: Instant) -> Result<()> {
        if self.state == RecordingState::Recording {
            return Err(Error::AlreadyRecording);
        }
        self.actions.clear();
        self.text_buffer.clear();
        self.last_key_at = None;
        self.last_timestamp = 0.0;
        self.started = Some(at);
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Flush pending text and return to idle, handing back the session's actions
    pub fn stop(&mut self, at: Instant) -> Vec<Action> {
        if self.state != RecordingState::Recording {
            return Vec::new();
        }
        self.flush(at);
        self.state = RecordingState::Idle;
        self.started = None;
        std::mem::take(&mut self.actions)
    }

    pub fn handle(&mut self, event: &InputEvent) -> Control {
        if self.state != RecordingState::Recording {
            return Control::Continue;
        }

        match &event.input {
            RawInput::PointerMoved { x, y } => {
                let (vx, vy) = self.scaler.to_virtual(*x as i32, *y as i32);
                if self.is_significant_move(vx, vy) {
                    self.flush(event.at);
                    let timestamp = self.timestamp(event.at);
                    self.actions.push(Action::mouse_move(timestamp, vx, vy));
                }
            }
            RawInput::ButtonPressed { button, x, y } => {
                let (vx, vy) = self.scaler.to_virtual(*x as i32, *y as i32);
                self.flush(event.at);
                let timestamp = self.timestamp(event.at);
                self.actions.push(Action::click(timestamp, *button, vx, vy));
            }
            RawInput::ButtonReleased { .. } => {}
            RawInput::Character(c) => {
                let timed_out = self
                    .last_key_at
                    .is_some_and(|last| event.at.saturating_duration_since(last) >= TEXT_TIMEOUT);
                if timed_out {
                    self.flush(event.at);
                }
                self.text_buffer.push(*c);
                self.last_key_at = Some(event.at);
            }
            RawInput::Key(name) => {
                self.flush(event.at);
                if *name == self.abort_key {
                    return Control::Stop;
                }
                let timestamp = self.timestamp(event.at);
                self.actions.push(Action::key(timestamp, name.clone()));
                self.last_key_at = Some(event.at);
            }
        }
        Control::Continue
    }

    fn is_significant_move(&self, vx: i32, vy: i32) -> bool {
        match self.actions.last() {
            Some(last) if last.kind == ActionKind::MouseMove => {
                let (lx, ly) = last.coordinate().unwrap_or((vx, vy));
                (lx - vx).abs() > MOVE_NOISE_THRESHOLD || (ly - vy).abs() > MOVE_NOISE_THRESHOLD
            }
            _ => true,
        }
    }

    /// Emit buffered characters as one `type` action
    fn flush(&mut self, at: Instant) {
        if self.text_buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text_buffer);
        let timestamp = self.timestamp(at);
        self.actions.push(Action::typed(timestamp, text));
    }

    /// Seconds since start, never earlier than the previous action
    fn timestamp(&mut self, at: Instant) -> f64 {
        let elapsed = self
            .started
            .map(|start| at.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0);
        self.last_timestamp = self.last_timestamp.max(elapsed);
        self.last_timestamp
    }
}
