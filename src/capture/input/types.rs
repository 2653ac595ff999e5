use crate::executor::types::MouseButton;
use std::time::Instant;

/// A raw input callback, already classified.
///
/// Literal characters and symbolic keys are disjoint: a key that produces a
/// printable character arrives as `Character`, everything else as `Key`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Pointer position in physical pixels
    PointerMoved { x: f64, y: f64 },
    ButtonPressed { button: MouseButton, x: f64, y: f64 },
    ButtonReleased { button: MouseButton, x: f64, y: f64 },
    Character(char),
    /// Symbolic key name, e.g. `enter`, `shift`, `f5`
    Key(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub at: Instant,
    pub input: RawInput,
}

impl InputEvent {
    pub fn new(at: Instant, input: RawInput) -> Self {
        Self { at, input }
    }

    pub fn now(input: RawInput) -> Self {
        Self::new(Instant::now(), input)
    }
}

/// What flows through the single-consumer recording queue
#[derive(Debug, Clone, PartialEq)]
pub enum InputMessage {
    Event(InputEvent),
    /// Explicit stop request
    Stop { at: Instant },
}
