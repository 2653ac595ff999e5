//! Input tracking (mouse, keyboard) capture
//!
//! Raw OS callbacks are classified into [`RawInput`] messages and pushed onto
//! a single-consumer queue owned by the active recording session.

pub mod channel;
pub(crate) mod hook;
pub mod types;

pub use channel::{InputSource, NativeInputSource};
pub use types::{InputEvent, InputMessage, RawInput};
