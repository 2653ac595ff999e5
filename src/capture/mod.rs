//! Input capture and coordinate normalization

pub mod input;
pub mod resolution;

pub use input::{InputEvent, InputMessage, InputSource, NativeInputSource, RawInput};
pub use resolution::{CoordinateScaler, Resolution, ScalingTarget};
