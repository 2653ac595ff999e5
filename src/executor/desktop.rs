//! The live desktop as seen by the executor.
//!
//! All coordinates at this seam are physical pixels; scaling happens above it.

use crate::capture::resolution::Resolution;
use crate::error::Result;
use crate::executor::types::MouseButton;
use image::RgbaImage;

/// Input injection and screen capture primitives
pub trait Desktop: Send + Sync {
    /// Physical size of the primary display
    fn screen_size(&self) -> Result<Resolution>;

    fn move_to(&self, x: i32, y: i32) -> Result<()>;

    /// Press the left button, move to (x, y), release
    fn drag_to(&self, x: i32, y: i32) -> Result<()>;

    fn click(&self, button: MouseButton) -> Result<()>;

    fn double_click(&self) -> Result<()>;

    /// Send a symbolic key, or a `+`-joined chord such as `ctrl+c`
    fn key(&self, name: &str) -> Result<()>;

    /// Send one literal character
    fn type_char(&self, c: char) -> Result<()>;

    fn cursor_position(&self) -> Result<(i32, i32)>;

    /// Capture the primary display at its native size
    fn capture(&self) -> Result<RgbaImage>;
}
