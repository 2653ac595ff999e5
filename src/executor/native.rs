//! Native desktop backend: enigo for input injection, xcap for capture

use crate::capture::resolution::Resolution;
use crate::error::{Error, Result};
use crate::executor::desktop::Desktop;
use crate::executor::types::MouseButton;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use image::RgbaImage;
use xcap::Monitor;

/// Drives the real pointer, keyboard, and screen.
///
/// A fresh enigo connection is opened per primitive so the backend stays
/// `Send + Sync` on every platform.
pub struct NativeDesktop {
    failsafe: bool,
}

impl NativeDesktop {
    pub fn new(failsafe: bool) -> Self {
        Self { failsafe }
    }

    fn connect() -> Result<Enigo> {
        Enigo::new(&Settings::default())
            .map_err(|e| Error::Input(format!("Failed to initialize input backend: {:?}", e)))
    }

    /// Run an injecting primitive, refusing while the pointer rests at (0, 0)
    fn inject<T>(&self, f: impl FnOnce(&mut Enigo) -> Result<T>) -> Result<T> {
        let mut enigo = Self::connect()?;
        if self.failsafe {
            let position = enigo.location().map_err(input_error)?;
            if position == (0, 0) {
                return Err(Error::FailSafe);
            }
        }
        f(&mut enigo)
    }

    fn map_button(button: MouseButton) -> Button {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }

    pub(crate) fn map_key(key: &str) -> Result<Key> {
        let key = key.trim();
        let lower = key.to_lowercase();
        let mapped = match lower.as_str() {
            "enter" | "return" => Key::Return,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "control" | "ctrl" => Key::Control,
            "shift" => Key::Shift,
            "alt" | "option" => Key::Alt,
            "meta" | "command" | "cmd" | "super" | "windows" | "win" => Key::Meta,
            "delete" | "del" => Key::Delete,
            "space" => Key::Space,
            "up" => Key::UpArrow,
            "down" => Key::DownArrow,
            "left" => Key::LeftArrow,
            "right" => Key::RightArrow,
            "home" => Key::Home,
            "end" => Key::End,
            "page_up" | "pageup" => Key::PageUp,
            "page_down" | "pagedown" => Key::PageDown,
            "caps_lock" | "capslock" => Key::CapsLock,
            "plus" => Key::Unicode('+'),
            "insert" => Self::insert_key(),
            "num_lock" | "numlock" => Self::num_lock_key(),
            "scroll_lock" | "scrolllock" => Self::scroll_lock_key(),
            "print_screen" | "printscreen" => Self::print_screen_key(),
            "pause" => Self::pause_key(),
            "f1" => Key::F1,
            "f2" => Key::F2,
            "f3" => Key::F3,
            "f4" => Key::F4,
            "f5" => Key::F5,
            "f6" => Key::F6,
            "f7" => Key::F7,
            "f8" => Key::F8,
            "f9" => Key::F9,
            "f10" => Key::F10,
            "f11" => Key::F11,
            "f12" => Key::F12,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Unicode(c),
                    _ => return Err(Error::InvalidArgument(format!("Unsupported key: {}", key))),
                }
            }
        };
        Ok(mapped)
    }

    // Lock and system keys exist on Windows and X11 only; macOS replays them
    // on the keys that occupy the same place on an extended keyboard

    #[cfg(not(target_os = "macos"))]
    fn insert_key() -> Key {
        Key::Insert
    }

    #[cfg(target_os = "macos")]
    fn insert_key() -> Key {
        Key::Help
    }

    #[cfg(not(target_os = "macos"))]
    fn num_lock_key() -> Key {
        Key::Numlock
    }

    #[cfg(target_os = "macos")]
    fn num_lock_key() -> Key {
        // kVK_ANSI_KeypadClear
        Key::Other(0x47)
    }

    #[cfg(target_os = "windows")]
    fn scroll_lock_key() -> Key {
        Key::Scroll
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn scroll_lock_key() -> Key {
        Key::ScrollLock
    }

    #[cfg(target_os = "macos")]
    fn scroll_lock_key() -> Key {
        Key::F14
    }

    #[cfg(target_os = "windows")]
    fn print_screen_key() -> Key {
        Key::Snapshot
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn print_screen_key() -> Key {
        Key::Print
    }

    #[cfg(target_os = "macos")]
    fn print_screen_key() -> Key {
        Key::F13
    }

    #[cfg(not(target_os = "macos"))]
    fn pause_key() -> Key {
        Key::Pause
    }

    #[cfg(target_os = "macos")]
    fn pause_key() -> Key {
        Key::F15
    }

    fn primary_monitor() -> Result<Monitor> {
        let monitors = Monitor::all()
            .map_err(|e| Error::CaptureFailure(format!("Failed to list monitors: {}", e)))?;
        let index = monitors.iter().position(|m| m.is_primary()).unwrap_or(0);
        monitors
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::CaptureFailure("No monitor available".to_string()))
    }
}

fn input_error(e: enigo::InputError) -> Error {
    Error::Input(format!("{:?}", e))
}

impl Desktop for NativeDesktop {
    fn screen_size(&self) -> Result<Resolution> {
        let enigo = Self::connect()?;
        let (width, height) = enigo.main_display().map_err(input_error)?;
        Ok(Resolution::new(width.max(0) as u32, height.max(0) as u32))
    }

    fn move_to(&self, x: i32, y: i32) -> Result<()> {
        self.inject(|enigo| enigo.move_mouse(x, y, Coordinate::Abs).map_err(input_error))
    }

    fn drag_to(&self, x: i32, y: i32) -> Result<()> {
        self.inject(|enigo| {
            enigo.button(Button::Left, Direction::Press).map_err(input_error)?;
            let moved = enigo.move_mouse(x, y, Coordinate::Abs).map_err(input_error);
            // Release even if the move failed so the button is not left held
            enigo.button(Button::Left, Direction::Release).map_err(input_error)?;
            moved
        })
    }

    fn click(&self, button: MouseButton) -> Result<()> {
        self.inject(|enigo| {
            enigo
                .button(Self::map_button(button), Direction::Click)
                .map_err(input_error)
        })
    }

    fn double_click(&self) -> Result<()> {
        self.inject(|enigo| {
            enigo.button(Button::Left, Direction::Click).map_err(input_error)?;
            enigo.button(Button::Left, Direction::Click).map_err(input_error)
        })
    }

    fn key(&self, name: &str) -> Result<()> {
        let keys = name
            .split('+')
            .filter(|part| !part.trim().is_empty())
            .map(Self::map_key)
            .collect::<Result<Vec<_>>>()?;
        let Some((last, modifiers)) = keys.split_last() else {
            return Err(Error::MissingArgument("key name is empty".to_string()));
        };

        self.inject(|enigo| {
            for modifier in modifiers {
                enigo.key(*modifier, Direction::Press).map_err(input_error)?;
            }
            let result = enigo.key(*last, Direction::Click).map_err(input_error);
            for modifier in modifiers.iter().rev() {
                enigo.key(*modifier, Direction::Release).map_err(input_error)?;
            }
            result
        })
    }

    fn type_char(&self, c: char) -> Result<()> {
        self.inject(|enigo| {
            let mut buf = [0u8; 4];
            enigo.text(c.encode_utf8(&mut buf)).map_err(input_error)
        })
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        let enigo = Self::connect()?;
        enigo.location().map_err(input_error)
    }

    fn capture(&self) -> Result<RgbaImage> {
        let monitor = Self::primary_monitor()?;
        let captured = monitor
            .capture_image()
            .map_err(|e| Error::CaptureFailure(e.to_string()))?;
        let (width, height) = (captured.width(), captured.height());
        RgbaImage::from_raw(width, height, captured.into_raw()).ok_or_else(|| {
            Error::CaptureFailure("captured buffer does not match its dimensions".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_names() {
        assert!(matches!(NativeDesktop::map_key("Enter"), Ok(Key::Return)));
        assert!(matches!(NativeDesktop::map_key("esc"), Ok(Key::Escape)));
        assert!(matches!(NativeDesktop::map_key("page_down"), Ok(Key::PageDown)));
        assert!(matches!(NativeDesktop::map_key("a"), Ok(Key::Unicode('a'))));
        assert!(matches!(NativeDesktop::map_key("plus"), Ok(Key::Unicode('+'))));
        assert!(NativeDesktop::map_key("insert").is_ok());
        assert!(NativeDesktop::map_key("print_screen").is_ok());
    }

    #[test]
    fn test_map_key_unknown() {
        assert!(matches!(
            NativeDesktop::map_key("hyperdrive"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
