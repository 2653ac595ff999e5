//! Process-wide OS input hook (rdev)
//!
//! `rdev::listen` blocks its thread for the life of the process and cannot be
//! torn down, so the hook is started once and forwards into whichever
//! recording session currently owns the slot.

use crate::capture::input::types::{InputEvent, InputMessage, RawInput};
use crate::error::{Error, Result};
use crate::executor::types::MouseButton;
use parking_lot::Mutex;
use rdev::{Button, Event, EventType, Key};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Default)]
pub(crate) struct HookShared {
    pub(crate) sender: Option<UnboundedSender<InputMessage>>,
    pub(crate) failure: Option<String>,
}

pub(crate) type HookSlot = Arc<Mutex<HookShared>>;

static HOOK: Mutex<Option<HookSlot>> = parking_lot::const_mutex(None);

/// The shared slot, starting the hook thread on first use
pub(crate) fn global_slot() -> Result<HookSlot> {
    let mut hook = HOOK.lock();
    if let Some(slot) = hook.as_ref() {
        return Ok(slot.clone());
    }

    let slot = HookSlot::default();
    let thread_slot = slot.clone();
    std::thread::Builder::new()
        .name("input-hook".to_string())
        .spawn(move || run_hook(thread_slot))?;

    *hook = Some(slot.clone());
    Ok(slot)
}

/// The shared slot if the hook thread has been started
pub(crate) fn existing_slot() -> Option<HookSlot> {
    HOOK.lock().clone()
}

fn run_hook(slot: HookSlot) {
    tracing::info!("Global input hook started");
    let callback_slot = slot.clone();
    let mut pointer = (0.0, 0.0);

    let result = rdev::listen(move |event| {
        if let Some(input) = translate(&event, &mut pointer) {
            if let Some(sender) = callback_slot.lock().sender.as_ref() {
                let _ = sender.send(InputMessage::Event(InputEvent::now(input)));
            }
        }
    });

    if let Err(e) = result {
        let message = format!("{:?}", e);
        tracing::error!("Global input hook failed: {}", message);
        let mut shared = slot.lock();
        if let Some(sender) = shared.sender.take() {
            let _ = sender.send(InputMessage::Stop { at: Instant::now() });
        }
        shared.failure = Some(message);
    }
}

impl HookShared {
    pub(crate) fn install(&mut self, sender: UnboundedSender<InputMessage>) -> Result<()> {
        if let Some(failure) = &self.failure {
            return Err(Error::Input(format!("input hook unavailable: {}", failure)));
        }
        if self.sender.as_ref().is_some_and(|s| !s.is_closed()) {
            return Err(Error::AlreadyRecording);
        }
        self.sender = Some(sender);
        Ok(())
    }
}

/// Classify an rdev event, tracking the last pointer position for button events
pub(crate) fn translate(event: &Event, pointer: &mut (f64, f64)) -> Option<RawInput> {
    match &event.event_type {
        EventType::MouseMove { x, y } => {
            *pointer = (*x, *y);
            Some(RawInput::PointerMoved { x: *x, y: *y })
        }
        EventType::ButtonPress(button) => map_button(button).map(|button| RawInput::ButtonPressed {
            button,
            x: pointer.0,
            y: pointer.1,
        }),
        EventType::ButtonRelease(button) => {
            map_button(button).map(|button| RawInput::ButtonReleased {
                button,
                x: pointer.0,
                y: pointer.1,
            })
        }
        EventType::KeyPress(key) => match printable(event.name.as_deref()) {
            Some(c) => Some(RawInput::Character(c)),
            None => key_name(key).map(RawInput::Key),
        },
        EventType::KeyRelease(_) | EventType::Wheel { .. } => None,
    }
}

fn map_button(button: &Button) -> Option<MouseButton> {
    match button {
        Button::Left => Some(MouseButton::Left),
        Button::Right => Some(MouseButton::Right),
        Button::Middle => Some(MouseButton::Middle),
        Button::Unknown(_) => None,
    }
}

/// A single non-control character, if the key produced one
fn printable(name: Option<&str>) -> Option<char> {
    let mut chars = name?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Symbolic name used in recorded `key` actions; matches what the executor accepts.
///
/// Character keys resolve to their unshifted character. That is what a key
/// reports while a modifier such as ctrl turns its text into a control code.
pub(crate) fn key_name(key: &Key) -> Option<String> {
    let name = match key {
        Key::Return | Key::KpReturn => "enter",
        Key::Tab => "tab",
        Key::Escape => "esc",
        Key::Backspace => "backspace",
        Key::Delete | Key::KpDelete => "delete",
        Key::Insert => "insert",
        Key::Space => "space",
        Key::ShiftLeft | Key::ShiftRight => "shift",
        Key::ControlLeft | Key::ControlRight => "ctrl",
        Key::Alt | Key::AltGr => "alt",
        Key::MetaLeft | Key::MetaRight => "meta",
        Key::UpArrow => "up",
        Key::DownArrow => "down",
        Key::LeftArrow => "left",
        Key::RightArrow => "right",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "page_up",
        Key::PageDown => "page_down",
        Key::CapsLock => "caps_lock",
        Key::NumLock => "num_lock",
        Key::ScrollLock => "scroll_lock",
        Key::PrintScreen => "print_screen",
        Key::Pause => "pause",
        // `+` separates chord parts
        Key::KpPlus => "plus",
        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",
        Key::Function | Key::Unknown(_) => return None,
        other => return key_char(other).map(String::from),
    };
    Some(name.to_string())
}

fn key_char(key: &Key) -> Option<char> {
    let c = match key {
        Key::KeyA => 'a',
        Key::KeyB => 'b',
        Key::KeyC => 'c',
        Key::KeyD => 'd',
        Key::KeyE => 'e',
        Key::KeyF => 'f',
        Key::KeyG => 'g',
        Key::KeyH => 'h',
        Key::KeyI => 'i',
        Key::KeyJ => 'j',
        Key::KeyK => 'k',
        Key::KeyL => 'l',
        Key::KeyM => 'm',
        Key::KeyN => 'n',
        Key::KeyO => 'o',
        Key::KeyP => 'p',
        Key::KeyQ => 'q',
        Key::KeyR => 'r',
        Key::KeyS => 's',
        Key::KeyT => 't',
        Key::KeyU => 'u',
        Key::KeyV => 'v',
        Key::KeyW => 'w',
        Key::KeyX => 'x',
        Key::KeyY => 'y',
        Key::KeyZ => 'z',
        Key::Num0 | Key::Kp0 => '0',
        Key::Num1 | Key::Kp1 => '1',
        Key::Num2 | Key::Kp2 => '2',
        Key::Num3 | Key::Kp3 => '3',
        Key::Num4 | Key::Kp4 => '4',
        Key::Num5 | Key::Kp5 => '5',
        Key::Num6 | Key::Kp6 => '6',
        Key::Num7 | Key::Kp7 => '7',
        Key::Num8 | Key::Kp8 => '8',
        Key::Num9 | Key::Kp9 => '9',
        Key::BackQuote => '`',
        Key::Minus | Key::KpMinus => '-',
        Key::Equal => '=',
        Key::LeftBracket => '[',
        Key::RightBracket => ']',
        Key::SemiColon => ';',
        Key::Quote => '\'',
        Key::BackSlash | Key::IntlBackslash => '\\',
        Key::Comma => ',',
        Key::Dot => '.',
        Key::Slash | Key::KpDivide => '/',
        Key::KpMultiply => '*',
        _ => return None,
    };
    Some(c)
}
