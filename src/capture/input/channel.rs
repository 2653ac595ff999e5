use crate::capture::input::hook;
use crate::capture::input::types::InputMessage;
use crate::error::Result;
use tokio::sync::mpsc::UnboundedSender;

/// A producer of raw input messages for one recording session at a time
pub trait InputSource: Send + Sync {
    /// Start forwarding input into `sender`
    fn subscribe(&self, sender: UnboundedSender<InputMessage>) -> Result<()>;

    /// Stop forwarding; safe to call when not subscribed
    fn unsubscribe(&self);
}

/// Global OS hook over mouse and keyboard
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeInputSource;

impl InputSource for NativeInputSource {
    fn subscribe(&self, sender: UnboundedSender<InputMessage>) -> Result<()> {
        let slot = hook::global_slot()?;
        let mut shared = slot.lock();
        shared.install(sender)?;
        tracing::info!("Input tracking started");
        Ok(())
    }

    fn unsubscribe(&self) {
        if let Some(slot) = hook::existing_slot() {
            if slot.lock().sender.take().is_some() {
                tracing::info!("Input tracking stopped");
            }
        }
    }
}
