//! Action execution against the live desktop
//!
//! [`ComputerTool`] is the single path through which simulated input reaches
//! the operating system. The [`Desktop`] trait separates it from the native
//! enigo/xcap backend so it can be driven by mocks.

pub mod computer;
pub mod desktop;
pub mod native;
pub mod screenshot;
pub mod types;

pub use computer::{ComputerTool, Executor, API_TYPE, SCREENSHOT_DELAY, TOOL_NAME};
pub use desktop::Desktop;
pub use native::NativeDesktop;
pub use types::{ActionKind, ActionRequest, CoordinateArg, MouseButton, ToolParams, ToolResult};
