//! The Action Executor
//!
//! Every simulated input goes through [`ComputerTool::execute`], which follows
//! a fixed announce -> wait -> act -> verify sequence and never returns a
//! fault to its caller: failures come back as error-bearing [`ToolResult`]s.

use crate::capture::resolution::CoordinateScaler;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::executor::desktop::Desktop;
use crate::executor::screenshot::encode_screenshot;
use crate::executor::types::{ActionKind, ActionRequest, MouseButton, ToolParams, ToolResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Protocol identifier advertised in [`ToolParams`]
pub const API_TYPE: &str = "computer_20241022";
pub const TOOL_NAME: &str = "computer";

/// Settle time between an action and its verification screenshot
pub const SCREENSHOT_DELAY: Duration = Duration::from_secs(1);

/// Interval between literal keystrokes for `type`
pub const TYPING_INTERVAL: Duration = Duration::from_millis(10);

/// Anything that can carry out an [`ActionRequest`]
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: ActionRequest) -> ToolResult;
}

pub struct ComputerTool {
    desktop: Arc<dyn Desktop>,
    scaler: CoordinateScaler,
    wait_before_action: Option<Duration>,
    pause: Duration,
}

impl ComputerTool {
    /// Query the physical display once and snapshot the relevant settings
    pub fn new(desktop: Arc<dyn Desktop>, settings: &Settings) -> Result<Self> {
        let physical = desktop.screen_size()?;
        let scaler = CoordinateScaler::new(physical, settings.scaling_target.resolution())?;
        tracing::info!(
            "Computer tool ready (physical={}, virtual={})",
            physical,
            scaler.virtual_resolution()
        );
        Ok(Self {
            desktop,
            scaler,
            wait_before_action: settings.wait_before_action,
            pause: settings.pause,
        })
    }

    pub fn to_params(&self) -> ToolParams {
        let virtual_res = self.scaler.virtual_resolution();
        ToolParams {
            api_type: API_TYPE.to_string(),
            name: TOOL_NAME.to_string(),
            display_width_px: virtual_res.width,
            display_height_px: virtual_res.height,
            display_number: 1,
        }
    }

    /// Capture the screen at virtual resolution
    pub async fn screenshot(&self) -> Result<ToolResult> {
        let desktop = self.desktop.clone();
        let target = self.scaler.virtual_resolution();
        let encoded = tokio::task::spawn_blocking(move || {
            let image = desktop.capture()?;
            encode_screenshot(image, target)
        })
        .await
        .map_err(|e| Error::CaptureFailure(format!("capture task failed: {}", e)))??;
        Ok(ToolResult::image(encoded))
    }

    async fn run(&self, request: &ActionRequest) -> Result<ToolResult> {
        tracing::info!(target: "executor", "Pending Action: {}", request.describe());

        if let Some(wait) = self.wait_before_action {
            tracing::info!(target: "executor", "Waiting {:?} before executing...", wait);
            tokio::time::sleep(wait).await;
        }

        let coordinate = match &request.coordinate {
            Some(arg) => {
                let (x, y) = arg.normalize()?;
                let scaled = self.scaler.to_physical(x, y);
                tracing::debug!("Scaled ({}, {}) -> {:?}", x, y, scaled);
                Some(scaled)
            }
            None => None,
        };

        match request.kind {
            ActionKind::MouseMove | ActionKind::LeftClickDrag => {
                let (x, y) = coordinate.ok_or_else(|| {
                    Error::MissingArgument(format!("coordinate required for {}", request.kind))
                })?;
                if request.kind == ActionKind::MouseMove {
                    self.desktop.move_to(x, y)?;
                } else {
                    self.desktop.drag_to(x, y)?;
                }
            }
            ActionKind::Key | ActionKind::Type => {
                let text = request
                    .text
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        Error::MissingArgument(format!("text required for {}", request.kind))
                    })?;
                if request.kind == ActionKind::Key {
                    self.desktop.key(text)?;
                } else {
                    for c in text.chars() {
                        self.desktop.type_char(c)?;
                        tokio::time::sleep(TYPING_INTERVAL).await;
                    }
                }
            }
            ActionKind::LeftClick
            | ActionKind::RightClick
            | ActionKind::MiddleClick
            | ActionKind::DoubleClick => {
                if let Some((x, y)) = coordinate {
                    self.desktop.move_to(x, y)?;
                }
                match request.kind {
                    ActionKind::LeftClick => self.desktop.click(MouseButton::Left)?,
                    ActionKind::RightClick => self.desktop.click(MouseButton::Right)?,
                    ActionKind::MiddleClick => self.desktop.click(MouseButton::Middle)?,
                    _ => self.desktop.double_click()?,
                }
            }
            ActionKind::CursorPosition => {
                let (x, y) = self.desktop.cursor_position()?;
                let (vx, vy) = self.scaler.to_virtual(x, y);
                return Ok(ToolResult::output(format!("X={},Y={}", vx, vy)));
            }
            ActionKind::Screenshot => return self.screenshot().await,
        }

        tokio::time::sleep(self.pause + SCREENSHOT_DELAY).await;
        self.screenshot().await
    }
}

#[async_trait]
impl Executor for ComputerTool {
    async fn execute(&self, request: ActionRequest) -> ToolResult {
        match self.run(&request).await {
            Ok(result) => result,
            Err(e) => {
                let message = format!("Action failed: {}", e);
                tracing::error!(target: "executor", "{}", message);
                ToolResult::error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::resolution::Resolution;
    use crate::executor::types::CoordinateArg;
    use image::{Rgba, RgbaImage};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        MoveTo(i32, i32),
        DragTo(i32, i32),
        Click(MouseButton),
        DoubleClick,
        Key(String),
        Char(char),
        Capture,
    }

    struct MockDesktop {
        size: Resolution,
        cursor: (i32, i32),
        fail_capture: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl MockDesktop {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: Resolution::new(width, height),
                cursor: (0, 0),
                fail_capture: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    impl Desktop for MockDesktop {
        fn screen_size(&self) -> Result<Resolution> {
            Ok(self.size)
        }
        fn move_to(&self, x: i32, y: i32) -> Result<()> {
            self.calls.lock().push(Call::MoveTo(x, y));
            Ok(())
        }
        fn drag_to(&self, x: i32, y: i32) -> Result<()> {
            self.calls.lock().push(Call::DragTo(x, y));
            Ok(())
        }
        fn click(&self, button: MouseButton) -> Result<()> {
            self.calls.lock().push(Call::Click(button));
            Ok(())
        }
        fn double_click(&self) -> Result<()> {
            self.calls.lock().push(Call::DoubleClick);
            Ok(())
        }
        fn key(&self, name: &str) -> Result<()> {
            self.calls.lock().push(Call::Key(name.to_string()));
            Ok(())
        }
        fn type_char(&self, c: char) -> Result<()> {
            self.calls.lock().push(Call::Char(c));
            Ok(())
        }
        fn cursor_position(&self) -> Result<(i32, i32)> {
            Ok(self.cursor)
        }
        fn capture(&self) -> Result<RgbaImage> {
            self.calls.lock().push(Call::Capture);
            if self.fail_capture {
                return Err(Error::CaptureFailure("display unavailable".to_string()));
            }
            Ok(RgbaImage::from_pixel(self.size.width, self.size.height, Rgba([1, 2, 3, 255])))
        }
    }

    fn tool(desktop: Arc<MockDesktop>) -> ComputerTool {
        let settings = Settings {
            pause: Duration::ZERO,
            ..Settings::default()
        };
        ComputerTool::new(desktop, &settings).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_move_scales_and_verifies() {
        let desktop = Arc::new(MockDesktop::new(2048, 1536));
        let tool = tool(desktop.clone());

        let result = tool
            .execute(ActionRequest::new(ActionKind::MouseMove).with_coordinate((256, 192)))
            .await;

        assert!(result.error.is_none(), "{:?}", result.error);
        assert!(result.image.is_some());
        assert_eq!(desktop.calls(), vec![Call::MoveTo(512, 384), Call::Capture]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_coordinate_is_error_without_screenshot() {
        let desktop = Arc::new(MockDesktop::new(1024, 768));
        let tool = tool(desktop.clone());

        for kind in [ActionKind::MouseMove, ActionKind::LeftClickDrag] {
            let result = tool.execute(ActionRequest::new(kind)).await;
            let error = result.error.expect("error expected");
            assert!(error.contains("coordinate required"), "{}", error);
            assert!(result.output.is_none());
            assert!(result.image.is_none());
        }
        assert!(desktop.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_is_missing_argument() {
        let desktop = Arc::new(MockDesktop::new(1024, 768));
        let tool = tool(desktop.clone());

        let result = tool
            .execute(ActionRequest::new(ActionKind::Type).with_text(""))
            .await;
        let error = result.error.expect("error expected");
        assert!(error.starts_with("Action failed: Missing argument"), "{}", error);
        assert!(result.image.is_none());

        let result = tool.execute(ActionRequest::new(ActionKind::Key)).await;
        assert!(result.is_error());
        assert!(desktop.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_coordinate_is_rejected() {
        let desktop = Arc::new(MockDesktop::new(1024, 768));
        let tool = tool(desktop.clone());

        let mut request = ActionRequest::new(ActionKind::MouseMove);
        request.coordinate = Some(CoordinateArg::List(vec![json!(1), json!("two")]));
        let result = tool.execute(request).await;
        assert!(result.error.unwrap().contains("Invalid argument"));
        assert!(desktop.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_sends_each_character() {
        let desktop = Arc::new(MockDesktop::new(1024, 768));
        let tool = tool(desktop.clone());

        let result = tool
            .execute(ActionRequest::new(ActionKind::Type).with_text("ok"))
            .await;
        assert!(result.image.is_some());
        assert_eq!(
            desktop.calls(),
            vec![Call::Char('o'), Call::Char('k'), Call::Capture]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_variants_map_to_distinct_primitives() {
        let desktop = Arc::new(MockDesktop::new(1024, 768));
        let tool = tool(desktop.clone());

        for kind in [
            ActionKind::LeftClick,
            ActionKind::RightClick,
            ActionKind::MiddleClick,
            ActionKind::DoubleClick,
        ] {
            assert!(!tool.execute(ActionRequest::new(kind)).await.is_error());
        }
        tool.execute(ActionRequest::new(ActionKind::LeftClick).with_coordinate((10, 10)))
            .await;

        assert_eq!(
            desktop.calls(),
            vec![
                Call::Click(MouseButton::Left),
                Call::Capture,
                Call::Click(MouseButton::Right),
                Call::Capture,
                Call::Click(MouseButton::Middle),
                Call::Capture,
                Call::DoubleClick,
                Call::Capture,
                Call::MoveTo(10, 10),
                Call::Click(MouseButton::Left),
                Call::Capture,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_and_drag() {
        let desktop = Arc::new(MockDesktop::new(2048, 1536));
        let tool = tool(desktop.clone());

        tool.execute(ActionRequest::new(ActionKind::Key).with_text("ctrl+s"))
            .await;
        tool.execute(ActionRequest::new(ActionKind::LeftClickDrag).with_coordinate((100, 50)))
            .await;
        assert_eq!(
            desktop.calls(),
            vec![
                Call::Key("ctrl+s".to_string()),
                Call::Capture,
                Call::DragTo(200, 100),
                Call::Capture,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_position_reports_virtual_without_screenshot() {
        let mut desktop = MockDesktop::new(2048, 1536);
        desktop.cursor = (1000, 700);
        let desktop = Arc::new(desktop);
        let tool = tool(desktop.clone());

        let result = tool.execute(ActionRequest::new(ActionKind::CursorPosition)).await;
        assert_eq!(result.output.as_deref(), Some("X=500,Y=350"));
        assert!(result.image.is_none());
        assert!(desktop.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_screenshot_only_carries_image() {
        let desktop = Arc::new(MockDesktop::new(1920, 1080));
        let tool = tool(desktop.clone());

        let result = tool.execute(ActionRequest::screenshot()).await;
        assert!(result.image.is_some());
        assert!(result.output.is_none() && result.error.is_none());
        assert_eq!(desktop.calls(), vec![Call::Capture]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_failure_fails_whole_call() {
        let mut desktop = MockDesktop::new(1024, 768);
        desktop.fail_capture = true;
        let desktop = Arc::new(desktop);
        let tool = tool(desktop.clone());

        let result = tool
            .execute(ActionRequest::new(ActionKind::MouseMove).with_coordinate((1, 1)))
            .await;
        let error = result.error.expect("error expected");
        assert!(error.contains("display unavailable"), "{}", error);
        assert!(result.image.is_none());
        assert_eq!(desktop.calls(), vec![Call::MoveTo(1, 1), Call::Capture]);
    }

    #[test]
    fn test_params_advertise_virtual_resolution() {
        let desktop = Arc::new(MockDesktop::new(2560, 1440));
        let params = tool(desktop).to_params();
        assert_eq!(params.name, "computer");
        assert_eq!(params.api_type, API_TYPE);
        assert_eq!((params.display_width_px, params.display_height_px), (1024, 768));
        assert_eq!(params.display_number, 1);

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["type"], json!(API_TYPE));
    }

    #[test]
    fn test_zero_sized_display_is_configuration_error() {
        let desktop = Arc::new(MockDesktop::new(0, 0));
        let result = ComputerTool::new(desktop, &Settings::default());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
