use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed set of primitive actions the executor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MouseMove,
    LeftClickDrag,
    LeftClick,
    RightClick,
    MiddleClick,
    DoubleClick,
    Key,
    Type,
    Screenshot,
    CursorPosition,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::MouseMove => "mouse_move",
            ActionKind::LeftClickDrag => "left_click_drag",
            ActionKind::LeftClick => "left_click",
            ActionKind::RightClick => "right_click",
            ActionKind::MiddleClick => "middle_click",
            ActionKind::DoubleClick => "double_click",
            ActionKind::Key => "key",
            ActionKind::Type => "type",
            ActionKind::Screenshot => "screenshot",
            ActionKind::CursorPosition => "cursor_position",
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(
            self,
            ActionKind::LeftClick
                | ActionKind::RightClick
                | ActionKind::MiddleClick
                | ActionKind::DoubleClick
        )
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mouse buttons the desktop backend can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

/// A coordinate as handed to the executor.
///
/// Callers may pass a typed pair, or an arbitrary JSON list (as produced by an
/// external planner) that still has to be validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateArg {
    Pair(i32, i32),
    List(Vec<serde_json::Value>),
}

impl CoordinateArg {
    /// Validate and truncate to an integer pair in virtual units
    pub fn normalize(&self) -> Result<(i32, i32)> {
        match self {
            CoordinateArg::Pair(x, y) => Ok((*x, *y)),
            CoordinateArg::List(values) => {
                if values.len() != 2 {
                    return Err(Error::InvalidArgument(format!(
                        "Invalid coordinate format: {}",
                        self
                    )));
                }
                let component = |v: &serde_json::Value| {
                    v.as_f64().map(|f| f as i32).ok_or_else(|| {
                        Error::InvalidArgument(format!("Invalid coordinate values: {}", self))
                    })
                };
                Ok((component(&values[0])?, component(&values[1])?))
            }
        }
    }
}

impl From<(i32, i32)> for CoordinateArg {
    fn from((x, y): (i32, i32)) -> Self {
        CoordinateArg::Pair(x, y)
    }
}

impl std::fmt::Display for CoordinateArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateArg::Pair(x, y) => write!(f, "({}, {})", x, y),
            CoordinateArg::List(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// One executor invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub coordinate: Option<CoordinateArg>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            text: None,
            coordinate: None,
        }
    }

    pub fn screenshot() -> Self {
        Self::new(ActionKind::Screenshot)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_coordinate(mut self, coordinate: impl Into<CoordinateArg>) -> Self {
        self.coordinate = Some(coordinate.into());
        self
    }

    /// Human-readable summary shown before the action runs
    pub fn describe(&self) -> String {
        let coordinate = self
            .coordinate
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "None".to_string());
        let text = self.text.as_deref().unwrap_or("");
        match self.kind {
            ActionKind::MouseMove => format!("Mouse Move to coordinates: {}", coordinate),
            ActionKind::LeftClickDrag => format!("Left Click Drag to coordinates: {}", coordinate),
            ActionKind::Key => format!("Key text: '{}'", text),
            ActionKind::Type => format!("Type text: '{}'", text),
            ActionKind::LeftClick
            | ActionKind::RightClick
            | ActionKind::MiddleClick
            | ActionKind::DoubleClick => {
                format!("Perform {}", self.kind.as_str().replace('_', " "))
            }
            ActionKind::Screenshot => "Take a screenshot".to_string(),
            ActionKind::CursorPosition => "Get current cursor position".to_string(),
        }
    }
}

/// Outcome of one executor call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub output: Option<String>,
    pub error: Option<String>,
    /// Base64-encoded PNG
    #[serde(rename = "base64_image")]
    pub image: Option<String>,
    pub system: Option<String>,
}

impl ToolResult {
    pub fn output(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Default::default()
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Default::default()
        }
    }

    /// True when no field carries information
    pub fn is_empty(&self) -> bool {
        [&self.output, &self.error, &self.image, &self.system]
            .iter()
            .all(|field| field.as_deref().map_or(true, str::is_empty))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Capability descriptor advertised to an external planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParams {
    #[serde(rename = "type")]
    pub api_type: String,
    pub name: String,
    pub display_width_px: u32,
    pub display_height_px: u32,
    pub display_number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_list_normalizes() {
        let arg: CoordinateArg = serde_json::from_value(json!([12.7, 40])).unwrap();
        assert_eq!(arg.normalize().unwrap(), (12, 40));
    }

    #[test]
    fn test_coordinate_pair_deserializes_as_pair() {
        let arg: CoordinateArg = serde_json::from_value(json!([3, 4])).unwrap();
        assert_eq!(arg, CoordinateArg::Pair(3, 4));
    }

    #[test]
    fn test_coordinate_wrong_arity_is_invalid() {
        let arg = CoordinateArg::List(vec![json!(1), json!(2), json!(3)]);
        assert!(matches!(arg.normalize(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_coordinate_non_numeric_is_invalid() {
        let arg = CoordinateArg::List(vec![json!("a"), json!(2)]);
        assert!(matches!(arg.normalize(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_tool_result_emptiness() {
        assert!(ToolResult::default().is_empty());
        assert!(!ToolResult::output("X=1,Y=2").is_empty());
        assert!(!ToolResult::error("boom").is_empty());
    }

    #[test]
    fn test_describe() {
        let move_req = ActionRequest::new(ActionKind::MouseMove).with_coordinate((10, 20));
        assert_eq!(move_req.describe(), "Mouse Move to coordinates: (10, 20)");

        let click = ActionRequest::new(ActionKind::DoubleClick);
        assert_eq!(click.describe(), "Perform double click");

        let typed = ActionRequest::new(ActionKind::Type).with_text("ok");
        assert_eq!(typed.describe(), "Type text: 'ok'");
    }

    #[test]
    fn test_request_from_planner_json() {
        let req: ActionRequest =
            serde_json::from_value(json!({"action": "left_click_drag", "coordinate": [5, 6]}))
                .unwrap();
        assert_eq!(req.kind, ActionKind::LeftClickDrag);
        assert_eq!(req.coordinate, Some(CoordinateArg::Pair(5, 6)));
        assert_eq!(req.text, None);
    }
}
