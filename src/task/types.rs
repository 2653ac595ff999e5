use crate::executor::types::{ActionKind, ActionRequest, MouseButton};
use serde::{Deserialize, Serialize};

/// One recorded, replayable unit of input.
///
/// `x`/`y` are always in virtual resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Seconds since the recording started
    pub timestamp: f64,
    #[serde(rename = "action_type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub button: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Action {
    fn bare(timestamp: f64, kind: ActionKind) -> Self {
        Self {
            timestamp,
            kind,
            x: None,
            y: None,
            button: None,
            key: None,
            text: None,
        }
    }

    pub fn mouse_move(timestamp: f64, x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::bare(timestamp, ActionKind::MouseMove)
        }
    }

    pub fn click(timestamp: f64, button: MouseButton, x: i32, y: i32) -> Self {
        let kind = match button {
            MouseButton::Left => ActionKind::LeftClick,
            MouseButton::Right => ActionKind::RightClick,
            MouseButton::Middle => ActionKind::MiddleClick,
        };
        Self {
            x: Some(x),
            y: Some(y),
            button: Some(button.as_str().to_string()),
            ..Self::bare(timestamp, kind)
        }
    }

    pub fn key(timestamp: f64, name: impl Into<String>) -> Self {
        Self {
            key: Some(name.into()),
            ..Self::bare(timestamp, ActionKind::Key)
        }
    }

    pub fn typed(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::bare(timestamp, ActionKind::Type)
        }
    }

    pub fn coordinate(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }

    /// The executor call that replays this action
    pub fn to_request(&self) -> ActionRequest {
        let mut request = ActionRequest::new(self.kind);
        request.text = match self.kind {
            ActionKind::Key => self.key.clone(),
            _ => self.text.clone(),
        };
        if let Some(coordinate) = self.coordinate() {
            request = request.with_coordinate(coordinate);
        }
        request
    }
}

/// A named, described, ordered sequence of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub actions: Vec<Action>,
}

impl Task {
    pub fn new(name: impl Into<String>, description: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            actions,
        }
    }

    /// Storage key derived from the name: lower-cased, spaces -> underscores
    pub fn storage_key(name: &str) -> String {
        name.trim().to_lowercase().replace(' ', "_")
    }

    pub fn key(&self) -> String {
        Self::storage_key(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::CoordinateArg;
    use serde_json::json;

    #[test]
    fn test_storage_key() {
        assert_eq!(Task::storage_key("Open Mail Client"), "open_mail_client");
        assert_eq!(Task::storage_key("already_normal"), "already_normal");
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let value = serde_json::to_value(Action::typed(1.5, "ok")).unwrap();
        assert_eq!(
            value,
            json!({
                "timestamp": 1.5,
                "action_type": "type",
                "x": null,
                "y": null,
                "button": null,
                "key": null,
                "text": "ok"
            })
        );
    }

    #[test]
    fn test_parses_document_with_missing_optionals() {
        let action: Action =
            serde_json::from_value(json!({"timestamp": 0.25, "action_type": "mouse_move", "x": 3, "y": 4}))
                .unwrap();
        assert_eq!(action, Action::mouse_move(0.25, 3, 4));
    }

    #[test]
    fn test_to_request_mapping() {
        let key = Action::key(0.0, "enter").to_request();
        assert_eq!(key.kind, ActionKind::Key);
        assert_eq!(key.text.as_deref(), Some("enter"));
        assert_eq!(key.coordinate, None);

        let click = Action::click(0.0, MouseButton::Right, 7, 9).to_request();
        assert_eq!(click.kind, ActionKind::RightClick);
        assert_eq!(click.coordinate, Some(CoordinateArg::Pair(7, 9)));

        let typed = Action::typed(0.0, "hi").to_request();
        assert_eq!(typed.text.as_deref(), Some("hi"));
    }
}
