//! Action descriptors: the declarative records widget bindings produce.
//!
//! Payload fields use the UI layer's camelCase wire names, so a descriptor
//! such as `{"type": "NAVIGATE", "pageNameOrUrl": "Home"}` deserializes
//! directly.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{NavigationTarget, Params};

/// One side effect to perform. Immutable once dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ActionDescriptor {
    Navigate(NavigateAction),
    RunQuery(RunQueryAction),
    ShowAlert(ShowAlertAction),
}

impl ActionDescriptor {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Navigate(_) => ActionKind::Navigate,
            Self::RunQuery(_) => ActionKind::RunQuery,
            Self::ShowAlert(_) => ActionKind::ShowAlert,
        }
    }
}

impl From<NavigateAction> for ActionDescriptor {
    fn from(action: NavigateAction) -> Self {
        Self::Navigate(action)
    }
}

impl From<RunQueryAction> for ActionDescriptor {
    fn from(action: RunQueryAction) -> Self {
        Self::RunQuery(action)
    }
}

impl From<ShowAlertAction> for ActionDescriptor {
    fn from(action: ShowAlertAction) -> Self {
        Self::ShowAlert(action)
    }
}

/// Discriminant of [`ActionDescriptor`], used for logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    RunQuery,
    ShowAlert,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Navigate => "navigate",
            Self::RunQuery => "run_query",
            Self::ShowAlert => "show_alert",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Navigate
// ---------------------------------------------------------------------------

/// Navigate to an absolute URL or to a page of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateAction {
    pub page_name_or_url: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: Params,
    #[serde(default)]
    pub target: NavigationTarget,
}

impl NavigateAction {
    /// Same-window navigation with no parameters.
    pub fn to(page_name_or_url: impl Into<String>) -> Self {
        Self {
            page_name_or_url: page_name_or_url.into(),
            params: Params::new(),
            target: NavigationTarget::SameWindow,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn in_new_window(mut self) -> Self {
        self.target = NavigationTarget::NewWindow;
        self
    }
}

// ---------------------------------------------------------------------------
// RunQuery
// ---------------------------------------------------------------------------

/// Run a named query, then the success or error callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryAction {
    pub action_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_success: Vec<ActionDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_error: Vec<ActionDescriptor>,
}

impl RunQueryAction {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            params: BTreeMap::new(),
            on_success: Vec::new(),
            on_error: Vec::new(),
        }
    }

    pub fn on_success(mut self, action: impl Into<ActionDescriptor>) -> Self {
        self.on_success.push(action.into());
        self
    }

    pub fn on_error(mut self, action: impl Into<ActionDescriptor>) -> Self {
        self.on_error.push(action.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ShowAlert
// ---------------------------------------------------------------------------

/// Presentation style of an alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for AlertStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Show a transient message to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowAlertAction {
    pub message: String,
    #[serde(default)]
    pub style: AlertStyle,
}

impl ShowAlertAction {
    pub fn new(message: impl Into<String>, style: AlertStyle) -> Self {
        Self {
            message: message.into(),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn navigate_descriptor_from_ui_payload() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "type": "NAVIGATE",
            "pageNameOrUrl": "google.com",
            "params": {"q": "test"},
            "target": "SAME_WINDOW"
        }))
        .unwrap();

        assert_eq!(
            descriptor,
            ActionDescriptor::Navigate(NavigateAction::to("google.com").param("q", "test"))
        );
        assert_eq!(descriptor.kind(), ActionKind::Navigate);
    }

    #[test]
    fn navigate_params_keep_payload_order() {
        let descriptor: ActionDescriptor = serde_json::from_str(
            r#"{"type":"NAVIGATE","pageNameOrUrl":"google.com","params":{"q":"test","a":"1","m":"x"}}"#,
        )
        .unwrap();

        let ActionDescriptor::Navigate(action) = descriptor else {
            panic!("expected navigate descriptor");
        };
        let keys: Vec<&str> = action.params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["q", "a", "m"]);
    }

    #[test]
    fn navigate_defaults_params_and_target() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "type": "NAVIGATE",
            "pageNameOrUrl": "Home"
        }))
        .unwrap();

        let ActionDescriptor::Navigate(action) = descriptor else {
            panic!("expected navigate descriptor");
        };
        assert!(action.params.is_empty());
        assert_eq!(action.target, NavigationTarget::SameWindow);
    }

    #[test]
    fn run_query_with_nested_callbacks() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "type": "RUN_QUERY",
            "actionId": "fetchUsers",
            "params": {"limit": 10},
            "onSuccess": [{"type": "NAVIGATE", "pageNameOrUrl": "Users"}],
            "onError": [{"type": "SHOW_ALERT", "message": "failed", "style": "error"}]
        }))
        .unwrap();

        let ActionDescriptor::RunQuery(query) = descriptor else {
            panic!("expected run query descriptor");
        };
        assert_eq!(query.action_id, "fetchUsers");
        assert_eq!(query.params["limit"], json!(10));
        assert_eq!(query.on_success[0].kind(), ActionKind::Navigate);
        assert_eq!(query.on_error[0].kind(), ActionKind::ShowAlert);
    }

    #[test]
    fn alert_style_defaults_to_info() {
        let action: ShowAlertAction =
            serde_json::from_value(json!({"message": "saved"})).unwrap();
        assert_eq!(action.style, AlertStyle::Info);
    }

    #[test]
    fn action_kind_display() {
        assert_eq!(ActionKind::RunQuery.to_string(), "run_query");
        assert_eq!(AlertStyle::Warning.to_string(), "warning");
    }
}
