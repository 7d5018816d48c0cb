//! Foundational types for the action trigger engine.
//!
//! Descriptors arrive from the UI layer with every binding expression
//! already resolved into plain values. Navigation parameters keep the order
//! in which the UI layer listed them.

pub mod actions;
pub mod outcome;

pub use actions::*;
pub use outcome::*;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{QueryError, RouterError, SnapshotError};

/// Navigation parameters, in insertion order. Query strings follow that order.
pub type Params = IndexMap<String, String>;

/// User-facing message for an input that is neither a URL nor a page.
pub const RESOLUTION_FAILURE_MESSAGE: &str = "Enter a valid URL or page name.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A page of the application, as listed by the state snapshot.
///
/// `page_name` is unique within an application. When it is not, lookups
/// return the first match in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Page {
    pub page_id: String,
    pub page_name: String,
}

impl Page {
    pub fn new(page_id: impl Into<String>, page_name: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            page_name: page_name.into(),
        }
    }
}

/// Whether the application is being authored or run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppMode {
    Edit,
    #[default]
    View,
}

/// Where a navigation lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationTarget {
    /// Replace the current browsing context.
    #[default]
    SameWindow,
    /// Open an additional browsing context, leaving the current one alone.
    NewWindow,
}

// ---------------------------------------------------------------------------
// TriggerError
// ---------------------------------------------------------------------------

/// Typed failure of a single trigger handler.
///
/// Any of these aborts the action chain that contains the trigger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriggerError {
    /// The input was neither URL-shaped nor a known page name.
    ///
    /// `trail` holds the navigation states visited, ending in `Failed`.
    #[error("Enter a valid URL or page name.")]
    ResolutionFailure {
        input: String,
        trail: Vec<NavigationState>,
    },
    /// Reading the state snapshot failed.
    #[error("state snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    /// The router or browser refused the side effect.
    #[error("external effect failed: {0}")]
    Effect(#[from] RouterError),
    /// A query failed and the descriptor had no error callbacks.
    #[error("query {action_id} failed: {source}")]
    Query {
        action_id: String,
        #[source]
        source: QueryError,
    },
}

impl TriggerError {
    /// Text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ResolutionFailure { .. } => RESOLUTION_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn navigation_target_wire_names() {
        assert_eq!(
            serde_json::to_value(NavigationTarget::SameWindow).unwrap(),
            json!("SAME_WINDOW")
        );
        let parsed: NavigationTarget = serde_json::from_value(json!("NEW_WINDOW")).unwrap();
        assert_eq!(parsed, NavigationTarget::NewWindow);
    }

    #[test]
    fn navigation_target_defaults_to_same_window() {
        assert_eq!(NavigationTarget::default(), NavigationTarget::SameWindow);
    }

    #[test]
    fn app_mode_wire_names() {
        let mode: AppMode = serde_json::from_value(json!("EDIT")).unwrap();
        assert_eq!(mode, AppMode::Edit);
        assert_eq!(serde_json::to_value(AppMode::View).unwrap(), json!("VIEW"));
    }

    #[test]
    fn resolution_failure_message() {
        let err = TriggerError::ResolutionFailure {
            input: "NoSuchPage".into(),
            trail: vec![NavigationState::Failed],
        };
        assert_eq!(err.to_string(), "Enter a valid URL or page name.");
        assert_eq!(err.user_message(), RESOLUTION_FAILURE_MESSAGE);
    }

    #[test]
    fn effect_error_wraps_router_error() {
        let err: TriggerError = RouterError::Refresh {
            message: "store detached".into(),
        }
        .into();
        assert!(matches!(err, TriggerError::Effect(_)));
        assert!(err.user_message().contains("store detached"));
    }
}
