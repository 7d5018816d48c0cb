//! What a handler reports back after a successful execution.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ActionDescriptor, AlertStyle, NavigationTarget};

/// States of the navigation executor.
///
/// `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    Classifying,
    Resolving,
    Building,
    Navigating,
    Syncing,
    Complete,
    Failed,
}

impl NavigationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classifying => "classifying",
            Self::Resolving => "resolving",
            Self::Building => "building",
            Self::Navigating => "navigating",
            Self::Syncing => "syncing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The location a navigation was sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Destination {
    /// An absolute URL, scheme-normalized, with the query string appended.
    Url { url: String },
    /// An in-app page path.
    Page {
        page_id: String,
        page_name: String,
        path: String,
    },
}

impl Destination {
    /// The string handed to the router.
    pub fn location(&self) -> &str {
        match self {
            Self::Url { url } => url,
            Self::Page { path, .. } => path,
        }
    }
}

/// Result of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NavigationOutcome {
    pub destination: Destination,
    pub target: NavigationTarget,
    /// Whether the current page's state was refreshed after navigating.
    pub refreshed: bool,
    /// States visited, in order. Always ends in `Complete`.
    pub trail: Vec<NavigationState>,
}

impl NavigationOutcome {
    /// A same-window jump to an absolute URL unloads the current context.
    pub fn leaves_context(&self) -> bool {
        self.target == NavigationTarget::SameWindow
            && matches!(self.destination, Destination::Url { .. })
    }
}

/// Outcome of one dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
#[non_exhaustive]
pub enum ActionOutcome {
    Navigated(NavigationOutcome),
    QueryCompleted {
        action_id: String,
        response: Value,
        /// Success callbacks, run before the rest of the chain.
        follow_up: Vec<ActionDescriptor>,
    },
    /// The query failed but the descriptor handled it with error callbacks.
    QueryFailed {
        action_id: String,
        error: String,
        follow_up: Vec<ActionDescriptor>,
    },
    AlertShown {
        message: String,
        style: AlertStyle,
    },
}

impl ActionOutcome {
    /// Callback actions to run next.
    pub fn follow_up(&self) -> &[ActionDescriptor] {
        match self {
            Self::QueryCompleted { follow_up, .. } | Self::QueryFailed { follow_up, .. } => {
                follow_up
            }
            _ => &[],
        }
    }

    /// Whether nothing after this action can run in the current context.
    pub fn leaves_context(&self) -> bool {
        match self {
            Self::Navigated(nav) => nav.leaves_context(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NavigateAction;

    fn url_outcome(target: NavigationTarget) -> NavigationOutcome {
        NavigationOutcome {
            destination: Destination::Url {
                url: "https://google.com".into(),
            },
            target,
            refreshed: false,
            trail: vec![NavigationState::Complete],
        }
    }

    #[test]
    fn same_window_url_leaves_context() {
        assert!(url_outcome(NavigationTarget::SameWindow).leaves_context());
        assert!(!url_outcome(NavigationTarget::NewWindow).leaves_context());
    }

    #[test]
    fn page_navigation_stays_in_context() {
        let outcome = NavigationOutcome {
            destination: Destination::Page {
                page_id: "p1".into(),
                page_name: "Home".into(),
                path: "/app/pages/p1".into(),
            },
            target: NavigationTarget::SameWindow,
            refreshed: true,
            trail: vec![NavigationState::Complete],
        };
        assert!(!ActionOutcome::Navigated(outcome).leaves_context());
    }

    #[test]
    fn follow_up_only_for_queries() {
        let next = ActionDescriptor::from(NavigateAction::to("Home"));
        let done = ActionOutcome::QueryCompleted {
            action_id: "q".into(),
            response: Value::Null,
            follow_up: vec![next.clone()],
        };
        assert_eq!(done.follow_up(), &[next]);

        let alert = ActionOutcome::AlertShown {
            message: "hi".into(),
            style: AlertStyle::Info,
        };
        assert!(alert.follow_up().is_empty());
    }

    #[test]
    fn terminal_states() {
        assert!(NavigationState::Complete.is_terminal());
        assert!(NavigationState::Failed.is_terminal());
        assert!(!NavigationState::Syncing.is_terminal());
    }
}
