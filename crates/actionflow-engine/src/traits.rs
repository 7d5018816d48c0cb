//! Collaborator interfaces the engine is written against.
//!
//! The engine owns no application state. Everything it reads comes from a
//! [`SnapshotProvider`], and everything it changes goes through one of the
//! sink or service traits below. Each async method is a suspension point:
//! the handler yields until the read or effect completes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::*;
use super::trigger_ctx::TriggerCtx;
use super::types::*;

// ---------------------------------------------------------------------------
// SnapshotProvider
// ---------------------------------------------------------------------------

/// Point-in-time, read-only access to application state.
///
/// Successive reads within one handler may observe different snapshots if
/// the store changes in between; the engine never assumes otherwise.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Pages of the application, in display order.
    async fn page_list(&self) -> Result<Vec<Page>, SnapshotError>;

    /// Id of the page currently displayed.
    async fn current_page_id(&self) -> Result<String, SnapshotError>;

    /// Whether the application is being edited or viewed.
    async fn app_mode(&self) -> Result<AppMode, SnapshotError>;
}

// ---------------------------------------------------------------------------
// RouterService
// ---------------------------------------------------------------------------

/// Router / window side effects.
#[async_trait]
pub trait RouterService: Send + Sync {
    /// Push an in-app path onto the current context's history.
    async fn navigate_same_window(&self, path: &str) -> Result<(), RouterError>;

    /// Open a path or URL in a new browsing context.
    async fn navigate_new_window(&self, path: &str) -> Result<(), RouterError>;

    /// Recompute page-scoped derived data without changing the route.
    async fn refresh_current_page_state(&self) -> Result<(), RouterError>;

    /// Replace the document location with an absolute URL.
    ///
    /// Default: same as [`navigate_same_window()`](Self::navigate_same_window).
    async fn assign_location(&self, url: &str) -> Result<(), RouterError> {
        self.navigate_same_window(url).await
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Fire-and-forget analytics. Must never block or fail the caller.
pub trait AnalyticsSink: Send + Sync {
    fn log_event(&self, name: &str, metadata: Value);
}

/// A human-readable entry in the application's audit console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditRecord {
    pub text: String,
    /// Structured metadata, e.g. `{"params": {...}}`.
    pub state: Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(text: impl Into<String>, state: Value) -> Self {
        Self {
            text: text.into(),
            state,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only audit log.
pub trait AuditSink: Send + Sync {
    fn info(&self, record: AuditRecord);
}

/// Shows transient messages to the user.
pub trait AlertSink: Send + Sync {
    fn show(&self, message: &str, style: AlertStyle);
}

// ---------------------------------------------------------------------------
// QueryRunner
// ---------------------------------------------------------------------------

/// Executes the application's named queries.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(
        &self,
        action_id: &str,
        params: &BTreeMap<String, Value>,
    ) -> Result<Value, QueryError>;
}

// ---------------------------------------------------------------------------
// ActionHandler
// ---------------------------------------------------------------------------

/// Executes one kind of [`ActionDescriptor`].
///
/// Handlers are stateless; everything they touch is reached through the
/// [`TriggerCtx`]. The dispatcher picks the handler by matching on the
/// descriptor variant.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Payload type of the descriptor variant this handler executes.
    type Action: Send + Sync;

    const KIND: ActionKind;

    async fn execute(
        &self,
        action: &Self::Action,
        ctx: &TriggerCtx,
    ) -> Result<ActionOutcome, TriggerError>;
}
