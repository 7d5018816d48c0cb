//! ActionFlow: executes the action chains bound to low-code widget events.
//!
//! A widget event produces an ordered list of [`ActionDescriptor`]s. The
//! [`Engine`] runs them one at a time against a point-in-time view of the
//! application ([`SnapshotProvider`]) and performs their side effects
//! through injected collaborators ([`RouterService`], [`AnalyticsSink`],
//! [`AuditSink`], [`AlertSink`], [`QueryRunner`]).
//!
//! The crate has no dependency on a browser or UI toolkit. Hosts plug in
//! their own router and state store; [`defaults`] provides in-memory
//! implementations for headless use and tests.

pub mod config;
pub mod defaults;
pub mod dispatcher;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod traits;
pub mod trigger_ctx;
pub mod types;
pub mod url;

// Re-export public types at the crate level.

// config
pub use config::{ChainConfig, EngineConfig, NavigationConfig, RouteConfig};

// defaults
pub use defaults::{
    InMemoryAuditLog, InMemoryHistory, InMemorySnapshot, TracingAlerts, TracingAnalytics,
    UnconfiguredQueryRunner,
};

// dispatcher
pub use dispatcher::{ChainError, ChainReport, ChainStatus, TriggerDispatcher};

// engine
pub use engine::{ChainHandle, Engine, EngineBuilder, EngineError};

// errors
pub use errors::{ConfigError, QueryError, RouterError, SnapshotError};

// handlers
pub use handlers::{NavigateHandler, RunQueryHandler, ShowAlertHandler};

// trigger_ctx
#[cfg(any(test, feature = "test-support"))]
pub use trigger_ctx::test_support::{
    RouterCall, SnapshotRead, TestTriggerCtx, TestTriggerCtxInspector,
};
pub use trigger_ctx::TriggerCtx;

// traits
pub use traits::{
    ActionHandler, AlertSink, AnalyticsSink, AuditRecord, AuditSink, QueryRunner, RouterService,
    SnapshotProvider,
};

// types
pub use types::{
    ActionDescriptor, ActionKind, ActionOutcome, AlertStyle, AppMode, Destination, NavigateAction,
    NavigationOutcome, NavigationState, NavigationTarget, Page, Params, RunQueryAction,
    ShowAlertAction, TriggerError, RESOLUTION_FAILURE_MESSAGE,
};

// pages / routes / url
pub use pages::resolve_page;
pub use routes::{build_path, query_string};
pub use url::{is_valid_scheme, is_valid_url, with_default_scheme};
