//! Runtime context given to every handler invocation.
//!
//! Handlers reach application state and side effects exclusively through
//! [`TriggerCtx`]. The engine builds one per action chain, so every action
//! in a chain shares the same collaborators and chain id.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::config::EngineConfig;
use super::traits::{
    AlertSink, AnalyticsSink, AuditRecord, AuditSink, QueryRunner, RouterService,
    SnapshotProvider,
};
use super::types::{AlertStyle, AppMode, Page, TriggerError};
use crate::errors::QueryError;

/// The runtime context shared by the actions of one chain.
#[derive(Clone)]
pub struct TriggerCtx {
    chain_id: String,
    config: Arc<EngineConfig>,
    snapshot: Arc<dyn SnapshotProvider>,
    router: Arc<dyn RouterService>,
    analytics: Arc<dyn AnalyticsSink>,
    audit: Arc<dyn AuditSink>,
    alerts: Arc<dyn AlertSink>,
    queries: Arc<dyn QueryRunner>,
}

impl std::fmt::Debug for TriggerCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerCtx")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl TriggerCtx {
    /// Construct a context. Normally only the engine does this.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: String,
        config: Arc<EngineConfig>,
        snapshot: Arc<dyn SnapshotProvider>,
        router: Arc<dyn RouterService>,
        analytics: Arc<dyn AnalyticsSink>,
        audit: Arc<dyn AuditSink>,
        alerts: Arc<dyn AlertSink>,
        queries: Arc<dyn QueryRunner>,
    ) -> Self {
        Self {
            chain_id,
            config,
            snapshot,
            router,
            analytics,
            audit,
            alerts,
            queries,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn router(&self) -> &dyn RouterService {
        self.router.as_ref()
    }

    pub async fn page_list(&self) -> Result<Vec<Page>, TriggerError> {
        Ok(self.snapshot.page_list().await?)
    }

    pub async fn current_page_id(&self) -> Result<String, TriggerError> {
        Ok(self.snapshot.current_page_id().await?)
    }

    pub async fn app_mode(&self) -> Result<AppMode, TriggerError> {
        Ok(self.snapshot.app_mode().await?)
    }

    /// Record an analytics event. Never fails.
    pub fn log_event(&self, name: &str, metadata: Value) {
        self.analytics.log_event(name, metadata);
    }

    /// Append an entry to the audit console.
    pub fn audit(&self, text: impl Into<String>, state: Value) {
        self.audit.info(AuditRecord::new(text, state));
    }

    pub fn show_alert(&self, message: &str, style: AlertStyle) {
        self.alerts.show(message, style);
    }

    pub async fn run_query(
        &self,
        action_id: &str,
        params: &BTreeMap<String, Value>,
    ) -> Result<Value, QueryError> {
        self.queries.run(action_id, params).await
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! Test utilities for building [`TriggerCtx`] instances in handler tests.
    //!
    //! ```ignore
    //! let (ctx, inspector) = TestTriggerCtx::builder()
    //!     .page("p1", "Home")
    //!     .current_page("p1")
    //!     .mode(AppMode::Edit)
    //!     .build();
    //!
    //! NavigateHandler.execute(&NavigateAction::to("Home"), &ctx).await?;
    //!
    //! assert_eq!(inspector.refresh_count(), 1);
    //! ```

    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::RwLock;
    use serde_json::Value;

    use crate::config::EngineConfig;
    use crate::errors::{QueryError, RouterError, SnapshotError};
    use crate::traits::{
        AlertSink, AnalyticsSink, AuditRecord, AuditSink, QueryRunner, RouterService,
        SnapshotProvider,
    };
    use crate::types::{AlertStyle, AppMode, Page};

    use super::TriggerCtx;

    /// One call observed on the router.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RouterCall {
        SameWindow(String),
        NewWindow(String),
        AssignLocation(String),
        Refresh,
    }

    /// Which snapshot read happened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SnapshotRead {
        PageList,
        CurrentPageId,
        AppMode,
    }

    type QueryLog = Vec<(String, BTreeMap<String, Value>)>;

    // -- Snapshot -----------------------------------------------------------

    struct FixedSnapshot {
        pages: Vec<Page>,
        current_page_id: String,
        mode: AppMode,
        unavailable: Option<String>,
        reads: Arc<RwLock<Vec<SnapshotRead>>>,
    }

    impl FixedSnapshot {
        fn read(&self, read: SnapshotRead) -> Result<(), SnapshotError> {
            self.reads.write().push(read);
            match &self.unavailable {
                Some(message) => Err(SnapshotError::Unavailable {
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SnapshotProvider for FixedSnapshot {
        async fn page_list(&self) -> Result<Vec<Page>, SnapshotError> {
            self.read(SnapshotRead::PageList)?;
            Ok(self.pages.clone())
        }

        async fn current_page_id(&self) -> Result<String, SnapshotError> {
            self.read(SnapshotRead::CurrentPageId)?;
            Ok(self.current_page_id.clone())
        }

        async fn app_mode(&self) -> Result<AppMode, SnapshotError> {
            self.read(SnapshotRead::AppMode)?;
            Ok(self.mode)
        }
    }

    // -- Router -------------------------------------------------------------

    struct RecordingRouter {
        calls: Arc<RwLock<Vec<RouterCall>>>,
        failure: Option<String>,
    }

    impl RecordingRouter {
        fn record(&self, call: RouterCall) -> Result<(), RouterError> {
            let destination = match &call {
                RouterCall::SameWindow(d) | RouterCall::NewWindow(d) | RouterCall::AssignLocation(d) => {
                    d.clone()
                }
                RouterCall::Refresh => String::new(),
            };
            self.calls.write().push(call);
            match &self.failure {
                Some(message) => Err(RouterError::Navigation {
                    destination,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RouterService for RecordingRouter {
        async fn navigate_same_window(&self, path: &str) -> Result<(), RouterError> {
            self.record(RouterCall::SameWindow(path.to_string()))
        }

        async fn navigate_new_window(&self, path: &str) -> Result<(), RouterError> {
            self.record(RouterCall::NewWindow(path.to_string()))
        }

        async fn refresh_current_page_state(&self) -> Result<(), RouterError> {
            self.record(RouterCall::Refresh)
        }

        async fn assign_location(&self, url: &str) -> Result<(), RouterError> {
            self.record(RouterCall::AssignLocation(url.to_string()))
        }
    }

    // -- Sinks --------------------------------------------------------------

    struct RecordingSinks {
        events: RwLock<Vec<(String, Value)>>,
        audit: RwLock<Vec<AuditRecord>>,
        alerts: RwLock<Vec<(String, AlertStyle)>>,
    }

    impl AnalyticsSink for RecordingSinks {
        fn log_event(&self, name: &str, metadata: Value) {
            self.events.write().push((name.to_string(), metadata));
        }
    }

    impl AuditSink for RecordingSinks {
        fn info(&self, record: AuditRecord) {
            self.audit.write().push(record);
        }
    }

    impl AlertSink for RecordingSinks {
        fn show(&self, message: &str, style: AlertStyle) {
            self.alerts.write().push((message.to_string(), style));
        }
    }

    // -- Queries ------------------------------------------------------------

    struct ScriptedQueries {
        responses: HashMap<String, Result<Value, String>>,
        log: RwLock<QueryLog>,
    }

    #[async_trait]
    impl QueryRunner for ScriptedQueries {
        async fn run(
            &self,
            action_id: &str,
            params: &BTreeMap<String, Value>,
        ) -> Result<Value, QueryError> {
            self.log
                .write()
                .push((action_id.to_string(), params.clone()));
            match self.responses.get(action_id) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(message)) => Err(QueryError::Execution {
                    message: message.clone(),
                }),
                None => Err(QueryError::NotFound {
                    action_id: action_id.to_string(),
                }),
            }
        }
    }

    // -- TestTriggerCtx builder ---------------------------------------------

    /// Builder for constructing a [`TriggerCtx`] in tests.
    pub struct TestTriggerCtx {
        chain_id: String,
        config: EngineConfig,
        pages: Vec<Page>,
        current_page_id: String,
        mode: AppMode,
        snapshot_failure: Option<String>,
        router_failure: Option<String>,
        responses: HashMap<String, Result<Value, String>>,
    }

    impl TestTriggerCtx {
        /// Start building a test `TriggerCtx`: no pages, view mode.
        pub fn builder() -> Self {
            Self {
                chain_id: "test-chain".to_string(),
                config: EngineConfig::default(),
                pages: Vec::new(),
                current_page_id: String::new(),
                mode: AppMode::View,
                snapshot_failure: None,
                router_failure: None,
                responses: HashMap::new(),
            }
        }

        pub fn chain_id(mut self, chain_id: &str) -> Self {
            self.chain_id = chain_id.to_string();
            self
        }

        pub fn config(mut self, config: EngineConfig) -> Self {
            self.config = config;
            self
        }

        /// Append a page (can be called multiple times).
        pub fn page(mut self, page_id: &str, page_name: &str) -> Self {
            self.pages.push(Page::new(page_id, page_name));
            self
        }

        pub fn current_page(mut self, page_id: &str) -> Self {
            self.current_page_id = page_id.to_string();
            self
        }

        pub fn mode(mut self, mode: AppMode) -> Self {
            self.mode = mode;
            self
        }

        /// Make every snapshot read fail.
        pub fn snapshot_unavailable(mut self, message: &str) -> Self {
            self.snapshot_failure = Some(message.to_string());
            self
        }

        /// Make every router call fail (after being recorded).
        pub fn failing_router(mut self, message: &str) -> Self {
            self.router_failure = Some(message.to_string());
            self
        }

        pub fn query_response(mut self, action_id: &str, response: Value) -> Self {
            self.responses.insert(action_id.to_string(), Ok(response));
            self
        }

        pub fn query_failure(mut self, action_id: &str, message: &str) -> Self {
            self.responses
                .insert(action_id.to_string(), Err(message.to_string()));
            self
        }

        /// Build the `TriggerCtx` and an inspector for verifying side effects.
        pub fn build(self) -> (TriggerCtx, TestTriggerCtxInspector) {
            let reads = Arc::new(RwLock::new(Vec::new()));
            let calls = Arc::new(RwLock::new(Vec::new()));

            let snapshot = Arc::new(FixedSnapshot {
                pages: self.pages,
                current_page_id: self.current_page_id,
                mode: self.mode,
                unavailable: self.snapshot_failure,
                reads: Arc::clone(&reads),
            });
            let router = Arc::new(RecordingRouter {
                calls: Arc::clone(&calls),
                failure: self.router_failure,
            });
            let sinks = Arc::new(RecordingSinks {
                events: RwLock::new(Vec::new()),
                audit: RwLock::new(Vec::new()),
                alerts: RwLock::new(Vec::new()),
            });
            let queries = Arc::new(ScriptedQueries {
                responses: self.responses,
                log: RwLock::new(Vec::new()),
            });

            let ctx = TriggerCtx::new(
                self.chain_id,
                Arc::new(self.config),
                snapshot as Arc<dyn SnapshotProvider>,
                router as Arc<dyn RouterService>,
                Arc::clone(&sinks) as Arc<dyn AnalyticsSink>,
                Arc::clone(&sinks) as Arc<dyn AuditSink>,
                Arc::clone(&sinks) as Arc<dyn AlertSink>,
                Arc::clone(&queries) as Arc<dyn QueryRunner>,
            );

            let inspector = TestTriggerCtxInspector {
                reads,
                calls,
                sinks,
                queries,
            };

            (ctx, inspector)
        }
    }

    /// Inspect side effects produced by handlers under test.
    pub struct TestTriggerCtxInspector {
        reads: Arc<RwLock<Vec<SnapshotRead>>>,
        calls: Arc<RwLock<Vec<RouterCall>>>,
        sinks: Arc<RecordingSinks>,
        queries: Arc<ScriptedQueries>,
    }

    impl TestTriggerCtxInspector {
        /// Every router call, in order.
        pub fn router_calls(&self) -> Vec<RouterCall> {
            self.calls.read().clone()
        }

        /// Router calls that changed a location (everything but refreshes).
        pub fn navigations(&self) -> Vec<RouterCall> {
            self.calls
                .read()
                .iter()
                .filter(|call| !matches!(call, RouterCall::Refresh))
                .cloned()
                .collect()
        }

        pub fn refresh_count(&self) -> usize {
            self.calls
                .read()
                .iter()
                .filter(|call| matches!(call, RouterCall::Refresh))
                .count()
        }

        pub fn snapshot_reads(&self) -> Vec<SnapshotRead> {
            self.reads.read().clone()
        }

        pub fn analytics_events(&self) -> Vec<(String, Value)> {
            self.sinks.events.read().clone()
        }

        pub fn audit_records(&self) -> Vec<AuditRecord> {
            self.sinks.audit.read().clone()
        }

        pub fn alerts(&self) -> Vec<(String, AlertStyle)> {
            self.sinks.alerts.read().clone()
        }

        /// Queries run, with their params, in order.
        pub fn queries_run(&self) -> Vec<(String, BTreeMap<String, Value>)> {
            self.queries.log.read().clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{RouterCall, SnapshotRead, TestTriggerCtx, TestTriggerCtxInspector};
