//! Engine: the single entry point for running action chains.
//!
//! The [`Engine`] owns the configuration and the collaborator set, and
//! builds a fresh [`TriggerCtx`] (with a fresh chain id) for every chain it
//! runs. Construct via [`Engine::builder()`].
//!
//! ```rust,ignore
//! let engine = Engine::builder()
//!     .snapshot(Arc::new(InMemorySnapshot::with_pages(pages)))
//!     .router(Arc::new(BrowserRouter::new()))
//!     .build()?;
//!
//! let report = engine.execute(vec![NavigateAction::to("Home").into()]).await?;
//! ```

mod builder;
pub mod error;

pub use builder::EngineBuilder;
pub use error::EngineError;

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::EngineConfig;
use crate::dispatcher::{ChainError, ChainReport, TriggerDispatcher};
use crate::handlers::NavigateHandler;
use crate::traits::{
    AlertSink, AnalyticsSink, AuditSink, QueryRunner, RouterService, SnapshotProvider,
};
use crate::trigger_ctx::TriggerCtx;
use crate::types::{ActionDescriptor, ActionKind, NavigateAction, NavigationOutcome};

/// The assembled engine. Cheap to clone; all internals are `Arc`-wrapped.
#[derive(Clone)]
pub struct Engine {
    pub(super) config: Arc<EngineConfig>,
    pub(super) dispatcher: Arc<TriggerDispatcher>,
    pub(super) snapshot: Arc<dyn SnapshotProvider>,
    pub(super) router: Arc<dyn RouterService>,
    pub(super) analytics: Arc<dyn AnalyticsSink>,
    pub(super) audit: Arc<dyn AuditSink>,
    pub(super) alerts: Arc<dyn AlertSink>,
    pub(super) queries: Arc<dyn QueryRunner>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create a new [`EngineBuilder`].
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Run a chain to its end on the current task.
    ///
    /// The chain cannot be cancelled; use [`spawn()`](Self::spawn) for that.
    pub async fn execute(&self, chain: Vec<ActionDescriptor>) -> Result<ChainReport, EngineError> {
        let chain_id = new_chain_id();
        let ctx = self.context(&chain_id);
        let (_cancel_tx, cancel_rx) = oneshot::channel();

        let report = self
            .dispatcher
            .run_chain(chain, &ctx, cancel_rx)
            .instrument(chain_span(&chain_id))
            .await?;
        Ok(report)
    }

    /// Run a chain on a new tokio task.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// handle cancels the chain.
    pub fn spawn(&self, chain: Vec<ActionDescriptor>) -> ChainHandle {
        let chain_id = new_chain_id();
        let ctx = self.context(&chain_id);
        let dispatcher = Arc::clone(&self.dispatcher);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let task = tokio::spawn(
            async move { dispatcher.run_chain(chain, &ctx, cancel_rx).await }
                .instrument(chain_span(&chain_id)),
        );

        ChainHandle {
            chain_id,
            cancel: Some(cancel_tx),
            task,
        }
    }

    /// Run a single navigation as its own chain.
    pub async fn navigate(&self, action: NavigateAction) -> Result<NavigationOutcome, EngineError> {
        let chain_id = new_chain_id();
        let ctx = self.context(&chain_id);

        NavigateHandler
            .navigate(&action, &ctx)
            .instrument(chain_span(&chain_id))
            .await
            .map_err(|source| {
                EngineError::Chain(ChainError::ActionFailed {
                    step: 0,
                    kind: ActionKind::Navigate,
                    source,
                })
            })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Arc<dyn SnapshotProvider> {
        &self.snapshot
    }

    pub fn router(&self) -> &Arc<dyn RouterService> {
        &self.router
    }

    fn context(&self, chain_id: &str) -> TriggerCtx {
        TriggerCtx::new(
            chain_id.to_string(),
            Arc::clone(&self.config),
            Arc::clone(&self.snapshot),
            Arc::clone(&self.router),
            Arc::clone(&self.analytics),
            Arc::clone(&self.audit),
            Arc::clone(&self.alerts),
            Arc::clone(&self.queries),
        )
    }
}

fn new_chain_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn chain_span(chain_id: &str) -> tracing::Span {
    tracing::info_span!("action_chain", chain_id = %chain_id)
}

// ---------------------------------------------------------------------------
// ChainHandle
// ---------------------------------------------------------------------------

/// A chain running on its own task.
pub struct ChainHandle {
    chain_id: String,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<ChainReport, ChainError>>,
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl ChainHandle {
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Ask the chain to stop. Returns `false` if the chain had already
    /// finished or was cancelled before.
    pub fn cancel(&mut self) -> bool {
        match self.cancel.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the chain to end.
    pub async fn join(self) -> Result<ChainReport, EngineError> {
        let ChainHandle { cancel, task, .. } = self;
        let result = task.await.map_err(|e| EngineError::Join {
            message: e.to_string(),
        });
        // The sender lives until the task ends so that joining never cancels.
        drop(cancel);
        Ok(result??)
    }
}
