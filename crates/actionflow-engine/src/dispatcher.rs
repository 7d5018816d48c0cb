//! Trigger dispatcher and action-chain runner.
//!
//! A chain is the ordered list of descriptors bound to one widget event.
//! [`TriggerDispatcher::run_chain`] executes it strictly sequentially: each
//! action's `.await` completes before the next begins. Callbacks produced by
//! an action (a query's `on_success` / `on_error`) run immediately after it,
//! ahead of the rest of the chain.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::ChainConfig;
use crate::handlers::{NavigateHandler, RunQueryHandler, ShowAlertHandler};
use crate::traits::ActionHandler;
use crate::trigger_ctx::TriggerCtx;
use crate::types::*;

// ---------------------------------------------------------------------------
// Chain results
// ---------------------------------------------------------------------------

/// How a chain stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    /// Every action ran.
    Completed,
    /// A same-window URL navigation unloaded the current context.
    Departed,
    /// The cancel signal fired (or its sender was dropped).
    Cancelled,
}

/// Summary of a finished chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    pub chain_id: String,
    pub status: ChainStatus,
    /// Outcomes of the actions that completed, in execution order.
    pub outcomes: Vec<ActionOutcome>,
    /// Actions that never ran (or were abandoned mid-flight).
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ChainError {
    /// `step` counts executed actions from 0, callbacks included.
    #[error("action {step} ({kind}) failed: {source}")]
    ActionFailed {
        step: usize,
        kind: ActionKind,
        #[source]
        source: TriggerError,
    },

    #[error("callback nesting depth {depth} exceeds limit {limit}")]
    CallbackDepthExceeded { depth: usize, limit: usize },
}

impl ChainError {
    /// The trigger failure behind this error, if any.
    pub fn trigger_error(&self) -> Option<&TriggerError> {
        match self {
            Self::ActionFailed { source, .. } => Some(source),
            Self::CallbackDepthExceeded { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes descriptors to their handlers and runs action chains.
pub struct TriggerDispatcher {
    config: ChainConfig,
}

impl TriggerDispatcher {
    pub fn new(config: ChainConfig) -> Self {
        Self { config }
    }

    /// Execute a single descriptor with its handler.
    pub async fn dispatch(
        &self,
        descriptor: &ActionDescriptor,
        ctx: &TriggerCtx,
    ) -> Result<ActionOutcome, TriggerError> {
        match descriptor {
            ActionDescriptor::Navigate(action) => invoke(&NavigateHandler, action, ctx).await,
            ActionDescriptor::RunQuery(action) => invoke(&RunQueryHandler, action, ctx).await,
            ActionDescriptor::ShowAlert(action) => invoke(&ShowAlertHandler, action, ctx).await,
        }
    }

    /// Run a chain to completion, departure, cancellation or first failure.
    ///
    /// Cancellation is checked before each action and raced against the
    /// in-flight one. An abandoned action is dropped at its current `.await`
    /// and counted in [`ChainReport::skipped`].
    pub async fn run_chain(
        &self,
        chain: Vec<ActionDescriptor>,
        ctx: &TriggerCtx,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> Result<ChainReport, ChainError> {
        let limit = self.config.max_callback_depth;
        let mut queue: VecDeque<(ActionDescriptor, usize)> =
            chain.into_iter().map(|descriptor| (descriptor, 0)).collect();
        let mut outcomes = Vec::new();
        let mut step = 0usize;

        while let Some((descriptor, depth)) = queue.pop_front() {
            if check_cancel(&mut cancel_rx) {
                return Ok(cancelled(ctx, outcomes, queue.len() + 1));
            }

            let kind = descriptor.kind();
            let result = tokio::select! {
                biased;
                _ = &mut cancel_rx => {
                    return Ok(cancelled(ctx, outcomes, queue.len() + 1));
                }
                result = self.dispatch(&descriptor, ctx) => result,
            };

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(source) => {
                    tracing::warn!(
                        chain_id = %ctx.chain_id(),
                        step,
                        kind = %kind,
                        error = %source,
                        "action failed, aborting chain"
                    );
                    return Err(ChainError::ActionFailed { step, kind, source });
                }
            };
            step += 1;

            let follow_up = outcome.follow_up();
            if !follow_up.is_empty() {
                let next_depth = depth + 1;
                if next_depth > limit {
                    return Err(ChainError::CallbackDepthExceeded {
                        depth: next_depth,
                        limit,
                    });
                }
                for callback in follow_up.iter().rev() {
                    queue.push_front((callback.clone(), next_depth));
                }
            }

            let departed = outcome.leaves_context();
            outcomes.push(outcome);
            if departed {
                tracing::info!(
                    chain_id = %ctx.chain_id(),
                    skipped = queue.len(),
                    "chain left the current context"
                );
                return Ok(ChainReport {
                    chain_id: ctx.chain_id().to_string(),
                    status: ChainStatus::Departed,
                    outcomes,
                    skipped: queue.len(),
                });
            }
        }

        tracing::info!(
            chain_id = %ctx.chain_id(),
            actions = outcomes.len(),
            "chain completed"
        );
        Ok(ChainReport {
            chain_id: ctx.chain_id().to_string(),
            status: ChainStatus::Completed,
            outcomes,
            skipped: 0,
        })
    }
}

impl Default for TriggerDispatcher {
    fn default() -> Self {
        Self::new(ChainConfig::default())
    }
}

async fn invoke<H: ActionHandler>(
    handler: &H,
    action: &H::Action,
    ctx: &TriggerCtx,
) -> Result<ActionOutcome, TriggerError> {
    tracing::debug!(chain_id = %ctx.chain_id(), kind = %H::KIND, "dispatching action");
    handler.execute(action, ctx).await
}

fn cancelled(ctx: &TriggerCtx, outcomes: Vec<ActionOutcome>, skipped: usize) -> ChainReport {
    tracing::warn!(chain_id = %ctx.chain_id(), skipped, "chain cancelled");
    ChainReport {
        chain_id: ctx.chain_id().to_string(),
        status: ChainStatus::Cancelled,
        outcomes,
        skipped,
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

fn check_cancel(cancel_rx: &mut oneshot::Receiver<()>) -> bool {
    matches!(
        cancel_rx.try_recv(),
        Ok(()) | Err(oneshot::error::TryRecvError::Closed)
    )
}
