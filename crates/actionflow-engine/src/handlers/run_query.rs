//! RunQuery handler: runs a named query and hands back its callbacks.
//!
//! The handler never executes callbacks itself. It returns them as the
//! outcome's follow-up, and the dispatcher runs them before continuing the
//! chain. A failure is only fatal to the chain when the descriptor has no
//! error callbacks to handle it.

use async_trait::async_trait;

use crate::traits::ActionHandler;
use crate::trigger_ctx::TriggerCtx;
use crate::types::*;

/// Built-in handler for [`ActionDescriptor::RunQuery`].
pub struct RunQueryHandler;

#[async_trait]
impl ActionHandler for RunQueryHandler {
    type Action = RunQueryAction;

    const KIND: ActionKind = ActionKind::RunQuery;

    async fn execute(
        &self,
        action: &RunQueryAction,
        ctx: &TriggerCtx,
    ) -> Result<ActionOutcome, TriggerError> {
        match ctx.run_query(&action.action_id, &action.params).await {
            Ok(response) => Ok(ActionOutcome::QueryCompleted {
                action_id: action.action_id.clone(),
                response,
                follow_up: action.on_success.clone(),
            }),
            Err(source) if action.on_error.is_empty() => Err(TriggerError::Query {
                action_id: action.action_id.clone(),
                source,
            }),
            Err(source) => {
                tracing::debug!(
                    chain_id = %ctx.chain_id(),
                    action_id = %action.action_id,
                    error = %source,
                    "query failed, running error callbacks"
                );
                Ok(ActionOutcome::QueryFailed {
                    action_id: action.action_id.clone(),
                    error: source.to_string(),
                    follow_up: action.on_error.clone(),
                })
            }
        }
    }
}
