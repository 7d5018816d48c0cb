//! ShowAlert handler.

use async_trait::async_trait;
use serde_json::json;

use crate::traits::ActionHandler;
use crate::trigger_ctx::TriggerCtx;
use crate::types::*;

/// Built-in handler for [`ActionDescriptor::ShowAlert`].
pub struct ShowAlertHandler;

#[async_trait]
impl ActionHandler for ShowAlertHandler {
    type Action = ShowAlertAction;

    const KIND: ActionKind = ActionKind::ShowAlert;

    async fn execute(
        &self,
        action: &ShowAlertAction,
        ctx: &TriggerCtx,
    ) -> Result<ActionOutcome, TriggerError> {
        ctx.show_alert(&action.message, action.style);
        ctx.audit(
            format!(
                "showAlert('{}', '{}') was triggered",
                action.message, action.style
            ),
            json!({ "message": action.message, "style": action.style }),
        );
        Ok(ActionOutcome::AlertShown {
            message: action.message.clone(),
            style: action.style,
        })
    }
}
