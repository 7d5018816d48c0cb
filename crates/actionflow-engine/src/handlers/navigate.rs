//! Navigate handler: sends the user to an absolute URL or to a page.
//!
//! Execution is a small state machine:
//!
//! ```text
//! URL:   Classifying -> Building -> Navigating -> Complete
//! page:  Classifying -> Resolving -> Building -> Navigating [-> Syncing] -> Complete
//! error: Classifying -> Resolving -> Failed
//! ```
//!
//! Classification runs before page lookup, so an input that looks like a
//! URL is never treated as a page name, even if a page has that name.
//! Same-window navigation to the page already displayed also refreshes the
//! page's state, because the router suppresses the no-op transition.

use async_trait::async_trait;
use serde_json::json;

use crate::pages::resolve_page;
use crate::routes::{build_path, query_string};
use crate::traits::ActionHandler;
use crate::trigger_ctx::TriggerCtx;
use crate::types::*;
use crate::url::{is_valid_url, with_default_scheme};

/// Built-in handler for [`ActionDescriptor::Navigate`].
pub struct NavigateHandler;

/// Tracks the states a single navigation passes through.
struct NavigationRun<'a> {
    chain_id: &'a str,
    trail: Vec<NavigationState>,
}

impl<'a> NavigationRun<'a> {
    fn start(chain_id: &'a str) -> Self {
        let mut run = Self {
            chain_id,
            trail: Vec::with_capacity(6),
        };
        run.advance(NavigationState::Classifying);
        run
    }

    fn advance(&mut self, next: NavigationState) {
        tracing::trace!(chain_id = %self.chain_id, state = %next, "navigation state");
        self.trail.push(next);
    }

    fn fail(mut self, input: &str) -> TriggerError {
        self.advance(NavigationState::Failed);
        TriggerError::ResolutionFailure {
            input: input.to_string(),
            trail: self.trail,
        }
    }

    fn complete(
        mut self,
        destination: Destination,
        target: NavigationTarget,
        refreshed: bool,
    ) -> NavigationOutcome {
        self.advance(NavigationState::Complete);
        NavigationOutcome {
            destination,
            target,
            refreshed,
            trail: self.trail,
        }
    }
}

impl NavigateHandler {
    /// Run one navigation and return its outcome.
    pub async fn navigate(
        &self,
        action: &NavigateAction,
        ctx: &TriggerCtx,
    ) -> Result<NavigationOutcome, TriggerError> {
        let mut run = NavigationRun::start(ctx.chain_id());
        let pages = ctx.page_list().await?;

        let input = action.page_name_or_url.as_str();
        if is_valid_url(input) {
            return navigate_to_url(action, ctx, run).await;
        }

        run.advance(NavigationState::Resolving);
        match resolve_page(input, &pages) {
            Some(page) => navigate_to_page(action, page, ctx, run).await,
            None => {
                tracing::warn!(
                    chain_id = %ctx.chain_id(),
                    input = %input,
                    "navigation target is neither a URL nor a page"
                );
                Err(run.fail(input))
            }
        }
    }
}

#[async_trait]
impl ActionHandler for NavigateHandler {
    type Action = NavigateAction;

    const KIND: ActionKind = ActionKind::Navigate;

    async fn execute(
        &self,
        action: &NavigateAction,
        ctx: &TriggerCtx,
    ) -> Result<ActionOutcome, TriggerError> {
        self.navigate(action, ctx).await.map(ActionOutcome::Navigated)
    }
}

async fn navigate_to_url(
    action: &NavigateAction,
    ctx: &TriggerCtx,
    mut run: NavigationRun<'_>,
) -> Result<NavigationOutcome, TriggerError> {
    let nav = &ctx.config().navigation;
    ctx.log_event(
        &nav.analytics_event,
        json!({ "navUrl": action.page_name_or_url }),
    );

    run.advance(NavigationState::Building);
    let url = format!("{}{}", action.page_name_or_url, query_string(&action.params));
    let url = with_default_scheme(url, &nav.default_scheme);

    run.advance(NavigationState::Navigating);
    match action.target {
        NavigationTarget::SameWindow => ctx.router().assign_location(&url).await?,
        NavigationTarget::NewWindow => ctx.router().navigate_new_window(&url).await?,
    }
    tracing::debug!(chain_id = %ctx.chain_id(), url = %url, nav_target = ?action.target, "navigated to URL");

    Ok(run.complete(Destination::Url { url }, action.target, false))
}

async fn navigate_to_page(
    action: &NavigateAction,
    page: &Page,
    ctx: &TriggerCtx,
    mut run: NavigationRun<'_>,
) -> Result<NavigationOutcome, TriggerError> {
    let current_page_id = ctx.current_page_id().await?;
    ctx.log_event(
        &ctx.config().navigation.analytics_event,
        json!({
            "pageName": action.page_name_or_url,
            "pageParams": action.params,
        }),
    );
    let mode = ctx.app_mode().await?;

    run.advance(NavigationState::Building);
    let path = build_path(&ctx.config().routes, mode, &page.page_id, &action.params);

    run.advance(NavigationState::Navigating);
    let mut refreshed = false;
    match action.target {
        NavigationTarget::SameWindow => {
            ctx.router().navigate_same_window(&path).await?;
            if current_page_id == page.page_id {
                run.advance(NavigationState::Syncing);
                ctx.router().refresh_current_page_state().await?;
                refreshed = true;
            }
        }
        NavigationTarget::NewWindow => ctx.router().navigate_new_window(&path).await?,
    }

    ctx.audit(
        format!("navigateTo('{}') was triggered", page.page_name),
        json!({ "params": action.params }),
    );
    tracing::debug!(
        chain_id = %ctx.chain_id(),
        page_id = %page.page_id,
        path = %path,
        refreshed,
        "navigated to page"
    );

    Ok(run.complete(
        Destination::Page {
            page_id: page.page_id.clone(),
            page_name: page.page_name.clone(),
            path,
        },
        action.target,
        refreshed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::trigger_ctx::{RouterCall, SnapshotRead, TestTriggerCtx};

    fn app() -> TestTriggerCtx {
        TestTriggerCtx::builder()
            .page("page-home", "Home")
            .page("page-settings", "Settings")
            .current_page("page-home")
    }

    fn navigated(outcome: ActionOutcome) -> NavigationOutcome {
        match outcome {
            ActionOutcome::Navigated(nav) => nav,
            other => panic!("expected navigation outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn url_with_params_gets_default_scheme() {
        let (ctx, inspector) = app().build();
        let action = NavigateAction::to("google.com").param("q", "test");

        let nav = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());

        assert_eq!(
            nav.destination,
            Destination::Url {
                url: "https://google.com?q=test".into()
            }
        );
        assert_eq!(
            inspector.router_calls(),
            vec![RouterCall::AssignLocation("https://google.com?q=test".into())]
        );
        assert!(inspector.audit_records().is_empty());
        assert_eq!(
            inspector.analytics_events(),
            vec![("NAVIGATE".to_string(), json!({"navUrl": "google.com"}))]
        );
        assert_eq!(
            nav.trail,
            vec![
                NavigationState::Classifying,
                NavigationState::Building,
                NavigationState::Navigating,
                NavigationState::Complete
            ]
        );
    }

    #[tokio::test]
    async fn ui_payload_params_keep_their_order() {
        let (ctx, inspector) = app().build();
        let action: NavigateAction = serde_json::from_value(json!({
            "pageNameOrUrl": "google.com",
            "params": {"q": "test", "a": "1"}
        }))
        .unwrap();

        NavigateHandler.execute(&action, &ctx).await.unwrap();

        assert_eq!(
            inspector.router_calls(),
            vec![RouterCall::AssignLocation("https://google.com?q=test&a=1".into())]
        );
    }

    #[tokio::test]
    async fn page_params_keep_their_order() {
        let (ctx, inspector) = app().build();
        let action = NavigateAction::to("Settings")
            .param("tab", "billing")
            .param("id", "7");

        NavigateHandler.execute(&action, &ctx).await.unwrap();

        assert_eq!(
            inspector.navigations(),
            vec![RouterCall::SameWindow(
                "/app/pages/page-settings?tab=billing&id=7".into()
            )]
        );
    }

    #[tokio::test]
    async fn recognized_scheme_is_kept() {
        for url in [
            "http://example.com/a",
            "https://example.com",
            "mailto:ops@example.com",
        ] {
            let (ctx, _inspector) = app().build();
            let nav = navigated(
                NavigateHandler
                    .execute(&NavigateAction::to(url), &ctx)
                    .await
                    .unwrap(),
            );
            assert_eq!(nav.destination.location(), url);
        }
    }

    #[tokio::test]
    async fn unrecognized_scheme_is_prefixed() {
        for url in ["ftp://files.example.net", "www.example.org", "10.1.1.1/x"] {
            let (ctx, _inspector) = app().build();
            let nav = navigated(
                NavigateHandler
                    .execute(&NavigateAction::to(url), &ctx)
                    .await
                    .unwrap(),
            );
            assert!(nav.destination.location().starts_with("https://"));
        }
    }

    #[tokio::test]
    async fn url_in_new_window_does_not_leave_context() {
        let (ctx, inspector) = app().build();
        let action = NavigateAction::to("example.com").in_new_window();

        let nav = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());

        assert!(!nav.leaves_context());
        assert_eq!(
            inspector.router_calls(),
            vec![RouterCall::NewWindow("https://example.com".into())]
        );
    }

    #[tokio::test]
    async fn current_page_in_edit_mode_refreshes_once() {
        let (ctx, inspector) = app().mode(AppMode::Edit).build();

        let nav = navigated(
            NavigateHandler
                .execute(&NavigateAction::to("Home"), &ctx)
                .await
                .unwrap(),
        );

        assert!(nav.refreshed);
        assert_eq!(
            inspector.router_calls(),
            vec![
                RouterCall::SameWindow("/app/pages/page-home/edit".into()),
                RouterCall::Refresh
            ]
        );
        assert_eq!(inspector.refresh_count(), 1);
        let audit = inspector.audit_records();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].text, "navigateTo('Home') was triggered");
        assert_eq!(audit[0].state, json!({"params": {}}));
        assert_eq!(
            nav.trail,
            vec![
                NavigationState::Classifying,
                NavigationState::Resolving,
                NavigationState::Building,
                NavigationState::Navigating,
                NavigationState::Syncing,
                NavigationState::Complete
            ]
        );
    }

    #[tokio::test]
    async fn other_page_does_not_refresh() {
        let (ctx, inspector) = app().mode(AppMode::View).build();
        let action = NavigateAction::to("Settings").param("tab", "billing");

        let nav = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());

        assert!(!nav.refreshed);
        assert_eq!(inspector.refresh_count(), 0);
        assert_eq!(
            nav.destination,
            Destination::Page {
                page_id: "page-settings".into(),
                page_name: "Settings".into(),
                path: "/app/pages/page-settings?tab=billing".into(),
            }
        );
        assert_eq!(
            inspector.analytics_events(),
            vec![(
                "NAVIGATE".to_string(),
                json!({"pageName": "Settings", "pageParams": {"tab": "billing"}})
            )]
        );
        assert_eq!(
            inspector.audit_records()[0].state,
            json!({"params": {"tab": "billing"}})
        );
    }

    #[tokio::test]
    async fn page_in_new_window_view_mode() {
        let (ctx, inspector) = app().mode(AppMode::View).build();
        let action = NavigateAction::to("Settings").in_new_window();

        let nav = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());

        assert_eq!(
            inspector.router_calls(),
            vec![RouterCall::NewWindow("/app/pages/page-settings".into())]
        );
        assert_eq!(inspector.refresh_count(), 0);
        assert!(!nav.refreshed);
        assert_eq!(inspector.audit_records().len(), 1);
    }

    #[tokio::test]
    async fn current_page_in_new_window_does_not_refresh() {
        let (ctx, inspector) = app().build();
        let action = NavigateAction::to("Home").in_new_window();

        NavigateHandler.execute(&action, &ctx).await.unwrap();

        assert_eq!(inspector.refresh_count(), 0);
    }

    #[tokio::test]
    async fn edit_and_view_paths_share_id_and_params() {
        let action = NavigateAction::to("Settings").param("id", "7");

        let (edit_ctx, _) = app().mode(AppMode::Edit).build();
        let (view_ctx, _) = app().mode(AppMode::View).build();
        let edit = navigated(NavigateHandler.execute(&action, &edit_ctx).await.unwrap());
        let view = navigated(NavigateHandler.execute(&action, &view_ctx).await.unwrap());

        let (edit_path, view_path) = (edit.destination.location(), view.destination.location());
        assert_ne!(edit_path, view_path);
        for path in [edit_path, view_path] {
            assert!(path.contains("page-settings"));
            assert!(path.ends_with("?id=7"));
        }
    }

    #[tokio::test]
    async fn unknown_page_fails_without_side_effects() {
        let (ctx, inspector) = app().build();

        let err = NavigateHandler
            .execute(&NavigateAction::to("NoSuchPage"), &ctx)
            .await
            .unwrap_err();

        match &err {
            TriggerError::ResolutionFailure { input, trail } => {
                assert_eq!(input, "NoSuchPage");
                assert_eq!(
                    trail,
                    &vec![
                        NavigationState::Classifying,
                        NavigationState::Resolving,
                        NavigationState::Failed
                    ]
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "Enter a valid URL or page name.");
        assert!(inspector.router_calls().is_empty());
        assert!(inspector.analytics_events().is_empty());
        assert!(inspector.audit_records().is_empty());
        assert_eq!(inspector.snapshot_reads(), vec![SnapshotRead::PageList]);
    }

    #[tokio::test]
    async fn url_classification_wins_over_page_name() {
        let (ctx, inspector) = TestTriggerCtx::builder()
            .page("page-test", "test.com")
            .current_page("page-test")
            .build();

        let nav = navigated(
            NavigateHandler
                .execute(&NavigateAction::to("test.com"), &ctx)
                .await
                .unwrap(),
        );

        assert_eq!(nav.destination.location(), "https://test.com");
        assert_eq!(inspector.refresh_count(), 0);
    }

    #[tokio::test]
    async fn repeated_navigation_resolves_same_path() {
        let (ctx, _inspector) = app().mode(AppMode::Edit).build();
        let action = NavigateAction::to("Settings").param("a", "1").param("b", "2");

        let first = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());
        let second = navigated(NavigateHandler.execute(&action, &ctx).await.unwrap());

        assert_eq!(first.destination, second.destination);
    }

    #[tokio::test]
    async fn page_reads_follow_snapshot_order() {
        let (ctx, inspector) = app().build();

        NavigateHandler
            .execute(&NavigateAction::to("Settings"), &ctx)
            .await
            .unwrap();

        assert_eq!(
            inspector.snapshot_reads(),
            vec![
                SnapshotRead::PageList,
                SnapshotRead::CurrentPageId,
                SnapshotRead::AppMode
            ]
        );
    }

    #[tokio::test]
    async fn router_failure_propagates() {
        let (ctx, inspector) = app().failing_router("history detached").build();

        let err = NavigateHandler
            .execute(&NavigateAction::to("Settings"), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::Effect(_)));
        assert!(inspector.audit_records().is_empty());
    }

    #[tokio::test]
    async fn snapshot_failure_propagates() {
        let (ctx, inspector) = app().snapshot_unavailable("not hydrated").build();

        let err = NavigateHandler
            .execute(&NavigateAction::to("Home"), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::Snapshot(_)));
        assert!(inspector.router_calls().is_empty());
    }
}
