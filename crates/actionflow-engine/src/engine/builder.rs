//! Engine builder: assembles collaborators and configuration into an [`Engine`].

use std::sync::Arc;

use super::error::EngineError;
use super::Engine;
use crate::config::EngineConfig;
use crate::defaults::{
    InMemoryAuditLog, InMemoryHistory, InMemorySnapshot, TracingAlerts, TracingAnalytics,
    UnconfiguredQueryRunner,
};
use crate::dispatcher::TriggerDispatcher;
use crate::traits::{
    AlertSink, AnalyticsSink, AuditSink, QueryRunner, RouterService, SnapshotProvider,
};

/// Builder for assembling the [`Engine`].
///
/// All collaborators are optional; defaults from [`crate::defaults`] are
/// applied during [`build()`](EngineBuilder::build). Collaborators are taken
/// as `Arc`s so the host can keep its own handle to them.
pub struct EngineBuilder {
    config: EngineConfig,
    snapshot: Option<Arc<dyn SnapshotProvider>>,
    router: Option<Arc<dyn RouterService>>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    audit: Option<Arc<dyn AuditSink>>,
    alerts: Option<Arc<dyn AlertSink>>,
    queries: Option<Arc<dyn QueryRunner>>,
}

impl EngineBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            snapshot: None,
            router: None,
            analytics: None,
            audit: None,
            alerts: None,
            queries: None,
        }
    }

    /// Set the engine configuration. Default: [`EngineConfig::default()`].
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the snapshot provider. Default: an empty [`InMemorySnapshot`].
    pub fn snapshot(mut self, snapshot: Arc<dyn SnapshotProvider>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Set the router. Default: [`InMemoryHistory`].
    pub fn router(mut self, router: Arc<dyn RouterService>) -> Self {
        self.router = Some(router);
        self
    }

    /// Set the analytics sink. Default: [`TracingAnalytics`].
    pub fn analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Set the audit sink. Default: [`InMemoryAuditLog`].
    pub fn audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Set the alert sink. Default: [`TracingAlerts`].
    pub fn alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Set the query runner. Default: [`UnconfiguredQueryRunner`].
    pub fn queries(mut self, queries: Arc<dyn QueryRunner>) -> Self {
        self.queries = Some(queries);
        self
    }

    /// Assemble the engine. Sanitizes and validates the configuration,
    /// then applies defaults for any unset collaborator.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config.sanitized();
        config.validate()?;

        let snapshot: Arc<dyn SnapshotProvider> = self
            .snapshot
            .unwrap_or_else(|| Arc::new(InMemorySnapshot::new()));
        let router: Arc<dyn RouterService> = self
            .router
            .unwrap_or_else(|| Arc::new(InMemoryHistory::new()));
        let analytics: Arc<dyn AnalyticsSink> =
            self.analytics.unwrap_or_else(|| Arc::new(TracingAnalytics));
        let audit: Arc<dyn AuditSink> = self
            .audit
            .unwrap_or_else(|| Arc::new(InMemoryAuditLog::new()));
        let alerts: Arc<dyn AlertSink> = self.alerts.unwrap_or_else(|| Arc::new(TracingAlerts));
        let queries: Arc<dyn QueryRunner> = self
            .queries
            .unwrap_or_else(|| Arc::new(UnconfiguredQueryRunner));

        tracing::debug!(
            max_callback_depth = config.chain.max_callback_depth,
            "engine built"
        );

        Ok(Engine {
            dispatcher: Arc::new(TriggerDispatcher::new(config.chain.clone())),
            config: Arc::new(config),
            snapshot,
            router,
            analytics,
            audit,
            alerts,
            queries,
        })
    }
}
