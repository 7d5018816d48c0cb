//! Analytics and alert sinks that emit `tracing` events.

use serde_json::Value;

use crate::traits::{AlertSink, AnalyticsSink};
use crate::types::AlertStyle;

/// Logs analytics events under the `actionflow::analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn log_event(&self, name: &str, metadata: Value) {
        tracing::info!(target: "actionflow::analytics", event = %name, metadata = %metadata);
    }
}

/// Logs alerts under the `actionflow::alerts` target, at a level matching
/// the alert style.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlerts;

impl AlertSink for TracingAlerts {
    fn show(&self, message: &str, style: AlertStyle) {
        match style {
            AlertStyle::Error => {
                tracing::error!(target: "actionflow::alerts", style = %style, "{message}")
            }
            AlertStyle::Warning => {
                tracing::warn!(target: "actionflow::alerts", style = %style, "{message}")
            }
            AlertStyle::Info | AlertStyle::Success => {
                tracing::info!(target: "actionflow::alerts", style = %style, "{message}")
            }
        }
    }
}
