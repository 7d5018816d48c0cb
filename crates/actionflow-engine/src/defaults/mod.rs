//! Default collaborator implementations.
//!
//! These let the engine run with zero external wiring: in tests, in a
//! headless preview, or as a starting point for a real host integration.
//! Each can be replaced via the [`EngineBuilder`](crate::engine::EngineBuilder).

pub mod in_memory_audit;
pub mod in_memory_history;
pub mod in_memory_snapshot;
pub mod tracing_sinks;
pub mod unconfigured_queries;
pub use in_memory_audit::InMemoryAuditLog;
pub use in_memory_history::InMemoryHistory;
pub use in_memory_snapshot::InMemorySnapshot;
pub use tracing_sinks::{TracingAlerts, TracingAnalytics};
pub use unconfigured_queries::UnconfiguredQueryRunner;
