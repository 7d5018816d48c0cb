//! Built-in trigger handlers, one per [`ActionDescriptor`](crate::types::ActionDescriptor) variant.

pub mod navigate;
pub mod run_query;
pub mod show_alert;

pub use navigate::NavigateHandler;
pub use run_query::RunQueryHandler;
pub use show_alert::ShowAlertHandler;
