// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod alert;
pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod notify;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::Aggregator;
pub use crate::alert::{Alert, Severity, Source};
pub use crate::api::{router, AppState};
pub use crate::config::Config;
pub use crate::error::SourceError;

// Re-export notification types for easy use in bins/tests
pub use crate::notify::{AlertNotification, NotifierMux};
