//! Fetch orchestration between views, the query cache and the transport.
//!
//! Each view owns one `FetchOrchestrator`, which tracks at most one live
//! request for its logical query and publishes `QueryState` snapshots through
//! a `tokio::sync::watch` channel.

pub mod orchestrator;
pub mod query;
pub mod state;

pub use orchestrator::FetchOrchestrator;
pub use query::{Payload, Query};
pub use state::{QueryPhase, QueryState};
