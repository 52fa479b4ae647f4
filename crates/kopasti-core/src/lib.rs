//! KOPASTI member directory core.
//!
//! Fetches member records and performance scores from a read-only JSON
//! endpoint and keeps views in sync with them:
//!
//! - `api`: reqwest transport and the `FetchError` taxonomy
//! - `cache`: in-memory query cache with a 5 minute TTL
//! - `sync`: per-query fetch orchestration with cancellation
//! - `views`: member list and member detail view models
//! - `directory`: composition root wiring the above together
//! - `card`: QR payloads and printable card data

pub mod api;
pub mod cache;
pub mod card;
pub mod config;
pub mod directory;
pub mod models;
pub mod sync;
pub mod utils;
pub mod views;

pub use api::{ApiClient, FetchError, Transport};
pub use cache::{CacheEntry, CacheKey, QueryCache};
pub use card::{card_url, parse_scanned_member_id, CardError, PrintableCard};
pub use config::Config;
pub use directory::MemberDirectory;
pub use models::{CriterionScore, MemberDetail, MemberPage, MemberSummary, PerformanceLevel, QueryParams};
pub use sync::{FetchOrchestrator, Payload, Query, QueryPhase, QueryState};
pub use views::{MemberSnapshot, MemberView, MembersSnapshot, MembersView};
