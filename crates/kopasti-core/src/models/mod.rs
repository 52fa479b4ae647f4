//! Data models for the member directory.
//!
//! - `MemberSummary`, `MemberDetail`, `CriterionScore`: member records as the
//!   endpoint returns them
//! - `MemberPage`: one page of the collection with the overall total
//! - `QueryParams`: filters and pagination for the collection
//! - `PerformanceLevel` and the criteria catalogue

pub mod member;
pub mod performance;
pub mod query;

pub use member::{is_missing_id, CriterionScore, MemberDetail, MemberPage, MemberSummary};
pub use performance::{criterion_label, describe_score, is_valid_score, score_percentage, PerformanceLevel, CRITERIA};
pub use query::{QueryParams, DEFAULT_LIMIT};
