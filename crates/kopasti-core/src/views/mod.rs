//! Read-only view models for rendering code.
//!
//! - `MembersView`: `{ data, loading, error, total }` for the member list
//! - `MemberView`: `{ member, loading, error }` for a single member
//!
//! Views are thin projections of their orchestrator's published state. They
//! never touch the cache or compute cache keys themselves.

pub mod member;
pub mod members;

pub use member::{MemberSnapshot, MemberView};
pub use members::{MembersSnapshot, MembersView};
