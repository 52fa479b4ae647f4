use tokio_util::sync::CancellationToken;

use crate::api::{FetchError, Transport};
use crate::cache::CacheKey;
use crate::models::{is_missing_id, MemberDetail, MemberPage, QueryParams};

/// A data need a view asks the orchestrator to satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Collection(QueryParams),
    Member(String),
}

/// Result of a [`Query`], as stored in the cache and published to views.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Collection(MemberPage),
    Member(MemberDetail),
}

impl Query {
    /// Cache key for this query, or `None` when there is nothing to fetch
    /// (a member query without an id).
    pub fn cache_key(&self) -> Option<CacheKey> {
        match self {
            Query::Collection(params) => Some(CacheKey::collection(params)),
            Query::Member(id) if is_missing_id(id) => None,
            Query::Member(id) => Some(CacheKey::member(id)),
        }
    }

    /// Whether `payload` is the kind of result this query produces.
    pub fn accepts(&self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (Query::Collection(_), Payload::Collection(_)) | (Query::Member(_), Payload::Member(_))
        )
    }

    pub(crate) async fn run<T: Transport + ?Sized>(
        &self,
        transport: &T,
        cancel: &CancellationToken,
    ) -> Result<Payload, FetchError> {
        match self {
            Query::Collection(params) => transport
                .fetch_collection(params, cancel)
                .await
                .map(Payload::Collection),
            Query::Member(id) => transport.fetch_by_id(id, cancel).await.map(Payload::Member),
        }
    }
}
