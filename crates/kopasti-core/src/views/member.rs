use serde::Serialize;
use tokio::sync::watch;

use crate::api::Transport;
use crate::models::MemberDetail;
use crate::sync::{FetchOrchestrator, Payload, Query, QueryState};

/// What a member detail page renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberSnapshot {
    pub member: Option<MemberDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl From<&QueryState> for MemberSnapshot {
    fn from(state: &QueryState) -> Self {
        let member = match &state.payload {
            Some(Payload::Member(detail)) => Some(detail.clone()),
            _ => None,
        };
        Self {
            member,
            loading: state.is_loading(),
            error: state.error_message(),
        }
    }
}

/// A single member looked up by id.
///
/// Dropping the view cancels its in-flight request.
pub struct MemberView<T: Transport> {
    orchestrator: FetchOrchestrator<T>,
}

impl<T: Transport> MemberView<T> {
    pub fn new(orchestrator: FetchOrchestrator<T>) -> Self {
        Self { orchestrator }
    }

    pub fn snapshot(&self) -> MemberSnapshot {
        MemberSnapshot::from(&self.orchestrator.state())
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.orchestrator.subscribe()
    }

    pub fn member_id(&self) -> Option<String> {
        match self.orchestrator.current_query() {
            Some(Query::Member(id)) => Some(id),
            _ => None,
        }
    }

    /// Show the member with `id`. An empty id settles immediately with no
    /// member and no error.
    pub async fn load(&self, id: impl Into<String>) {
        self.orchestrator.request(Query::Member(id.into())).await;
    }

    pub async fn refetch(&self) {
        self.orchestrator.refetch().await;
    }
}

impl<T: Transport> Drop for MemberView<T> {
    fn drop(&mut self) {
        self.orchestrator.cancel();
    }
}
