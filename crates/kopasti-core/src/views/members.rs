use serde::Serialize;
use tokio::sync::watch;

use crate::api::Transport;
use crate::models::{MemberSummary, QueryParams};
use crate::sync::{FetchOrchestrator, Payload, Query, QueryState};

/// What a member list renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MembersSnapshot {
    pub data: Vec<MemberSummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub total: u64,
}

impl From<&QueryState> for MembersSnapshot {
    fn from(state: &QueryState) -> Self {
        let (data, total) = match &state.payload {
            Some(Payload::Collection(page)) => (page.data.clone(), page.total),
            _ => (Vec::new(), 0),
        };
        Self {
            data,
            loading: state.is_loading(),
            error: state.error_message(),
            total,
        }
    }
}

/// Paginated, filterable member list.
///
/// Dropping the view cancels its in-flight request.
pub struct MembersView<T: Transport> {
    orchestrator: FetchOrchestrator<T>,
}

impl<T: Transport> MembersView<T> {
    pub fn new(orchestrator: FetchOrchestrator<T>) -> Self {
        Self { orchestrator }
    }

    pub fn snapshot(&self) -> MembersSnapshot {
        MembersSnapshot::from(&self.orchestrator.state())
    }

    /// Raw state updates; project them with `MembersSnapshot::from`.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.orchestrator.subscribe()
    }

    /// Params of the most recent request.
    pub fn params(&self) -> Option<QueryParams> {
        match self.orchestrator.current_query() {
            Some(Query::Collection(params)) => Some(params),
            _ => None,
        }
    }

    pub async fn set_params(&self, params: QueryParams) {
        self.orchestrator.request(Query::Collection(params)).await;
    }

    pub async fn refetch(&self) {
        self.orchestrator.refetch().await;
    }

    /// Move to the next page. Returns `false` when already on the last one.
    pub async fn next_page(&self) -> bool {
        let total = self.snapshot().total;
        let next = self.params().and_then(|p| p.next_page(total));
        match next {
            Some(params) => {
                self.set_params(params).await;
                true
            }
            None => false,
        }
    }

    /// Move to the previous page. Returns `false` when already on the first.
    pub async fn prev_page(&self) -> bool {
        match self.params().and_then(|p| p.prev_page()) {
            Some(params) => {
                self.set_params(params).await;
                true
            }
            None => false,
        }
    }
}

impl<T: Transport> Drop for MembersView<T> {
    fn drop(&mut self) {
        self.orchestrator.cancel();
    }
}
