use crate::api::FetchError;

use super::query::Payload;

/// Where a logical query is in its fetch cycle.
///
/// `Idle → Loading → {Settled, Aborted}`; a new request may start from either
/// end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Loading,
    Settled,
    Aborted,
}

/// What the orchestrator publishes to its subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub phase: QueryPhase,
    pub payload: Option<Payload>,
    /// Never `Aborted`; aborted requests publish nothing.
    pub error: Option<FetchError>,
}

impl QueryState {
    pub(crate) fn loading(previous: Option<Payload>) -> Self {
        Self {
            phase: QueryPhase::Loading,
            payload: previous,
            error: None,
        }
    }

    pub(crate) fn settled(payload: Payload) -> Self {
        Self {
            phase: QueryPhase::Settled,
            payload: Some(payload),
            error: None,
        }
    }

    pub(crate) fn failed(error: FetchError) -> Self {
        Self {
            phase: QueryPhase::Settled,
            payload: None,
            error: Some(error),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            phase: QueryPhase::Settled,
            payload: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == QueryPhase::Loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::message)
    }
}
