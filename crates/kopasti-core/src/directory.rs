//! Composition root.
//!
//! `MemberDirectory` builds the transport and the one query cache the
//! application uses, and hands both to every view it creates. Views made by
//! the same directory share cached results.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::{ApiClient, Transport};
use crate::cache::QueryCache;
use crate::card::{source_url, CardError, PrintableCard};
use crate::config::Config;
use crate::models::{CriterionScore, MemberDetail, QueryParams};
use crate::sync::{FetchOrchestrator, Payload};
use crate::views::{MemberView, MembersView};

pub struct MemberDirectory<T: Transport> {
    transport: Arc<T>,
    cache: Arc<QueryCache<Payload>>,
    config: Config,
}

impl MemberDirectory<ApiClient> {
    /// Directory backed by the HTTP endpoint named in `config`.
    pub fn connect(config: Config) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(&config)?;
        info!(base_url = %api.base_url(), "Member directory ready");
        Ok(Self::with_transport(Arc::new(api), config))
    }
}

impl<T: Transport> MemberDirectory<T> {
    pub fn with_transport(transport: Arc<T>, config: Config) -> Self {
        let cache = Arc::new(QueryCache::with_ttl(config.cache_ttl()));
        Self {
            transport,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &Arc<QueryCache<Payload>> {
        &self.cache
    }

    fn orchestrator(&self) -> FetchOrchestrator<T> {
        FetchOrchestrator::new(Arc::clone(&self.transport), Arc::clone(&self.cache))
    }

    pub fn members_view(&self) -> MembersView<T> {
        MembersView::new(self.orchestrator())
    }

    pub fn member_view(&self) -> MemberView<T> {
        MemberView::new(self.orchestrator())
    }

    /// First page of the unfiltered list, sized by the configured page size.
    pub fn first_page(&self) -> QueryParams {
        QueryParams::first_page().with_page(0, self.config.page_size)
    }

    /// Link to the sheet cell a criterion was scored in, if it names one.
    pub fn criterion_source_url(&self, criterion: &CriterionScore) -> Option<String> {
        let reference = criterion.source_reference.trim();
        (!reference.is_empty()).then(|| source_url(&self.config.spreadsheet_id, reference))
    }

    pub fn printable_card(&self, detail: &MemberDetail) -> Result<PrintableCard, CardError> {
        PrintableCard::from_detail(detail, &self.config)
    }

    /// Forget every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
