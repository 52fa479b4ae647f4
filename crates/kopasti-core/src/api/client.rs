//! HTTP transport for the member query endpoint.
//!
//! The endpoint is a single GET URL. Collection queries pass filter and
//! pagination parameters; entity lookups pass only `id`. Both kinds answer
//! with JSON, or with an `{ "error": true, "message", "statusCode" }`
//! envelope carried in a 2xx response.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{is_missing_id, MemberDetail, MemberPage, QueryParams};

use super::FetchError;

/// The seam between fetch orchestration and the network.
///
/// Implementations must return [`FetchError::Aborted`] once `cancel` fires and
/// stop any underlying I/O. They never retry.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn fetch_collection(
        &self,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<MemberPage, FetchError>;

    async fn fetch_by_id(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<MemberDetail, FetchError>;
}

/// API client for the member endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request URL for a collection query. Absent and empty params are left out.
    pub fn collection_url(&self, params: &QueryParams) -> Url {
        self.url_with(&params.normalized_pairs())
    }

    pub fn member_url(&self, id: &str) -> Url {
        self.url_with(&[("id", id.to_string())])
    }

    fn url_with(&self, pairs: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in pairs {
                query.append_pair(name, value);
            }
        }
        url
    }

    /// GET `url` and return the decoded JSON body, racing the request against
    /// `cancel`. A cancelled request is dropped, which closes its connection.
    async fn get_json(&self, url: &Url, cancel: &CancellationToken) -> Result<Value, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Aborted);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "Request cancelled");
                Err(FetchError::Aborted)
            }
            result = self.send(url) => result,
        }
    }

    async fn send(&self, url: &Url) -> Result<Value, FetchError> {
        debug!(url = %url, "Sending GET request");
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request failed");
                FetchError::unreachable()
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Endpoint returned error status");
            return Err(FetchError::from_status(status));
        }

        let body = response.text().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read response body");
            FetchError::unreachable()
        })?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Response body is not JSON");
            FetchError::unreachable()
        })
    }

    fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, FetchError> {
        serde_json::from_value(value).map_err(|e| {
            warn!(error = %e, "Failed to parse {} response", what);
            FetchError::unreachable()
        })
    }
}

/// Message and status from an error envelope, or `None` if `value` is not one.
fn envelope_error(value: &Value) -> Option<(Option<String>, Option<u16>)> {
    let flagged = match value.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    };
    if !flagged {
        return None;
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let status = value
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());
    Some((message, status))
}

#[async_trait]
impl Transport for ApiClient {
    async fn fetch_collection(
        &self,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<MemberPage, FetchError> {
        let url = self.collection_url(params);
        let value = self.get_json(&url, cancel).await?;

        if let Some((message, status)) = envelope_error(&value) {
            warn!(url = %url, ?status, "Endpoint reported an error");
            return Err(FetchError::application(message, status));
        }

        let page: MemberPage = Self::decode(value, "collection")?;
        debug!(count = page.data.len(), total = page.total, "Fetched member page");
        Ok(page)
    }

    async fn fetch_by_id(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<MemberDetail, FetchError> {
        if is_missing_id(id) {
            return Err(FetchError::not_found());
        }

        let url = self.member_url(id);
        let value = self.get_json(&url, cancel).await?;

        if let Some((message, status)) = envelope_error(&value) {
            warn!(id, ?status, "Endpoint reported an error for member");
            return Err(match (message, status) {
                (None, _) => FetchError::not_found(),
                (Some(message), Some(404)) => FetchError::NotFound { message },
                (message, status) => FetchError::application(message, status),
            });
        }

        let detail: MemberDetail = Self::decode(value, "member")?;
        Ok(detail.with_catalogue_labels())
    }
}
