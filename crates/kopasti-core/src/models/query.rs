use serde::{Deserialize, Serialize};

/// Members per page when the caller does not choose.
pub const DEFAULT_LIMIT: u64 = 20;

/// Filter and pagination fields for the member collection.
///
/// Absent and empty-string fields are dropped by [`QueryParams::normalized_pairs`],
/// so `q: Some("")` and `q: None` describe the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct QueryParams {
    /// Free-text search over name and member number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(rename = "angkatan", default, skip_serializing_if = "Option::is_none")]
    pub cohort: Option<String>,
    #[serde(rename = "satuan_terminal", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl QueryParams {
    /// First page with the default page size.
    pub fn first_page() -> Self {
        Self {
            offset: Some(0),
            limit: Some(DEFAULT_LIMIT),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohort = Some(cohort.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Wire name and value of every defined, non-empty field, in a fixed order.
    ///
    /// This is the only serialization of the params: the request URL and the
    /// cache key are both built from it.
    pub fn normalized_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("q", &self.q),
            ("angkatan", &self.cohort),
            ("satuan_terminal", &self.unit),
        ];
        let numbers = [("offset", self.offset), ("limit", self.limit)];

        text.into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (name, v.to_string()))
            })
            .chain(
                numbers
                    .into_iter()
                    .filter_map(|(name, value)| value.map(|v| (name, v.to_string()))),
            )
            .collect()
    }

    /// Page size, falling back to [`DEFAULT_LIMIT`].
    pub fn page_size(&self) -> u64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// Params for the following page, if `total` says there is one.
    pub fn next_page(&self, total: u64) -> Option<Self> {
        let limit = self.page_size();
        let next = self
            .offset
            .unwrap_or(0)
            .checked_add(limit)
            .filter(|next| *next < total)?;
        Some(Self {
            offset: Some(next),
            limit: Some(limit),
            ..self.clone()
        })
    }

    /// Params for the preceding page, if not already on the first.
    pub fn prev_page(&self) -> Option<Self> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.page_size();
        (offset > 0).then(|| Self {
            offset: Some(offset.saturating_sub(limit)),
            limit: Some(limit),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_pairs_skip_empty() {
        let params = QueryParams {
            q: Some(String::new()),
            cohort: Some("2024".to_string()),
            unit: None,
            offset: Some(0),
            limit: Some(20),
        };
        assert_eq!(
            params.normalized_pairs(),
            vec![
                ("angkatan", "2024".to_string()),
                ("offset", "0".to_string()),
                ("limit", "20".to_string()),
            ]
        );
        assert!(QueryParams::default().normalized_pairs().is_empty());
    }

    #[test]
    fn test_pagination() {
        let page = QueryParams::first_page().with_search("budi");
        let next = page.next_page(57).expect("second page exists");
        assert_eq!(next.offset, Some(20));
        assert_eq!(next.q.as_deref(), Some("budi"));

        let last = next.next_page(57).expect("third page exists");
        assert_eq!(last.offset, Some(40));
        assert!(last.next_page(57).is_none());

        assert_eq!(last.prev_page().and_then(|p| p.offset), Some(20));
        assert!(page.prev_page().is_none());

        let odd = QueryParams::default().with_page(5, 20);
        assert_eq!(odd.prev_page().and_then(|p| p.offset), Some(0));
    }

    #[test]
    fn test_next_page_near_u64_max_has_no_successor() {
        let far = QueryParams::default().with_page(u64::MAX - 5, 20);
        assert!(far.next_page(57).is_none());
        assert!(far.next_page(u64::MAX).is_none());
    }
}
