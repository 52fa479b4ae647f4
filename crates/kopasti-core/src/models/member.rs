use serde::{Deserialize, Deserializer, Serialize};

use super::performance::criterion_label;

/// True when a member id cannot name any member.
pub fn is_missing_id(id: &str) -> bool {
    id.trim().is_empty()
}

/// One row of the member collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(rename = "nomor_induk", default, deserialize_with = "string_or_number")]
    pub member_number: String,
    #[serde(rename = "jabatan", default)]
    pub position: String,
    #[serde(rename = "satuan_terminal", default)]
    pub unit: String,
    #[serde(rename = "angkatan", default, deserialize_with = "string_or_number")]
    pub cohort: String,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A single performance criterion for a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CriterionScore {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Option<f64>,
    /// Opaque pointer into the source sheet (a cell reference such as `D12`).
    #[serde(rename = "cellRef", default)]
    pub source_reference: String,
}

impl CriterionScore {
    pub fn has_value(&self) -> bool {
        self.value.is_some_and(|v| !v.is_nan())
    }
}

/// A member with its per-criterion scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberDetail {
    #[serde(flatten)]
    pub summary: MemberSummary,
    #[serde(rename = "criteria_list", default)]
    pub criteria: Vec<CriterionScore>,
}

impl MemberDetail {
    /// Fill labels the server left blank from the criteria catalogue.
    pub fn with_catalogue_labels(mut self) -> Self {
        for criterion in &mut self.criteria {
            if criterion.label.trim().is_empty() {
                if let Some(label) = criterion_label(&criterion.key) {
                    criterion.label = label.to_string();
                }
            }
        }
        self
    }

    /// Criteria that carry a numeric score, in server order. These are the
    /// points a radar chart can plot.
    pub fn scored_criteria(&self) -> impl Iterator<Item = &CriterionScore> {
        self.criteria.iter().filter(|c| c.has_value())
    }

    pub fn criterion(&self, key: &str) -> Option<&CriterionScore> {
        self.criteria.iter().find(|c| c.key == key)
    }
}

/// One page of the member collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberPage {
    #[serde(default)]
    pub data: Vec<MemberSummary>,
    #[serde(default)]
    pub total: u64,
}

/// Sheet-backed APIs emit ids and cohorts as either strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null => String::new(),
    })
}
