//! Score classification for member performance.
//!
//! Scores are on a 0–100 scale. A missing score is "unrated" rather than zero.

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the low band.
const LOW_THRESHOLD: f64 = 40.0;

/// Upper bound (inclusive) of the medium band.
const MEDIUM_THRESHOLD: f64 = 70.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// The criteria every member is assessed on, with their display labels.
pub const CRITERIA: &[(&str, &str)] = &[
    ("kedisiplinan", "Kedisiplinan"),
    ("kepemimpinan", "Kepemimpinan"),
    ("kerajinan", "Kerajinan"),
    ("public_speaking", "Public Speaking"),
    ("teamwork", "Teamwork"),
    ("teknis_kopasti", "Teknis KOPASTI"),
    ("pengambilan_keputusan", "Pengambilan Keputusan"),
    ("kreativitas", "Kreativitas"),
];

/// Look up the display label for a criterion key.
pub fn criterion_label(key: &str) -> Option<&'static str> {
    CRITERIA
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum PerformanceLevel {
    Unrated,
    Low,
    Medium,
    High,
}

impl PerformanceLevel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => PerformanceLevel::Unrated,
            Some(s) if s.is_nan() => PerformanceLevel::Unrated,
            Some(s) if s <= LOW_THRESHOLD => PerformanceLevel::Low,
            Some(s) if s <= MEDIUM_THRESHOLD => PerformanceLevel::Medium,
            Some(_) => PerformanceLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Unrated => "N/A",
            PerformanceLevel::Low => "Rendah",
            PerformanceLevel::Medium => "Sedang",
            PerformanceLevel::High => "Baik",
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Longer assessment text for a score, in seven bands.
pub fn describe_score(score: Option<f64>) -> &'static str {
    let Some(s) = score.filter(|s| !s.is_nan()) else {
        return "Belum ada penilaian";
    };
    match s {
        s if s <= 40.0 => "Perlu peningkatan signifikan",
        s if s <= 50.0 => "Perlu ditingkatkan",
        s if s <= 60.0 => "Cukup",
        s if s <= 70.0 => "Memuaskan",
        s if s <= 80.0 => "Baik",
        s if s <= 90.0 => "Sangat baik",
        _ => "Luar biasa",
    }
}

/// Score as a rounded percentage of `max_score`. Unrated scores count as 0.
pub fn score_percentage(score: Option<f64>, max_score: f64) -> i64 {
    match score {
        Some(s) if !s.is_nan() && max_score > 0.0 => ((s / max_score) * 100.0).round() as i64,
        _ => 0,
    }
}

pub fn is_valid_score(score: Option<f64>) -> bool {
    score.is_some_and(|s| (MIN_SCORE..=MAX_SCORE).contains(&s))
}
