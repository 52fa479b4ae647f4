use crate::models::performance::{score_percentage, MAX_SCORE};

/// Display form of a nullable score: "N/A", "80", or "78.25".
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if !s.is_nan() => {
            let fixed = format!("{:.2}", s);
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "N/A".to_string(),
    }
}

/// Score as a percentage of the 0–100 scale, e.g. "78%".
pub fn format_percentage(score: Option<f64>) -> String {
    match score {
        Some(s) if !s.is_nan() => format!("{}%", score_percentage(Some(s), MAX_SCORE)),
        _ => "N/A".to_string(),
    }
}
