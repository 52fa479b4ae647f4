//! Member card data: QR payloads and the fields of a printable card.
//!
//! A card's QR code encodes `{origin}/member/{id}`. Scanning reverses that:
//! the id is whatever path segment follows `member`.

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::{MemberDetail, PerformanceLevel};
use crate::utils::format_score;

pub const INVALID_QR_MESSAGE: &str = "QR Code tidak valid.";

const MEMBER_SEGMENT: &str = "member";

/// Print size of a card (A6 portrait).
pub const CARD_WIDTH_MM: u32 = 105;
pub const CARD_HEIGHT_MM: u32 = 148;

/// Rendered QR size in pixels.
pub const QR_SIZE_PX: u32 = 150;

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";
const AVATAR_SIZE: &str = "200";
const AVATAR_BACKGROUND: &str = "2D5016";
const AVATAR_COLOR: &str = "fff";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("{}", INVALID_QR_MESSAGE)]
    InvalidQr,

    #[error("Invalid card origin: {0}")]
    InvalidOrigin(String),
}

/// URL a member's QR code points at.
pub fn card_url(origin: &str, member_id: &str) -> Result<Url, CardError> {
    let invalid = || CardError::InvalidOrigin(origin.to_string());
    let mut url = Url::parse(origin).map_err(|_| invalid())?;
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(MEMBER_SEGMENT)
        .push(member_id);
    Ok(url)
}

/// Extract the member id from scanned QR text.
pub fn parse_scanned_member_id(scanned: &str) -> Result<String, CardError> {
    let url = Url::parse(scanned.trim()).map_err(|_| CardError::InvalidQr)?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    segments
        .iter()
        .position(|s| *s == MEMBER_SEGMENT)
        .and_then(|i| segments.get(i + 1))
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .ok_or(CardError::InvalidQr)
}

/// Link to the sheet cell a criterion score was read from.
pub fn source_url(spreadsheet_id: &str, source_reference: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/edit#gid=0&range={}",
        spreadsheet_id, source_reference
    )
}

/// Generated avatar used when a member has no photo.
pub fn avatar_url(name: &str) -> String {
    Url::parse_with_params(
        AVATAR_BASE_URL,
        &[
            ("name", name),
            ("size", AVATAR_SIZE),
            ("background", AVATAR_BACKGROUND),
            ("color", AVATAR_COLOR),
        ],
    )
    .map(String::from)
    .unwrap_or_else(|_| AVATAR_BASE_URL.to_string())
}

/// Everything printed on a member card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PrintableCard {
    pub member_number: String,
    pub name: String,
    pub position: String,
    pub unit: String,
    pub cohort: String,
    pub photo_url: String,
    /// Present only when the member has a positive average.
    pub average_label: Option<String>,
    pub level: PerformanceLevel,
    pub qr_payload: String,
}

impl PrintableCard {
    pub fn from_detail(detail: &MemberDetail, config: &Config) -> Result<Self, CardError> {
        let member = &detail.summary;
        let qr_payload = card_url(&config.card_origin, &member.id)?.to_string();

        let photo_url = member
            .photo_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| avatar_url(&member.name));

        let average_label = member
            .average_score
            .filter(|avg| *avg > 0.0)
            .map(|avg| format!("Rata-rata: {}", format_score(Some(avg))));

        Ok(Self {
            member_number: member.member_number.clone(),
            name: member.name.clone(),
            position: member.position.clone(),
            unit: member.unit.clone(),
            cohort: member.cohort.clone(),
            photo_url,
            average_label,
            level: PerformanceLevel::from_score(member.average_score),
            qr_payload,
        })
    }
}
