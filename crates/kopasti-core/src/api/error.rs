use thiserror::Error;

/// Shown when the endpoint is unreachable or answers with a non-2xx status.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.";

/// Shown when a member id is missing or the endpoint reports no such member.
pub const NOT_FOUND_MESSAGE: &str = "Data tidak ditemukan.";

/// Fallback for application errors that carry no message of their own.
pub const GENERIC_ERROR_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// Status assumed for an application error envelope without `statusCode`.
const DEFAULT_APPLICATION_STATUS: u16 = 500;

/// Every failure a fetch can end in.
///
/// `Aborted` is never shown to the user: it means the request was superseded
/// or its consumer went away.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{message}")]
    Network { message: String, status: Option<u16> },

    #[error("Request aborted")]
    Aborted,

    #[error("{message}")]
    Application {
        message: String,
        status_code: Option<u16>,
    },

    #[error("{message}")]
    NotFound { message: String },
}

impl FetchError {
    /// Network failure that never produced an HTTP status.
    pub fn unreachable() -> Self {
        FetchError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: None,
        }
    }

    pub fn from_status(status: reqwest::StatusCode) -> Self {
        FetchError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: Some(status.as_u16()),
        }
    }

    /// Build an application error from the server's `{ error: true, .. }` envelope.
    pub fn application(message: Option<String>, status_code: Option<u16>) -> Self {
        FetchError::Application {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            status_code: Some(status_code.unwrap_or(DEFAULT_APPLICATION_STATUS)),
        }
    }

    pub fn not_found() -> Self {
        FetchError::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }

    /// Message suitable for the UI.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(_: reqwest::Error) -> Self {
        FetchError::unreachable()
    }
}
