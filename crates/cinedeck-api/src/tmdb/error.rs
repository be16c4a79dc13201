//! Fetch error taxonomy.

use thiserror::Error;

/// Failure of a single upstream GET.
///
/// `Clone` so one failed in-flight request can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network failure or non-2xx status.
    #[error("transport error for {url}{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        /// Requested URL with the API key redacted.
        url: String,
        /// HTTP status, `None` when no response arrived.
        status: Option<u16>,
        /// Cause.
        message: String,
    },
    /// Body was not valid JSON or did not match the expected shape.
    #[error("failed to decode JSON response from {url}: {message}")]
    Decode {
        /// Requested URL with the API key redacted.
        url: String,
        /// Decoder message.
        message: String,
    },
}

impl FetchError {
    /// HTTP status, when the failure came with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Decode { .. } => None,
        }
    }

    /// Returns `true` for `Transport`.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` for `Decode`.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Replaces the `api_key` query value so URLs can be logged and reported.
#[must_use]
pub fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find("api_key=") else {
        return String::from(url);
    };
    let value_start = start.saturating_add("api_key=".len());
    let value_end = url
        .get(value_start..)
        .and_then(|rest| rest.find('&'))
        .map_or(url.len(), |offset| value_start.saturating_add(offset));
    let head = url.get(..value_start).unwrap_or_default();
    let tail = url.get(value_end..).unwrap_or_default();
    format!("{head}***{tail}")
}
