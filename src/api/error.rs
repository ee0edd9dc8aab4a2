//! Errors produced by REST calls.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

pub const TRANSPORT_FALLBACK: &str = "Could not reach the server. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, timeout, or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the credentials or the session (HTTP 401).
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx status.
    #[error("server returned HTTP {status}")]
    Backend { status: u16, message: Option<String> },

    /// A 2xx body that does not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Backend { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Text to show the admin: the backend's message verbatim when present,
    /// otherwise a generic fallback for the error class.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message: Some(m) } | Self::Backend { message: Some(m), .. } => m.clone(),
            Self::Unauthorized { message: None } => "Invalid credentials. Please try again.".to_string(),
            Self::Backend { status, message: None } => format!("Request failed (HTTP {status})."),
            Self::Transport(_) => TRANSPORT_FALLBACK.to_string(),
            other => other.to_string(),
        }
    }
}

/// Pull a human message out of an error body.
///
/// Accepts `{"message": "..."}`, `{"message": ["a", "b"]}` (joined with
/// `"; "`) and `{"error": "..."}`. Anything else yields `None`.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("message") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    };
    message
        .or_else(|| value.get("error").and_then(serde_json::Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}
