use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for the widget fetch/refresh paths.
///
/// Every variant is recoverable: the background loops log and skip the
/// cycle, and route handlers translate into a JSON error response.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Required credentials/settings are absent. Terminal until the
    /// configuration is fixed, but callers still retry on the next cycle.
    #[error("missing configuration: {0}")]
    Config(String),

    /// The upstream rejected our credentials (revoked refresh token,
    /// expired bearer token).
    #[error("authorization rejected: {0}")]
    Auth(String),

    /// Timeout, connection failure or 5xx from the upstream.
    #[error("transient upstream failure: {0}")]
    Transient(String),

    /// The upstream answered but the body was not what we expect.
    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for WidgetError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transient(e.to_string())
    }
}

/// Dashlink v1 JSON error response format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashlinkError {
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// HTTP status code.
    pub status: u16,
    /// HTTP status reason phrase (e.g. "Bad Request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    /// The request path that caused the error.
    pub path: String,
}

impl DashlinkError {
    pub fn new(
        status: u16,
        error: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: crate::server::now_ms(),
            status,
            error: error.into(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(404, "Not Found", message, path)
    }

    /// Maps a widget failure onto the closest HTTP status.
    pub fn from_widget(err: &WidgetError, path: impl Into<String>) -> Self {
        match err {
            WidgetError::Config(m) => Self::new(503, "Service Unavailable", m.clone(), path),
            WidgetError::Auth(m) => Self::new(502, "Bad Gateway", m.clone(), path),
            WidgetError::Transient(m) => Self::new(502, "Bad Gateway", m.clone(), path),
            WidgetError::Payload(m) => Self::new(502, "Bad Gateway", m.clone(), path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_error_status_mapping() {
        let e = DashlinkError::from_widget(
            &WidgetError::Config("spotify credentials not set".into()),
            "/v1/sessions/abc/now-playing",
        );
        assert_eq!(e.status, 503);
        assert_eq!(e.error, "Service Unavailable");

        let e = DashlinkError::from_widget(
            &WidgetError::Auth("refresh token revoked".into()),
            "/v1/sessions/abc/now-playing",
        );
        assert_eq!(e.status, 502);
    }
}
