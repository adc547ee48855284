use thiserror::Error;

use crate::models::Discipline;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No source URL configured for {0}")]
    NotConfigured(Discipline),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - sheet may no longer be published")]
    Unauthorized,

    #[error("Sheet not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => FetchError::Unauthorized,
            403 => FetchError::AccessDenied(truncated),
            404 => FetchError::NotFound(truncated),
            429 => FetchError::RateLimited,
            500..=599 => FetchError::ServerError(truncated),
            _ => FetchError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(FetchError::from_status(StatusCode::UNAUTHORIZED, ""), FetchError::Unauthorized));
        assert!(matches!(FetchError::from_status(StatusCode::NOT_FOUND, "gone"), FetchError::NotFound(b) if b == "gone"));
        assert!(matches!(FetchError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), FetchError::RateLimited));
        assert!(matches!(FetchError::from_status(StatusCode::BAD_GATEWAY, ""), FetchError::ServerError(_)));
        assert!(matches!(FetchError::from_status(StatusCode::IM_A_TEAPOT, ""), FetchError::InvalidResponse(_)));
    }

    #[test]
    fn test_truncate_body() {
        let long = "é".repeat(400);
        let truncated = FetchError::truncate_body(&long);
        assert!(truncated.contains("truncated, 800 total bytes"));
        assert_eq!(FetchError::truncate_body("short"), "short");
    }
}
