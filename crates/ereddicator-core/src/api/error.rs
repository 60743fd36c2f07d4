use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Unauthorized - credentials were rejected")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
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
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            code => ApiError::Status {
                status: code,
                body: truncated,
            },
        }
    }

    /// True when Reddit answered and refused the request, as opposed to the
    /// request never completing or the answer being unreadable.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, ApiError::NetworkError(_) | ApiError::InvalidResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::Forbidden(ref body) if body == "nope"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "down"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "bad"),
            ApiError::Status { status: 400, .. }
        ));
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);

        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));

        // Multi-byte characters straddling the limit must not panic
        let wide = "€".repeat(300);
        let truncated = ApiError::truncate_body(&wide);
        assert!(truncated.contains("truncated, 900 total bytes"));
    }

    #[test]
    fn test_is_rejection() {
        assert!(ApiError::OAuth("invalid_grant".into()).is_rejection());
        assert!(ApiError::Unauthorized.is_rejection());
        assert!(ApiError::ServerError("oops".into()).is_rejection());
        assert!(!ApiError::InvalidResponse("not json".into()).is_rejection());
    }
}
