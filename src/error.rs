use thiserror::Error;

#[derive(Error, Debug)]
pub enum MondoError {
    #[error("Authentication failed with status {status_code}")]
    Auth { status_code: u16 },

    #[error("Mondo API error {status_code}: {description}")]
    Api {
        status_code: u16,
        description: &'static str,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("Token response has an unusable expires_in of {0} seconds")]
    InvalidExpiry(i64),

    #[error("No accounts found")]
    NoAccounts,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MondoError {
    /// Build an API error for a non-200 response.
    pub(crate) fn api(status_code: u16) -> Self {
        MondoError::Api {
            status_code,
            description: describe_status(status_code),
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            MondoError::Auth { .. } | MondoError::Api { status_code: 401, .. }
        )
    }

    /// The API asked us to back off. Nothing in this crate retries.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MondoError::Api { status_code: 429, .. })
    }

    /// HTTP status carried by auth and API errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MondoError::Auth { status_code } | MondoError::Api { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }
}

/// Failures below the HTTP status line: nothing was received that could be
/// interpreted as a response.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Connection failed: {0}")]
    Connection(String),
}

// https://getmondo.co.uk/docs/#errors
pub fn describe_status(status_code: u16) -> &'static str {
    match status_code {
        400 => "Bad Request. Your request has missing parameters or is malformed.",
        401 => "Unauthorized. Your request is not authenticated.",
        403 => "Forbidden. Your request is authenticated but has insufficient permissions.",
        404 => "Page Not Found. The endpoint requested does not exist.",
        405 => {
            "Method Not Allowed. You are using the incorrect HTTP verb. \
             Double check whether it should be POST/GET/DELETE/etc."
        }
        406 => {
            "Not Acceptable. Your application does not accept the content format \
             returned according to the Accept headers sent in the request."
        }
        429 => "Too Many Requests. Your application is exceeding its rate limit.",
        500 => "Internal Server Error. Something is wrong on our end.",
        504 => "Gateway Timeout. Something has timed out on our end.",
        _ => "unknown",
    }
}

pub type Result<T> = std::result::Result<T, MondoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_status_descriptions() {
        assert!(describe_status(401).starts_with("Unauthorized"));
        assert!(describe_status(429).starts_with("Too Many Requests"));
        assert!(describe_status(504).starts_with("Gateway Timeout"));
    }

    #[test]
    fn test_unknown_status_falls_back() {
        match MondoError::api(418) {
            MondoError::Api {
                status_code,
                description,
            } => {
                assert_eq!(status_code, 418);
                assert_eq!(description, "unknown");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(MondoError::Auth { status_code: 400 }.is_auth_error());
        assert!(MondoError::api(401).is_auth_error());
        assert!(!MondoError::api(500).is_auth_error());
        assert!(MondoError::api(429).is_rate_limited());
        assert!(!MondoError::NoAccounts.is_rate_limited());
        assert_eq!(MondoError::api(404).status_code(), Some(404));
        assert_eq!(MondoError::NoAccounts.status_code(), None);
    }
}
