//! Client error types.

use serde_json::Value;
use tally_core::validation::AmountError;
use tally_shared::error::UNKNOWN_ERROR;
use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or "Unknown error".
        message: String,
    },

    /// The request never produced a response, or the body did not decode.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Fetched figures could not be totalled.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl ClientError {
    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Transport(err) => err.to_string(),
            Self::Amount(err) => err.to_string(),
        }
    }

    /// HTTP status, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::Amount(_) => None,
        }
    }
}

/// Extracts the `error` field of a failed response body.
///
/// Anything else (no body, not JSON, no `error` string) yields "Unknown error".
#[must_use]
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"error":"Invalid date format"}"#.as_slice(), "Invalid date format")]
    #[case(br#"{"error":""}"#.as_slice(), "Unknown error")]
    #[case(br#"{"message":"nope"}"#.as_slice(), "Unknown error")]
    #[case(br#"{"error":42}"#.as_slice(), "Unknown error")]
    #[case(b"<html>502</html>".as_slice(), "Unknown error")]
    #[case(b"".as_slice(), "Unknown error")]
    fn test_error_message_extraction(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(error_message(body), expected);
    }

    #[test]
    fn test_api_error_displays_bare_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Insufficient fund balance".to_string(),
        };
        assert_eq!(err.to_string(), "Insufficient fund balance");
        assert_eq!(err.user_message(), "Insufficient fund balance");
        assert_eq!(err.status(), Some(400));
    }
}
