// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST client error types

use ac_api_contract::{ApiContractError, ProblemDetails};
use ac_client_api::ClientApiError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by [`crate::RestClient`]
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error ({status}): {details}")]
    ServerError {
        status: StatusCode,
        details: ProblemDetails,
    },

    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid request: {0}")]
    Validation(#[from] ApiContractError),
}

pub type RestClientResult<T> = Result<T, RestClientError>;

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Http(e) if e.is_decode() => ClientApiError::Decode(e.to_string()),
            RestClientError::Http(e) => ClientApiError::Transport(e.to_string()),
            RestClientError::Url(e) => ClientApiError::Transport(e.to_string()),
            RestClientError::InvalidBaseUrl(url) => {
                ClientApiError::Transport(format!("invalid base URL {}", url))
            }
            RestClientError::Json(e) => ClientApiError::Decode(e.to_string()),
            RestClientError::ServerError { status, details } => ClientApiError::Server {
                status: status.as_u16(),
                message: details.to_string(),
            },
            RestClientError::UnexpectedResponse { status, body } => ClientApiError::Server {
                status: status.as_u16(),
                message: body,
            },
            RestClientError::Auth(msg) => ClientApiError::Auth(msg),
            RestClientError::Validation(e) => ClientApiError::Validation(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_conversion() {
        let err = RestClientError::ServerError {
            status: StatusCode::FORBIDDEN,
            details: ProblemDetails {
                problem_type: "about:blank".to_string(),
                title: "Forbidden".to_string(),
                status: Some(403),
                detail: "admin role required".to_string(),
                errors: Default::default(),
            },
        };
        assert_eq!(
            ClientApiError::from(err),
            ClientApiError::Server {
                status: 403,
                message: "Forbidden: admin role required".to_string(),
            }
        );
    }

    #[test]
    fn test_json_error_is_decode() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(
            ClientApiError::from(RestClientError::from(json_err)),
            ClientApiError::Decode(_)
        ));
    }
}
