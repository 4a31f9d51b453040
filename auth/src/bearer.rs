//! Syntactic extraction of bearer credentials from authorization headers.
//!
//! The scheme word in front of the credential is not checked, so
//! `Token abc` yields `abc` just like `Bearer abc`. Whether the credential
//! authenticates anyone is for the token authority to decide.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use thiserror::Error;

/// Error type for credential extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Invalid Authorization header format. Expected: <scheme> <token>")]
    Malformed,
}

/// Extract the credential from a raw authorization header value.
///
/// # Arguments
/// * `header_value` - Header value, or `None` when the header is absent
///
/// # Returns
/// The second whitespace-separated field
///
/// # Errors
/// * `Missing` - Value is absent or empty
/// * `Malformed` - Fewer than two whitespace-separated fields
pub fn extract_bearer_token(header_value: Option<&str>) -> Result<&str, BearerError> {
    let value = match header_value {
        Some(value) if !value.is_empty() => value,
        _ => return Err(BearerError::Missing),
    };

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(_scheme), Some(token)) => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}

/// Extract the credential from the `Authorization` header of a request.
///
/// A header value that is not visible ASCII is reported as `Malformed`.
pub fn from_headers(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| BearerError::Malformed)?,
        None => return Err(BearerError::Missing),
    };

    extract_bearer_token(Some(value))
}
