//! Shared validation helpers for inbound HTTP adapters.
//!
//! Malformed bodies never reach handlers: [`json_config`] converts Actix's
//! deserialisation failures into `invalid_request` errors carrying the serde
//! message, so a wrong JSON type or an unknown category is a `400` with the
//! standard error body.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{EmailAddress, Error};

/// Upper bound for request bodies; article content is the largest field.
pub const JSON_LIMIT: usize = 2 * 1024 * 1024;

fn json_error(error: JsonPayloadError, _request: &HttpRequest) -> actix_web::Error {
    let domain = match &error {
        JsonPayloadError::Deserialize(inner) => Error::invalid_request("Invalid request body")
            .with_details(json!({ "code": "invalid_body", "reason": inner.to_string() })),
        JsonPayloadError::ContentType => Error::invalid_request("Expected application/json body")
            .with_details(json!({ "code": "invalid_content_type" })),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            Error::invalid_request("Request body too large")
                .with_details(json!({ "code": "body_too_large", "limit": limit }))
        }
        other => Error::invalid_request("Invalid request body")
            .with_details(json!({ "code": "invalid_body", "reason": other.to_string() })),
    };
    domain.into()
}

/// JSON extractor configuration shared by every route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(json_error)
}

/// Parse a path identifier. Anything that is not a UUID cannot name a stored
/// record, so it is reported as missing.
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found(not_found))
}

/// Parse a client supplied email address.
pub(crate) fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::parse(raw).map_err(Error::from)
}
