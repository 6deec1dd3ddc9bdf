//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the JSON shape always carries a human readable `error` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// The requested record does not exist.
    NotFound,
    /// The request collides with an existing record.
    Conflict,
    /// The route exists but does not accept the request method.
    MethodNotAllowed,
    /// The record store could not be reached.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// The trace identifier in scope at construction time is captured so error
/// bodies correlate with server logs.
///
/// # Examples
/// ```
/// use footballvoice::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Article not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Article not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "Article not found")]
    #[serde(rename = "error")]
    message: String,
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, capturing the current trace identifier.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use footballvoice::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Replace the captured trace identifier.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Error for a request method the route does not serve.
    pub fn method_not_allowed(method: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::MethodNotAllowed,
            format!("Method {method} Not Allowed"),
        )
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn serialises_message_under_error_key() {
        let err = Error::not_found("Article not found");
        let value = serde_json::to_value(&err).expect("serialise error");

        assert_eq!(value["error"], json!("Article not found"));
        assert_eq!(value["code"], json!("not_found"));
        assert!(value.get("traceId").is_none());
        assert!(value.get("details").is_none());
    }

    #[rstest]
    fn method_not_allowed_names_the_method() {
        let err = Error::method_not_allowed("PATCH");
        assert_eq!(err.message(), "Method PATCH Not Allowed");
        assert_eq!(err.code(), ErrorCode::MethodNotAllowed);
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
            .parse()
            .expect("valid uuid");
        let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
    }

    #[rstest]
    fn deserialises_round_trip_with_details() {
        let err = Error::invalid_request("bad").with_details(json!({ "field": "email" }));
        let text = serde_json::to_string(&err).expect("serialise");
        let parsed: Error = serde_json::from_str(&text).expect("deserialise");
        assert_eq!(parsed, err);
    }
}
