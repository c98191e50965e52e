//! Booky response representation.
//!
//! Responses are produced by the business layer, either from a handled request or
//! from the errors of a failed parse session, and serialized by the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder).

use bytes::Bytes;

use crate::protocol::{ParseError, StatusCode};

/// Header carrying the reason phrase of an error response
pub const REASON_HEADER: &str = "Reason";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Bytes::new() }
    }

    pub fn success() -> Self {
        Self::new(StatusCode::Success)
    }

    /// Builds a `ServerError` response carrying `message` as its body.
    pub fn server_error<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::ServerError)
            .with_header(REASON_HEADER, StatusCode::ServerError.canonical_reason())
            .with_body(message.into())
    }

    /// Builds the response for a failed parse session.
    ///
    /// The status follows the kind of the first error, the body lists every error message on its own line.
    pub fn from_errors(errors: &[ParseError]) -> Self {
        let status = errors.first().map_or(StatusCode::DeadParser, |error| StatusCode::from(error.kind()));
        let body = errors.iter().map(ParseError::message).collect::<Vec<_>>().join("\n");

        Self::new(status).with_header(REASON_HEADER, status.canonical_reason()).with_body(body)
    }

    #[must_use]
    pub fn with_header<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
