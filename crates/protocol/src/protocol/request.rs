//! Booky request representation.
//!
//! A [`Request`] is immutable once constructed. The parser assembles it through a
//! [`RequestBuilder`], whose mutators are only reachable from inside this crate and
//! enforce the order in which the protocol phases produce the fields.

use bytes::{Bytes, BytesMut};

use crate::ensure;
use crate::protocol::{Method, ParseError};

/// A fully parsed Booky request.
///
/// Headers keep their wire order and may contain duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    resource: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Request {
    pub fn new<R, B>(method: Method, resource: R, headers: Vec<(String, String)>, body: B) -> Self
    where
        R: Into<String>,
        B: Into<Bytes>,
    {
        Self { method, resource: resource.into(), headers, body: body.into() }
    }

    /// Returns the request's method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the resource named in the request line.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns all headers in wire order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the value of the first header named `key`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the request and returns its parts.
    pub fn into_parts(self) -> (Method, String, Vec<(String, String)>, Bytes) {
        (self.method, self.resource, self.headers, self.body)
    }
}

/// Accumulates the fields of a request while the parser walks through the phases.
///
/// Every mutator checks that the previous phases already produced their field and that
/// its own field is still unset, a violation is reported as a dead parser error.
#[derive(Debug, Default)]
pub(crate) struct RequestBuilder {
    method: Option<Method>,
    resource: Option<String>,
    headers: Vec<(String, String)>,
    body: BytesMut,
}

impl RequestBuilder {
    pub(crate) fn method(&mut self, method: Method) -> Result<(), ParseError> {
        ensure!(self.method.is_none(), ParseError::dead_parser("method has already been set"));
        self.method = Some(method);
        Ok(())
    }

    pub(crate) fn resource(&mut self, resource: String) -> Result<(), ParseError> {
        ensure!(self.method.is_some(), ParseError::dead_parser("resource set before method"));
        ensure!(self.resource.is_none(), ParseError::dead_parser("resource has already been set"));
        self.resource = Some(resource);
        Ok(())
    }

    pub(crate) fn header(&mut self, key: String, value: String) -> Result<(), ParseError> {
        ensure!(self.resource.is_some(), ParseError::dead_parser("header set before resource"));
        self.headers.push((key, value));
        Ok(())
    }

    pub(crate) fn body_data(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        ensure!(self.resource.is_some(), ParseError::dead_parser("body data set before resource"));
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub(crate) fn build(self) -> Result<Request, ParseError> {
        let method = self.method.ok_or_else(|| ParseError::dead_parser("request built without method"))?;
        let resource = self.resource.ok_or_else(|| ParseError::dead_parser("request built without resource"))?;
        Ok(Request { method, resource, headers: self.headers, body: self.body.freeze() })
    }
}
