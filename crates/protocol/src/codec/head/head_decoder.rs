//! Decoder for the head of a Booky request: method, resource and header block.
//!
//! The decoder is a byte-level state machine. Every call consumes the whole input it is
//! given unless it reaches the end of the head, so a token split across two buffer fills
//! is stitched together in an internal line buffer instead of being re-scanned.
//!
//! ```text
//! SYC test/testing.pdf\r\n      Method, Resource, ResourceLf
//! Encoding: UTF8\r\n            HeaderStart, Header, HeaderLf
//! -\r\n                         HeaderStart, EndCr, EndLf
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Limits, Method, ParseError, Phase, RequestBuilder};

use HeadState::{Done, EndCr, EndLf, Header, HeaderLf, HeaderStart, Resource, ResourceLf};

const SP: u8 = b' ';
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const COLON: char = ':';

/// Marks the end of the header block when it starts a line
const HEADER_END: u8 = b'-';

/// The method code followed by its space
const METHOD_LINE_LEN: usize = Method::CODE_LEN + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadState {
    /// Read the 3-byte method code and the space after it
    Method,
    /// Read the resource up to its terminator
    Resource,
    /// Read LF after the resource
    ResourceLf,
    /// Decide between a header line and the end marker
    HeaderStart,
    /// Read a header line up to CR
    Header,
    /// Read LF after a header line
    HeaderLf,
    /// Read CR after the end marker
    EndCr,
    /// Read LF after the end marker
    EndLf,
    /// The head has been handed out
    Done,
}

/// Decodes a request head into a [`RequestBuilder`] ready to receive the body.
#[derive(Debug)]
pub(crate) struct HeadDecoder {
    state: HeadState,
    /// Bytes of the token currently being read, kept across refills
    line: BytesMut,
    builder: RequestBuilder,
    limits: Limits,
}

impl HeadDecoder {
    pub(crate) fn new(limits: Limits) -> Self {
        Self { state: HeadState::Method, line: BytesMut::new(), builder: RequestBuilder::default(), limits }
    }

    pub(crate) fn phase(&self) -> Phase {
        match self.state {
            HeadState::Method => Phase::Method,
            Resource | ResourceLf => Phase::Resource,
            HeaderStart | Header | HeaderLf | EndCr | EndLf => Phase::Header,
            Done => Phase::Body,
        }
    }

    fn step(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        match self.state {
            HeadState::Method => self.read_method(src),
            Resource => self.read_resource(src),
            ResourceLf => self.read_resource_lf(src),
            HeaderStart => self.read_header_start(src),
            Header => self.read_header(src),
            HeaderLf => self.read_header_lf(src),
            EndCr => Self::read_end_cr(src),
            EndLf => Self::read_end_lf(src),
            Done => Err(ParseError::dead_parser("request head has already been decoded")),
        }
    }

    fn read_method(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        let wanted = METHOD_LINE_LEN - self.line.len();
        let take = wanted.min(src.len());
        self.line.extend_from_slice(&src[..take]);
        src.advance(take);

        if self.line.len() < Method::CODE_LEN {
            return Ok(HeadState::Method);
        }

        let method = Method::from_code(&self.line[..Method::CODE_LEN]).ok_or_else(ParseError::unknown_method)?;
        if self.line.len() < METHOD_LINE_LEN {
            return Ok(HeadState::Method);
        }

        ensure!(self.line[Method::CODE_LEN] == SP, ParseError::missing_method_space());

        self.builder.method(method)?;
        self.line.clear();
        trace!(%method, "decoded method");
        Ok(Resource)
    }

    fn read_resource(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        // a resource ends at the first whitespace, only CRLF may follow it
        let Some(index) = src.iter().position(|b| matches!(*b, SP | CR | LF)) else {
            self.append_line(src)?;
            src.clear();
            return Ok(Resource);
        };

        self.append_line(&src[..index])?;
        let terminator = src[index];
        src.advance(index + 1);

        ensure!(terminator == CR, ParseError::missing_resource_newline());
        Ok(ResourceLf)
    }

    fn read_resource_lf(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        ensure!(src.get_u8() == LF, ParseError::missing_resource_newline());

        let Ok(resource) = std::str::from_utf8(&self.line) else {
            return Err(ParseError::resource_not_utf8());
        };
        trace!(resource, "decoded resource");

        self.builder.resource(resource.to_owned())?;
        self.line.clear();
        Ok(HeaderStart)
    }

    fn read_header_start(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        if src[0] == HEADER_END {
            src.advance(1);
            return Ok(EndCr);
        }

        ensure!(self.builder.header_count() < self.limits.max_headers(), ParseError::too_many_headers());
        Ok(Header)
    }

    fn read_header(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        let Some(index) = src.iter().position(|b| matches!(*b, CR | LF)) else {
            self.append_line(src)?;
            src.clear();
            return Ok(Header);
        };

        self.append_line(&src[..index])?;
        let terminator = src[index];
        src.advance(index + 1);

        ensure!(terminator == CR, ParseError::missing_header_newline());
        Ok(HeaderLf)
    }

    fn read_header_lf(&mut self, src: &mut BytesMut) -> Result<HeadState, ParseError> {
        ensure!(src.get_u8() == LF, ParseError::missing_header_newline());

        let (key, value) = parse_header(&self.line)?;
        trace!(key = %key, value = %value, "decoded header");

        self.builder.header(key, value)?;
        self.line.clear();
        Ok(HeaderStart)
    }

    fn read_end_cr(src: &mut BytesMut) -> Result<HeadState, ParseError> {
        ensure!(src.get_u8() == CR, ParseError::missing_header_end_newline());
        Ok(EndLf)
    }

    fn read_end_lf(src: &mut BytesMut) -> Result<HeadState, ParseError> {
        ensure!(src.get_u8() == LF, ParseError::missing_header_end_newline());
        Ok(Done)
    }

    fn append_line(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        ensure!(self.line.len() + bytes.len() <= self.limits.max_line_bytes(), ParseError::line_too_long());
        self.line.extend_from_slice(bytes);
        Ok(())
    }
}

impl Decoder for HeadDecoder {
    type Item = RequestBuilder;
    type Error = ParseError;

    /// Decodes as much of the head as `src` allows.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(builder))`: the header block is complete, `src` starts with the body
    /// - `Ok(None)`: `src` has been fully consumed and more data is needed
    /// - `Err(_)`: the head is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if src.is_empty() {
                return Ok(None);
            }

            self.state = self.step(src)?;

            if self.state == Done {
                trace!(headers = self.builder.header_count(), "finished reading request head");
                return Ok(Some(mem::take(&mut self.builder)));
            }
        }
    }
}

/// Splits a header line on its single colon into a trimmed key and value.
fn parse_header(line: &[u8]) -> Result<(String, String), ParseError> {
    let Ok(line) = std::str::from_utf8(line) else {
        return Err(ParseError::header_not_utf8());
    };

    let mut parts = line.split(COLON);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        _ => Err(ParseError::header_colon()),
    }
}
