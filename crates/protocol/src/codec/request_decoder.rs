//! Booky request decoder.
//!
//! Decoding happens in two stages, like the phases of the protocol:
//!
//! - Head: [`HeadDecoder`] reads the method, resource and header block
//! - Body: [`BodyDecoder`] collects the body until the sentinel byte or the end of the stream
//!
//! # Example
//!
//! ```
//! use booky_protocol::codec::RequestDecoder;
//! use booky_protocol::protocol::Method;
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"DWN notes.md\r\n-\r\n\0"[..]);
//!
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.method(), Method::Download);
//! assert_eq!(request.resource(), "notes.md");
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::BodyDecoder;
use crate::codec::head::HeadDecoder;
use crate::ensure;
use crate::protocol::{Limits, ParseError, PayloadItem, Phase, Request, RequestBuilder};

/// A decoder for one Booky request.
///
/// The decoder maintains its stage through the `body` field:
/// - `None`: currently decoding the head
/// - `Some(_)`: the head is complete and the body is being collected
///
/// A decoder yields at most one request, decoding again afterwards is a dead parser error.
#[derive(Debug)]
pub struct RequestDecoder {
    head_decoder: HeadDecoder,
    body: Option<(RequestBuilder, BodyDecoder)>,
    finished: bool,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default [`Limits`]
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { head_decoder: HeadDecoder::new(limits), body: None, finished: false }
    }

    /// Returns the protocol phase the decoder is in.
    pub fn phase(&self) -> Phase {
        if self.finished || self.body.is_some() { Phase::Body } else { self.head_decoder.phase() }
    }

    fn decode_head(&mut self, src: &mut BytesMut) -> Result<bool, ParseError> {
        if self.body.is_some() {
            return Ok(true);
        }

        match self.head_decoder.decode(src)? {
            Some(builder) => {
                self.body = Some((builder, BodyDecoder::new()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn decode_body(&mut self, src: &mut BytesMut, eof: bool) -> Result<Option<Request>, ParseError> {
        loop {
            let Some((builder, body_decoder)) = self.body.as_mut() else {
                return Err(ParseError::dead_parser("body decoded before the head"));
            };

            let item = if eof { body_decoder.decode_eof(src)? } else { body_decoder.decode(src)? };

            match item {
                Some(PayloadItem::Chunk(bytes)) => builder.body_data(&bytes)?,
                Some(PayloadItem::Eof) => break,
                None => return Ok(None),
            }
        }

        let (builder, _) = self.body.take().ok_or_else(|| ParseError::dead_parser("request body vanished"))?;
        self.finished = true;

        let request = builder.build()?;
        trace!(method = %request.method(), body_size = request.body().len(), "finished reading request");
        Ok(Some(request))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the body sentinel has been reached
    /// - `Ok(None)`: the buffer has been consumed entirely and more data is needed
    /// - `Err(_)`: the request is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        ensure!(!self.finished, ParseError::dead_parser("request has already been decoded"));

        if !self.decode_head(src)? {
            return Ok(None);
        }

        self.decode_body(src, false)
    }

    /// Finishes the request once the source is exhausted.
    ///
    /// A body may be terminated by the end of the stream, every earlier phase may not.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        ensure!(!self.finished, ParseError::dead_parser("request has already been decoded"));

        if !self.decode_head(src)? {
            trace!(phase = %self.phase(), "stream ended inside the request head");
            return Err(ParseError::unexpected_eof());
        }

        self.decode_body(src, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ErrorKind, Method};
    use indoc::indoc;

    const SCENARIO_A: &[u8] =
        b"SYC test/testing.pdf\r\nEncoding: UTF8\r\nContent-Type: json\r\n-\r\n{\"test\":123,\"another\":\"hello\"}";

    #[test]
    fn body_ends_at_end_of_stream() {
        let mut buffer = BytesMut::from(SCENARIO_A);
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert!(buffer.is_empty());
        assert_eq!(decoder.phase(), Phase::Body);

        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert_eq!(request.method(), Method::Sync);
        assert_eq!(request.resource(), "test/testing.pdf");
        assert_eq!(
            request.headers(),
            &[("Encoding".to_string(), "UTF8".to_string()), ("Content-Type".to_string(), "json".to_string())]
        );
        assert_eq!(&request.body()[..], b"{\"test\":123,\"another\":\"hello\"}");
    }

    #[test]
    fn body_ends_at_sentinel() {
        let mut buffer = BytesMut::from(&b"UPL a.txt\r\n-\r\nfirst\0second"[..]);
        let mut decoder = RequestDecoder::new();

        let request = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&request.body()[..], b"first");
        assert_eq!(&buffer[..], b"second");
    }

    #[test]
    fn multiline_body() {
        let input = indoc! {r#"
            SYC test.pdf
            Encoding: UTF8
            -
            {
                "test": 123
            }"#};
        let input = input.replace('\n', "\r\n");
        let (_, body) = input.split_once("-\r\n").unwrap();

        let mut buffer = BytesMut::from(input.as_bytes());
        let mut decoder = RequestDecoder::new();
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert_eq!(request.body(), body.as_bytes());
    }

    #[test]
    fn empty_body() {
        let mut buffer = BytesMut::from(&b"DWN a\r\n-\r\n"[..]);
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        let request = decoder.decode_eof(&mut buffer).unwrap().unwrap();
        assert!(request.body().is_empty());
    }

    #[test]
    fn end_of_stream_inside_head() {
        for input in [&b""[..], b"SY", b"SYC a", b"SYC a\r\nKey: v", b"SYC a\r\n-\r"] {
            let mut buffer = BytesMut::from(input);
            let mut decoder = RequestDecoder::new();

            let error = decoder.decode_eof(&mut buffer).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Format, "{input:?}");
            assert_eq!(error.message(), "Unexpected end of stream!");
        }
    }

    #[test]
    fn decoding_twice_is_a_dead_parser() {
        let mut buffer = BytesMut::from(&b"DWN a\r\n-\r\n\0"[..]);
        let mut decoder = RequestDecoder::new();
        decoder.decode(&mut buffer).unwrap().unwrap();

        let error = decoder.decode(&mut buffer).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DeadParser);
    }
}
