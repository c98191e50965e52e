//! One request, one response.
//!
//! A [`Connection`] runs a [`RequestParser`] over a blocking stream, lets the [`Handler`]
//! answer a parsed request, answers a failed parse from its errors, and writes exactly one
//! response back.

use std::cell::Cell;
use std::error::Error;
use std::io::{Read, Write};

use booky_protocol::codec::ResponseEncoder;
use booky_protocol::parser::{DEFAULT_CAPACITY, RequestParser};
use booky_protocol::protocol::{Limits, ParseError, Request, Response, StatusCode};
use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::{error, info};

use crate::ServerError;
use crate::handler::Handler;

#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    capacity: usize,
    limits: Limits,
}

impl<S> Connection<S>
where
    S: Read + Write,
{
    pub fn new(stream: S) -> Self {
        Self { stream, capacity: DEFAULT_CAPACITY, limits: Limits::default() }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Parses one request, answers it and returns the status that has been sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the response could not be written. Malformed requests and handler
    /// failures are answered, not returned.
    pub fn process<H>(&mut self, handler: &H) -> Result<StatusCode, ServerError>
    where
        H: Handler + ?Sized,
    {
        let response = Cell::new(None);

        {
            let mut parser = RequestParser::with_capacity(&mut self.stream, self.capacity).with_limits(self.limits);
            parser
                .on_success(|request| response.set(Some(respond(handler, request))))
                .on_error(|errors| response.set(Some(reject(errors))));
            parser.parse();
        }

        // a terminal session always dispatched one of the listeners
        let response = response.take().unwrap_or_else(|| Response::from_errors(&[]));
        self.send(&response)?;
        Ok(response.status())
    }

    fn send(&mut self, response: &Response) -> Result<(), ServerError> {
        let mut buffer = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut buffer)?;

        self.stream.write_all(&buffer)?;
        self.stream.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn respond<H>(handler: &H, request: &Request) -> Response
where
    H: Handler + ?Sized,
{
    match handler.call(request) {
        Ok(response) => {
            info!(method = %request.method(), resource = request.resource(), status = response.status().as_u8(), "handled request");
            response
        }
        Err(e) => {
            let e: Box<dyn Error + Send + Sync> = e.into();
            error!(method = %request.method(), resource = request.resource(), cause = %e, "handler failed");
            Response::server_error(e.to_string())
        }
    }
}

fn reject(errors: &[ParseError]) -> Response {
    let response = Response::from_errors(errors);
    info!(status = response.status().as_u8(), errors = errors.len(), "rejected request");
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{FileStore, make_handler};
    use crate::test_utils::TempRoot;
    use booky_protocol::protocol::REASON_HEADER;
    use indoc::indoc;
    use std::convert::Infallible;
    use std::io::{self, Cursor};

    /// An in-memory stream: reads from `input`, collects writes in `output`.
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Duplex {
        fn new(input: &[u8]) -> Self {
            Self { input: Cursor::new(input.to_vec()), output: Vec::new() }
        }
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    fn echo(request: &Request) -> Result<Response, Infallible> {
        Ok(Response::success().with_body(request.body().clone()))
    }

    #[test]
    fn answers_parsed_request() {
        let input = crlf(indoc! {r#"
            SYC test/testing.pdf
            Encoding: UTF8
            Content-Type: json
            -
            {"test":123}"#});

        let mut connection = Connection::new(Duplex::new(&input));
        let status = connection.process(&make_handler(echo)).unwrap();

        assert_eq!(status, StatusCode::Success);
        assert_eq!(connection.get_ref().output, b"\x64 \r\n-\r\n{\"test\":123}");
    }

    #[test]
    fn answers_parse_errors() {
        let input = crlf(indoc! {r#"
            DEL payload.pdf
            Some: header
            -
            {"test":124}"#});

        let mut connection = Connection::new(Duplex::new(&input));
        let status = connection.process(&make_handler(echo)).unwrap();

        assert_eq!(status, StatusCode::UnknownMethod);
        assert_eq!(connection.get_ref().output, b"\x01 \r\nReason:Unknown Method\r\n-\r\nThis method is not supported!");
    }

    #[test]
    fn handler_errors_become_server_errors() {
        let root = TempRoot::new();
        let store = FileStore::new(root.path());

        let mut connection = Connection::new(Duplex::new(b"DWN missing.txt\r\n-\r\n\0"));
        let status = connection.process(&store).unwrap();

        assert_eq!(status, StatusCode::ServerError);
        let output = &connection.get_ref().output;
        assert_eq!(output[0], 200);
        assert!(output.ends_with(b"resource not found: missing.txt"));
    }

    #[test]
    fn small_capacity_gives_same_response() {
        let input = b"UPL a.txt\r\nKey: value\r\n-\r\nhello world\0";

        let mut expected = Connection::new(Duplex::new(input));
        expected.process(&make_handler(echo)).unwrap();

        let mut connection = Connection::new(Duplex::new(input)).with_capacity(3);
        connection.process(&make_handler(echo)).unwrap();

        assert_eq!(connection.get_ref().output, expected.get_ref().output);
    }

    #[test]
    fn limits_are_passed_to_the_parser() {
        let limits = Limits::default().with_max_line_bytes(4);
        let mut connection = Connection::new(Duplex::new(b"SYC a-long-resource\r\n-\r\n")).with_limits(limits);

        assert_eq!(connection.process(&make_handler(echo)).unwrap(), StatusCode::IncorrectFormat);
        let reason = REASON_HEADER.as_bytes();
        assert!(connection.get_ref().output.windows(reason.len()).any(|window| window == reason));
    }
}
