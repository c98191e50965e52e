//! The blocking, re-entrant parse session.
//!
//! A [`RequestParser`] binds a [`RequestDecoder`] to one byte source through a
//! [`BufferedSource`]. Each call to [`RequestParser::parse_step`] refills the buffer once
//! and feeds the whole window to the decoder; once the session reaches a terminal state
//! the registered listeners are dispatched and every further step is a no-op.
//!
//! ```text
//! NotStarted ──▶ Parsing ──▶ NeedMoreData ──▶ Parsing ──▶ …
//!                   │                            │
//!                   ├──▶ Finished                ├──▶ Finished
//!                   └──▶ Failed                  └──▶ Failed
//! ```

use std::io::Read;

use tokio_util::codec::Decoder;
use tracing::{debug, error, trace, warn};

use crate::codec::RequestDecoder;
use crate::parser::{BufferedSource, Dispatcher};
use crate::protocol::{Limits, ParseError, Phase, Request};

/// Buffer capacity used by [`RequestParser::new`]
pub const DEFAULT_CAPACITY: usize = 512;

/// Lifecycle of a parse session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// No byte has been read yet
    NotStarted,
    /// The decoder is working on the current window
    Parsing,
    /// The window has been consumed, the next step refills it
    NeedMoreData,
    /// A request has been parsed and dispatched
    Finished,
    /// The session failed and its errors have been dispatched
    Failed,
}

impl Lifecycle {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::Finished | Lifecycle::Failed)
    }
}

/// Parses exactly one request from a blocking byte source.
///
/// # Example
///
/// ```
/// use booky_protocol::parser::{Lifecycle, RequestParser};
/// use booky_protocol::protocol::Method;
///
/// let input = &b"UPL notes.md\r\nEncoding: UTF8\r\n-\r\nhello"[..];
///
/// let mut method = None;
/// let mut parser = RequestParser::new(input);
/// parser.on_success(|request| method = Some(request.method()));
///
/// assert_eq!(parser.parse(), Lifecycle::Finished);
/// drop(parser);
/// assert_eq!(method, Some(Method::Upload));
/// ```
#[derive(Debug)]
pub struct RequestParser<'l, R> {
    source: BufferedSource<R>,
    decoder: RequestDecoder,
    lifecycle: Lifecycle,
    errors: Vec<ParseError>,
    dispatcher: Dispatcher<'l>,
}

impl<'l, R: Read> RequestParser<'l, R> {
    /// Creates a parser with a buffer of [`DEFAULT_CAPACITY`] bytes.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            source: BufferedSource::with_capacity(reader, capacity),
            decoder: RequestDecoder::new(),
            lifecycle: Lifecycle::NotStarted,
            errors: Vec::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Replaces the decoding limits, only effective before the first step.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        if self.lifecycle == Lifecycle::NotStarted {
            self.decoder = RequestDecoder::with_limits(limits);
        }
        self
    }

    /// Registers a listener receiving the parsed request.
    pub fn on_success<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&Request) + 'l,
    {
        self.dispatcher.on_success(listener);
        self
    }

    /// Registers a listener receiving the errors of a failed session.
    pub fn on_error<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[ParseError]) + 'l,
    {
        self.dispatcher.on_error(listener);
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn phase(&self) -> Phase {
        self.decoder.phase()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &BufferedSource<R> {
        &self.source
    }

    /// Drives the session until it is finished or failed.
    pub fn parse(&mut self) -> Lifecycle {
        loop {
            let lifecycle = self.parse_step();
            if lifecycle.is_terminal() {
                return lifecycle;
            }
        }
    }

    /// Refills the buffer once and decodes the whole window.
    ///
    /// Returns `NeedMoreData` if the caller has to step again, or the terminal state the
    /// session reached. Steps on a finished or failed session do nothing.
    pub fn parse_step(&mut self) -> Lifecycle {
        if self.lifecycle.is_terminal() {
            return self.lifecycle;
        }

        let (exhausted, outcome) = match self.source.refill() {
            Ok(0) => {
                trace!(phase = %self.decoder.phase(), "source exhausted");
                (true, self.decoder.decode_eof(self.source.window_mut()))
            }
            Ok(_) => {
                self.lifecycle = Lifecycle::Parsing;
                (false, self.decoder.decode(self.source.window_mut()))
            }
            Err(e) => {
                warn!(cause = %e, phase = %self.decoder.phase(), "failed to read from source");
                (true, Err(ParseError::from(e)))
            }
        };

        match outcome {
            Ok(Some(request)) => self.finish(&request),
            // every step must consume its window or end the session, anything else would spin
            Ok(None) if exhausted => self.fail(ParseError::dead_parser("decoder made no progress at end of stream")),
            Ok(None) if !self.source.window().is_empty() => {
                self.fail(ParseError::dead_parser("decoder stalled with unconsumed input"));
            }
            Ok(None) => self.lifecycle = Lifecycle::NeedMoreData,
            Err(e) => self.fail(e),
        }

        self.lifecycle
    }

    fn finish(&mut self, request: &Request) {
        self.lifecycle = Lifecycle::Finished;

        let trailing = self.source.window().len();
        if trailing > 0 {
            debug!(trailing, "ignoring bytes after the body sentinel");
        }
        debug!(method = %request.method(), resource = request.resource(), "request parsed");

        self.dispatcher.dispatch_success(request);
    }

    fn fail(&mut self, e: ParseError) {
        self.lifecycle = Lifecycle::Failed;

        if e.kind().is_parser_bug() {
            error!(cause = %e, phase = %self.decoder.phase(), "parser invariant violated");
        } else {
            debug!(cause = %e, phase = %self.decoder.phase(), "request rejected");
        }

        self.errors.push(e);
        self.dispatcher.dispatch_error(&self.errors);
    }
}
