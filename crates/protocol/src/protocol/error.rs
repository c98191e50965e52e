use std::borrow::Cow;
use std::fmt;
use std::io;
use thiserror::Error;

/// The category of a [`ParseError`].
///
/// `UnknownMethod`, `Format` and `Header` are client mistakes, `DeadParser` is a parser bug.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The 3-byte method code is not one of `SYC`, `UPL`, `DWN`
    UnknownMethod,
    /// A delimiter or terminator is missing or malformed
    Format,
    /// A header line is malformed
    Header,
    /// The parser broke one of its own invariants
    DeadParser,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnknownMethod => "unknown method",
            ErrorKind::Format => "format",
            ErrorKind::Header => "header",
            ErrorKind::DeadParser => "dead parser",
        }
    }

    /// Returns true if the error was caused by the parser itself rather than by the peer
    #[inline]
    pub fn is_parser_bug(self) -> bool {
        matches!(self, ErrorKind::DeadParser)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by a parse session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct ParseError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl ParseError {
    pub fn new<S: Into<Cow<'static, str>>>(kind: ErrorKind, message: S) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn unknown_method() -> Self {
        Self::new(ErrorKind::UnknownMethod, "This method is not supported!")
    }

    pub fn format<S: Into<Cow<'static, str>>>(message: S) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn header<S: Into<Cow<'static, str>>>(message: S) -> Self {
        Self::new(ErrorKind::Header, message)
    }

    pub fn dead_parser<S: Into<Cow<'static, str>>>(message: S) -> Self {
        Self::new(ErrorKind::DeadParser, message)
    }

    pub(crate) fn missing_method_space() -> Self {
        Self::format("Expected space after method!")
    }

    pub(crate) fn missing_resource_newline() -> Self {
        Self::format("Expected newline after resource!")
    }

    pub(crate) fn missing_header_newline() -> Self {
        Self::format("Expected newline after header!")
    }

    pub(crate) fn missing_header_end_newline() -> Self {
        Self::format("Expected newline after header end!")
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::format("Unexpected end of stream!")
    }

    pub(crate) fn line_too_long() -> Self {
        Self::format("Line exceeds the maximum length!")
    }

    pub(crate) fn resource_not_utf8() -> Self {
        Self::format("Resource must be valid UTF-8!")
    }

    pub(crate) fn source_failed() -> Self {
        Self::format("Failed to read from source!")
    }

    pub(crate) fn header_colon() -> Self {
        Self::header("Header must contain exactly one ':'")
    }

    pub(crate) fn header_not_utf8() -> Self {
        Self::header("Header must be valid UTF-8!")
    }

    pub(crate) fn too_many_headers() -> Self {
        Self::header("Too many headers!")
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Required by the codec traits, a failing source is reported as a format error.
impl From<io::Error> for ParseError {
    fn from(_: io::Error) -> Self {
        Self::source_failed()
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid message head: {reason}")]
    InvalidHead { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_head<S: ToString>(str: S) -> Self {
        Self::InvalidHead { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
