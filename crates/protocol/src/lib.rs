//! An incremental parser for the Booky file sync protocol
//!
//! A Booky request is a small line-oriented message:
//!
//! ```text
//! SYC test/testing.pdf\r\n      method and resource
//! Encoding: UTF8\r\n            zero or more headers
//! -\r\n                         end of the header block
//! {"test":123}\0                body, ended by a NUL byte or the end of the stream
//! ```
//!
//! # Features
//!
//! - Byte-at-a-time state machine, independent of how the input is fragmented
//! - Fixed-capacity buffering, suitable for blocking sockets and files
//! - Typed errors with a stable kind and message for every failure
//! - Listener dispatch: exactly one outcome per parse session
//! - Encoders for requests and responses
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//!
//! use booky_protocol::parser::{Lifecycle, RequestParser};
//! use booky_protocol::protocol::{ParseError, Response, StatusCode};
//!
//! let input = &b"DEL payload.pdf\r\n-\r\n"[..];
//!
//! let response = RefCell::new(None);
//! let mut parser = RequestParser::new(input);
//! parser
//!     .on_success(|_| *response.borrow_mut() = Some(Response::success()))
//!     .on_error(|errors: &[ParseError]| *response.borrow_mut() = Some(Response::from_errors(errors)));
//!
//! assert_eq!(parser.parse(), Lifecycle::Failed);
//! drop(parser);
//! assert_eq!(response.into_inner().unwrap().status(), StatusCode::UnknownMethod);
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: requests, responses, status codes and errors
//! - [`codec`]: the sans-io decoder and the encoders, built on `tokio_util::codec`
//! - [`parser`]: the blocking session binding a decoder to a byte source

pub mod codec;
pub mod parser;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
