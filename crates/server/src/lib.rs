//! A file store server for the Booky sync protocol
//!
//! Every accepted connection carries exactly one request. The request is parsed by
//! [`booky_protocol`] on a blocking thread, answered by a [`Handler`](handler::Handler),
//! and the connection is closed after the response has been written.
//!
//! # Example
//!
//! ```no_run
//! use booky_server::handler::FileStore;
//! use booky_server::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder()
//!         .address("127.0.0.1:4000")
//!         .handler(FileStore::new("/srv/booky"))
//!         .build()
//!         .unwrap();
//!
//!     server.start().await.unwrap();
//! }
//! ```

pub mod cli;
pub mod connection;
pub mod handler;

mod server;
pub use server::DEFAULT_READ_TIMEOUT;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use server::ServerError;

#[cfg(test)]
mod test_utils;
