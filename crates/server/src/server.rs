//! The accept loop.
//!
//! Connections are accepted on a tokio [`TcpListener`] and each one is handed to the blocking
//! thread pool, where a [`Connection`] parses its request with blocking reads.

use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use booky_protocol::parser::DEFAULT_CAPACITY;
use booky_protocol::protocol::{Limits, SendError};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::connection::Connection;
use crate::handler::Handler;

/// Default time a connection may stay silent before its read fails
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound of unread request bytes drained before closing a connection
const DRAIN_LIMIT: u64 = 64 * 1024;

pub struct ServerBuilder<H> {
    address: Option<io::Result<Vec<SocketAddr>>>,
    handler: Option<H>,
    capacity: usize,
    read_timeout: Option<Duration>,
    limits: Limits,
}

impl<H> ServerBuilder<H>
where
    H: Handler + 'static,
{
    fn new() -> Self {
        Self {
            address: None,
            handler: None,
            capacity: DEFAULT_CAPACITY,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            limits: Limits::default(),
        }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(|addresses| addresses.collect()));
        self
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the parse buffer capacity of every connection.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the read timeout of every connection, `None` waits forever.
    pub fn read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the address or the handler is missing, or if the address could
    /// not be resolved.
    pub fn build(self) -> Result<Server<H>, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)??;
        let handler = self.handler.ok_or(ServerBuildError::MissingHandler)?;
        Ok(Server {
            address,
            handler: Arc::new(handler),
            capacity: self.capacity,
            read_timeout: self.read_timeout,
            limits: self.limits,
        })
    }
}

impl<H> std::fmt::Debug for ServerBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("address", &self.address)
            .field("handler", &self.handler.is_some())
            .field("capacity", &self.capacity)
            .field("read_timeout", &self.read_timeout)
            .field("limits", &self.limits)
            .finish()
    }
}

pub struct Server<H> {
    address: Vec<SocketAddr>,
    handler: Arc<H>,
    capacity: usize,
    read_timeout: Option<Duration>,
    limits: Limits,
}

impl<H> std::fmt::Debug for Server<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("address", &self.address)
            .field("capacity", &self.capacity)
            .field("read_timeout", &self.read_timeout)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("handler must be set")]
    MissingHandler,
    #[error("address must be set")]
    MissingAddress,
    #[error("address could not be resolved: {source}")]
    InvalidAddress {
        #[from]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind server error: {source}")]
    Bind { source: io::Error },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("response error: {source}")]
    Response {
        #[from]
        source: SendError,
    },
}

impl<H> Server<H>
where
    H: Handler + 'static,
{
    pub fn builder() -> ServerBuilder<H> {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    /// Binds the configured address and serves connections until the task is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the address can not be bound.
    pub async fn start(self) -> Result<(), ServerError> {
        info!(address = ?self.address, "start listening");
        let tcp_listener = TcpListener::bind(self.address.as_slice()).await.map_err(|source| {
            error!(cause = %source, "bind server error");
            ServerError::Bind { source }
        })?;

        self.serve(tcp_listener).await
    }

    /// Serves connections accepted on an already bound listener.
    ///
    /// # Errors
    ///
    /// Never returns under normal operation, accept failures are logged and skipped.
    pub async fn serve(self, tcp_listener: TcpListener) -> Result<(), ServerError> {
        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let stream = match self.prepare_stream(tcp_stream) {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(%remote_addr, cause = %e, "failed to prepare connection");
                    continue;
                }
            };

            debug!(%remote_addr, "accepted connection");
            let handler = Arc::clone(&self.handler);
            let (capacity, limits) = (self.capacity, self.limits);

            tokio::task::spawn_blocking(move || {
                let mut connection = Connection::new(stream).with_capacity(capacity).with_limits(limits);
                match connection.process(handler.as_ref()) {
                    Ok(status) => {
                        info!(%remote_addr, status = status.as_u8(), "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                    }
                }
                close(connection.into_inner());
            });
        }
    }

    fn prepare_stream(&self, tcp_stream: tokio::net::TcpStream) -> io::Result<TcpStream> {
        let stream = tcp_stream.into_std()?;
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(self.read_timeout)?;
        Ok(stream)
    }
}

/// Closes the write half and drains what the client still sends, so the response is not
/// discarded by a reset.
fn close(stream: TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!(cause = %e, "failed to shutdown connection");
        return;
    }

    if let Err(e) = io::copy(&mut (&stream).take(DRAIN_LIMIT), &mut io::sink()) {
        debug!(cause = %e, "failed to drain connection");
    }
}
