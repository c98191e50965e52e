//! Command line of the `booky-server` binary.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use booky_protocol::parser::DEFAULT_CAPACITY;
use clap::Parser;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "booky-server", version)]
#[command(about = "Serves a directory over the Booky file sync protocol")]
pub struct Cli {
    /// IP address to listen on
    #[arg(short, long)]
    pub address: IpAddr,

    /// Port to listen on
    #[arg(short, long)]
    pub port: u16,

    /// Directory the resources are stored in
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Seconds a connection may stay silent, 0 waits forever
    #[arg(short = 't', long, default_value_t = 30)]
    pub read_timeout: u64,

    /// Parse buffer capacity in bytes
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Maximum level of the log output
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Cli {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout > 0).then(|| Duration::from_secs(self.read_timeout))
    }
}
