//! Listener Config

use clap::Args;

/// Address the HTTP server binds to.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServerRuntimeConfig {
    /// `host:port`, with IPv6 hosts bracketed.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
