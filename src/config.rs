//! Process configuration.
//!
//! Flags, each with an environment fallback, so the same binary runs from a
//! shell or a container spec.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::client::{ClientConfig, DEFAULT_BACKEND_URL};

/// Public read proxy for crates.page
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "crates-public")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base URL of the upstream API
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value_t = 30)]
    pub backend_timeout_secs: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.backend_url.clone(),
            timeout: Duration::from_secs(self.backend_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_listen_addr_and_client_config() {
        let config = Config::try_parse_from([
            "crates-public",
            "--host", "127.0.0.1",
            "--port", "9000",
            "--backend-url", "http://backend:8980",
            "--backend-timeout-secs", "5",
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.client_config(), ClientConfig {
            base_url: "http://backend:8980".into(),
            timeout: Duration::from_secs(5),
        });
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["crates-public", "--port", "http"]).is_err());
    }
}
