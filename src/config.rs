//! Command line and environment configuration.
//!
//! The webhook serves HTTPS when both the certificate and the private key
//! can be read, and falls back to plain HTTP otherwise. Admission handling is
//! identical in both modes.

use std::fs::File;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::warn;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default HTTPS port
pub const WEBHOOK_TLS_PORT: u16 = 443;
/// Default plain HTTP port
pub const WEBHOOK_HTTP_PORT: u16 = 5000;

/// Kubernetes ValidatingAdmissionWebhook requiring an `owner` label
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "owner-label-webhook", version, about)]
pub struct Config {
    /// PEM certificate for TLS
    #[arg(long, env = "WEBHOOK_TLS_CERT", default_value = WEBHOOK_CERT_PATH)]
    pub tls_cert: PathBuf,

    /// PEM private key for TLS
    #[arg(long, env = "WEBHOOK_TLS_KEY", default_value = WEBHOOK_KEY_PATH)]
    pub tls_key: PathBuf,

    /// Port used when serving HTTPS
    #[arg(long, env = "WEBHOOK_TLS_PORT", default_value_t = WEBHOOK_TLS_PORT)]
    pub tls_port: u16,

    /// Port used when certificates are missing
    #[arg(long, env = "WEBHOOK_HTTP_PORT", default_value_t = WEBHOOK_HTTP_PORT)]
    pub http_port: u16,

    /// Address to listen on
    #[arg(long, env = "WEBHOOK_BIND_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
}

/// How the server accepts connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// HTTPS with a certificate and private key in PEM format.
    /// `fallback` is served over plain HTTP if the PEM files fail to load.
    Tls {
        addr: SocketAddr,
        cert: PathBuf,
        key: PathBuf,
        fallback: SocketAddr,
    },
    /// Plain HTTP
    Plain { addr: SocketAddr },
}

impl TransportMode {
    pub fn addr(&self) -> SocketAddr {
        match self {
            TransportMode::Tls { addr, .. } | TransportMode::Plain { addr } => *addr,
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, TransportMode::Tls { .. })
    }
}

impl Config {
    /// Pick TLS when the certificate material is readable, plain HTTP otherwise
    pub fn transport(&self) -> TransportMode {
        let plain_addr = SocketAddr::new(self.bind, self.http_port);
        let cert_readable = is_readable_file(&self.tls_cert, "TLS certificate");
        let key_readable = is_readable_file(&self.tls_key, "TLS private key");

        if cert_readable && key_readable {
            return TransportMode::Tls {
                addr: SocketAddr::new(self.bind, self.tls_port),
                cert: self.tls_cert.clone(),
                key: self.tls_key.clone(),
                fallback: plain_addr,
            };
        }

        TransportMode::Plain { addr: plain_addr }
    }
}

fn is_readable_file(path: &Path, what: &str) -> bool {
    if !path.is_file() {
        warn!(path = %path.display(), "{} not found", what);
        return false;
    }
    match File::open(path) {
        Ok(_) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "{} is not readable", what);
            false
        }
    }
}
