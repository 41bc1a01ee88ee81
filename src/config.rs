use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use anyhow::Context;
use axum::http::HeaderValue;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ALLOWED_ORIGIN: &str = "https://q-gen-nu.vercel.app";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_MAX_QR_SIZE: u32 = 4096;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    /// The single origin allowed to call the service from a browser.
    pub allowed_origin: HeaderValue,
    pub max_upload_bytes: usize,
    /// Requested sizes above this fall back to the default size.
    pub max_qr_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_qr_size: DEFAULT_MAX_QR_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST")
            .ok()
            .and_then(|v| v.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let allowed_origin = match env::var("ALLOWED_ORIGIN") {
            Ok(raw) => parse_origin(&raw)?,
            Err(_) => HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
        };

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let max_qr_size = env::var("MAX_QR_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&v: &u32| v > 0)
            .unwrap_or(DEFAULT_MAX_QR_SIZE);

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            allowed_origin,
            max_upload_bytes,
            max_qr_size,
        })
    }
}

/// Browsers send `Origin` without a trailing slash, so one is stripped here.
pub fn parse_origin(raw: &str) -> anyhow::Result<HeaderValue> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        anyhow::bail!("ALLOWED_ORIGIN must not be empty");
    }
    HeaderValue::from_str(trimmed).with_context(|| format!("invalid ALLOWED_ORIGIN {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origin_strips_trailing_slash() {
        let origin = parse_origin("https://q-gen-nu.vercel.app/").unwrap();
        assert_eq!(origin, "https://q-gen-nu.vercel.app");
    }

    #[test]
    fn parse_origin_rejects_blank_and_invalid_values() {
        assert!(parse_origin("  / ").is_err());
        assert!(parse_origin("https://bad\norigin").is_err());
    }

    #[test]
    fn default_config_listens_on_port_5000() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr.port(), 5000);
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
    }
}
