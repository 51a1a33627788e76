//! Native-stream strategy: libcurl easy handles, no injected client.
//!
//! Probes are a manual header-only request (`nobody`) with the header lines
//! collected from libcurl's callback. For https origins peer and host
//! verification are on and responses are requested without content coding.

mod body;
mod headers;

use std::time::Duration;

use curl::easy::{Easy, List};
use url::Url;

use super::{Response, Transport};
use crate::config::{HttpFsConfig, TlsConfig};
use crate::error::{ConfigError, TransportError};
use crate::filesystem::FileStream;
use crate::origin::Origin;
use headers::HeaderCollector;

#[derive(Debug, Clone)]
pub struct StreamTransport {
    origin: Origin,
    follow_redirects: bool,
    max_redirections: u32,
    connect_timeout: Duration,
    timeout: Option<Duration>,
    tls: TlsConfig,
    /// Extra request headers as `Name: value` lines.
    headers: Vec<String>,
}

impl StreamTransport {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_config(&HttpFsConfig::new(base_url))
    }

    pub fn from_config(cfg: &HttpFsConfig) -> Result<Self, ConfigError> {
        let origin = Origin::parse(&cfg.base_url)?;

        let mut headers = Vec::with_capacity(cfg.headers.len());
        for (name, value) in &cfg.headers {
            let name_ok = !name.trim().is_empty()
                && name.trim().bytes().all(|b| b.is_ascii_graphic() && b != b':');
            if !name_ok || value.contains(&['\r', '\n'][..]) {
                return Err(ConfigError::InvalidHeader(name.clone()));
            }
            headers.push(format!("{}: {}", name.trim(), value.trim()));
        }

        Ok(Self {
            origin,
            follow_redirects: cfg.follow_redirects,
            max_redirections: cfg.max_redirections,
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            tls: cfg.tls,
            headers,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    fn easy(&self, url: &Url) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(self.follow_redirects)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(timeout) = self.timeout {
            easy.timeout(timeout)?;
        }

        if self.origin.is_https() {
            easy.ssl_verify_peer(self.tls.verify_peer)?;
            easy.ssl_verify_host(self.tls.verify_host)?;
            easy.accept_encoding("identity")?;
        }

        if !self.headers.is_empty() {
            let mut list = List::new();
            for header in &self.headers {
                list.append(header)?;
            }
            easy.http_headers(list)?;
        }
        Ok(easy)
    }
}

impl Transport for StreamTransport {
    fn probe(&self, path: &str) -> Result<Response, TransportError> {
        let url = self.origin.resolve(path)?;
        let mut easy = self.easy(&url)?;
        easy.nobody(true)?; // HEAD request

        let mut collector = HeaderCollector::default();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                collector.push(data);
                true
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!("HEAD {} returned HTTP {}", url, status);

        Ok(Response {
            status,
            headers: collector.into_headers(),
            body: FileStream::empty(),
        })
    }

    fn fetch(&self, path: &str) -> Result<Response, TransportError> {
        let url = self.origin.resolve(path)?;
        let easy = self.easy(&url)?;
        let response = body::fetch(easy)?;
        tracing::debug!("GET {} returned HTTP {}", url, response.status);
        Ok(response)
    }
}
