//! Generic-protocol strategy: an injected HTTP client does the exchange.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;

use super::{Method, Response, Transport};
use crate::config::HttpFsConfig;
use crate::error::{ConfigError, TransportError};
use crate::filesystem::FileStream;
use crate::origin::Origin;

/// Client capability consumed by [`ClientTransport`].
///
/// `path` is relative to whatever origin the client was built for.
pub trait HttpClient: Send + Sync {
    fn send_request(&self, method: Method, path: &str) -> Result<Response, TransportError>;
}

/// [`Transport`] over any [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientTransport<C> {
    client: C,
}

impl<C: HttpClient> ClientTransport<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: HttpClient> Transport for ClientTransport<C> {
    fn probe(&self, path: &str) -> Result<Response, TransportError> {
        self.client.send_request(Method::Head, path)
    }

    fn fetch(&self, path: &str) -> Result<Response, TransportError> {
        self.client.send_request(Method::Get, path)
    }
}

/// Default [`HttpClient`]: a blocking reqwest client bound to an origin.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    origin: Origin,
}

impl ReqwestClient {
    /// Client with the default settings: redirects followed, TLS verified.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        Self::from_config(&HttpFsConfig::new(url))
    }

    pub fn from_config(cfg: &HttpFsConfig) -> Result<Self, ConfigError> {
        let origin = Origin::parse(&cfg.base_url)?;

        let redirect = if cfg.follow_redirects {
            Policy::limited(cfg.max_redirections as usize)
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .redirect(redirect)
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            // rustls cannot skip only the host name check
            .danger_accept_invalid_certs(!cfg.tls.verify_peer || !cfg.tls.verify_host)
            .default_headers(header_map(cfg)?)
            .build()?;

        tracing::debug!("built reqwest client for {}", origin);
        Ok(Self { client, origin })
    }

    /// Wraps a caller-built client; its own settings (redirects, TLS, headers) apply.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            origin: Origin::parse(base_url)?,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl HttpClient for ReqwestClient {
    fn send_request(&self, method: Method, path: &str) -> Result<Response, TransportError> {
        let url = self.origin.resolve(path)?;
        let request = match method {
            Method::Head => self.client.head(url),
            Method::Get => self.client.get(url),
        };
        let response = request.send()?;

        let status = u32::from(response.status().as_u16());
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(Response {
            status,
            headers,
            body: FileStream::new(response),
        })
    }
}

fn header_map(cfg: &HttpFsConfig) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in &cfg.headers {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value.trim()).map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
