//! Transport strategies: how a probe or fetch actually reaches the origin.
//!
//! Two implementations of [`Transport`]:
//!
//! - [`ClientTransport`]: delegates to an injected [`HttpClient`]
//!   ([`ReqwestClient`] by default).
//! - [`StreamTransport`]: drives libcurl easy handles directly.

mod client;
mod stream;

use std::fmt;

use crate::error::TransportError;
use crate::filesystem::FileStream;

pub use client::{ClientTransport, HttpClient, ReqwestClient};
pub use stream::StreamTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Head => "HEAD",
            Method::Get => "GET",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin response as seen by the translators.
#[derive(Debug)]
pub struct Response {
    pub status: u32,
    /// Raw `(name, value)` pairs in arrival order; names keep their original case.
    pub headers: Vec<(String, String)>,
    pub body: FileStream,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the request/response exchange for a path below the origin.
pub trait Transport: Send + Sync {
    /// Header-only request (HEAD). The body of the returned response is empty.
    fn probe(&self, path: &str) -> Result<Response, TransportError>;

    /// Full retrieval (GET). The body is streamed, not buffered.
    fn fetch(&self, path: &str) -> Result<Response, TransportError>;
}
