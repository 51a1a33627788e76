//! Base origin URL and path composition.

use std::fmt;

use url::Url;

use crate::error::{ConfigError, TransportError};

/// Validated base URL every path is resolved against.
///
/// The stored URL always ends in `/` and carries no query or fragment, so a
/// key appended to it lands below its last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base: Url,
}

impl Origin {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let mut base = Url::parse(url.trim()).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        if !matches!(base.scheme(), "http" | "https")
            || base.host_str().is_none()
            || base.cannot_be_a_base()
        {
            return Err(ConfigError::UnsupportedUrl(url.to_string()));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    pub fn as_url(&self) -> &Url {
        &self.base
    }

    pub fn is_https(&self) -> bool {
        self.base.scheme() == "https"
    }

    /// Full URL for `path`.
    ///
    /// The path is an opaque key appended to the base: leading slashes are
    /// dropped, so `/a.txt` and `a.txt` name the same resource. Nothing in the
    /// key is interpreted as a URL reference. A key that would normalize to a
    /// location outside the base (dot segments) is refused.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        let key = escape_key(path.trim_start_matches('/'));
        let url = Url::parse(&format!("{}{}", self.base, key)).map_err(|source| {
            TransportError::Url {
                path: path.to_string(),
                source,
            }
        })?;

        if !url.as_str().starts_with(self.base.as_str()) {
            return Err(TransportError::OutsideOrigin {
                path: path.to_string(),
            });
        }
        Ok(url)
    }
}

/// Encodes the characters the URL parser would treat as structure rather than
/// data; everything else illegal in a path is encoded by the parser itself.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '#' => out.push_str("%23"),
            '\\' => out.push_str("%5C"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())
    }
}
