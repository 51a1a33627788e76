//! Attribute record built from a metadata probe.
//!
//! Every transport hands its raw header list to [`FileAttributes::from_headers`],
//! so size, mime type, charset and timestamps are derived identically no
//! matter how the exchange happened.

mod parse;

use std::collections::BTreeMap;
use std::fmt;

/// Charset reported when the origin does not name one.
pub const DEFAULT_CHARSET: &str = "UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    path: String,
    file_size: Option<u64>,
    visibility: Visibility,
    last_modified: Option<i64>,
    mime_type: Option<String>,
    charset: String,
    headers: BTreeMap<String, String>,
}

impl FileAttributes {
    /// Builds the record from raw `(name, value)` header pairs.
    ///
    /// Header names are matched case-insensitively; the stored header bag is
    /// normalized (lower-case keys, blank values dropped).
    pub fn from_headers(path: &str, raw: &[(String, String)]) -> Self {
        let headers = parse::normalize_headers(raw);

        let (mime_type, charset) = headers
            .get("content-type")
            .map(|v| parse::split_content_type(v))
            .unwrap_or((None, None));
        let file_size = headers
            .get("content-length")
            .and_then(|v| parse::parse_file_size(v));
        let last_modified = headers
            .get("last-modified")
            .and_then(|v| parse::parse_last_modified(v));

        Self {
            path: path.trim_start_matches('/').to_string(),
            file_size,
            visibility: Visibility::Public,
            last_modified,
            mime_type,
            charset: charset.unwrap_or_else(|| DEFAULT_CHARSET.to_string()),
            headers,
        }
    }

    /// Path relative to the origin, without a leading `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }

    /// Always [`Visibility::Public`]: HTTP has no access-control concept here.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Unix timestamp (seconds).
    pub fn last_modified(&self) -> Option<i64> {
        self.last_modified
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Normalized response headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}
