//! Error taxonomy for filesystem operations, transports and construction.

use thiserror::Error;

use crate::gate::Operation;

/// Coarse classification of every failure the crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation implies directory semantics.
    FileOnly,
    /// Operation would mutate the origin.
    ReadOnly,
    /// Header probe failed or returned non-2xx.
    MetadataUnavailable,
    /// Content retrieval failed or returned non-2xx.
    UnableToRead,
    /// Construction-time failure (bad base URL, client build).
    Config,
}

/// Failure of a filesystem operation.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{operation} is not supported: the filesystem holds files only")]
    FileOnly { operation: Operation },

    #[error("{operation} is not supported: the filesystem is read-only")]
    ReadOnly { operation: Operation },

    #[error("unable to retrieve metadata for `{path}`: {cause}")]
    MetadataUnavailable {
        path: String,
        #[source]
        cause: FailureCause,
    },

    #[error("unable to read `{path}`: {cause}")]
    UnableToRead {
        path: String,
        #[source]
        cause: FailureCause,
    },
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::FileOnly { .. } => ErrorKind::FileOnly,
            FsError::ReadOnly { .. } => ErrorKind::ReadOnly,
            FsError::MetadataUnavailable { .. } => ErrorKind::MetadataUnavailable,
            FsError::UnableToRead { .. } => ErrorKind::UnableToRead,
        }
    }

    /// The rejected operation, for gate failures.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            FsError::FileOnly { operation } | FsError::ReadOnly { operation } => Some(*operation),
            _ => None,
        }
    }

    /// Underlying code: HTTP status for missing resources, transport code otherwise.
    pub fn code(&self) -> Option<i64> {
        match self {
            FsError::MetadataUnavailable { cause, .. } | FsError::UnableToRead { cause, .. } => {
                cause.code()
            }
            _ => None,
        }
    }

    pub(crate) fn metadata_unavailable(path: &str, cause: impl Into<FailureCause>) -> Self {
        FsError::MetadataUnavailable {
            path: path.to_string(),
            cause: cause.into(),
        }
    }

    pub(crate) fn unable_to_read(path: &str, cause: impl Into<FailureCause>) -> Self {
        FsError::UnableToRead {
            path: path.to_string(),
            cause: cause.into(),
        }
    }
}

/// Why a probe or fetch did not produce a usable response.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// Origin answered with a non-2xx status.
    #[error("resource not found (HTTP {status})")]
    NotFound { status: u32 },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FailureCause {
    pub fn code(&self) -> Option<i64> {
        match self {
            FailureCause::NotFound { status } => Some(i64::from(*status)),
            FailureCause::Transport(e) => e.code(),
        }
    }
}

/// Body read errors: a transport error smuggled through `io::Error` is unwrapped.
impl From<std::io::Error> for FailureCause {
    fn from(e: std::io::Error) -> Self {
        FailureCause::Transport(TransportError::from_body(e))
    }
}

/// Error raised by a transport while exchanging a request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),

    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot resolve `{path}` against the origin: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("`{path}` resolves outside the origin")]
    OutsideOrigin { path: String },
}

impl TransportError {
    /// Numeric code carried by the error, when there is one.
    ///
    /// libcurl errors report their `CURLcode`. reqwest errors report the HTTP
    /// status when they have one, otherwise the `CURLcode` of the matching
    /// failure class, so both transports speak the same codes. I/O errors
    /// report the OS error number.
    pub fn code(&self) -> Option<i64> {
        match self {
            TransportError::Curl(e) => Some(i64::from(e.code())),
            TransportError::Http(e) => http_code(e),
            TransportError::Io(e) => e.raw_os_error().map(i64::from),
            TransportError::Url { .. } | TransportError::OutsideOrigin { .. } => None,
        }
    }

    /// Recovers the typed error from an `io::Error` raised while reading a body.
    pub(crate) fn from_body(e: std::io::Error) -> Self {
        let typed = e.get_ref().is_some_and(|inner| {
            inner.is::<curl::Error>() || inner.is::<reqwest::Error>() || inner.is::<std::io::Error>()
        });
        if !typed {
            return TransportError::Io(e);
        }

        let kind = e.kind();
        let Some(inner) = e.into_inner() else {
            return TransportError::Io(kind.into());
        };
        let inner = match inner.downcast::<curl::Error>() {
            Ok(e) => return TransportError::Curl(*e),
            Err(other) => other,
        };
        let inner = match inner.downcast::<reqwest::Error>() {
            Ok(e) => return TransportError::Http(*e),
            Err(other) => other,
        };
        match inner.downcast::<std::io::Error>() {
            Ok(nested) => TransportError::from_body(*nested),
            Err(other) => TransportError::Io(std::io::Error::new(kind, other)),
        }
    }
}

// CURLcode values
const CURLE_URL_MALFORMAT: i64 = 3;
const CURLE_COULDNT_CONNECT: i64 = 7;
const CURLE_OPERATION_TIMEDOUT: i64 = 28;
const CURLE_TOO_MANY_REDIRECTS: i64 = 47;
const CURLE_SEND_ERROR: i64 = 55;
const CURLE_RECV_ERROR: i64 = 56;

fn http_code(e: &reqwest::Error) -> Option<i64> {
    if let Some(status) = e.status() {
        return Some(i64::from(status.as_u16()));
    }
    let code = if e.is_timeout() {
        CURLE_OPERATION_TIMEDOUT
    } else if e.is_connect() {
        CURLE_COULDNT_CONNECT
    } else if e.is_redirect() {
        CURLE_TOO_MANY_REDIRECTS
    } else if e.is_body() || e.is_decode() {
        CURLE_RECV_ERROR
    } else if e.is_builder() {
        CURLE_URL_MALFORMAT
    } else if e.is_request() {
        CURLE_SEND_ERROR
    } else {
        return None;
    };
    Some(code)
}

/// Fatal construction-time failure. Never returned by filesystem operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base url `{0}` must be an absolute http(s) url with a host")]
    UnsupportedUrl(String),

    #[error("invalid request header `{0}`")]
    InvalidHeader(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}
