//! Read-only, file-only filesystem over an HTTP(S) origin.
//!
//! Paths are resolved against a fixed base URL. Existence and metadata come
//! from HEAD probes, content from GET; directory operations and every mutation
//! are rejected up front.

pub mod adapter;
pub mod attributes;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod gate;
pub mod logging;
pub mod origin;
pub mod transport;

pub use adapter::HttpAdapter;
pub use attributes::{FileAttributes, Visibility};
pub use config::{HttpFsConfig, TransportKind};
pub use error::{ConfigError, ErrorKind, FailureCause, FsError, TransportError};
pub use filesystem::{FileStream, FilesystemAdapter, StreamSource};
pub use gate::Operation;
