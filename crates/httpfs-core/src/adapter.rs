//! HTTP-backed [`FilesystemAdapter`].
//!
//! Metadata comes from a HEAD probe, content from a GET; directory and
//! mutating operations are refused by the gate without touching the network.

use std::io::Read;
use std::sync::Arc;

use crate::attributes::{FileAttributes, Visibility};
use crate::config::{HttpFsConfig, TransportKind};
use crate::error::{ConfigError, FailureCause, FsError};
use crate::filesystem::{FileStream, FilesystemAdapter};
use crate::gate::{self, Operation};
use crate::transport::{ClientTransport, HttpClient, ReqwestClient, StreamTransport, Transport};

/// Read-only, file-only view of an HTTP(S) origin.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct HttpAdapter {
    transport: Arc<dyn Transport>,
}

impl HttpAdapter {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Generic-protocol strategy over an injected client.
    pub fn with_client(client: impl HttpClient + 'static) -> Self {
        Self::new(ClientTransport::new(client))
    }

    /// Generic-protocol strategy with a default reqwest client for `url`.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_client(ReqwestClient::from_url(url)?))
    }

    /// Native-stream strategy (libcurl) with default settings for `url`.
    pub fn stream(url: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(StreamTransport::new(url)?))
    }

    pub fn from_config(cfg: &HttpFsConfig) -> Result<Self, ConfigError> {
        let adapter = match cfg.transport {
            TransportKind::Client => Self::with_client(ReqwestClient::from_config(cfg)?),
            TransportKind::Stream => Self::new(StreamTransport::from_config(cfg)?),
        };
        tracing::info!("http filesystem on {} ({:?} transport)", cfg.base_url, cfg.transport);
        Ok(adapter)
    }

    fn read_metadata(&self, path: &str) -> Result<FileAttributes, FsError> {
        let response = self
            .transport
            .probe(path)
            .map_err(|e| FsError::metadata_unavailable(path, e))?;

        if !response.is_success() {
            return Err(FsError::metadata_unavailable(
                path,
                FailureCause::NotFound {
                    status: response.status,
                },
            ));
        }

        Ok(FileAttributes::from_headers(path, &response.headers))
    }

    fn read_file(&self, path: &str) -> Result<FileStream, FsError> {
        let response = self
            .transport
            .fetch(path)
            .map_err(|e| FsError::unable_to_read(path, e))?;

        if !response.is_success() {
            if let Err(e) = response.body.close() {
                tracing::debug!("closing body of {} failed: {}", path, e);
            }
            return Err(FsError::unable_to_read(
                path,
                FailureCause::NotFound {
                    status: response.status,
                },
            ));
        }

        Ok(response.body)
    }
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter").finish_non_exhaustive()
    }
}

impl FilesystemAdapter for HttpAdapter {
    /// Any failure, including transport errors, reads as "does not exist".
    fn file_exists(&self, path: &str) -> bool {
        match self.transport.probe(path) {
            Ok(response) => response.is_success(),
            Err(e) => {
                tracing::debug!("existence probe for {} failed: {}", path, e);
                false
            }
        }
    }

    fn directory_exists(&self, _path: &str) -> Result<bool, FsError> {
        Err(gate::reject(Operation::DirectoryExists))
    }

    fn write(&self, _path: &str, _contents: &[u8]) -> Result<(), FsError> {
        Err(gate::reject(Operation::Write))
    }

    fn write_stream(&self, _path: &str, _contents: &mut dyn Read) -> Result<(), FsError> {
        Err(gate::reject(Operation::Write))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let mut body = self.read_file(path)?;
        let mut contents = Vec::new();
        body.read_to_end(&mut contents)
            .map_err(|e| FsError::unable_to_read(path, e))?;
        body.close().map_err(|e| FsError::unable_to_read(path, e))?;
        Ok(contents)
    }

    fn read_stream(&self, path: &str) -> Result<FileStream, FsError> {
        self.read_file(path)
    }

    fn delete(&self, _path: &str) -> Result<(), FsError> {
        Err(gate::reject(Operation::Delete))
    }

    fn delete_directory(&self, _path: &str) -> Result<(), FsError> {
        Err(gate::reject(Operation::DeleteDirectory))
    }

    fn create_directory(&self, _path: &str) -> Result<(), FsError> {
        Err(gate::reject(Operation::CreateDirectory))
    }

    fn set_visibility(&self, _path: &str, _visibility: Visibility) -> Result<(), FsError> {
        Err(gate::reject(Operation::SetVisibility))
    }

    fn visibility(&self, path: &str) -> Result<FileAttributes, FsError> {
        self.read_metadata(path)
    }

    fn mime_type(&self, path: &str) -> Result<FileAttributes, FsError> {
        self.read_metadata(path)
    }

    fn last_modified(&self, path: &str) -> Result<FileAttributes, FsError> {
        self.read_metadata(path)
    }

    fn file_size(&self, path: &str) -> Result<FileAttributes, FsError> {
        self.read_metadata(path)
    }

    fn list_contents(&self, _path: &str, _deep: bool) -> Result<Vec<FileAttributes>, FsError> {
        Err(gate::reject(Operation::ListContents))
    }

    fn move_file(&self, _source: &str, _destination: &str) -> Result<(), FsError> {
        Err(gate::reject(Operation::Move))
    }

    fn copy(&self, _source: &str, _destination: &str) -> Result<(), FsError> {
        Err(gate::reject(Operation::Copy))
    }
}
