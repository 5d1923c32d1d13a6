use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to read {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to create data directory {}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("stored value for {key:?} is malformed")]
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to serialize value for {key:?}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}
