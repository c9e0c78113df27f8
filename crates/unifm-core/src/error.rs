//! Error types for `unifm-core`.
//!
//! Reducers never fail: every problem they meet is logged and absorbed.
//! [`CoreError`] is returned by the fallible helpers around them (config
//! loading, action decoding, collaborator lookups) so callers can decide
//! what to surface.

use std::path::PathBuf;

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An entry key was referenced but is not present in the cache.
    #[error("entry not cached: {0}")]
    MissingEntry(String),

    /// A volume id was referenced but no such volume is mounted.
    #[error("unknown volume: {0}")]
    UnknownVolume(String),

    /// A serialized action could not be decoded.
    #[error("action decode error: {0}")]
    ActionDecode(String),

    /// An external collaborator (resolver, metadata or task service) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `unifm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
