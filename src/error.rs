//! Error types for storeforge operations.
//!
//! This module defines [`StoreforgeError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Structural problems (missing roots, unreadable files) degrade to partial
//!   results with warnings and rarely surface as errors at all
//! - Planning problems are recorded per section kind as [`StoreforgeError::PlanConflict`]
//! - [`StoreforgeError::BackupFailed`] is the only safety-critical error: it
//!   stops the cleanup state machine before anything is deleted
//! - Use `anyhow::Error` (via `StoreforgeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for storeforge operations.
#[derive(Debug, Error)]
pub enum StoreforgeError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The template configuration holds a value the resolver cannot use.
    #[error("Malformed template '{template}': {message}")]
    MalformedTemplate { template: String, message: String },

    /// The scan root exists but cannot be listed.
    #[error("Cannot read template root {path}: {message}")]
    ScanRootUnreadable { path: PathBuf, message: String },

    /// A section kind could not be consolidated.
    #[error("Cannot migrate section '{kind}': {message}")]
    PlanConflict { kind: String, message: String },

    /// Copying legacy templates into the backup failed. Nothing was deleted.
    #[error("Backup failed at {path}: {message}")]
    BackupFailed { path: PathBuf, message: String },

    /// Restoring a backup failed.
    #[error("Restore from {path} failed: {message}")]
    RestoreFailed { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for storeforge operations.
pub type Result<T> = std::result::Result<T, StoreforgeError>;
