//! Error types shared across the crate

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocshelfError {
    /// The bundle directory could not be enumerated (packaging defect)
    #[error("bundle directory {} is unavailable: {source}", .path.display())]
    BundleUnavailable { path: PathBuf, source: io::Error },

    /// The documents directory could not be enumerated
    #[error("documents directory {} is unavailable: {source}", .path.display())]
    DocumentsUnavailable { path: PathBuf, source: io::Error },

    /// Metadata for a single entry could not be read
    #[error("cannot read properties of {}: {source}", .path.display())]
    PropertyResolution { path: PathBuf, source: io::Error },

    #[error("a document named '{name}' already exists in {}", .destination.display())]
    ImportCollision { name: String, destination: PathBuf },

    #[error("failed to import {}: {source}", .path.display())]
    ImportCopy { path: PathBuf, source: io::Error },

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("could not open document: {0}")]
    OpenError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DocshelfError>;

/// A problem found while listing that did not stop the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingWarning {
    BundleUnavailable { path: PathBuf, reason: String },
    DocumentsUnavailable { path: PathBuf, reason: String },
    UnreadableEntry { path: PathBuf, reason: String },
}

impl ListingWarning {
    pub fn path(&self) -> &PathBuf {
        match self {
            ListingWarning::BundleUnavailable { path, .. }
            | ListingWarning::DocumentsUnavailable { path, .. }
            | ListingWarning::UnreadableEntry { path, .. } => path,
        }
    }
}

impl fmt::Display for ListingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingWarning::BundleUnavailable { path, reason } => {
                write!(f, "bundle directory {} is unavailable: {}", path.display(), reason)
            }
            ListingWarning::DocumentsUnavailable { path, reason } => {
                write!(
                    f,
                    "documents directory {} is unavailable: {}",
                    path.display(),
                    reason
                )
            }
            ListingWarning::UnreadableEntry { path, reason } => {
                write!(f, "skipped {}: {}", path.display(), reason)
            }
        }
    }
}

impl DocshelfError {
    /// The non-fatal form of a listing error, if this is one
    pub fn as_listing_warning(&self) -> Option<ListingWarning> {
        match self {
            DocshelfError::BundleUnavailable { path, source } => {
                Some(ListingWarning::BundleUnavailable {
                    path: path.clone(),
                    reason: source.to_string(),
                })
            }
            DocshelfError::DocumentsUnavailable { path, source } => {
                Some(ListingWarning::DocumentsUnavailable {
                    path: path.clone(),
                    reason: source.to_string(),
                })
            }
            DocshelfError::PropertyResolution { path, source } => {
                Some(ListingWarning::UnreadableEntry {
                    path: path.clone(),
                    reason: source.to_string(),
                })
            }
            _ => None,
        }
    }
}
