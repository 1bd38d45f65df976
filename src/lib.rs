//! Docshelf - a terminal document shelf
//!
//! This crate provides the catalog, import and preview machinery behind the
//! `docshelf` binary: bundled and imported documents are listed into a
//! sectioned catalog, filtered by title, and rendered in a terminal UI.

pub mod async_preview;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod logging;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    filter_by_title, BrowserState, Catalog, CatalogLayout, CatalogReport, ContentKind,
    DocumentLibrary, DocumentRecord, LibraryOptions, Listing, Section, SectionKind,
};
pub use error::{DocshelfError, ListingWarning, Result};
pub use file_opener::open_record;
