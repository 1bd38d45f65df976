//! Hands a document to an external viewer or editor

use crate::domain::{ContentKind, DocumentRecord};
use crate::error::{DocshelfError, Result};
use std::path::Path;
use tracing::info;

/// How a document will be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    /// `$VISUAL` / `$EDITOR`, blocking until it exits
    Editor,
    /// The platform's default application
    SystemViewer,
}

impl Opener {
    pub fn for_record(record: &DocumentRecord) -> Self {
        match record.content_kind() {
            ContentKind::Text => Opener::Editor,
            _ => Opener::SystemViewer,
        }
    }
}

/// Opens the record's location. The caller must release the terminal first
/// when the editor may take it over.
pub fn open_record(record: &DocumentRecord) -> Result<()> {
    open_path(&record.location, Opener::for_record(record))
}

pub fn open_path(path: &Path, opener: Opener) -> Result<()> {
    if !path.exists() {
        return Err(DocshelfError::OpenError(format!(
            "{} no longer exists",
            path.display()
        )));
    }

    info!("Opening {} with {:?}", path.display(), opener);
    match opener {
        Opener::Editor => edit::edit_file(path)
            .map_err(|e| DocshelfError::OpenError(format!("editor failed: {}", e))),
        Opener::SystemViewer => open::that(path)
            .map_err(|e| DocshelfError::OpenError(format!("viewer failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNKNOWN_MEDIA_TYPE;
    use std::path::PathBuf;

    fn record(name: &str, media_type: &str) -> DocumentRecord {
        DocumentRecord {
            title: name.to_string(),
            size_bytes: 0,
            thumbnail_name: None,
            location: PathBuf::from("/nonexistent").join(name),
            media_type: media_type.to_string(),
        }
    }

    #[test]
    fn test_opener_for_text_is_editor() {
        assert_eq!(Opener::for_record(&record("a.md", "text/markdown")), Opener::Editor);
    }

    #[test]
    fn test_opener_for_other_kinds_is_viewer() {
        assert_eq!(
            Opener::for_record(&record("a.jpg", "image/jpeg")),
            Opener::SystemViewer
        );
        assert_eq!(
            Opener::for_record(&record("a.pdf", "application/pdf")),
            Opener::SystemViewer
        );
        assert_eq!(
            Opener::for_record(&record("blob", UNKNOWN_MEDIA_TYPE)),
            Opener::SystemViewer
        );
    }

    #[test]
    fn test_open_missing_file_fails_without_launching() {
        let result = open_record(&record("gone.pdf", "application/pdf"));
        match result {
            Err(DocshelfError::OpenError(msg)) => assert!(msg.contains("no longer exists")),
            other => panic!("Expected OpenError, got {:?}", other),
        }
    }
}
