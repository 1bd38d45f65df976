pub mod library;

use crate::error::{DocshelfError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use library::{CatalogLayout, CatalogReport, DocumentLibrary, LibraryOptions, Listing};

/// Title used when a file name cannot be turned into a display name
pub const UNTITLED: &str = "Untitled";

/// Media type reported when the content type cannot be resolved
pub const UNKNOWN_MEDIA_TYPE: &str = "unknown";

/// Resolves a MIME-style content type from a file name's extension.
pub fn media_type_for_path(path: &Path) -> String {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return UNKNOWN_MEDIA_TYPE.to_string(),
    };

    let media_type = match ext.as_str() {
        // Text
        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "rs" => "text/x-rust",
        "py" => "text/x-python",
        "swift" => "text/x-swift",
        "c" | "h" => "text/x-c",
        "cpp" | "hpp" => "text/x-c++",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "sh" | "bash" => "application/x-sh",

        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",

        // Documents
        "pdf" => "application/pdf",
        "rtf" => "application/rtf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pages" => "application/vnd.apple.pages",
        "key" => "application/vnd.apple.keynote",
        "numbers" => "application/vnd.apple.numbers",

        // Archives and media
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",

        _ => UNKNOWN_MEDIA_TYPE,
    };

    media_type.to_string()
}

/// How a document's content can be previewed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Image,
    Pdf,
    Binary,
}

impl ContentKind {
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_lowercase();
        match media_type.as_str() {
            "application/pdf" => ContentKind::Pdf,
            "image/svg+xml" => ContentKind::Text,
            "application/json" | "application/xml" | "application/toml" | "application/yaml"
            | "application/x-sh" => ContentKind::Text,
            t if t.starts_with("text/") => ContentKind::Text,
            t if t.starts_with("image/") => ContentKind::Image,
            _ => ContentKind::Binary,
        }
    }
}

/// One listable file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub title: String,
    pub size_bytes: u64,
    pub thumbnail_name: Option<String>,
    pub location: PathBuf,
    pub media_type: String,
}

impl DocumentRecord {
    /// Builds a record from a file on disk.
    ///
    /// `with_thumbnail` records the entry's own name as its thumbnail, which
    /// is only done for bundled images.
    pub fn from_path(path: &Path, with_thumbnail: bool) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|source| DocshelfError::PropertyResolution {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty());

        let size_bytes = if metadata.is_file() { metadata.len() } else { 0 };

        Ok(DocumentRecord {
            title: file_name.clone().unwrap_or_else(|| UNTITLED.to_string()),
            size_bytes,
            thumbnail_name: if with_thumbnail { file_name } else { None },
            location: path.to_path_buf(),
            media_type: media_type_for_path(path),
        })
    }

    pub fn content_kind(&self) -> ContentKind {
        ContentKind::from_media_type(&self.media_type)
    }

    /// Case-insensitive substring match on the title
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Bundle,
    Imported,
    /// Single section of a flat catalog
    All,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Bundle => "Bundle",
            SectionKind::Imported => "Imported",
            SectionKind::All => "Documents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub records: Vec<DocumentRecord>,
}

impl Section {
    pub fn new(kind: SectionKind, records: Vec<DocumentRecord>) -> Self {
        Self { kind, records }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Documents grouped into named sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Two sections: bundled documents first, imported documents second.
    pub fn sectioned(bundle: Vec<DocumentRecord>, imported: Vec<DocumentRecord>) -> Self {
        Self::new(vec![
            Section::new(SectionKind::Bundle, bundle),
            Section::new(SectionKind::Imported, imported),
        ])
    }

    /// One section holding bundled documents followed by imported ones.
    pub fn flat(bundle: Vec<DocumentRecord>, imported: Vec<DocumentRecord>) -> Self {
        let mut records = bundle;
        records.extend(imported);
        Self::new(vec![Section::new(SectionKind::All, records)])
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.records.len())
    }

    pub fn record(&self, section: usize, row: usize) -> Option<&DocumentRecord> {
        self.sections.get(section)?.records.get(row)
    }

    /// Total number of records across all sections
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.sections.iter().flat_map(|s| s.records.iter())
    }

    /// Appends a freshly imported record to the section that holds imports.
    pub fn push_imported(&mut self, record: DocumentRecord) {
        match self.imported_section_index() {
            Some(index) => self.sections[index].records.push(record),
            None => self
                .sections
                .push(Section::new(SectionKind::Imported, vec![record])),
        }
    }

    fn imported_section_index(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.kind == SectionKind::Imported)
            .or_else(|| self.sections.iter().position(|s| s.kind == SectionKind::All))
    }

    /// Maps a position in the flattened record order to (section, row).
    pub fn position_of(&self, flat_index: usize) -> Option<(usize, usize)> {
        let mut remaining = flat_index;
        for (section_index, section) in self.sections.iter().enumerate() {
            if remaining < section.records.len() {
                return Some((section_index, remaining));
            }
            remaining -= section.records.len();
        }
        None
    }

    pub fn filter_by_title(&self, query: &str) -> Catalog {
        filter_by_title(self, query)
    }
}

/// Keeps, per section, only the records whose title contains `query`
/// case-insensitively. An empty query returns the catalog unchanged.
pub fn filter_by_title(catalog: &Catalog, query: &str) -> Catalog {
    if query.is_empty() {
        return catalog.clone();
    }

    let sections = catalog
        .sections
        .iter()
        .map(|section| Section {
            kind: section.kind,
            records: section
                .records
                .iter()
                .filter(|r| r.title_matches(query))
                .cloned()
                .collect(),
        })
        .collect();

    Catalog { sections }
}

/// View model driving the document browser
#[derive(Debug)]
pub struct BrowserState {
    catalog: Catalog,
    visible: Catalog,
    pub query: String,
    pub current_index: usize,
}

impl BrowserState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            visible: catalog.clone(),
            catalog,
            query: String::new(),
            current_index: 0,
        }
    }

    /// The unfiltered catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The catalog as currently filtered
    pub fn visible(&self) -> &Catalog {
        &self.visible
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.refilter();
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty()
    }

    /// Swaps in a freshly built catalog, keeping the active query.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.refilter();
    }

    /// Moves the cursor to the visible record stored at `location`.
    pub fn select_location(&mut self, location: &Path) -> bool {
        match self.visible.records().position(|r| r.location == location) {
            Some(index) => {
                self.current_index = index;
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self) {
        if self.current_index < self.visible.len().saturating_sub(1) {
            self.current_index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    pub fn current_position(&self) -> Option<(usize, usize)> {
        self.visible.position_of(self.current_index)
    }

    pub fn current_record(&self) -> Option<&DocumentRecord> {
        let (section, row) = self.current_position()?;
        self.visible.record(section, row)
    }

    fn refilter(&mut self) {
        self.visible = filter_by_title(&self.catalog, &self.query);
        let last = self.visible.len().saturating_sub(1);
        if self.current_index > last {
            self.current_index = last;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn record(title: &str) -> DocumentRecord {
        DocumentRecord {
            title: title.to_string(),
            size_bytes: 100,
            thumbnail_name: None,
            location: PathBuf::from(format!("/docs/{}", title)),
            media_type: media_type_for_path(Path::new(title)),
        }
    }

    pub fn bundled(title: &str) -> DocumentRecord {
        DocumentRecord {
            thumbnail_name: Some(title.to_string()),
            location: PathBuf::from(format!("/bundle/{}", title)),
            ..record(title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{bundled, record};
    use super::*;

    fn titles(catalog: &Catalog) -> Vec<&str> {
        catalog.records().map(|r| r.title.as_str()).collect()
    }

    mod media_type_tests {
        use super::*;

        #[test]
        fn test_media_type_common_extensions() {
            assert_eq!(media_type_for_path(Path::new("a.jpg")), "image/jpeg");
            assert_eq!(media_type_for_path(Path::new("report.pdf")), "application/pdf");
            assert_eq!(media_type_for_path(Path::new("notes.txt")), "text/plain");
            assert_eq!(media_type_for_path(Path::new("main.rs")), "text/x-rust");
        }

        #[test]
        fn test_media_type_case_insensitive() {
            assert_eq!(media_type_for_path(Path::new("PHOTO.JPG")), "image/jpeg");
            assert_eq!(media_type_for_path(Path::new("Report.PDF")), "application/pdf");
        }

        #[test]
        fn test_media_type_unknown() {
            assert_eq!(media_type_for_path(Path::new("README")), UNKNOWN_MEDIA_TYPE);
            assert_eq!(media_type_for_path(Path::new("blob.xyz123")), UNKNOWN_MEDIA_TYPE);
            assert_eq!(media_type_for_path(Path::new(".DS_Store")), UNKNOWN_MEDIA_TYPE);
        }

        #[test]
        fn test_content_kind_from_media_type() {
            assert_eq!(ContentKind::from_media_type("text/plain"), ContentKind::Text);
            assert_eq!(ContentKind::from_media_type("application/json"), ContentKind::Text);
            assert_eq!(ContentKind::from_media_type("image/jpeg"), ContentKind::Image);
            assert_eq!(ContentKind::from_media_type("application/pdf"), ContentKind::Pdf);
            assert_eq!(ContentKind::from_media_type("application/zip"), ContentKind::Binary);
            assert_eq!(ContentKind::from_media_type(UNKNOWN_MEDIA_TYPE), ContentKind::Binary);
        }
    }

    mod record_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_record_from_path() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("notes.txt");
            fs::write(&path, b"hello").unwrap();

            let rec = DocumentRecord::from_path(&path, false).unwrap();

            assert_eq!(rec.title, "notes.txt");
            assert_eq!(rec.size_bytes, 5);
            assert_eq!(rec.location, path);
            assert_eq!(rec.media_type, "text/plain");
            assert!(rec.thumbnail_name.is_none());
            assert_eq!(rec.content_kind(), ContentKind::Text);
        }

        #[test]
        fn test_record_with_thumbnail() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("a.jpg");
            fs::write(&path, vec![0u8; 500]).unwrap();

            let rec = DocumentRecord::from_path(&path, true).unwrap();

            assert_eq!(rec.thumbnail_name.as_deref(), Some("a.jpg"));
            assert_eq!(rec.size_bytes, 500);
        }

        #[test]
        fn test_record_without_file_name_is_untitled() {
            let rec = DocumentRecord::from_path(Path::new("/"), false).unwrap();

            assert_eq!(rec.title, UNTITLED);
            assert_eq!(rec.size_bytes, 0);
            assert!(rec.thumbnail_name.is_none());
        }

        #[test]
        fn test_record_parent_component_is_untitled() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("sub").join("..");
            fs::create_dir(temp_dir.path().join("sub")).unwrap();

            let rec = DocumentRecord::from_path(&path, true).unwrap();

            assert_eq!(rec.title, UNTITLED);
            assert!(rec.thumbnail_name.is_none());
        }

        #[test]
        fn test_record_nonexistent_file() {
            let result = DocumentRecord::from_path(Path::new("/nonexistent/file.txt"), false);
            assert!(matches!(
                result,
                Err(DocshelfError::PropertyResolution { .. })
            ));
        }

        #[test]
        fn test_title_matches_case_insensitive() {
            let rec = record("Document 1");
            assert!(rec.title_matches("doc"));
            assert!(rec.title_matches("DOCUMENT"));
            assert!(rec.title_matches("ent 1"));
            assert!(!rec.title_matches("notes"));
        }
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_sectioned_catalog() {
            let catalog = Catalog::sectioned(
                vec![bundled("a.jpg"), bundled("b.jpg")],
                vec![record("report.pdf")],
            );

            assert_eq!(catalog.section_count(), 2);
            assert_eq!(catalog.sections()[0].title(), "Bundle");
            assert_eq!(catalog.sections()[1].title(), "Imported");
            assert_eq!(catalog.row_count(0), 2);
            assert_eq!(catalog.row_count(1), 1);
            assert_eq!(catalog.row_count(2), 0);
            assert_eq!(catalog.len(), 3);
            assert_eq!(catalog.record(1, 0).unwrap().title, "report.pdf");
            assert!(catalog.record(1, 1).is_none());
        }

        #[test]
        fn test_flat_catalog_keeps_bundle_first() {
            let catalog = Catalog::flat(vec![bundled("a.jpg")], vec![record("report.pdf")]);

            assert_eq!(catalog.section_count(), 1);
            assert_eq!(catalog.sections()[0].title(), "Documents");
            assert_eq!(titles(&catalog), vec!["a.jpg", "report.pdf"]);
        }

        #[test]
        fn test_push_imported_sectioned() {
            let mut catalog = Catalog::sectioned(vec![bundled("a.jpg")], vec![]);
            assert_eq!(catalog.row_count(1), 0);

            catalog.push_imported(record("report.pdf"));

            assert_eq!(catalog.row_count(0), 1);
            assert_eq!(catalog.row_count(1), 1);
        }

        #[test]
        fn test_push_imported_flat_appends_at_end() {
            let mut catalog = Catalog::flat(vec![bundled("a.jpg")], vec![record("x.txt")]);
            catalog.push_imported(record("report.pdf"));

            assert_eq!(catalog.section_count(), 1);
            assert_eq!(titles(&catalog), vec!["a.jpg", "x.txt", "report.pdf"]);
            assert_eq!(catalog.row_count(0), 3);
        }

        #[test]
        fn test_push_imported_into_empty_catalog() {
            let mut catalog = Catalog::default();
            catalog.push_imported(record("report.pdf"));

            assert_eq!(catalog.section_count(), 1);
            assert_eq!(catalog.sections()[0].kind, SectionKind::Imported);
        }

        #[test]
        fn test_position_of() {
            let catalog = Catalog::sectioned(
                vec![bundled("a.jpg"), bundled("b.jpg")],
                vec![record("c.txt")],
            );

            assert_eq!(catalog.position_of(0), Some((0, 0)));
            assert_eq!(catalog.position_of(1), Some((0, 1)));
            assert_eq!(catalog.position_of(2), Some((1, 0)));
            assert_eq!(catalog.position_of(3), None);
        }

        #[test]
        fn test_position_of_skips_empty_sections() {
            let catalog = Catalog::sectioned(vec![], vec![record("c.txt")]);
            assert_eq!(catalog.position_of(0), Some((1, 0)));
        }
    }

    mod filter_tests {
        use super::*;

        fn sample() -> Catalog {
            Catalog::sectioned(
                vec![bundled("Document 1"), bundled("Notes")],
                vec![record("document_old"), record("Budget.xlsx")],
            )
        }

        #[test]
        fn test_filter_scenario_preserves_order() {
            let catalog = Catalog::flat(
                vec![],
                vec![record("Document 1"), record("Notes"), record("document_old")],
            );

            let filtered = filter_by_title(&catalog, "doc");

            assert_eq!(titles(&filtered), vec!["Document 1", "document_old"]);
        }

        #[test]
        fn test_filter_empty_query_returns_input() {
            let catalog = sample();
            assert_eq!(filter_by_title(&catalog, ""), catalog);
        }

        #[test]
        fn test_filter_keeps_section_structure() {
            let filtered = sample().filter_by_title("doc");

            assert_eq!(filtered.section_count(), 2);
            assert_eq!(filtered.sections()[0].kind, SectionKind::Bundle);
            assert_eq!(filtered.sections()[1].kind, SectionKind::Imported);
            assert_eq!(filtered.row_count(0), 1);
            assert_eq!(filtered.row_count(1), 1);
        }

        #[test]
        fn test_filter_results_are_subset_and_match() {
            let catalog = sample();
            for query in ["o", "DOC", "bud", "zzz", " "] {
                let filtered = filter_by_title(&catalog, query);
                for rec in filtered.records() {
                    assert!(catalog.records().any(|r| r == rec));
                    assert!(rec.title.to_lowercase().contains(&query.to_lowercase()));
                }
            }
        }

        #[test]
        fn test_filter_is_idempotent() {
            let catalog = sample();
            let once = filter_by_title(&catalog, "doc");
            let twice = filter_by_title(&once, "doc");
            assert_eq!(once, twice);
        }

        #[test]
        fn test_filter_does_not_mutate_input() {
            let catalog = sample();
            let before = catalog.clone();
            let _ = filter_by_title(&catalog, "notes");
            assert_eq!(catalog, before);
        }

        #[test]
        fn test_filter_no_matches_keeps_empty_sections() {
            let filtered = filter_by_title(&sample(), "zzz");
            assert_eq!(filtered.section_count(), 2);
            assert!(filtered.is_empty());
        }
    }

    mod browser_state_tests {
        use super::*;

        fn state() -> BrowserState {
            BrowserState::new(Catalog::sectioned(
                vec![bundled("a.jpg"), bundled("b.jpg")],
                vec![record("Document 1"), record("document_old")],
            ))
        }

        #[test]
        fn test_browser_state_new() {
            let state = state();
            assert_eq!(state.current_index, 0);
            assert_eq!(state.visible().len(), 4);
            assert_eq!(state.current_record().unwrap().title, "a.jpg");
            assert!(!state.is_filtered());
        }

        #[test]
        fn test_browser_state_navigation_crosses_sections() {
            let mut state = state();
            state.next();
            state.next();
            assert_eq!(state.current_position(), Some((1, 0)));
            assert_eq!(state.current_record().unwrap().title, "Document 1");

            state.next();
            state.next();
            assert_eq!(state.current_index, 3); // stays on last

            state.previous();
            assert_eq!(state.current_index, 2);
        }

        #[test]
        fn test_browser_state_previous_at_start() {
            let mut state = state();
            state.previous();
            assert_eq!(state.current_index, 0);
        }

        #[test]
        fn test_browser_state_query_filters_visible_only() {
            let mut state = state();
            state.set_query("doc");

            assert!(state.is_filtered());
            assert_eq!(state.visible().len(), 2);
            assert_eq!(state.catalog().len(), 4);
            assert_eq!(state.current_record().unwrap().title, "Document 1");
        }

        #[test]
        fn test_browser_state_query_clamps_cursor() {
            let mut state = state();
            state.current_index = 3;
            state.set_query("a.jpg");
            assert_eq!(state.current_index, 0);
            assert_eq!(state.current_record().unwrap().title, "a.jpg");
        }

        #[test]
        fn test_browser_state_typing_query() {
            let mut state = state();
            state.push_query_char('o');
            state.push_query_char('l');
            assert_eq!(state.query, "ol");
            assert_eq!(state.visible().len(), 1);

            state.pop_query_char();
            assert_eq!(state.query, "o");
            assert_eq!(state.visible().len(), 2);

            state.clear_query();
            assert_eq!(state.visible().len(), 4);
        }

        #[test]
        fn test_browser_state_replace_catalog_keeps_query() {
            let mut state = state();
            state.set_query("doc");
            state.replace_catalog(Catalog::sectioned(vec![], vec![record("docs.md")]));

            assert_eq!(state.query, "doc");
            assert_eq!(state.visible().len(), 1);
        }

        #[test]
        fn test_browser_state_select_location() {
            let mut state = state();
            let target = state.catalog().record(1, 1).unwrap().location.clone();

            assert!(state.select_location(&target));
            assert_eq!(state.current_record().unwrap().location, target);

            assert!(!state.select_location(Path::new("/nowhere/missing.txt")));
            assert_eq!(state.current_record().unwrap().location, target);
        }

        #[test]
        fn test_browser_state_empty_catalog() {
            let mut state = BrowserState::new(Catalog::default());
            assert!(state.current_record().is_none());
            state.next();
            assert_eq!(state.current_index, 0);
        }
    }
}
