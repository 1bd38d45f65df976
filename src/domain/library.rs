use super::{BrowserState, Catalog, DocumentRecord};
use crate::error::{DocshelfError, ListingWarning, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Filters applied to the bundle directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    /// Only bundle entries ending with this suffix are listed
    pub image_suffix: String,
    /// Bundle entries ending with this suffix are OS metadata and never listed
    pub excluded_suffix: String,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            image_suffix: ".jpg".to_string(),
            excluded_suffix: "DS_Store".to_string(),
        }
    }
}

impl LibraryOptions {
    fn accepts_bundle_entry(&self, name: &str) -> bool {
        name.ends_with(&self.image_suffix) && !name.ends_with(&self.excluded_suffix)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogLayout {
    /// Bundle and imported documents in separate sections
    #[default]
    Sectioned,
    /// A single list
    Flat,
}

/// Records produced by one listing, plus the entries that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub records: Vec<DocumentRecord>,
    pub warnings: Vec<ListingWarning>,
}

#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub catalog: Catalog,
    pub warnings: Vec<ListingWarning>,
}

/// The two document locations and the rules used to read them
#[derive(Debug, Clone)]
pub struct DocumentLibrary {
    bundle_dir: PathBuf,
    documents_dir: PathBuf,
    options: LibraryOptions,
}

impl DocumentLibrary {
    pub fn new(bundle_dir: impl Into<PathBuf>, documents_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(bundle_dir, documents_dir, LibraryOptions::default())
    }

    pub fn with_options(
        bundle_dir: impl Into<PathBuf>,
        documents_dir: impl Into<PathBuf>,
        options: LibraryOptions,
    ) -> Self {
        Self {
            bundle_dir: bundle_dir.into(),
            documents_dir: documents_dir.into(),
            options,
        }
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Creates the documents directory if it does not exist yet.
    pub fn ensure_documents_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.documents_dir).map_err(|source| {
            DocshelfError::DocumentsUnavailable {
                path: self.documents_dir.clone(),
                source,
            }
        })
    }

    /// Lists bundled images in directory enumeration order.
    ///
    /// Fails only when the bundle directory itself cannot be read. Entries
    /// whose properties cannot be resolved are skipped with a warning.
    pub fn list_bundled_documents(&self) -> Result<Listing> {
        let entries = fs::read_dir(&self.bundle_dir).map_err(|source| {
            DocshelfError::BundleUnavailable {
                path: self.bundle_dir.clone(),
                source,
            }
        })?;

        let mut listing = Listing::default();

        for entry_result in entries {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    listing.skip(&self.bundle_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if !self.options.accepts_bundle_entry(&name) {
                debug!("Ignoring bundle entry {}", path.display());
                continue;
            }

            match fs::metadata(&path) {
                Ok(m) if m.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    listing.skip(&path, e);
                    continue;
                }
            }

            listing.push(DocumentRecord::from_path(&path, true));
        }

        Ok(listing)
    }

    /// Lists every regular file in the documents directory.
    ///
    /// Never fails: an unreadable directory yields no records and a warning.
    pub fn list_imported_documents(&self) -> Listing {
        let mut listing = Listing::default();

        let entries = match fs::read_dir(&self.documents_dir) {
            Ok(entries) => entries,
            Err(e) => {
                let warning = ListingWarning::DocumentsUnavailable {
                    path: self.documents_dir.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", warning);
                listing.warnings.push(warning);
                return listing;
            }
        };

        for entry_result in entries {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    listing.skip(&self.documents_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            match fs::metadata(&path) {
                Ok(m) if m.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    listing.skip(&path, e);
                    continue;
                }
            }

            listing.push(DocumentRecord::from_path(&path, false));
        }

        listing
    }

    /// Reads both locations and assembles a fresh catalog.
    pub fn build_catalog(&self, layout: CatalogLayout) -> CatalogReport {
        let mut warnings = Vec::new();

        let bundle = match self.list_bundled_documents() {
            Ok(listing) => {
                warnings.extend(listing.warnings);
                listing.records
            }
            Err(e) => {
                warn!("{}", e);
                warnings.extend(e.as_listing_warning());
                Vec::new()
            }
        };

        let imported = self.list_imported_documents();
        warnings.extend(imported.warnings);

        let catalog = match layout {
            CatalogLayout::Sectioned => Catalog::sectioned(bundle, imported.records),
            CatalogLayout::Flat => Catalog::flat(bundle, imported.records),
        };

        info!(
            "Catalog built: {} documents, {} warnings",
            catalog.len(),
            warnings.len()
        );

        CatalogReport { catalog, warnings }
    }

    /// Rebuilds the catalog from disk and swaps it into `state`.
    ///
    /// The active query survives, so a cleared filter shows the fresh catalog.
    pub fn reload_into(&self, state: &mut BrowserState, layout: CatalogLayout) -> CatalogReport {
        let report = self.build_catalog(layout);
        state.replace_catalog(report.catalog.clone());
        report
    }

    /// Copies `source` into the documents directory under its own name.
    ///
    /// An existing file with the same name is never overwritten. The returned
    /// record is resolved from the copy, not from the source.
    pub fn import_document(&self, source: &Path) -> Result<DocumentRecord> {
        let metadata = fs::metadata(source).map_err(|e| DocshelfError::ImportCopy {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_file() {
            return Err(DocshelfError::NotAFile(source.to_path_buf()));
        }

        let name = source
            .file_name()
            .ok_or_else(|| DocshelfError::NotAFile(source.to_path_buf()))?;

        fs::create_dir_all(&self.documents_dir).map_err(|e| DocshelfError::ImportCopy {
            path: source.to_path_buf(),
            source: e,
        })?;

        let destination = self.documents_dir.join(name);

        let mut target = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DocshelfError::ImportCollision {
                    name: name.to_string_lossy().into_owned(),
                    destination: self.documents_dir.clone(),
                });
            }
            Err(e) => {
                return Err(DocshelfError::ImportCopy {
                    path: source.to_path_buf(),
                    source: e,
                })
            }
        };

        let copied = fs::File::open(source)
            .and_then(|mut input| io::copy(&mut input, &mut target))
            .and_then(|_| target.sync_all());

        if let Err(e) = copied {
            drop(target);
            // Leave nothing behind for the next listing to pick up
            fs::remove_file(&destination).ok();
            return Err(DocshelfError::ImportCopy {
                path: source.to_path_buf(),
                source: e,
            });
        }

        let record = DocumentRecord::from_path(&destination, false)?;
        info!(
            "Imported {} ({} bytes) into {}",
            record.title,
            record.size_bytes,
            self.documents_dir.display()
        );
        Ok(record)
    }

    /// Imports `source` and appends the new record to `catalog`.
    ///
    /// On failure the catalog is left untouched.
    pub fn import_into(&self, catalog: &mut Catalog, source: &Path) -> Result<DocumentRecord> {
        let record = self.import_document(source)?;
        catalog.push_imported(record.clone());
        Ok(record)
    }
}

impl Listing {
    fn push(&mut self, record: Result<DocumentRecord>) {
        match record {
            Ok(r) => self.records.push(r),
            Err(e) => match e.as_listing_warning() {
                Some(warning) => {
                    warn!("{}", warning);
                    self.warnings.push(warning);
                }
                None => warn!("{}", e),
            },
        }
    }

    fn skip(&mut self, path: &Path, err: io::Error) {
        let warning = ListingWarning::UnreadableEntry {
            path: path.to_path_buf(),
            reason: err.to_string(),
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}
