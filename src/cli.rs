// CLI module for argument parsing and configuration

use crate::config::{default_bundle_dir, default_documents_dir, UserConfig};
use crate::domain::CatalogLayout;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Docshelf - a terminal document shelf
///
/// Lists the documents shipped in the bundle directory and the ones you
/// imported, previews them, and imports new files.
#[derive(Parser, Debug, Clone)]
#[command(name = "docshelf")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the bundled (read-only) documents
    #[arg(long = "bundle-dir", global = true)]
    pub bundle_dir: Option<PathBuf>,

    /// Directory holding imported documents
    #[arg(long = "documents-dir", global = true)]
    pub documents_dir: Option<PathBuf>,

    /// Show one flat list instead of Bundle / Imported sections
    #[arg(long = "flat", action = ArgAction::SetTrue, global = true)]
    pub flat: bool,

    /// Show Bundle / Imported sections even if the saved config says flat
    #[arg(
        long = "sectioned",
        action = ArgAction::SetTrue,
        global = true,
        conflicts_with = "flat"
    )]
    pub sectioned: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Show the welcome screen even if it was already seen
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse documents interactively (default)
    Browse,
    /// Print the catalog
    List {
        /// Print JSON instead of a table
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Copy a file into the documents directory
    Import {
        /// File to import
        path: PathBuf,
    },
    /// Print documents whose title contains QUERY (case-insensitive)
    Search {
        query: String,
        /// Print JSON instead of a table
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },
}

impl Command {
    /// Whether the command may write into the documents directory
    pub fn writes_documents(&self) -> bool {
        matches!(self, Command::Browse | Command::Import { .. })
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        for (label, dir) in [
            ("Bundle directory", &self.bundle_dir),
            ("Documents directory", &self.documents_dir),
        ] {
            if let Some(dir) = dir {
                if dir.exists() && !dir.is_dir() {
                    return Err(format!("{} is not a directory: {}", label, dir.display()));
                }
            }
        }

        if let Some(Command::Import { path }) = &self.command {
            if !path.exists() {
                return Err(format!("File does not exist: {}", path.display()));
            }
            if !path.is_file() {
                return Err(format!("Not a regular file: {}", path.display()));
            }
        }

        Ok(())
    }
}

/// Configuration resolved from CLI arguments over the saved user config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bundle_dir: PathBuf,
    pub documents_dir: PathBuf,
    pub layout: CatalogLayout,
    pub verbose: u8,
    pub show_welcome: bool,
    pub command: Command,
}

impl AppConfig {
    pub fn resolve(args: Args, user: &UserConfig) -> Self {
        let layout = if args.sectioned {
            CatalogLayout::Sectioned
        } else if args.flat || user.flat {
            CatalogLayout::Flat
        } else {
            CatalogLayout::Sectioned
        };

        AppConfig {
            bundle_dir: pick_dir(args.bundle_dir, user.bundle_dir.as_deref(), default_bundle_dir),
            documents_dir: pick_dir(
                args.documents_dir,
                user.documents_dir.as_deref(),
                default_documents_dir,
            ),
            layout,
            verbose: args.verbose,
            show_welcome: args.show_welcome,
            command: args.command.unwrap_or(Command::Browse),
        }
    }
}

fn pick_dir(cli: Option<PathBuf>, saved: Option<&Path>, fallback: fn() -> PathBuf) -> PathBuf {
    cli.or_else(|| saved.map(Path::to_path_buf))
        .unwrap_or_else(fallback)
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig::resolve(args, &UserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            bundle_dir: None,
            documents_dir: None,
            flat: false,
            sectioned: false,
            verbose: 0,
            show_welcome: false,
            command: None,
        }
    }

    mod args_tests {
        use super::*;
        use std::fs;
        use tempfile::TempDir;

        #[test]
        fn test_parse_defaults_to_no_command() {
            let args = Args::try_parse_from(["docshelf"]).unwrap();
            assert!(args.command.is_none());
            assert!(!args.flat);
            assert_eq!(args.verbose, 0);
        }

        #[test]
        fn test_parse_list_json() {
            let args = Args::try_parse_from(["docshelf", "list", "--json"]).unwrap();
            assert_eq!(args.command, Some(Command::List { json: true }));
        }

        #[test]
        fn test_parse_import() {
            let args = Args::try_parse_from(["docshelf", "import", "/tmp/report.pdf"]).unwrap();
            assert_eq!(
                args.command,
                Some(Command::Import {
                    path: PathBuf::from("/tmp/report.pdf")
                })
            );
        }

        #[test]
        fn test_parse_search_with_global_flags() {
            let args = Args::try_parse_from([
                "docshelf",
                "search",
                "doc",
                "--flat",
                "-vv",
                "--documents-dir",
                "/srv/docs",
            ])
            .unwrap();

            assert_eq!(
                args.command,
                Some(Command::Search {
                    query: "doc".to_string(),
                    json: false
                })
            );
            assert!(args.flat);
            assert_eq!(args.verbose, 2);
            assert_eq!(args.documents_dir, Some(PathBuf::from("/srv/docs")));
        }

        #[test]
        fn test_parse_flat_and_sectioned_conflict() {
            assert!(Args::try_parse_from(["docshelf", "--flat", "--sectioned"]).is_err());
            let args = Args::try_parse_from(["docshelf", "list", "--sectioned"]).unwrap();
            assert!(args.sectioned);
        }

        #[test]
        fn test_parse_import_requires_path() {
            assert!(Args::try_parse_from(["docshelf", "import"]).is_err());
        }

        #[test]
        fn test_validate_missing_dirs_are_allowed() {
            let args = Args {
                bundle_dir: Some(PathBuf::from("/nonexistent/bundle/12345")),
                ..args()
            };
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_validate_dir_that_is_a_file() {
            let temp_dir = TempDir::new().unwrap();
            let file = temp_dir.path().join("file.txt");
            fs::write(&file, b"x").unwrap();

            let args = Args {
                documents_dir: Some(file),
                ..args()
            };

            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_validate_import_missing_file() {
            let args = Args {
                command: Some(Command::Import {
                    path: PathBuf::from("/nonexistent/report.pdf"),
                }),
                ..args()
            };

            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_validate_import_directory() {
            let temp_dir = TempDir::new().unwrap();
            let args = Args {
                command: Some(Command::Import {
                    path: temp_dir.path().to_path_buf(),
                }),
                ..args()
            };

            assert!(args.validate().unwrap_err().contains("Not a regular file"));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_only_browse_and_import_write_documents() {
            assert!(Command::Browse.writes_documents());
            assert!(Command::Import {
                path: PathBuf::from("a.txt")
            }
            .writes_documents());
            assert!(!Command::List { json: false }.writes_documents());
            assert!(!Command::Search {
                query: "doc".to_string(),
                json: true
            }
            .writes_documents());
        }

        #[test]
        fn test_app_config_defaults() {
            let config: AppConfig = args().into();

            assert_eq!(config.bundle_dir, default_bundle_dir());
            assert_eq!(config.documents_dir, default_documents_dir());
            assert_eq!(config.layout, CatalogLayout::Sectioned);
            assert_eq!(config.command, Command::Browse);
            assert!(!config.show_welcome);
        }

        #[test]
        fn test_app_config_saved_values_apply() {
            let user = UserConfig {
                bundle_dir: Some(PathBuf::from("/saved/bundle")),
                flat: true,
                ..UserConfig::default()
            };

            let config = AppConfig::resolve(args(), &user);

            assert_eq!(config.bundle_dir, PathBuf::from("/saved/bundle"));
            assert_eq!(config.documents_dir, default_documents_dir());
            assert_eq!(config.layout, CatalogLayout::Flat);
        }

        #[test]
        fn test_app_config_sectioned_overrides_saved_flat() {
            let user = UserConfig {
                flat: true,
                ..UserConfig::default()
            };
            let args = Args {
                sectioned: true,
                ..args()
            };

            let config = AppConfig::resolve(args, &user);

            assert_eq!(config.layout, CatalogLayout::Sectioned);
        }

        #[test]
        fn test_app_config_cli_overrides_saved() {
            let user = UserConfig {
                documents_dir: Some(PathBuf::from("/saved/docs")),
                ..UserConfig::default()
            };
            let args = Args {
                documents_dir: Some(PathBuf::from("/cli/docs")),
                command: Some(Command::List { json: false }),
                ..args()
            };

            let config = AppConfig::resolve(args, &user);

            assert_eq!(config.documents_dir, PathBuf::from("/cli/docs"));
            assert_eq!(config.command, Command::List { json: false });
        }
    }
}
