use docshelf::async_preview::SyncPreviewManager;
use docshelf::cli::{AppConfig, Args, Command};
use docshelf::config::{default_log_path, UserConfig};
use docshelf::domain::{BrowserState, Catalog, CatalogLayout, CatalogReport, DocumentLibrary};
use docshelf::file_opener::open_record;
use docshelf::logging::{self, LogTarget};
use docshelf::tui::{
    expand_home, format_file_size, handle_key_event, handle_text_input, render_help_overlay,
    render_welcome_overlay, render_with_preview, Footer, KeyAction, StatusMessage, TextInput,
    ViewState,
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{info, warn};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Saved settings fill in whatever the command line leaves out
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });
    let config = AppConfig::resolve(args, &user_config);

    let target = match config.command {
        Command::Browse => LogTarget::File(default_log_path()),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(config.verbose, target) {
        eprintln!("Warning: {}", e);
    }

    let library = DocumentLibrary::new(&config.bundle_dir, &config.documents_dir);
    if config.command.writes_documents() {
        if let Err(e) = library.ensure_documents_dir() {
            warn!("{}", e);
        }
    }

    let result = match &config.command {
        Command::Browse => run_app_with_config(&config, &library, user_config),
        Command::List { json } => {
            let catalog = load_catalog(&library, config.layout);
            print_catalog(&catalog, *json)
        }
        Command::Search { query, json } => {
            let catalog = load_catalog(&library, config.layout);
            print_catalog(&catalog.filter_by_title(query), *json)
        }
        Command::Import { path } => run_import(&library, path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Builds the catalog, printing any skipped entries to stderr
fn load_catalog(library: &DocumentLibrary, layout: CatalogLayout) -> Catalog {
    let report = library.build_catalog(layout);
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    report.catalog
}

fn print_catalog(catalog: &Catalog, json: bool) -> io::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(catalog).map_err(io::Error::other)?;
        println!("{}", out);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No documents");
        return Ok(());
    }

    for section in catalog.sections() {
        println!("{} ({})", section.title(), section.records.len());
        for record in &section.records {
            let marker = if record.thumbnail_name.is_some() {
                "▣"
            } else {
                " "
            };
            println!(
                "  {} {:<40} {:>10}  {}",
                marker,
                record.title,
                format_file_size(record.size_bytes),
                record.media_type
            );
        }
    }
    Ok(())
}

fn run_import(library: &DocumentLibrary, path: &std::path::Path) -> io::Result<()> {
    let record = library.import_document(path).map_err(io::Error::other)?;
    println!(
        "Imported {} ({}, {}) into {}",
        record.title,
        format_file_size(record.size_bytes),
        record.media_type,
        library.documents_dir().display()
    );
    Ok(())
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(
    config: &AppConfig,
    library: &DocumentLibrary,
    mut user_config: UserConfig,
) -> io::Result<()> {
    let catalog = library.build_catalog(config.layout).catalog;
    info!("Loaded {} documents", catalog.len());

    let mut state = BrowserState::new(catalog);
    let mut preview_manager = SyncPreviewManager::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &mut state,
        &mut preview_manager,
        library,
        config,
        &mut user_config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Rebuilds the catalog from disk and drops previews that may be stale
fn reload(
    library: &DocumentLibrary,
    state: &mut BrowserState,
    preview_manager: &mut SyncPreviewManager,
    layout: CatalogLayout,
) -> CatalogReport {
    let report = library.reload_into(state, layout);
    preview_manager.clear_cache();
    preview_manager.reset();
    report
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    state: &mut BrowserState,
    preview_manager: &mut SyncPreviewManager,
    library: &DocumentLibrary,
    config: &AppConfig,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    // Show welcome on first launch or if --welcome flag is set
    let mut view_state = if config.show_welcome || !user_config.welcome_shown {
        ViewState::Welcome
    } else {
        ViewState::Browsing
    };
    let mut import_input = String::new();
    let mut status: Option<StatusMessage> = None;

    loop {
        terminal.draw(|frame| {
            let footer = match (&view_state, &status) {
                (ViewState::Searching, _) => Footer::Search(&state.query),
                (ViewState::Importing, _) => Footer::Import(&import_input),
                (_, Some(message)) => Footer::Status(message),
                _ => Footer::Controls,
            };
            render_with_preview(frame, state, preview_manager, footer);

            match view_state {
                ViewState::Help => render_help_overlay(frame),
                ViewState::Welcome => render_welcome_overlay(frame),
                _ => {}
            }
        })?;

        // Short poll so finished previews show up without a key press
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match view_state {
            ViewState::Welcome => {
                // Any key dismisses welcome and starts browsing
                view_state = ViewState::Browsing;

                user_config.welcome_shown = true;
                if let Err(e) = user_config.save() {
                    warn!("Failed to save user config: {}", e);
                }
                continue;
            }
            ViewState::Help => {
                let action = handle_key_event(key);
                if matches!(action, KeyAction::Help | KeyAction::Quit | KeyAction::None) {
                    view_state = ViewState::Browsing;
                }
                continue;
            }
            ViewState::Searching => {
                match handle_text_input(key) {
                    TextInput::Insert(c) => state.push_query_char(c),
                    TextInput::Backspace => state.pop_query_char(),
                    TextInput::Submit => {
                        if !state.is_filtered() {
                            reload(library, state, preview_manager, config.layout);
                        }
                        view_state = ViewState::Browsing;
                    }
                    TextInput::Cancel => {
                        state.clear_query();
                        reload(library, state, preview_manager, config.layout);
                        view_state = ViewState::Browsing;
                    }
                    TextInput::None => {}
                }
                continue;
            }
            ViewState::Importing => {
                match handle_text_input(key) {
                    TextInput::Insert(c) => import_input.push(c),
                    TextInput::Backspace => {
                        import_input.pop();
                    }
                    TextInput::Cancel => view_state = ViewState::Browsing,
                    TextInput::Submit => {
                        let source = expand_home(&import_input);
                        status = Some(match library.import_document(&source) {
                            Ok(record) => {
                                reload(library, state, preview_manager, config.layout);
                                state.select_location(&record.location);
                                StatusMessage::info(format!("Imported {}", record.title))
                            }
                            Err(e) => {
                                warn!("Import of {} failed: {}", source.display(), e);
                                StatusMessage::error(e.to_string())
                            }
                        });
                        import_input.clear();
                        view_state = ViewState::Browsing;
                    }
                    TextInput::None => {}
                }
                continue;
            }
            ViewState::Browsing => {}
        }

        // A status message lasts until the next key press
        status = None;

        match handle_key_event(key) {
            KeyAction::Quit => break,
            KeyAction::Next => state.next(),
            KeyAction::Previous => state.previous(),
            KeyAction::Search => view_state = ViewState::Searching,
            KeyAction::Import => {
                import_input.clear();
                view_state = ViewState::Importing;
            }
            KeyAction::Reload => {
                let report = reload(library, state, preview_manager, config.layout);
                let count = report.catalog.len();
                status = Some(match report.warnings.first() {
                    Some(first) => StatusMessage::error(format!(
                        "Reloaded {} documents, {} skipped ({})",
                        count,
                        report.warnings.len(),
                        first
                    )),
                    None => StatusMessage::info(format!("Reloaded {} documents", count)),
                });
            }
            KeyAction::Help => view_state = ViewState::Help,
            KeyAction::Open => {
                let Some(record) = state.current_record().cloned() else {
                    continue;
                };

                // Suspend terminal before opening external program
                if let Err(e) = suspend_terminal(terminal) {
                    warn!("Failed to suspend terminal: {}", e);
                    continue;
                }

                // Editors block until they exit
                let open_result = open_record(&record);

                resume_terminal(terminal)?;

                match open_result {
                    Ok(()) => preview_manager.invalidate(&record.location),
                    Err(e) => {
                        warn!("Failed to open {}: {}", record.location.display(), e);
                        status = Some(StatusMessage::error(e.to_string()));
                    }
                }
            }
            KeyAction::None => {}
        }
    }

    Ok(())
}
