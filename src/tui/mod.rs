// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

pub use colors::*;
pub use helpers::{centered_rect, expand_home, format_file_size};
pub use input::{handle_key_event, handle_text_input, KeyAction, TextInput};

use crate::async_preview::{PreviewState, SyncPreviewManager};
use crate::domain::{BrowserState, Catalog, DocumentRecord};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main document list
    Browsing,
    /// Typing a title filter
    Searching,
    /// Typing the path of a file to import
    Importing,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
}

/// One-line message shown in the footer until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// What the footer shows
#[derive(Debug, Clone, Copy)]
pub enum Footer<'a> {
    Controls,
    Search(&'a str),
    Import(&'a str),
    Status(&'a StatusMessage),
}

/// Renders the browser, polling the preview manager for the selected document
pub fn render_with_preview(
    frame: &mut Frame,
    state: &BrowserState,
    preview_manager: &mut SyncPreviewManager,
    footer: Footer,
) {
    let preview = state
        .current_record()
        .map(|record| preview_manager.request_preview(record).clone());
    render(frame, state, preview.as_ref(), footer);
}

/// Renders the browser with an already known preview state
pub fn render(frame: &mut Frame, state: &BrowserState, preview: Option<&PreviewState>, footer: Footer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_document_list(frame, body[0], state);
    render_preview(frame, body[1], state.current_record(), preview);
    render_footer(frame, chunks[2], footer);
}

fn render_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let total = state.catalog().len();
    let mut spans = vec![
        Span::styled(
            " Docshelf ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} documents", total),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ];

    if state.is_filtered() {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled("filter ", Style::default().fg(TEXT_SECONDARY)));
        spans.push(Span::styled(
            format!("\"{}\"", state.query),
            Style::default().fg(ACCENT_SECONDARY),
        ));
        spans.push(Span::styled(
            format!(" ({} shown)", state.visible().len()),
            Style::default().fg(TEXT_SECONDARY),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(header, area);
}

/// Index of the selected row among the list items, counting section headers
pub fn selected_item_index(catalog: &Catalog, position: Option<(usize, usize)>) -> Option<usize> {
    let (section, row) = position?;
    let before: usize = catalog.sections()[..section]
        .iter()
        .map(|s| s.records.len() + 1)
        .sum();
    Some(before + 1 + row)
}

fn document_row(record: &DocumentRecord) -> ListItem<'static> {
    let marker = if record.thumbnail_name.is_some() {
        "▣ "
    } else {
        "• "
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(ACCENT_SECONDARY)),
        Span::styled(record.title.clone(), Style::default().fg(TEXT_PRIMARY)),
        Span::styled(
            format!("  {} · {}", format_file_size(record.size_bytes), record.media_type),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ]))
}

fn render_document_list(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(" Documents ");

    let catalog = state.visible();
    if catalog.is_empty() {
        frame.render_widget(render_empty_state_widget(state).block(block), area);
        return;
    }

    let mut items = Vec::new();
    for section in catalog.sections() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{} ({})", section.title(), section.records.len()),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))));
        items.extend(section.records.iter().map(document_row));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(BG_SELECTED).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");

    let mut list_state =
        ListState::default().with_selected(selected_item_index(catalog, state.current_position()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_empty_state_widget(state: &BrowserState) -> Paragraph<'static> {
    let (title, hint) = if state.is_filtered() {
        (
            "No Matches",
            format!("Nothing matches \"{}\". Press / then Esc to clear.", state.query),
        )
    } else {
        (
            "No Documents",
            "Press 'a' to import a file.".to_string(),
        )
    };

    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(TEXT_SECONDARY))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}

fn render_preview(
    frame: &mut Frame,
    area: Rect,
    record: Option<&DocumentRecord>,
    preview: Option<&PreviewState>,
) {
    let Some(record) = record else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR))
            .title(" Preview ");
        frame.render_widget(block, area);
        return;
    };

    let title = format!(" {} ", record.title);
    let (lines, border) = match preview {
        Some(PreviewState::Ready(content)) => (content.clone().into_lines(), BORDER_COLOR),
        Some(PreviewState::Error(e)) => (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Error generating preview",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", e)),
                Line::from(""),
                Line::from(format!("  Location: {}", record.location.display())),
                Line::from(format!("  Size: {}", format_file_size(record.size_bytes))),
                Line::from(format!("  Type: {}", record.media_type)),
            ],
            ACCENT_PRIMARY,
        ),
        Some(PreviewState::Loading) | None => (
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Loading preview...",
                    Style::default()
                        .fg(TEXT_SECONDARY)
                        .add_modifier(Modifier::ITALIC),
                )),
            ],
            BORDER_COLOR,
        ),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border))
                .title(title),
        )
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect, footer: Footer) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(ACCENT_HIGHLIGHT));
    let label = |l: &'static str| Span::styled(l, Style::default().fg(TEXT_SECONDARY));
    let sep = || Span::raw("  │  ");

    let (line, alignment) = match footer {
        Footer::Controls => (
            Line::from(vec![
                key("↑↓ "),
                label("Navigate"),
                sep(),
                key("/ "),
                label("Search"),
                sep(),
                key("a "),
                label("Import"),
                sep(),
                key("o "),
                label("Open"),
                sep(),
                key("r "),
                label("Reload"),
                sep(),
                key("? "),
                label("Help"),
                sep(),
                key("q "),
                label("Quit"),
            ]),
            Alignment::Center,
        ),
        Footer::Search(query) => (
            Line::from(vec![
                key(" / "),
                Span::styled(query.to_string(), Style::default().fg(TEXT_PRIMARY)),
                Span::styled("▏", Style::default().fg(ACCENT_HIGHLIGHT)),
                label("   Enter keep · Esc clear"),
            ]),
            Alignment::Left,
        ),
        Footer::Import(path) => (
            Line::from(vec![
                key(" Import file: "),
                Span::styled(path.to_string(), Style::default().fg(TEXT_PRIMARY)),
                Span::styled("▏", Style::default().fg(ACCENT_HIGHLIGHT)),
                label("   Enter import · Esc cancel"),
            ]),
            Alignment::Left,
        ),
        Footer::Status(message) => {
            let color = if message.is_error {
                ACCENT_PRIMARY
            } else {
                ACCENT_SECONDARY
            };
            (
                Line::from(Span::styled(
                    format!(" {}", message.text),
                    Style::default().fg(color),
                )),
                Alignment::Left,
            )
        }
    };

    let paragraph = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(alignment);

    frame.render_widget(paragraph, area);
}

fn overlay_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK))
}

fn shortcut_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), Style::default().fg(ACCENT_SECONDARY)),
        Span::raw(action),
    ])
}

fn shortcut_lines() -> Vec<Line<'static>> {
    vec![
        shortcut_line("↑ / k", "Previous document"),
        shortcut_line("↓ / j", "Next document"),
        shortcut_line("/", "Search titles"),
        shortcut_line("a", "Import a file"),
        shortcut_line("o / Enter", "Open in viewer or editor"),
        shortcut_line("r", "Reload from disk"),
        shortcut_line("?", "Toggle help"),
        shortcut_line("q / Esc", "Quit"),
    ]
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(" Help ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(shortcut_lines());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(TEXT_SECONDARY),
    )));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![
        Line::from(""),
        heading("Welcome to Docshelf!"),
        Line::from(""),
        Line::from("Your shelf has two parts: the Bundle, documents shipped with the app,"),
        Line::from("and Imported, the files you copied in yourself."),
        Line::from(""),
        heading("Keyboard Shortcuts:"),
        Line::from(""),
    ];
    lines.extend(shortcut_lines());
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Imports never overwrite: a file with the same name is refused.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        heading("Press any key to start browsing..."),
    ]);

    let paragraph = Paragraph::new(lines)
        .block(overlay_block(" Welcome to Docshelf "))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
