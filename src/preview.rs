// Preview module: renders a document's content for the terminal preview pane

use crate::domain::{ContentKind, DocumentRecord};
use crate::tui::helpers::format_file_size;
use image::{DynamicImage, GenericImageView, Pixel};
use pdfium_render::prelude::*;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

const MAX_PREVIEW_LINES: usize = 50;
const MAX_PDF_PAGES: usize = 5;
const MAX_IMAGE_WIDTH: u32 = 120;
/// Two pixel rows fit in one terminal row with half-blocks
const MAX_IMAGE_HEIGHT: u32 = 80;

/// Preview content: plain lines, or lines carrying colour
#[derive(Debug, Clone)]
pub enum PreviewContent {
    Text(Vec<String>),
    Styled(Vec<Line<'static>>),
}

impl PreviewContent {
    pub fn into_lines(self) -> Vec<Line<'static>> {
        match self {
            PreviewContent::Text(lines) => lines.into_iter().map(Line::from).collect(),
            PreviewContent::Styled(lines) => lines,
        }
    }
}

/// Reads at most `max_lines` lines without loading the whole file
pub fn read_file_lines(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let reader = BufReader::new(fs::File::open(path)?);
    reader.lines().take(max_lines).collect()
}

fn syntect_color(color: syntect::highlighting::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Syntax-highlighted preview of a text document
pub fn generate_text_preview(record: &DocumentRecord) -> io::Result<PreviewContent> {
    let lines = read_file_lines(&record.location, MAX_PREVIEW_LINES)?;

    let extension = record
        .location
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let syntax_set = SyntaxSet::load_defaults_newlines();
    let theme_set = ThemeSet::load_defaults();
    let syntax = syntax_set
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, &theme_set.themes["base16-ocean.dark"]);

    let mut styled = Vec::with_capacity(lines.len());
    for line in lines {
        let with_newline = format!("{}\n", line);
        let ranges = highlighter
            .highlight_line(&with_newline, &syntax_set)
            .map_err(|e| io::Error::other(format!("Syntax highlighting error: {}", e)))?;

        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                Span::styled(
                    text.trim_end_matches('\n').to_string(),
                    Style::default().fg(syntect_color(style.foreground)),
                )
            })
            .collect();
        styled.push(Line::from(spans));
    }

    Ok(PreviewContent::Styled(styled))
}

pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Fits an image inside the bounds, keeping its aspect ratio and never upscaling
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let ratio = (max_width as f64 / original_width as f64)
        .min(max_height as f64 / original_height as f64);

    if ratio >= 1.0 {
        (original_width, original_height)
    } else {
        (
            (original_width as f64 * ratio) as u32,
            (original_height as f64 * ratio) as u32,
        )
    }
}

/// Renders an image with the upper half block (▀): foreground is the upper
/// pixel, background the lower one.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let height = height + height % 2;

    let img = img
        .resize_exact(width, height, image::imageops::FilterType::Triangle)
        .to_rgb8();

    (0..height / 2)
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..width)
                .map(|x| {
                    let upper = img.get_pixel(x, row * 2).to_rgb();
                    let lower = img.get_pixel(x, row * 2 + 1).to_rgb();
                    Span::styled(
                        "▀",
                        Style::default()
                            .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                            .bg(Color::Rgb(lower[0], lower[1], lower[2])),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn header_lines(label: &str, record: &DocumentRecord, details: Vec<String>) -> Vec<Line<'static>> {
    let info_style = Style::default().fg(Color::Gray);
    let mut info = vec![Span::styled(
        format!("Size: {}", format_file_size(record.size_bytes)),
        info_style,
    )];
    info.push(Span::raw("  "));
    info.push(Span::styled(format!("Type: {}", record.media_type), info_style));
    for detail in details {
        info.push(Span::raw("  "));
        info.push(Span::styled(detail, info_style));
    }

    vec![
        Line::from(vec![
            Span::styled(
                format!("{}: ", label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(record.title.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(info),
        Line::from(""),
    ]
}

pub fn generate_image_preview(record: &DocumentRecord) -> io::Result<PreviewContent> {
    let img = load_image(&record.location)?;
    let (original_width, original_height) = img.dimensions();
    let (width, height) = calculate_resize_dimensions(
        original_width,
        original_height,
        MAX_IMAGE_WIDTH,
        MAX_IMAGE_HEIGHT,
    );

    let mut details = vec![format!("{}×{} px", original_width, original_height)];
    if let Some(thumbnail) = &record.thumbnail_name {
        details.push(format!("Thumbnail: {}", thumbnail));
    }

    let mut lines = header_lines("Image", record, details);
    lines.extend(image_to_halfblock_lines(&img, width, height));
    Ok(PreviewContent::Styled(lines))
}

/// Binds to a Pdfium library if one can be found, without panicking
fn try_create_pdfium() -> Option<Pdfium> {
    if let Ok(bindings) = Pdfium::bind_to_system_library() {
        return Some(Pdfium::new(bindings));
    }

    let mut candidates = Vec::new();
    if let Ok(lib_path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        candidates.push(lib_path);
    }
    candidates.push("./lib/".to_string());
    candidates.push("./".to_string());

    candidates.iter().find_map(|dir| {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .ok()
            .map(Pdfium::new)
    })
}

pub fn is_pdfium_available() -> bool {
    try_create_pdfium().is_some()
}

fn extract_pdf_text(path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
    let pdfium = try_create_pdfium().ok_or_else(|| {
        io::Error::other("Pdfium library not available. Install libpdfium to enable PDF previews.")
    })?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| io::Error::other(format!("PDF loading error: {}", e)))?;

    let mut lines: Vec<String> = Vec::new();
    for (index, page) in document.pages().iter().take(MAX_PDF_PAGES).enumerate() {
        let Ok(text) = page.text() else { continue };
        let page_text = text.all();
        if page_text.trim().is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
            lines.push(format!("--- Page {} ---", index + 1));
            lines.push(String::new());
        }
        lines.extend(page_text.lines().map(str::to_string));
        if lines.len() >= max_lines {
            break;
        }
    }

    lines.truncate(max_lines);
    Ok(lines)
}

/// PDF preview by text extraction; failures are shown in the preview itself
pub fn generate_pdf_preview(record: &DocumentRecord) -> io::Result<PreviewContent> {
    let mut lines: Vec<String> = vec![
        format!("PDF: {}", record.title),
        format!("Size: {}", format_file_size(record.size_bytes)),
        String::new(),
    ];

    match extract_pdf_text(&record.location, MAX_PREVIEW_LINES) {
        Ok(text) if text.is_empty() => {
            lines.push("[This PDF contains no extractable text]".to_string());
            lines.push(String::new());
            lines.push("Press 'o' to open it in your PDF viewer.".to_string());
        }
        Ok(text) => lines.extend(text),
        Err(e) => {
            let message = e.to_string();
            let help = if message.contains("Pdfium library not available") {
                "[PDF preview requires the Pdfium library]"
            } else {
                "[This PDF may be corrupted, password-protected, or unsupported]"
            };
            lines.push(format!("Error: {}", message));
            lines.push(String::new());
            lines.push(help.to_string());
            lines.push(String::new());
            lines.push("Press 'o' to open it in your PDF viewer.".to_string());
        }
    }

    Ok(PreviewContent::Text(lines))
}

/// Builds the preview for any document
pub fn generate_preview(record: &DocumentRecord) -> io::Result<PreviewContent> {
    match record.content_kind() {
        ContentKind::Text => generate_text_preview(record),
        ContentKind::Image => generate_image_preview(record),
        ContentKind::Pdf => generate_pdf_preview(record),
        ContentKind::Binary => Ok(PreviewContent::Text(vec![
            format!("Document: {}", record.title),
            format!("Size: {}", format_file_size(record.size_bytes)),
            format!("Type: {}", record.media_type),
            String::new(),
            "[No inline preview for this type]".to_string(),
            "Press 'o' to open it with the system viewer.".to_string(),
        ])),
    }
}
