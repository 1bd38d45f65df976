// Colour palette shared by every widget
use ratatui::style::Color;

pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 111, 146);
pub const ACCENT_SECONDARY: Color = Color::Rgb(156, 207, 216);
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(246, 193, 119);
pub const TEXT_PRIMARY: Color = Color::Rgb(224, 222, 244);
pub const TEXT_SECONDARY: Color = Color::Rgb(144, 140, 170);
pub const BG_DARK: Color = Color::Rgb(25, 23, 36);
pub const BG_SELECTED: Color = Color::Rgb(57, 53, 82);
pub const BORDER_COLOR: Color = Color::Rgb(110, 106, 134);
