// LogLens - ui/theme.rs
//
// Colour scheme, level colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::filter::normalize_level;
use egui::Color32;

/// Foreground colour for a level label. Unknown levels use the normal text
/// colour (`None`).
pub fn level_colour(level: &str) -> Option<Color32> {
    match normalize_level(level).as_str() {
        "fatal" | "critical" | "crit" => Some(Color32::from_rgb(220, 38, 38)), // Red 600
        "error" | "err" => Some(Color32::from_rgb(239, 68, 68)),                // Red 500
        "warn" | "warning" => Some(Color32::from_rgb(217, 119, 6)),             // Amber 600
        "debug" => Some(Color32::from_rgb(107, 114, 128)),                      // Gray 500
        "trace" | "verbose" => Some(Color32::from_rgb(75, 85, 99)),             // Gray 600
        _ => None,
    }
}

/// Background tint behind search matches.
pub const HIGHLIGHT_BG: Color32 = Color32::from_rgba_premultiplied(250, 204, 21, 90); // Yellow 400

/// Error text (invalid search pattern, failed loads).
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const PROGRESS_BAR_WIDTH: f32 = 160.0;

/// Column widths for the record table; `None` takes the remaining space.
pub fn column_width(column: crate::core::model::Column) -> Option<f32> {
    use crate::core::model::Column;
    match column {
        Column::Timestamp => Some(190.0),
        Column::Level => Some(70.0),
        Column::AppName => Some(120.0),
        Column::Source => Some(140.0),
        Column::Message => None,
    }
}
