//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Progress};

// Column accents, one per progress value

/// Used for Not Started
pub const SLATE: Color = Color::Rgb(96, 110, 130);
/// Used for In Progress
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for Completed
pub const DARK_GREEN: Color = Color::Rgb(0, 110, 40);

/// Card being dragged
pub const DRAG_PURPLE: Color = Color::Rgb(120, 70, 150);
/// Confirmation dialogs
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

pub fn column_color(progress: Progress) -> Color {
    match progress {
        Progress::NotStarted => SLATE,
        Progress::InProgress => GOLD,
        Progress::Completed => DARK_GREEN,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::LightRed,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}
