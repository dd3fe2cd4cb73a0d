//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

pub const RED: Color = Color::Rgb(220, 38, 38);
pub const ORANGE: Color = Color::Rgb(234, 88, 12);
pub const YELLOW: Color = Color::Rgb(202, 138, 4);
pub const GREEN: Color = Color::Rgb(22, 163, 74);
pub const BLUE: Color = Color::Rgb(37, 99, 235);
pub const SLATE: Color = Color::Rgb(100, 116, 139);
/// Background of the delete confirmation.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Urgent => RED,
        Priority::High => ORANGE,
        Priority::Medium => YELLOW,
        Priority::Low => GREEN,
    }
}

pub fn status_color(s: Status) -> Color {
    match s {
        Status::Completed => GREEN,
        Status::InProgress => BLUE,
        Status::Pending => SLATE,
    }
}
