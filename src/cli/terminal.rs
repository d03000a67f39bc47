//! Colour for the run report

use std::fmt::Display;

use owo_colors::{colors::css, OwoColorize};

/// Detects whether stdout can show colour.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Extension trait that paints report fragments by meaning.
///
/// Falls back to plain text when stdout has no colour support.
pub trait Paint: Display {
    /// Accepted flights, healthy outcomes (green).
    fn accepted(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    /// Rejected lines, failed files (amber).
    fn rejected(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    /// Files written (blue).
    fn path(&self) -> String {
        paint(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    /// Secondary detail.
    fn hint(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }
}

impl<T: Display + ?Sized> Paint for T {}

fn paint<T: Display + ?Sized>(value: &T, style: impl FnOnce(&str) -> String) -> String {
    let text = value.to_string();
    if supports_color() { style(&text) } else { text }
}
