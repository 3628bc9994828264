//! Color palette and severity tiers for the usage report.
//!
//! Severity is a pure function of the percentage; the palette decides how a
//! tier looks. `Palette::plain()` renders the same text without escape codes.

use crossterm::style::{Color, ContentStyle, Stylize};

const HIGH_THRESHOLD: f64 = 80.0;
const MID_THRESHOLD: f64 = 50.0;

/// Three-tier classification of a usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Mid,
    High,
}

impl Severity {
    /// Boundary values map to the higher tier (50 is mid, 80 is high).
    pub fn from_percent(percent: f64) -> Self {
        if percent >= HIGH_THRESHOLD {
            Severity::High
        } else if percent >= MID_THRESHOLD {
            Severity::Mid
        } else {
            Severity::Low
        }
    }
}

/// Terminal colors for every role in the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub low: Color,
    pub mid: Color,
    pub high: Color,
    /// Background behind bar cells, filled or empty
    pub bar_background: Color,
    /// When false, all styling is dropped
    pub enabled: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            low: Color::DarkGreen,
            mid: Color::DarkYellow,
            high: Color::DarkRed,
            bar_background: Color::AnsiValue(238),
            enabled: true,
        }
    }
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Low => self.low,
            Severity::Mid => self.mid,
            Severity::High => self.high,
        }
    }

    pub fn color_for_percent(&self, percent: f64) -> Color {
        self.severity_color(Severity::from_percent(percent))
    }

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if !self.enabled {
            return text.to_string();
        }
        style.apply(text).to_string()
    }

    pub fn colored(&self, text: &str, color: Color) -> String {
        self.paint(text, ContentStyle::new().with(color))
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, ContentStyle::new().bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, ContentStyle::new().dim())
    }

    /// Filled bar cells: severity color over the bar background.
    pub fn bar_fill(&self, text: &str, color: Color) -> String {
        self.paint(text, ContentStyle::new().with(color).on(self.bar_background))
    }

    /// Empty bar cells: dimmed blanks over the bar background.
    pub fn bar_empty(&self, text: &str) -> String {
        self.paint(text, ContentStyle::new().dim().on(self.bar_background))
    }
}

#[cfg(test)]
#[path = "tests/theme_tests.rs"]
mod tests;
