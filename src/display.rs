//! Line rendering for the usage report.
//!
//! Everything here is a pure function from usage records to strings; the
//! only I/O is `Renderer::write_lines`, which writes to whatever stream the
//! caller hands in.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::account_usage::types::{ClaudeUsage, CodexUsage, Provider};
use crate::theme::Palette;
use crate::usage_reset::format_time_until;

/// Sub-cell glyphs indexed by eighths of a cell.
const PARTIAL_BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
const FULL_BLOCK: char = '█';
const SEPARATOR: char = '─';
const DOT: char = '●';

/// Fixed widths used to align report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Target visible width of a window line, and of the separator
    pub line_width: usize,
    pub bar_width: usize,
    pub label_width: usize,
    pub sub_label_width: usize,
    /// Spaces kept before the reset annotation even when a line overflows
    pub min_gap: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            line_width: 62,
            bar_width: 20,
            label_width: 14,
            sub_label_width: 12,
            min_gap: 2,
        }
    }
}

/// Cell breakdown of a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarCells {
    pub full: usize,
    pub partial: Option<char>,
    pub empty: usize,
}

impl BarCells {
    /// Splits `width` cells for `percent`, clamped to [0, 100].
    ///
    /// The fractional remainder is rounded to eighths; a partial glyph is
    /// drawn only for one to seven eighths.
    pub fn for_percent(percent: f64, width: usize) -> Self {
        let total = percent.clamp(0.0, 100.0) / 100.0 * width as f64;
        let full = (total.floor() as usize).min(width);
        let eighths = ((total - full as f64) * 8.0).round() as usize;
        let partial = (1..8).contains(&eighths).then(|| PARTIAL_BLOCKS[eighths]);
        let empty = width - full - usize::from(partial.is_some());
        Self {
            full,
            partial,
            empty,
        }
    }

    pub fn total(&self) -> usize {
        self.full + usize::from(self.partial.is_some()) + self.empty
    }
}

/// Renders report lines with a fixed layout and palette.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    layout: Layout,
    palette: Palette,
}

impl Renderer {
    pub fn new(layout: Layout, palette: Palette) -> Self {
        Self { layout, palette }
    }

    /// Severity dot for a provider header.
    pub fn dot(&self, percent: f64) -> String {
        let color = self.palette.color_for_percent(percent);
        self.palette.colored(&DOT.to_string(), color)
    }

    pub fn bar(&self, percent: f64) -> String {
        let cells = BarCells::for_percent(percent, self.layout.bar_width);
        let color = self.palette.color_for_percent(percent);

        let mut bar = String::new();
        if cells.full > 0 {
            let full = FULL_BLOCK.to_string().repeat(cells.full);
            bar.push_str(&self.palette.bar_fill(&full, color));
        }
        if let Some(glyph) = cells.partial {
            bar.push_str(&self.palette.bar_fill(&glyph.to_string(), color));
        }
        if cells.empty > 0 {
            bar.push_str(&self.palette.bar_empty(&" ".repeat(cells.empty)));
        }
        bar
    }

    /// `  <label> <bar> <pct>` with an optional right-aligned reset countdown.
    pub fn window_line(
        &self,
        label: &str,
        percent: f64,
        resets_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> String {
        let layout = &self.layout;
        let pct_text = format!("{:>4}", format!("{}%", percent.round() as i64));
        let color = self.palette.color_for_percent(percent);
        let left = format!(
            "  {:<width$} {} {}",
            label,
            self.bar(percent),
            self.palette.colored(&pct_text, color),
            width = layout.label_width
        );

        let Some(resets_at) = resets_at else {
            return left;
        };

        let reset_text = format!("resets {}", format_time_until(resets_at, now));
        let visible_left = 2 + layout.label_width + 1 + layout.bar_width + 1 + pct_text.len();
        let pad = layout
            .line_width
            .saturating_sub(visible_left + reset_text.chars().count())
            .max(layout.min_gap);
        format!(
            "{}{}{}",
            left,
            " ".repeat(pad),
            self.palette.dim(&reset_text)
        )
    }

    /// Indented breakdown line, e.g. a per-model percentage.
    pub fn sub_line(&self, label: &str, percent: f64) -> String {
        let color = self.palette.color_for_percent(percent);
        format!(
            "    {} {}",
            self.palette.dim(&format!(
                "{:<width$}",
                label,
                width = self.layout.sub_label_width
            )),
            self.palette
                .colored(&format!("{}%", percent.round() as i64), color)
        )
    }

    fn balance_line(&self, label: &str, value: &str) -> String {
        format!(
            "    {} {}",
            self.palette.dim(&format!(
                "{:<width$}",
                label,
                width = self.layout.sub_label_width
            )),
            value
        )
    }

    fn separator(&self) -> String {
        self.palette
            .dim(&SEPARATOR.to_string().repeat(self.layout.line_width))
    }

    pub fn header_lines(&self) -> Vec<String> {
        vec![
            String::new(),
            self.palette.bold("  OpenCode Usage"),
            self.separator(),
        ]
    }

    pub fn footer_lines(&self) -> Vec<String> {
        vec![self.separator(), String::new()]
    }

    pub fn claude_lines(&self, usage: &ClaudeUsage, now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            format!(
                "  {} {}",
                self.dot(usage.max_percent()),
                self.palette.bold(Provider::Claude.display_name())
            ),
            self.window_line(
                "5h window",
                usage.five_hour.percent,
                usage.five_hour.resets_at,
                now,
            ),
            self.window_line(
                "7d window",
                usage.seven_day.percent,
                usage.seven_day.resets_at,
                now,
            ),
        ];
        if let Some(percent) = usage.sonnet {
            lines.push(self.sub_line("Sonnet", percent));
        }
        if let Some(percent) = usage.opus {
            lines.push(self.sub_line("Opus", percent));
        }
        if let Some(extra) = usage.extra_usage.as_ref().filter(|extra| extra.enabled) {
            lines.push(self.balance_line(
                "Overage",
                &format!("${:.2} / ${:.2}", extra.used, extra.limit),
            ));
        }
        lines
    }

    pub fn codex_lines(&self, usage: &CodexUsage, now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            format!(
                "  {} {}  {}",
                self.dot(usage.max_percent()),
                self.palette.bold(Provider::Codex.display_name()),
                self.palette.dim(&format!("({})", usage.plan_type))
            ),
            self.window_line(
                "Primary",
                usage.primary.percent,
                usage.primary.resets_at,
                now,
            ),
        ];
        if let Some(secondary) = &usage.secondary {
            lines.push(self.window_line(
                "Secondary",
                secondary.percent,
                secondary.resets_at,
                now,
            ));
        }
        if let Some(credits) = usage.credits.as_ref().filter(|c| !c.unlimited) {
            lines.push(self.balance_line("Credits", &format!("${:.2}", credits.balance)));
        }
        lines
    }

    pub fn error_lines(&self, provider: Provider, message: &str) -> Vec<String> {
        let high = self.palette.high;
        vec![
            String::new(),
            format!(
                "  {} {}",
                self.palette.colored(&DOT.to_string(), high),
                self.palette.bold(provider.display_name())
            ),
            format!("    {}", self.palette.colored(message, high)),
        ]
    }

    pub fn write_lines(&self, out: &mut impl Write, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
