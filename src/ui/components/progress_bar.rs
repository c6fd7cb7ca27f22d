use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Single-row completion gauge with a `done/total` label on the right.
pub struct ProgressBar<'a> {
    done: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(done: usize, total: usize, theme: &'a Theme) -> Self {
        Self { done, total, theme }
    }

    fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;

        let label = format!(" {}/{}", self.done, self.total);
        let label_width = label.chars().count() as u16;
        let bar_width = area.width.saturating_sub(label_width);
        let filled = (self.ratio() * bar_width as f64).round() as u16;

        for x in 0..bar_width {
            let color = if x < filled {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(area.x + x, area.y)].set_symbol(" ").set_style(Style::default().bg(color));
        }
        buf.set_string(
            area.x + bar_width,
            area.y,
            &label,
            Style::default().fg(colors.text_dim()),
        );
    }
}
