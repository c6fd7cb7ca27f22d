use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::content::{MODULES, Module};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;
use crate::views::DashboardView;

const CARD_HEIGHT: u16 = 6;

/// Stats strip above a grid of module cards.
pub struct Dashboard<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn render_stats(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = &self.view.stats;
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let label = Style::default().fg(colors.text_dim());

        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Welcome back, ", label),
                Span::styled(self.view.user_name.as_str(), value),
            ]),
            Line::from(vec![
                Span::styled("  Lessons ", label),
                Span::styled(stats.lessons_completed.to_string(), value),
                Span::styled("   Time ", label),
                Span::styled(format!("{}m", stats.total_time_seconds / 60), value),
                Span::styled("   Achievements ", label),
                Span::styled(stats.achievement_count.to_string(), value),
                Span::styled("   Active days (7d) ", label),
                Span::styled(stats.current_streak.to_string(), value),
            ]),
        ];
        if let Some(notice) = &self.view.notice {
            lines.push(Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(colors.warning()),
            )));
        }
        Paragraph::new(lines).render(area, buf);
    }

    fn render_card(&self, index: usize, module: &Module, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let selected = self.view.selected == Some(index);

        let block = Block::bordered()
            .title(format!(" {} {} ", module.icon, module.title))
            .border_style(Style::default().fg(if selected {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(if selected {
                colors.selection_bg()
            } else {
                colors.bg()
            }));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let lines = vec![
            Line::from(Span::styled(
                module.description,
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!(
                    "{} · {} · {} min",
                    module.category,
                    module.difficulty.as_str(),
                    module.total_minutes()
                ),
                Style::default().fg(colors.text_dim()),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);

        let bar_row = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        let done = self.view.completed.get(index).copied().unwrap_or(0);
        ProgressBar::new(done, module.lesson_count(), self.theme).render(bar_row, buf);
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.render_stats(layout[0], buf);

        let columns = self.view.columns.max(1);
        let grid = layout[1];
        let card_width = grid.width / columns as u16;
        let visible_rows = (grid.height / CARD_HEIGHT).max(1) as usize;

        // Scroll so the selected row stays visible.
        let selected_row = self.view.selected.unwrap_or(0) / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        for (index, module) in MODULES.iter().enumerate() {
            let row = index / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = (index % columns) as u16;
            let y = grid.y + ((row - first_row) as u16) * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(grid.y + grid.height - y);
            let card = Rect::new(grid.x + col * card_width, y, card_width, height);
            self.render_card(index, module, card, buf);
        }
    }
}
