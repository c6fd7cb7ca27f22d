use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::state::AppState;
use crate::ui::theme::Theme;

/// Key reference for the current screen, drawn over it.
pub struct HelpOverlay<'a> {
    state: AppState,
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(state: AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn bindings(state: AppState) -> &'static [(&'static str, &'static str)] {
        match state {
            AppState::Intro => &[("enter", "Start"), ("h", "Toggle help"), ("q", "Quit")],
            AppState::AuthMenu => &[
                ("up/k, down/j", "Move"),
                ("enter", "Select"),
                ("h", "Toggle help"),
                ("q", "Quit"),
            ],
            AppState::Dashboard => &[
                ("arrows", "Choose a module"),
                ("enter", "Open module"),
                ("m", "Main menu"),
                ("h", "Help"),
                ("q", "Quit"),
            ],
            AppState::Lesson => &[
                ("tab/shift+tab", "Switch tab"),
                ("n / p", "Next / previous lesson"),
                ("?", "Show hints"),
                ("r", "Run exercise"),
                ("c", "Mark lesson complete"),
                ("q", "Back to dashboard"),
            ],
            _ => &[("esc", "Back"), ("q", "Quit")],
        }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Help ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];
        for (keys, action) in Self::bindings(self.state) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {keys:>14}  "),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*action, Style::default().fg(colors.fg())),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  esc closes this help",
            Style::default().fg(colors.text_dim()),
        )));
        Paragraph::new(lines).render(inner, buf);
    }
}
