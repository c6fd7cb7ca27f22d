use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::components::field::input_line;
use crate::ui::theme::Theme;
use crate::views::SignInView;

pub struct SignInPanel<'a> {
    view: &'a SignInView,
    theme: &'a Theme,
}

impl<'a> SignInPanel<'a> {
    pub fn new(view: &'a SignInView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl Widget for SignInPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Sign In ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Enter your 16-digit account number. Spaces are optional.",
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
            input_line("Account number", &self.view.input, true, self.theme),
            Line::from(""),
        ];
        if let Some(error) = &self.view.error {
            lines.push(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(colors.error()),
            )));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
