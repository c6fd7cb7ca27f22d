use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::components::field::input_line;
use crate::ui::theme::Theme;
use crate::views::{AccountForm, Focus};

const WARNING: &str = "Write this number down. It is the only way to sign in again.";

pub struct AccountFormPanel<'a> {
    form: &'a AccountForm,
    theme: &'a Theme,
}

impl<'a> AccountFormPanel<'a> {
    pub fn new(form: &'a AccountForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }

    fn info_lines(&self, number: &'a str) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        // Blink the banner: bright for six frames, dim for four.
        let bright = self.form.warning_frame % 10 < 6;
        let warning_style = if bright {
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim())
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Welcome, {}!", self.form.display_name()),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Your account number",
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(Span::styled(
                number,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(format!("! {WARNING} !"), warning_style)),
        ];
        if self.form.account.is_none() {
            lines.push(Line::from(Span::styled(
                "(not saved: no data store available)",
                Style::default().fg(colors.error()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to continue to your dashboard",
            Style::default().fg(colors.fg()),
        )));
        lines
    }
}

impl Widget for AccountFormPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Create Account ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.form.focus == Focus::DisplayInfo
            && let Some(number) = self.form.account_number.as_deref()
        {
            Paragraph::new(self.info_lines(number))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Tell us who you are. We will issue your account number.",
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
            input_line("Name", &self.form.name, self.form.focus == Focus::Name, self.theme),
            Line::from(""),
            input_line("Email", &self.form.email, self.form.focus == Focus::Email, self.theme),
            Line::from(""),
        ];
        if let Some(error) = &self.form.error {
            lines.push(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(colors.error()),
            )));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
