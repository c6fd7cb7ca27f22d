use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::menu::MenuManager;
use crate::ui::theme::Theme;

/// The active menu as a centered list (auth screen).
pub struct MenuPanel<'a> {
    menus: &'a MenuManager,
    selected: usize,
    message: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> MenuPanel<'a> {
    pub fn new(
        menus: &'a MenuManager,
        selected: usize,
        message: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            menus,
            selected,
            message,
            theme,
        }
    }
}

impl Widget for MenuPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.menus.title(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.menus.description(),
                Style::default().fg(colors.text_dim()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let options = self.menus.options();
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(options.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[1]);

        for (i, option) in options.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(Span::styled(format!(" {indicator} {}", option.label), label_style)),
                Line::from(Span::styled(
                    format!("     {}", option.description),
                    Style::default().fg(colors.text_dim()),
                )),
            ];
            if let Some(row) = menu_layout.get(i) {
                Paragraph::new(lines).render(*row, buf);
            }
        }

        if let Some(message) = self.message {
            Paragraph::new(Span::styled(message, Style::default().fg(colors.warning())))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(layout[2], buf);
        }
    }
}
