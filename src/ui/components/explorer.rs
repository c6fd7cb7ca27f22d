use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::menu::MenuManager;
use crate::ui::theme::Theme;

/// Sidebar of option labels next to a content pane.
pub struct Explorer<'a> {
    menus: &'a MenuManager,
    selected: usize,
    message: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> Explorer<'a> {
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

impl Widget for Explorer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(area);

        let sidebar = Block::bordered()
            .title(format!(" {} ", self.menus.title()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let sidebar_inner = sidebar.inner(columns[0]);
        sidebar.render(columns[0], buf);

        let items: Vec<Line> = self
            .menus
            .option_labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!(" > {label}"),
                        Style::default()
                            .fg(colors.accent())
                            .bg(colors.selection_bg())
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("   {label}"),
                        Style::default().fg(colors.fg()),
                    ))
                }
            })
            .collect();
        Paragraph::new(items).render(sidebar_inner, buf);

        let content = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let content_inner = content.inner(columns[1]);
        content.render(columns[1], buf);

        let highlighted = self
            .menus
            .options()
            .get(self.selected)
            .map(|o| o.description.as_str())
            .filter(|d| !d.is_empty());

        let mut lines = vec![
            Line::from(Span::styled(
                self.menus.description(),
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
        ];
        if let Some(description) = highlighted {
            lines.push(Line::from(Span::styled(
                description,
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(""));
        }
        if let Some(message) = self.message {
            for line in message.lines() {
                lines.push(Line::from(Span::styled(
                    line,
                    Style::default().fg(colors.accent()),
                )));
            }
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(content_inner, buf);
    }
}
