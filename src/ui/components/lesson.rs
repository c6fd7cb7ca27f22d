use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Tabs, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::views::{LessonTab, LessonView};

pub struct LessonPanel<'a> {
    view: &'a LessonView,
    theme: &'a Theme,
}

impl<'a> LessonPanel<'a> {
    pub fn new(view: &'a LessonView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn body(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let view = self.view;
        let Some(lesson) = view.lesson() else {
            return vec![Line::from("This module has no lessons yet.")];
        };

        match view.tab {
            LessonTab::Lesson => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        lesson.title,
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("about {} min", lesson.minutes),
                        Style::default().fg(colors.text_dim()),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(lesson.summary, Style::default().fg(colors.fg()))),
                ];
                if view.show_hints {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "Hints",
                        Style::default().fg(colors.warning()),
                    )));
                    for hint in lesson.hints {
                        lines.push(Line::from(Span::styled(
                            format!("  • {hint}"),
                            Style::default().fg(colors.fg()),
                        )));
                    }
                }
                lines
            }
            LessonTab::Editor => lesson
                .starter_code
                .lines()
                .enumerate()
                .map(|(i, line)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>3} ", i + 1),
                            Style::default().fg(colors.text_dim()),
                        ),
                        Span::styled(line, Style::default().fg(colors.fg())),
                    ])
                })
                .collect(),
            LessonTab::Output if view.output.is_empty() => vec![Line::from(Span::styled(
                "Nothing run yet. Press r to run the exercise.",
                Style::default().fg(colors.text_dim()),
            ))],
            LessonTab::Output => view
                .output
                .iter()
                .map(|line| Line::from(Span::styled(line.as_str(), Style::default().fg(colors.fg()))))
                .collect(),
        }
    }
}

impl Widget for LessonPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let selected_tab = LessonTab::ALL
            .iter()
            .position(|t| *t == view.tab)
            .unwrap_or(0);
        Tabs::new(LessonTab::ALL.iter().map(|t| t.title()))
            .select(selected_tab)
            .style(Style::default().fg(colors.text_dim()))
            .highlight_style(
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .render(layout[0], buf);

        let lesson_count = view.module.lesson_count();
        let done_mark = match view.lesson() {
            Some(lesson) if view.is_completed(lesson) => " ✓",
            _ => "",
        };
        let block = Block::bordered()
            .title(format!(
                " {} · {}/{}{} ",
                view.module.title,
                view.lesson_index + 1,
                lesson_count,
                done_mark
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(layout[1]);
        block.render(layout[1], buf);
        Paragraph::new(self.body())
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        let status = match (&view.error, &view.status) {
            (Some(error), _) => Span::styled(error.as_str(), Style::default().fg(colors.error())),
            (None, Some(status)) => {
                Span::styled(status.as_str(), Style::default().fg(colors.success()))
            }
            (None, None) => Span::raw(""),
        };
        Paragraph::new(Line::from(status)).render(layout[2], buf);
    }
}
