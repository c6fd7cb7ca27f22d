use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

const BANNER: [&str; 5] = [
    r" ____                        _   _      _ _ ",
    r"|  _ \ _____      _____ _ __| | | | ___| | |",
    r"| |_) / _ \ \ /\ / / _ \ '__| |_| |/ _ \ | |",
    r"|  __/ (_) \ V  V /  __/ |  |  _  |  __/ | |",
    r"|_|   \___/ \_/\_/ \___|_|  |_| |_|\___|_|_|",
];

/// Title banner with a highlight sweeping across it.
pub struct Intro<'a> {
    frame: u64,
    theme: &'a Theme,
}

impl<'a> Intro<'a> {
    pub fn new(frame: u64, theme: &'a Theme) -> Self {
        Self { frame, theme }
    }
}

impl Widget for Intro<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let width = BANNER[0].chars().count();
        let sweep = (self.frame as usize) % (width + 8);

        let mut lines: Vec<Line> = Vec::new();
        let top_pad = area.height.saturating_sub(BANNER.len() as u16 + 4) / 2;
        for _ in 0..top_pad {
            lines.push(Line::from(""));
        }

        for row in BANNER {
            let spans: Vec<Span> = row
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    let lit = i + 4 >= sweep && i <= sweep;
                    let style = if lit {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    Span::styled(ch.to_string(), style)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Learn PowerShell the hard way, one lesson at a time",
            Style::default().fg(colors.text_dim()),
        )));
        lines.push(Line::from(Span::styled(
            "Press Enter to begin",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
