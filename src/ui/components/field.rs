use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// One labelled text field. The cursor cell is drawn only while focused.
pub fn input_line<'a>(
    label: &'a str,
    input: &'a LineInput,
    focused: bool,
    theme: &Theme,
) -> Line<'a> {
    let colors = &theme.colors;
    let label_style = if focused {
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.fg())
    };
    let text_style = Style::default().fg(colors.fg());
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());

    let mut spans = vec![Span::styled(format!("  {label}: "), label_style)];

    if input.is_empty() && !focused {
        spans.push(Span::styled(
            input.placeholder(),
            Style::default().fg(colors.text_dim()),
        ));
        return Line::from(spans);
    }

    let (before, cursor, after) = input.render_parts();
    spans.push(Span::styled(before, text_style));
    if focused {
        let cursor_text = cursor.map_or_else(|| " ".to_string(), |ch| ch.to_string());
        spans.push(Span::styled(cursor_text, cursor_style));
    } else if let Some(ch) = cursor {
        spans.push(Span::styled(ch.to_string(), text_style));
    }
    spans.push(Span::styled(after, text_style));
    Line::from(spans)
}
