pub mod components;
pub mod layout;
pub mod line_input;
pub mod theme;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::App;
use crate::state::AppState;
use crate::views::Screen;
use components::account_form::AccountFormPanel;
use components::dashboard::Dashboard;
use components::explorer::Explorer;
use components::help::HelpOverlay;
use components::intro::Intro;
use components::lesson::LessonPanel;
use components::menu_panel::MenuPanel;
use components::sign_in::SignInPanel;
use layout::{AppLayout, centered_rect, pack_hint_lines};
use theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    render_app(area, frame.buffer_mut(), app, theme);
}

/// Draw the whole application into `buf`. Separate from [`render`] so it
/// can be driven against a plain buffer.
pub fn render_app(area: Rect, buf: &mut Buffer, app: &App, theme: &Theme) {
    let colors = &theme.colors;
    Block::default()
        .style(Style::default().bg(colors.bg()))
        .render(area, buf);

    let hints = footer_hints(app);
    let hint_lines = pack_hint_lines(hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    render_header(layout.header, buf, app, theme);

    match &app.screen {
        Screen::Intro => Intro::new(app.frame, theme).render(layout.main, buf),
        Screen::AuthMenu(cursor) => {
            let panel_area = centered_rect(50, 80, layout.main);
            MenuPanel::new(&app.menus, cursor.selected, cursor.message.as_deref(), theme)
                .render(panel_area, buf);
        }
        Screen::AccountCreation(form) => {
            AccountFormPanel::new(form, theme).render(centered_rect(60, 60, layout.main), buf)
        }
        Screen::SignIn(view) => {
            SignInPanel::new(view, theme).render(centered_rect(60, 40, layout.main), buf)
        }
        Screen::ModuleExplorer(cursor) => {
            Explorer::new(&app.menus, cursor.selected, cursor.message.as_deref(), theme)
                .render(layout.main, buf)
        }
        Screen::Dashboard(view) => Dashboard::new(view, theme).render(layout.main, buf),
        Screen::Lesson(view) => LessonPanel::new(view, theme).render(layout.main, buf),
    }

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
        .collect();
    Paragraph::new(footer).render(layout.footer, buf);

    if app.show_help {
        HelpOverlay::new(app.state(), theme).render(centered_rect(50, 50, area), buf);
    }
}

fn render_header(area: Rect, buf: &mut Buffer, app: &App, theme: &Theme) {
    let colors = &theme.colors;
    let signed_in = match &app.account {
        Some(account) => format!(" {} ({}) ", account.name, account.account_number),
        None if app.state() == AppState::Dashboard || app.state() == AppState::Lesson => {
            format!(" {} ", app.user_name)
        }
        None => String::new(),
    };
    let storage = if app.store.is_some() { "" } else { " [no store]" };

    Paragraph::new(Line::from(vec![
        Span::styled(
            " PowerHell ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            signed_in,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
        Span::styled(
            storage,
            Style::default().fg(colors.warning()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
    .render(area, buf);
}

fn footer_hints(app: &App) -> &'static [&'static str] {
    match &app.screen {
        Screen::Intro => &["[enter] Start", "[h] Help", "[q] Quit"],
        Screen::AuthMenu(_) => &["[up/down] Move", "[enter] Select", "[h] Help", "[q] Quit"],
        Screen::AccountCreation(form) if form.account_number.is_some() => {
            &["[enter] Continue", "[q] Quit"]
        }
        Screen::AccountCreation(_) => &["[tab] Next field", "[enter] Confirm", "[esc] Back"],
        Screen::SignIn(_) => &["[enter] Sign in", "[esc] Back", "[ctrl+c] Quit"],
        Screen::ModuleExplorer(_) => &["[up/down] Move", "[enter] Select", "[esc] Back", "[q] Quit"],
        Screen::Dashboard(_) => &["[arrows] Move", "[enter] Open", "[m] Menu", "[h] Help", "[q] Quit"],
        Screen::Lesson(_) => &[
            "[tab] Switch tab",
            "[n/p] Next/prev",
            "[?] Hints",
            "[r] Run",
            "[c] Complete",
            "[h] Help",
            "[q] Dashboard",
        ],
    }
}
