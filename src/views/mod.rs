//! Per-screen interaction state. Each view is owned by exactly one
//! [`Screen`] variant, so a view can never outlive the state it belongs to.

pub mod account_form;
pub mod dashboard;
pub mod lesson;
pub mod menu_cursor;
pub mod sign_in;

pub use account_form::{AccountForm, Focus, FormEvent};
pub use dashboard::{DashboardEvent, DashboardView};
pub use lesson::{LessonEvent, LessonTab, LessonView};
pub use menu_cursor::{CursorEvent, MenuCursor};
pub use sign_in::{SignInEvent, SignInView};

use crate::state::AppState;

/// The active screen together with its view state.
#[derive(Debug)]
pub enum Screen {
    Intro,
    AccountCreation(AccountForm),
    SignIn(SignInView),
    AuthMenu(MenuCursor),
    ModuleExplorer(MenuCursor),
    Dashboard(DashboardView),
    Lesson(LessonView),
}

impl Screen {
    /// Legacy states have no variant, so they can never be the current state.
    pub fn state(&self) -> AppState {
        match self {
            Screen::Intro => AppState::Intro,
            Screen::AccountCreation(_) => AppState::AccountCreation,
            Screen::SignIn(_) => AppState::SignIn,
            Screen::AuthMenu(_) => AppState::AuthMenu,
            Screen::ModuleExplorer(_) => AppState::ModuleExplorer,
            Screen::Dashboard(_) => AppState::Dashboard,
            Screen::Lesson(_) => AppState::Lesson,
        }
    }
}
