use crossterm::event::{KeyCode, KeyEvent};

use crate::store::schema::Account;
use crate::ui::line_input::{InputResult, LineInput};

pub const NAME_LIMIT: usize = 50;
pub const EMAIL_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Name,
    Email,
    /// Shows the generated number. Not reachable by cycling.
    DisplayInfo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormEvent {
    None,
    /// Enter on the email field with both fields filled in.
    Submit,
    /// Enter on the info panel.
    Continue,
    Cancel,
}

#[derive(Debug)]
pub struct AccountForm {
    pub name: LineInput,
    pub email: LineInput,
    pub focus: Focus,
    pub account_number: Option<String>,
    /// The persisted account, absent when running without a store.
    pub account: Option<Account>,
    pub error: Option<String>,
    pub warning_frame: u64,
}

impl AccountForm {
    pub fn new() -> Self {
        Self {
            name: LineInput::new("")
                .with_limit(NAME_LIMIT)
                .with_placeholder("Your name"),
            email: LineInput::new("")
                .with_limit(EMAIL_LIMIT)
                .with_placeholder("you@example.com"),
            focus: Focus::Name,
            account_number: None,
            account: None,
            error: None,
            warning_frame: 0,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.value().trim()
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Name => Focus::Email,
            Focus::Email => Focus::Name,
            Focus::DisplayInfo => Focus::DisplayInfo,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if self.focus == Focus::DisplayInfo {
            return match key.code {
                KeyCode::Enter => FormEvent::Continue,
                _ => FormEvent::None,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.cycle_focus();
                return FormEvent::None;
            }
            _ => {}
        }

        let input = match self.focus {
            Focus::Name => &mut self.name,
            _ => &mut self.email,
        };
        match input.handle(key) {
            InputResult::Cancel => FormEvent::Cancel,
            InputResult::Submit if self.focus == Focus::Name => {
                self.focus = Focus::Email;
                FormEvent::None
            }
            InputResult::Submit => {
                if self.display_name().is_empty() || self.email.value().trim().is_empty() {
                    self.error = Some("Name and email are both required".to_string());
                    FormEvent::None
                } else {
                    self.error = None;
                    FormEvent::Submit
                }
            }
            InputResult::Continue => FormEvent::None,
        }
    }

    /// Record a successful creation and move to the info panel.
    pub fn complete(&mut self, account_number: String, account: Option<Account>) {
        self.account_number = Some(account_number);
        self.account = account;
        self.error = None;
        self.focus = Focus::DisplayInfo;
        self.warning_frame = 0;
    }

    pub fn tick(&mut self) {
        self.warning_frame = self.warning_frame.wrapping_add(1);
    }
}

impl Default for AccountForm {
    fn default() -> Self {
        Self::new()
    }
}
