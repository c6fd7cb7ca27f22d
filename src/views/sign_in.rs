use crossterm::event::KeyEvent;

use crate::store::account_number;
use crate::ui::line_input::{InputResult, LineInput};

/// 16 digits plus three separating spaces.
pub const INPUT_LIMIT: usize = 19;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInEvent {
    None,
    /// A well-formed number, as bare digits.
    Submit(String),
    Cancel,
}

#[derive(Debug)]
pub struct SignInView {
    pub input: LineInput,
    pub error: Option<String>,
}

impl SignInView {
    pub fn new() -> Self {
        Self {
            input: LineInput::new("")
                .with_limit(INPUT_LIMIT)
                .with_placeholder("1234 5678 9012 3456"),
            error: None,
        }
    }

    /// Format problems are reported here and never reach the store.
    pub fn handle_key(&mut self, key: KeyEvent) -> SignInEvent {
        match self.input.handle(key) {
            InputResult::Cancel => SignInEvent::Cancel,
            InputResult::Submit => match account_number::validate(self.input.value()) {
                Ok(digits) => {
                    self.error = None;
                    SignInEvent::Submit(digits)
                }
                Err(err) => {
                    self.error = Some(err.to_string());
                    SignInEvent::None
                }
            },
            InputResult::Continue => SignInEvent::None,
        }
    }
}

impl Default for SignInView {
    fn default() -> Self {
        Self::new()
    }
}
