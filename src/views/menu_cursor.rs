use crossterm::event::{KeyCode, KeyEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorEvent {
    None,
    Select(usize),
    Back,
}

/// Highlighted row in a menu-driven screen plus the last result message.
#[derive(Clone, Debug, Default)]
pub struct MenuCursor {
    pub selected: usize,
    pub message: Option<String>,
}

impl MenuCursor {
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = len - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> CursorEvent {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.next(len),
            KeyCode::Enter if len > 0 => return CursorEvent::Select(self.selected),
            KeyCode::Esc => return CursorEvent::Back,
            _ => {}
        }
        CursorEvent::None
    }
}
