use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};

use crate::content::{MODULES, Module};
use crate::store::schema::{AccountStats, Progress};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    None,
    /// Open the module at this catalog index.
    Open(usize),
    MainMenu,
}

/// Grid column count for a terminal width.
pub fn columns_for_width(width: u16) -> usize {
    if width >= 120 {
        3
    } else if width >= 80 {
        2
    } else {
        1
    }
}

/// Module grid for the signed-in learner.
#[derive(Clone, Debug)]
pub struct DashboardView {
    pub user_name: String,
    pub selected: Option<usize>,
    pub columns: usize,
    pub width: u16,
    pub height: u16,
    pub stats: AccountStats,
    /// Completed lessons per module, indexed like [`MODULES`].
    pub completed: Vec<usize>,
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn new(user_name: &str, width: u16, height: u16) -> Self {
        Self {
            user_name: user_name.to_string(),
            selected: if MODULES.is_empty() { None } else { Some(0) },
            columns: columns_for_width(width),
            width,
            height,
            stats: AccountStats::default(),
            completed: vec![0; MODULES.len()],
            notice: None,
        }
    }

    /// Keep a previous selection if it still points at a module.
    pub fn with_selection(mut self, selected: Option<usize>) -> Self {
        if let Some(idx) = selected
            && idx < MODULES.len()
        {
            self.selected = Some(idx);
        }
        self
    }

    pub fn with_stats(mut self, stats: AccountStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_progress(mut self, rows: &[Progress]) -> Self {
        self.completed = MODULES
            .iter()
            .map(|module| {
                let done: HashSet<&str> = rows
                    .iter()
                    .filter(|p| p.module_id == module.id)
                    .map(|p| p.lesson_id.as_str())
                    .collect();
                module.lessons.iter().filter(|l| done.contains(l.id)).count()
            })
            .collect();
        self
    }

    pub fn selected_module(&self) -> Option<&'static Module> {
        self.selected.and_then(|idx| MODULES.get(idx))
    }

    pub fn completion_ratio(&self, index: usize) -> f64 {
        match (MODULES.get(index), self.completed.get(index)) {
            (Some(module), Some(&done)) if module.lesson_count() > 0 => {
                done as f64 / module.lesson_count() as f64
            }
            _ => 0.0,
        }
    }

    fn move_by(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let target = current as isize + delta;
        if target >= 0 && (target as usize) < MODULES.len() {
            self.selected = Some(target as usize);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DashboardEvent {
        let cols = self.columns.max(1) as isize;
        match key.code {
            KeyCode::Left => self.move_by(-1),
            KeyCode::Right => self.move_by(1),
            KeyCode::Up => self.move_by(-cols),
            KeyCode::Down => self.move_by(cols),
            KeyCode::Char('m') => return DashboardEvent::MainMenu,
            KeyCode::Enter => {
                if let Some(idx) = self.selected {
                    return DashboardEvent::Open(idx);
                }
            }
            _ => {}
        }
        DashboardEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn columns_follow_width() {
        assert_eq!(columns_for_width(140), 3);
        assert_eq!(columns_for_width(120), 3);
        assert_eq!(columns_for_width(100), 2);
        assert_eq!(columns_for_width(79), 1);
    }

    #[test]
    fn vertical_moves_jump_a_row() {
        let mut view = DashboardView::new("Ann", 130, 40);
        view.handle_key(key(KeyCode::Down));
        assert_eq!(view.selected, Some(3));
        view.handle_key(key(KeyCode::Down));
        assert_eq!(view.selected, Some(3), "no module below the last row");
        view.handle_key(key(KeyCode::Up));
        assert_eq!(view.selected, Some(0));
        view.handle_key(key(KeyCode::Up));
        assert_eq!(view.selected, Some(0));
    }

    #[test]
    fn enter_opens_selected_module() {
        let mut view = DashboardView::new("Ann", 80, 24);
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.handle_key(key(KeyCode::Enter)), DashboardEvent::Open(1));
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let mut view = DashboardView::new("Ann", 80, 24);
        view.selected = None;
        assert_eq!(view.handle_key(key(KeyCode::Enter)), DashboardEvent::None);
    }

    #[test]
    fn progress_counts_only_catalog_lessons() {
        let row = |module: &str, lesson: &str| Progress {
            account_id: 1,
            module_id: module.to_string(),
            lesson_id: lesson.to_string(),
            completed_at: Utc::now(),
        };
        let rows = vec![
            row("basics", "basics-1"),
            row("basics", "basics-2"),
            row("basics", "retired-lesson"),
        ];
        let view = DashboardView::new("Ann", 80, 24).with_progress(&rows);
        assert_eq!(view.completed[0], 2);
        let expected = 2.0 / MODULES[0].lesson_count() as f64;
        assert!((view.completion_ratio(0) - expected).abs() < f64::EPSILON);
        assert_eq!(view.completion_ratio(1), 0.0);
    }

    #[test]
    fn stale_selection_is_ignored() {
        let view = DashboardView::new("Ann", 80, 24).with_selection(Some(99));
        assert_eq!(view.selected, Some(0));
    }
}
