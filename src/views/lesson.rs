use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};

use crate::content::{Lesson, Module};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonTab {
    Lesson,
    Editor,
    Output,
}

impl LessonTab {
    pub const ALL: [LessonTab; 3] = [LessonTab::Lesson, LessonTab::Editor, LessonTab::Output];

    pub fn title(self) -> &'static str {
        match self {
            LessonTab::Lesson => "Lesson",
            LessonTab::Editor => "Editor",
            LessonTab::Output => "Output",
        }
    }

    fn index(self) -> usize {
        match self {
            LessonTab::Lesson => 0,
            LessonTab::Editor => 1,
            LessonTab::Output => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LessonEvent {
    None,
    /// Mark the current lesson complete.
    Complete {
        module_id: &'static str,
        lesson_id: &'static str,
    },
}

#[derive(Clone, Debug)]
pub struct LessonView {
    pub module: &'static Module,
    pub lesson_index: usize,
    pub tab: LessonTab,
    pub show_hints: bool,
    pub output: Vec<String>,
    /// Lesson ids of this module the learner has finished.
    pub completed: HashSet<String>,
    pub status: Option<String>,
    pub error: Option<String>,
    pub width: u16,
    pub height: u16,
}

impl LessonView {
    pub fn new(module: &'static Module, width: u16, height: u16) -> Self {
        Self {
            module,
            lesson_index: 0,
            tab: LessonTab::Lesson,
            show_hints: false,
            output: Vec::new(),
            completed: HashSet::new(),
            status: None,
            error: None,
            width,
            height,
        }
    }

    /// Same module, lesson, tab and completion state at a new size.
    pub fn resized(&self, width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    pub fn lesson(&self) -> Option<&'static Lesson> {
        self.module.lessons.get(self.lesson_index)
    }

    pub fn is_completed(&self, lesson: &Lesson) -> bool {
        self.completed.contains(lesson.id)
    }

    pub fn module_complete(&self) -> bool {
        self.module
            .lessons
            .iter()
            .all(|lesson| self.completed.contains(lesson.id))
    }

    /// Open the first lesson not yet completed.
    pub fn resume(&mut self) {
        if let Some(idx) = self
            .module
            .lessons
            .iter()
            .position(|lesson| !self.completed.contains(lesson.id))
        {
            self.lesson_index = idx;
        }
    }

    fn go_to(&mut self, index: usize) {
        if index < self.module.lesson_count() && index != self.lesson_index {
            self.lesson_index = index;
            self.output.clear();
            self.status = None;
            self.error = None;
            self.show_hints = false;
        }
    }

    /// Echo the starter code into the Output tab. Nothing is executed.
    fn run(&mut self) {
        let Some(lesson) = self.lesson() else {
            return;
        };
        self.output.clear();
        for line in lesson.starter_code.lines() {
            self.output.push(format!("PS> {line}"));
        }
        self.output
            .push("(practice mode: commands are shown, not executed)".to_string());
        self.tab = LessonTab::Output;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LessonEvent {
        match key.code {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('n') => self.go_to(self.lesson_index + 1),
            KeyCode::Char('p') => {
                if self.lesson_index > 0 {
                    self.go_to(self.lesson_index - 1);
                }
            }
            KeyCode::Char('?') => self.show_hints = !self.show_hints,
            KeyCode::Char('r') => self.run(),
            KeyCode::Char('c') => {
                if let Some(lesson) = self.lesson() {
                    return LessonEvent::Complete {
                        module_id: self.module.id,
                        lesson_id: lesson.id,
                    };
                }
            }
            _ => {}
        }
        LessonEvent::None
    }
}
