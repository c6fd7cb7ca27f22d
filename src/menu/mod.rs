pub mod catalog;
pub mod manager;

pub use manager::MenuManager;

use std::fmt;

use thiserror::Error;

use crate::state::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Navigate,
    Execute,
    Back,
    Exit,
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("no menu registered for state {0:?}")]
    NotRegistered(AppState),
    #[error("menu setup failed: {0}")]
    Init(String),
    #[error("menu cleanup failed: {0}")]
    Cleanup(String),
}

/// Outcome of selecting an option. Interpreted by the application state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuResult {
    pub action: MenuAction,
    pub next_state: Option<AppState>,
    /// Free-form data for the receiver, e.g. a module id.
    pub payload: Option<String>,
    pub message: Option<String>,
}

impl MenuResult {
    pub fn none() -> Self {
        Self::new(MenuAction::None, None)
    }

    pub fn new(action: MenuAction, next_state: Option<AppState>) -> Self {
        Self {
            action,
            next_state,
            payload: None,
            message: None,
        }
    }

    pub fn navigate(state: AppState) -> Self {
        Self::new(MenuAction::Navigate, Some(state))
    }

    pub fn execute(message: impl Into<String>) -> Self {
        Self::new(MenuAction::Execute, None).with_message(message)
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub type Handler = Box<dyn Fn() -> MenuResult + Send + Sync>;

/// An option either carries a static action/target pair or a handler whose
/// result is returned verbatim.
pub enum OptionBehavior {
    Static {
        action: MenuAction,
        target: Option<AppState>,
    },
    Handler(Handler),
}

impl fmt::Debug for OptionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionBehavior::Static { action, target } => f
                .debug_struct("Static")
                .field("action", action)
                .field("target", target)
                .finish(),
            OptionBehavior::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

#[derive(Debug)]
pub struct MenuOption {
    pub label: String,
    pub description: String,
    pub behavior: OptionBehavior,
}

impl MenuOption {
    pub fn action(&self) -> MenuAction {
        match &self.behavior {
            OptionBehavior::Static { action, .. } => *action,
            OptionBehavior::Handler(_) => MenuAction::Execute,
        }
    }

    pub fn target(&self) -> Option<AppState> {
        match &self.behavior {
            OptionBehavior::Static { target, .. } => *target,
            OptionBehavior::Handler(_) => None,
        }
    }

    pub fn select(&self) -> MenuResult {
        match &self.behavior {
            OptionBehavior::Handler(handler) => handler(),
            OptionBehavior::Static { action, target } => {
                MenuResult::new(*action, *target).with_message(format!("Selected: {}", self.label))
            }
        }
    }
}

/// A selectable surface. Implementors only describe their options; selection
/// dispatch is shared.
pub trait Menu: Send {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn options(&self) -> &[MenuOption];
    fn back_option_index(&self) -> Option<usize>;

    /// Out-of-range indices yield [`MenuAction::None`].
    fn handle_selection(&self, index: usize) -> MenuResult {
        match self.options().get(index) {
            Some(option) => option.select(),
            None => MenuResult::none(),
        }
    }

    fn initialize(&mut self) -> Result<(), MenuError> {
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), MenuError> {
        Ok(())
    }
}

/// Menu whose options are fixed at construction.
#[derive(Debug)]
pub struct StaticMenu {
    title: String,
    description: String,
    options: Vec<MenuOption>,
    back_index: Option<usize>,
}

impl StaticMenu {
    pub fn builder(title: &str, description: &str) -> MenuBuilder {
        MenuBuilder {
            menu: StaticMenu {
                title: title.to_string(),
                description: description.to_string(),
                options: Vec::new(),
                back_index: None,
            },
        }
    }
}

impl Menu for StaticMenu {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn options(&self) -> &[MenuOption] {
        &self.options
    }

    fn back_option_index(&self) -> Option<usize> {
        self.back_index
    }
}

pub struct MenuBuilder {
    menu: StaticMenu,
}

impl MenuBuilder {
    pub fn navigate(mut self, label: &str, description: &str, target: AppState) -> Self {
        self.menu.options.push(MenuOption {
            label: label.to_string(),
            description: description.to_string(),
            behavior: OptionBehavior::Static {
                action: MenuAction::Navigate,
                target: Some(target),
            },
        });
        self
    }

    pub fn execute<F>(mut self, label: &str, description: &str, handler: F) -> Self
    where
        F: Fn() -> MenuResult + Send + Sync + 'static,
    {
        self.menu.options.push(MenuOption {
            label: label.to_string(),
            description: description.to_string(),
            behavior: OptionBehavior::Handler(Box::new(handler)),
        });
        self
    }

    /// The back option. `None` as target means leaving the application.
    /// Adding a second back option moves the back index to it.
    pub fn back(mut self, label: &str, target: Option<AppState>) -> Self {
        self.menu.back_index = Some(self.menu.options.len());
        self.menu.options.push(MenuOption {
            label: label.to_string(),
            description: String::new(),
            behavior: OptionBehavior::Static {
                action: MenuAction::Back,
                target,
            },
        });
        self
    }

    pub fn build(self) -> StaticMenu {
        self.menu
    }
}
