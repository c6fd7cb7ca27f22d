use std::collections::HashMap;

use tracing::{debug, warn};

use crate::menu::{Menu, MenuError, MenuOption, MenuResult, catalog};
use crate::state::AppState;

/// Owns every menu surface and routes selections to the active one.
pub struct MenuManager {
    menus: HashMap<AppState, Box<dyn Menu>>,
    current: Option<AppState>,
}

impl MenuManager {
    /// Registers the built-in surfaces (auth, main, learn, studio, settings).
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.register(AppState::AuthMenu, Box::new(catalog::auth_menu()));
        manager.register(AppState::MainMenu, Box::new(catalog::main_menu()));
        manager.register(AppState::LearnMenu, Box::new(catalog::learn_menu()));
        manager.register(AppState::Studio, Box::new(catalog::studio_menu()));
        manager.register(AppState::Settings, Box::new(catalog::settings_menu()));
        manager
    }

    pub fn empty() -> Self {
        Self {
            menus: HashMap::new(),
            current: None,
        }
    }

    /// Initialization failures are logged; the menu stays registered.
    pub fn register(&mut self, state: AppState, mut menu: Box<dyn Menu>) {
        if let Err(err) = menu.initialize() {
            warn!(state = state.as_str(), "error initializing menu: {err}");
        }
        self.menus.insert(state, menu);
    }

    pub fn is_registered(&self, state: AppState) -> bool {
        self.menus.contains_key(&state)
    }

    /// Switch the active menu, cleaning up the previous one first.
    /// An unregistered state leaves the active menu unchanged.
    pub fn set_current_menu(&mut self, state: AppState) -> Result<(), MenuError> {
        if !self.menus.contains_key(&state) {
            return Err(MenuError::NotRegistered(state));
        }

        if let Some(previous) = self.current.and_then(|s| self.menus.get_mut(&s))
            && let Err(err) = previous.cleanup()
        {
            warn!("error cleaning up previous menu: {err}");
        }

        debug!(state = state.as_str(), "active menu changed");
        self.current = Some(state);
        Ok(())
    }

    pub fn current_state(&self) -> Option<AppState> {
        self.current
    }

    fn current_menu(&self) -> Option<&dyn Menu> {
        self.current
            .and_then(|s| self.menus.get(&s))
            .map(|m| &**m)
    }

    pub fn handle_selection(&self, index: usize) -> MenuResult {
        match self.current_menu() {
            Some(menu) => menu.handle_selection(index),
            None => MenuResult::none(),
        }
    }

    pub fn title(&self) -> &str {
        self.current_menu().map_or("", |m| m.title())
    }

    pub fn description(&self) -> &str {
        self.current_menu().map_or("", |m| m.description())
    }

    pub fn options(&self) -> &[MenuOption] {
        self.current_menu()
            .map(|m| m.options())
            .unwrap_or_default()
    }

    pub fn option_labels(&self) -> Vec<&str> {
        self.options().iter().map(|o| o.label.as_str()).collect()
    }

    pub fn back_option_index(&self) -> Option<usize> {
        self.current_menu().and_then(|m| m.back_option_index())
    }

    pub fn cleanup_all(&mut self) {
        for (state, menu) in self.menus.iter_mut() {
            if let Err(err) = menu.cleanup() {
                warn!(state = state.as_str(), "error cleaning up menu: {err}");
            }
        }
    }
}

impl Default for MenuManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuAction, StaticMenu};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts cleanups and can be told to fail setup.
    struct TrackedMenu {
        inner: StaticMenu,
        fail_init: bool,
        cleanups: Arc<AtomicUsize>,
    }

    impl TrackedMenu {
        fn new(fail_init: bool, cleanups: Arc<AtomicUsize>) -> Self {
            Self {
                inner: StaticMenu::builder("TrackedMenu", "tracked menu")
                    .navigate("Go", "", AppState::Dashboard)
                    .build(),
                fail_init,
                cleanups,
            }
        }
    }

    impl Menu for TrackedMenu {
        fn title(&self) -> &str {
            self.inner.title()
        }
        fn description(&self) -> &str {
            self.inner.description()
        }
        fn options(&self) -> &[MenuOption] {
            self.inner.options()
        }
        fn back_option_index(&self) -> Option<usize> {
            self.inner.back_option_index()
        }
        fn initialize(&mut self) -> Result<(), MenuError> {
            if self.fail_init {
                Err(MenuError::Init("setup failed".into()))
            } else {
                Ok(())
            }
        }
        fn cleanup(&mut self) -> Result<(), MenuError> {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn no_active_menu_yields_noop() {
        let manager = MenuManager::new();
        assert_eq!(manager.current_state(), None);
        assert_eq!(manager.handle_selection(0), MenuResult::none());
        assert!(manager.option_labels().is_empty());
        assert_eq!(manager.title(), "");
        assert_eq!(manager.back_option_index(), None);
    }

    #[test]
    fn unregistered_state_is_an_error_and_keeps_current() {
        let mut manager = MenuManager::new();
        manager.set_current_menu(AppState::AuthMenu).unwrap();
        let err = manager.set_current_menu(AppState::Dashboard).unwrap_err();
        assert!(matches!(err, MenuError::NotRegistered(AppState::Dashboard)));
        assert_eq!(manager.current_state(), Some(AppState::AuthMenu));
    }

    #[test]
    fn switching_cleans_up_previous_menu() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut manager = MenuManager::new();
        manager.register(AppState::Studio, Box::new(TrackedMenu::new(false, cleanups.clone())));

        manager.set_current_menu(AppState::Studio).unwrap();
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);
        manager.set_current_menu(AppState::AuthMenu).unwrap();
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_init_keeps_menu_registered() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut manager = MenuManager::empty();
        manager.register(AppState::Studio, Box::new(TrackedMenu::new(true, cleanups)));
        assert!(manager.is_registered(AppState::Studio));
        manager.set_current_menu(AppState::Studio).unwrap();
        assert_eq!(manager.handle_selection(0).action, MenuAction::Navigate);
    }

    #[test]
    fn selection_routes_to_active_menu() {
        let mut manager = MenuManager::new();
        manager.set_current_menu(AppState::AuthMenu).unwrap();
        assert_eq!(manager.option_labels(), vec!["Sign Up", "Login", "Exit"]);
        let result = manager.handle_selection(0);
        assert_eq!(result.next_state, Some(AppState::AccountCreation));
        assert_eq!(manager.handle_selection(3), MenuResult::none());
    }

    #[test]
    fn metadata_comes_from_active_menu() {
        let mut manager = MenuManager::new();
        manager.set_current_menu(AppState::MainMenu).unwrap();
        assert_eq!(manager.title(), "PowerHell Main Menu");
        let back = manager.back_option_index().unwrap();
        assert_eq!(manager.option_labels()[back], "Exit");
    }
}
