use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error, info, warn};

use crate::content::{MODULES, Module, find_module, module_index};
use crate::event::AppEvent;
use crate::menu::catalog::{PAYLOAD_ACCOUNT_DETAILS, PAYLOAD_PROGRESS_SUMMARY};
use crate::menu::{MenuAction, MenuManager, MenuResult};
use crate::state::AppState;
use crate::store::schema::{Account, AccountId, SessionId};
use crate::store::{AccountStore, StoreError, account_number};
use crate::views::{
    AccountForm, CursorEvent, DashboardEvent, DashboardView, Focus, FormEvent, LessonEvent,
    LessonView, MenuCursor, Screen, SignInEvent, SignInView,
};

const GUEST_NAME: &str = "Guest";

pub struct App {
    pub screen: Screen,
    /// Last state left, used by the explorer's back key.
    pub previous: Option<AppState>,
    pub menus: MenuManager,
    pub store: Option<AccountStore>,
    pub account: Option<Account>,
    pub session_id: Option<SessionId>,
    pub user_name: String,
    pub show_help: bool,
    pub should_quit: bool,
    pub width: u16,
    pub height: u16,
    pub frame: u64,
    rng: SmallRng,
}

impl App {
    /// `store` is `None` when persistence is unavailable; the app then runs
    /// without sign-in or progress tracking.
    pub fn new(store: Option<AccountStore>, width: u16, height: u16) -> Self {
        if store.is_none() {
            info!("running without a data store: accounts and progress are not saved");
        }
        Self {
            screen: Screen::Intro,
            previous: None,
            menus: MenuManager::new(),
            store,
            account: None,
            session_id: None,
            user_name: GUEST_NAME.to_string(),
            show_help: false,
            should_quit: false,
            width,
            height,
            frame: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn state(&self) -> AppState {
        self.screen.state()
    }

    /// Whether the animation timer should keep firing.
    pub fn wants_tick(&self) -> bool {
        match &self.screen {
            Screen::Intro => true,
            Screen::AccountCreation(form) => form.focus == Focus::DisplayInfo,
            _ => false,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(width, height) => self.handle_resize(width, height),
            AppEvent::Tick => self.handle_tick(),
        }
    }

    pub fn handle_tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if let Screen::AccountCreation(form) = &mut self.screen {
            form.tick();
        }
    }

    /// Rebuild the size-dependent views in place.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        match &self.screen {
            Screen::Dashboard(view) => {
                let selected = view.selected;
                let notice = view.notice.clone();
                let mut rebuilt = self.build_dashboard().with_selection(selected);
                rebuilt.notice = notice;
                self.screen = Screen::Dashboard(rebuilt);
            }
            Screen::Lesson(view) => {
                self.screen = Screen::Lesson(view.resized(width, height));
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        let plain_q =
            key.code == KeyCode::Char('q') && !key.modifiers.contains(KeyModifiers::CONTROL);
        let state = self.state();
        let editing = matches!(
            &self.screen,
            Screen::AccountCreation(form) if form.focus != Focus::DisplayInfo
        );

        if !editing {
            if plain_q && state == AppState::Lesson {
                self.enter(AppState::Dashboard, None);
                return;
            }
            if plain_q || ctrl_c {
                self.quit();
                return;
            }
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h')) {
                self.show_help = false;
                return;
            }
            if matches!(state, AppState::Dashboard | AppState::Lesson) {
                return;
            }
        }

        match state {
            AppState::Intro => self.handle_intro_key(key),
            AppState::AuthMenu => self.handle_auth_menu_key(key),
            AppState::AccountCreation => self.handle_account_form_key(key),
            AppState::SignIn => self.handle_sign_in_key(key),
            AppState::ModuleExplorer => self.handle_explorer_key(key),
            AppState::Dashboard => self.handle_dashboard_key(key),
            AppState::Lesson => self.handle_lesson_key(key),
            legacy => warn!(state = legacy.as_str(), "key event in a redirect-only state"),
        }
    }

    fn handle_intro_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.enter(AppState::AuthMenu, None),
            KeyCode::Char('h') => self.show_help = !self.show_help,
            _ => {}
        }
    }

    fn handle_auth_menu_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('h') {
            self.show_help = !self.show_help;
            return;
        }
        let len = self.menus.options().len();
        let event = match &mut self.screen {
            Screen::AuthMenu(cursor) => cursor.handle_key(key, len),
            _ => return,
        };
        match event {
            CursorEvent::Select(index) => self.select_menu_option(index),
            CursorEvent::Back | CursorEvent::None => {}
        }
    }

    fn handle_explorer_key(&mut self, key: KeyEvent) {
        let len = self.menus.options().len();
        let event = match &mut self.screen {
            Screen::ModuleExplorer(cursor) => cursor.handle_key(key, len),
            _ => return,
        };
        match event {
            CursorEvent::Select(index) => self.select_menu_option(index),
            CursorEvent::Back => self.enter(self.explorer_back_target(), None),
            CursorEvent::None => {}
        }
    }

    fn handle_account_form_key(&mut self, key: KeyEvent) {
        let event = match &mut self.screen {
            Screen::AccountCreation(form) => form.handle_key(key),
            _ => return,
        };
        match event {
            FormEvent::Submit => self.create_account(),
            FormEvent::Continue => self.finish_account_creation(),
            FormEvent::Cancel => self.enter(AppState::AuthMenu, None),
            FormEvent::None => {}
        }
    }

    fn handle_sign_in_key(&mut self, key: KeyEvent) {
        let event = match &mut self.screen {
            Screen::SignIn(view) => view.handle_key(key),
            _ => return,
        };
        match event {
            SignInEvent::Submit(digits) => self.sign_in(&digits),
            SignInEvent::Cancel => self.enter(AppState::AuthMenu, None),
            SignInEvent::None => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('h') {
            self.show_help = true;
            return;
        }
        let event = match &mut self.screen {
            Screen::Dashboard(view) => view.handle_key(key),
            _ => return,
        };
        match event {
            DashboardEvent::Open(index) => {
                if let Some(module) = MODULES.get(index) {
                    self.enter(AppState::Lesson, Some(module.id));
                }
            }
            DashboardEvent::MainMenu => self.enter(AppState::MainMenu, None),
            DashboardEvent::None => {}
        }
    }

    fn handle_lesson_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('h') {
            self.show_help = true;
            return;
        }
        let event = match &mut self.screen {
            Screen::Lesson(view) => view.handle_key(key),
            _ => return,
        };
        if let LessonEvent::Complete {
            module_id,
            lesson_id,
        } = event
        {
            self.complete_lesson(module_id, lesson_id);
        }
    }

    fn select_menu_option(&mut self, index: usize) {
        let result = self.menus.handle_selection(index);
        self.apply_menu_result(result);
    }

    /// Turn a menu outcome into a transition, a message, or termination.
    pub fn apply_menu_result(&mut self, result: MenuResult) {
        debug!(action = ?result.action, next = ?result.next_state, "menu result");
        match result.action {
            MenuAction::None => {}
            MenuAction::Execute => {
                let message = self
                    .describe_payload(result.payload.as_deref())
                    .or(result.message);
                if let Some(message) = message {
                    self.show_message(message);
                }
            }
            MenuAction::Navigate => match result.next_state {
                Some(target) => self.enter(target, result.payload.as_deref()),
                None => warn!("navigate result without a target state"),
            },
            MenuAction::Back => match result.next_state {
                Some(target) => self.enter(target, None),
                None => self.quit(),
            },
            MenuAction::Exit => self.quit(),
        }
    }

    fn show_message(&mut self, message: String) {
        match &mut self.screen {
            Screen::AuthMenu(cursor) | Screen::ModuleExplorer(cursor) => {
                cursor.message = Some(message);
            }
            Screen::Dashboard(view) => view.notice = Some(message),
            _ => debug!(%message, "message with no place to show it"),
        }
    }

    fn describe_payload(&self, payload: Option<&str>) -> Option<String> {
        match payload? {
            PAYLOAD_ACCOUNT_DETAILS => Some(match &self.account {
                Some(account) => format!(
                    "Name: {}\nEmail: {}\nAccount number: {}\nMember since: {}",
                    account.name,
                    account.email,
                    account.account_number,
                    account.created_at.format("%Y-%m-%d"),
                ),
                None => format!("Signed in as {} (account not saved)", self.user_name),
            }),
            PAYLOAD_PROGRESS_SUMMARY => Some(self.progress_summary()),
            _ => None,
        }
    }

    fn progress_summary(&self) -> String {
        let (Some(store), Some(account)) = (&self.store, &self.account) else {
            return "Progress tracking is unavailable for this session".to_string();
        };
        match store.get_stats(account.id) {
            Ok(stats) => format!(
                "Lessons completed: {}\nTime spent: {} min\nAchievements: {}\nActive days this week: {}",
                stats.lessons_completed,
                stats.total_time_seconds / 60,
                stats.achievement_count,
                stats.current_streak,
            ),
            Err(err) => {
                warn!("failed to load stats: {err}");
                format!("Could not load progress: {err}")
            }
        }
    }

    /// Move to `target`, resolving legacy states first. `payload` is the
    /// module id when entering a lesson.
    pub fn enter(&mut self, target: AppState, payload: Option<&str>) {
        let from = self.state();
        let resolved = target.redirect();

        if target.is_legacy()
            && resolved == AppState::ModuleExplorer
            && let Err(err) = self.menus.set_current_menu(target)
        {
            warn!("cannot open menu: {err}");
            return;
        }

        let screen = match resolved {
            AppState::Intro => Screen::Intro,
            AppState::AuthMenu => {
                if self.account.is_some() || self.session_id.is_some() {
                    self.log_out();
                }
                if let Err(err) = self.menus.set_current_menu(AppState::AuthMenu) {
                    warn!("cannot open auth menu: {err}");
                    return;
                }
                Screen::AuthMenu(MenuCursor::default())
            }
            AppState::AccountCreation => Screen::AccountCreation(AccountForm::new()),
            AppState::SignIn => Screen::SignIn(SignInView::new()),
            AppState::ModuleExplorer => {
                if self.menus.current_state().is_none()
                    && let Err(err) = self.menus.set_current_menu(AppState::MainMenu)
                {
                    warn!("cannot open main menu: {err}");
                    return;
                }
                Screen::ModuleExplorer(MenuCursor::default())
            }
            AppState::Dashboard => {
                let came_from = match &self.screen {
                    Screen::Lesson(view) => module_index(view.module.id),
                    _ => None,
                };
                Screen::Dashboard(self.build_dashboard().with_selection(came_from))
            }
            AppState::Lesson => {
                let Some(module) = payload.and_then(find_module) else {
                    warn!(?payload, "lesson requested without a known module");
                    self.show_message("That module is not available".to_string());
                    return;
                };
                Screen::Lesson(self.build_lesson(module))
            }
            legacy => {
                error!(state = legacy.as_str(), "redirect produced a legacy state");
                return;
            }
        };

        debug!(from = from.as_str(), to = resolved.as_str(), "state transition");
        if from != resolved {
            self.previous = Some(from);
        }
        self.show_help = false;
        self.screen = screen;
    }

    fn explorer_back_target(&self) -> AppState {
        match self.previous {
            Some(state @ (AppState::Intro | AppState::AuthMenu | AppState::Dashboard)) => state,
            _ => AppState::Dashboard,
        }
    }

    fn build_dashboard(&self) -> DashboardView {
        let view = DashboardView::new(&self.user_name, self.width, self.height);
        let (Some(store), Some(account)) = (&self.store, &self.account) else {
            return view;
        };
        let view = match store.get_stats(account.id) {
            Ok(stats) => view.with_stats(stats),
            Err(err) => {
                warn!("failed to load stats: {err}");
                view
            }
        };
        match store.progress(account.id) {
            Ok(rows) => view.with_progress(&rows),
            Err(err) => {
                warn!("failed to load progress: {err}");
                view
            }
        }
    }

    fn build_lesson(&self, module: &'static Module) -> LessonView {
        let mut view = LessonView::new(module, self.width, self.height);
        if let Some(completed) = self.completed_lessons(module) {
            view.completed = completed;
            view.resume();
        }
        view
    }

    fn completed_lessons(&self, module: &Module) -> Option<HashSet<String>> {
        let store = self.store.as_ref()?;
        let account = self.account.as_ref()?;
        match store.progress(account.id) {
            Ok(rows) => Some(
                rows.into_iter()
                    .filter(|p| p.module_id == module.id)
                    .map(|p| p.lesson_id)
                    .collect(),
            ),
            Err(err) => {
                warn!("failed to load progress: {err}");
                None
            }
        }
    }

    fn create_account(&mut self) {
        let (name, email) = match &self.screen {
            Screen::AccountCreation(form) => (
                form.display_name().to_string(),
                form.email.value().trim().to_string(),
            ),
            _ => return,
        };

        let outcome = match &self.store {
            Some(store) => {
                let rng = &mut self.rng;
                store
                    .generate_unique_account_number(|| account_number::generate(&mut *rng))
                    .and_then(|number| store.create_account(&name, &email, &number))
                    .map(|account| (account.account_number.clone(), Some(account)))
            }
            None => Ok((account_number::generate(&mut self.rng), None)),
        };

        let Screen::AccountCreation(form) = &mut self.screen else {
            return;
        };
        match outcome {
            Ok((number, account)) => {
                info!(persisted = account.is_some(), "account created");
                form.complete(number, account);
            }
            Err(err) => {
                error!("account creation failed: {err}");
                form.error = Some(format!("Could not create account: {err}"));
            }
        }
    }

    fn finish_account_creation(&mut self) {
        let (name, account) = match &mut self.screen {
            Screen::AccountCreation(form) => (form.display_name().to_string(), form.account.take()),
            _ => return,
        };
        self.user_name = name;
        if let Some(account) = account {
            self.begin_session(account);
        }
        self.enter(AppState::Dashboard, None);
    }

    fn sign_in(&mut self, digits: &str) {
        let Some(store) = &self.store else {
            info!("no data store, skipping account lookup");
            self.enter(AppState::Dashboard, None);
            return;
        };

        match store.sign_in(digits) {
            Ok(account) => {
                info!(account_id = account.id, "signed in");
                self.user_name = account.name.clone();
                self.begin_session(account);
                self.enter(AppState::Dashboard, None);
            }
            Err(err) => {
                let message = match err {
                    StoreError::AccountNotFound => {
                        "No account with that number. Check the digits and try again.".to_string()
                    }
                    other => {
                        error!("sign-in failed: {other}");
                        format!("Sign-in failed: {other}")
                    }
                };
                if let Screen::SignIn(view) = &mut self.screen {
                    view.error = Some(message);
                }
            }
        }
    }

    fn begin_session(&mut self, account: Account) {
        if let Some(store) = &self.store {
            match store.start_session(account.id) {
                Ok(id) => self.session_id = Some(id),
                Err(err) => warn!(account_id = account.id, "failed to start session: {err}"),
            }
        }
        self.account = Some(account);
    }

    /// Close the open session, if any. Failures are logged only.
    fn end_session(&mut self) {
        if let (Some(store), Some(id)) = (&self.store, self.session_id.take())
            && let Err(err) = store.end_session(id)
        {
            warn!(session_id = id, "failed to end session: {err}");
        }
    }

    fn log_out(&mut self) {
        self.end_session();
        self.account = None;
        self.user_name = GUEST_NAME.to_string();
        info!("logged out");
    }

    fn complete_lesson(&mut self, module_id: &'static str, lesson_id: &'static str) {
        let outcome = match (&self.store, &self.account) {
            (Some(store), Some(account)) => {
                record_completion(store, account.id, module_id, lesson_id).map(Some)
            }
            _ => Ok(None),
        };

        let Screen::Lesson(view) = &mut self.screen else {
            return;
        };
        match outcome {
            Ok(Some((completed, awarded))) => {
                view.completed = completed;
                view.error = None;
                view.status = Some(if awarded {
                    format!("Module complete! Achievement unlocked: {}", view.module.title)
                } else {
                    "Lesson complete".to_string()
                });
            }
            Ok(None) => {
                view.error = Some("Progress is not saved in this session".to_string());
            }
            Err(err) => {
                error!(module_id, lesson_id, "failed to save progress: {err}");
                view.error = Some(format!("Could not save progress: {err}"));
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// End the session and release every menu. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.end_session();
        self.menus.cleanup_all();
    }
}

/// Save one completion and award the module achievement once every lesson
/// of the module is done. Returns the module's completed lesson ids and
/// whether the achievement was newly awarded.
fn record_completion(
    store: &AccountStore,
    account_id: AccountId,
    module_id: &str,
    lesson_id: &str,
) -> Result<(HashSet<String>, bool), StoreError> {
    store.save_progress(account_id, module_id, lesson_id)?;
    let completed: HashSet<String> = store
        .progress(account_id)?
        .into_iter()
        .filter(|p| p.module_id == module_id)
        .map(|p| p.lesson_id)
        .collect();

    let all_done = find_module(module_id)
        .is_some_and(|module| module.lessons.iter().all(|l| completed.contains(l.id)));
    let awarded = if all_done {
        store.award_achievement(account_id, &format!("module:{module_id}"))?
    } else {
        false
    };
    Ok((completed, awarded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn app_with_store() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::open(dir.path().to_path_buf()).unwrap();
        (App::new(Some(store), 100, 30), dir)
    }

    fn select_label(app: &mut App, label: &str) {
        let index = app
            .menus
            .option_labels()
            .iter()
            .position(|l| *l == label)
            .unwrap();
        app.select_menu_option(index);
    }

    fn sign_up(app: &mut App, name: &str, email: &str) {
        app.handle_key(key(KeyCode::Enter));
        select_label(app, "Sign Up");
        type_str(app, name);
        app.handle_key(key(KeyCode::Enter));
        type_str(app, email);
        app.handle_key(key(KeyCode::Enter));
    }

    fn account_number_shown(app: &App) -> String {
        match &app.screen {
            Screen::AccountCreation(form) => form.account_number.clone().unwrap(),
            _ => panic!("not on the account form"),
        }
    }

    #[test]
    fn intro_enter_opens_auth_menu_at_top() {
        let (mut app, _dir) = app_with_store();
        assert_eq!(app.state(), AppState::Intro);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::AuthMenu);
        assert_eq!(app.menus.current_state(), Some(AppState::AuthMenu));
        assert!(matches!(&app.screen, Screen::AuthMenu(c) if c.selected == 0));
    }

    #[test]
    fn help_toggle_is_orthogonal_to_state() {
        let (mut app, _dir) = app_with_store();
        app.handle_key(key(KeyCode::Char('h')));
        assert!(app.show_help);
        assert_eq!(app.state(), AppState::Intro);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn sign_up_creates_and_persists_account() {
        let (mut app, _dir) = app_with_store();
        sign_up(&mut app, "Ann", "a@b.com");

        assert!(matches!(&app.screen, Screen::AccountCreation(f) if f.focus == Focus::DisplayInfo));
        let number = account_number_shown(&app);
        assert_eq!(number.len(), 19);
        assert_ne!(number.chars().next(), Some('0'));
        let store = app.store.as_ref().unwrap();
        assert_eq!(store.account_count().unwrap(), 1);
        assert_eq!(store.find_account(&number).unwrap().name, "Ann");
        assert!(app.wants_tick());

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Dashboard);
        assert_eq!(app.user_name, "Ann");
        assert!(app.session_id.is_some());
        assert!(matches!(&app.screen, Screen::Dashboard(v) if v.user_name == "Ann"));
    }

    #[test]
    fn q_in_form_is_text_but_quits_on_info_panel() {
        let (mut app, _dir) = app_with_store();
        app.handle_key(key(KeyCode::Enter));
        select_label(&mut app, "Sign Up");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(ctrl_c());
        assert!(!app.should_quit);
        assert!(matches!(&app.screen, Screen::AccountCreation(f) if f.email.value() == "q"));

        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "Quinn");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(&app.screen, Screen::AccountCreation(f) if f.focus == Focus::DisplayInfo));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn esc_leaves_account_form() {
        let (mut app, _dir) = app_with_store();
        app.handle_key(key(KeyCode::Enter));
        select_label(&mut app, "Sign Up");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::AuthMenu);
    }

    #[test]
    fn login_redirects_to_sign_in_form() {
        let (mut app, _dir) = app_with_store();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::SignIn);
        assert_eq!(app.previous, Some(AppState::AuthMenu));
    }

    #[test]
    fn sign_in_errors_stay_on_form() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::SignIn, None);

        type_str(&mut app, "12345");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::SignIn);
        assert!(matches!(&app.screen, Screen::SignIn(v)
            if v.error.as_deref() == Some("Account number must be exactly 16 digits")));

        app.enter(AppState::SignIn, None);
        type_str(&mut app, "1111222233334444");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::SignIn);
        assert!(matches!(&app.screen, Screen::SignIn(v)
            if v.error.as_deref().is_some_and(|e| e.starts_with("No account"))));
    }

    #[test]
    fn sign_in_accepts_either_spelling() {
        let (mut app, _dir) = app_with_store();
        let store = app.store.as_ref().unwrap();
        let account = store
            .create_account("Bea", "b@c.com", "1234567890123456")
            .unwrap();

        app.enter(AppState::SignIn, None);
        type_str(&mut app, "1234 5678 9012 3456");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Dashboard);
        assert_eq!(app.account.as_ref().map(|a| a.id), Some(account.id));
        assert_eq!(app.user_name, "Bea");
    }

    #[test]
    fn sign_in_esc_returns_to_auth_menu() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::SignIn, None);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::AuthMenu);
    }

    #[test]
    fn legacy_states_never_become_current() {
        let (mut app, _dir) = app_with_store();
        for target in [
            AppState::MainMenu,
            AppState::LearnMenu,
            AppState::Studio,
            AppState::Settings,
            AppState::SignInPlaceholder,
        ] {
            app.enter(target, None);
            assert!(!app.state().is_legacy());
            assert_eq!(app.state(), target.redirect());
        }
        assert_eq!(app.menus.current_state(), Some(AppState::Settings));
    }

    #[test]
    fn dashboard_to_lesson_and_back() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(&app.screen, Screen::Lesson(v) if v.module.id == MODULES[1].id));

        app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(app.state(), AppState::Dashboard);
        assert!(!app.should_quit);

        app.enter(AppState::Lesson, Some("basics"));
        app.handle_key(ctrl_c());
        assert!(app.should_quit);
    }

    #[test]
    fn help_overlay_swallows_dashboard_keys() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Right));
        assert!(matches!(&app.screen, Screen::Dashboard(v) if v.selected == Some(0)));
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Right));
        assert!(matches!(&app.screen, Screen::Dashboard(v) if v.selected == Some(1)));
    }

    #[test]
    fn main_menu_learn_opens_lesson_with_payload() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.state(), AppState::ModuleExplorer);
        select_label(&mut app, "Learn");
        assert_eq!(app.menus.current_state(), Some(AppState::LearnMenu));
        select_label(&mut app, MODULES[2].title);
        assert!(matches!(&app.screen, Screen::Lesson(v) if v.module.id == MODULES[2].id));
    }

    #[test]
    fn explorer_esc_returns_to_dashboard() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.enter(AppState::Studio, None);
        app.enter(AppState::MainMenu, None);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::Dashboard);
    }

    #[test]
    fn studio_tools_show_message_in_place() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Studio, None);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::ModuleExplorer);
        assert!(matches!(&app.screen, Screen::ModuleExplorer(c) if c.message.is_some()));
    }

    #[test]
    fn out_of_range_selection_changes_nothing() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::AuthMenu, None);
        app.select_menu_option(42);
        assert_eq!(app.state(), AppState::AuthMenu);
        assert!(!app.should_quit);
    }

    #[test]
    fn auth_exit_terminates() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::AuthMenu, None);
        select_label(&mut app, "Exit");
        assert!(app.should_quit);
    }

    #[test]
    fn log_out_closes_session() {
        let (mut app, _dir) = app_with_store();
        sign_up(&mut app, "Ann", "a@b.com");
        app.handle_key(key(KeyCode::Enter));
        let account_id = app.account.as_ref().unwrap().id;

        app.enter(AppState::MainMenu, None);
        select_label(&mut app, "Log Out");
        assert_eq!(app.state(), AppState::AuthMenu);
        assert!(app.account.is_none());
        assert!(app.session_id.is_none());

        let stats = app.store.as_ref().unwrap().get_stats(account_id).unwrap();
        assert!(stats.total_time_seconds >= 0);
    }

    #[test]
    fn completing_a_module_awards_achievement_once() {
        let (mut app, _dir) = app_with_store();
        sign_up(&mut app, "Ann", "a@b.com");
        app.handle_key(key(KeyCode::Enter));
        let account_id = app.account.as_ref().unwrap().id;

        app.enter(AppState::Lesson, Some("msgraph"));
        let lessons = find_module("msgraph").unwrap().lesson_count();
        for _ in 0..lessons {
            app.handle_key(key(KeyCode::Char('c')));
            app.handle_key(key(KeyCode::Char('n')));
        }
        assert!(matches!(&app.screen, Screen::Lesson(v)
            if v.module_complete()
                && v.status.as_deref().is_some_and(|s| s.starts_with("Module complete"))));

        app.handle_key(key(KeyCode::Char('c')));
        assert!(matches!(&app.screen, Screen::Lesson(v)
            if v.status.as_deref() == Some("Lesson complete")));

        let stats = app.store.as_ref().unwrap().get_stats(account_id).unwrap();
        assert_eq!(stats.lessons_completed, lessons);
        assert_eq!(stats.achievement_count, 1);
    }

    #[test]
    fn settings_progress_summary_reads_store() {
        let (mut app, _dir) = app_with_store();
        sign_up(&mut app, "Ann", "a@b.com");
        app.handle_key(key(KeyCode::Enter));
        app.enter(AppState::Settings, None);
        select_label(&mut app, "Progress Summary");
        assert!(matches!(&app.screen, Screen::ModuleExplorer(c)
            if c.message.as_deref().is_some_and(|m| m.starts_with("Lessons completed: 0"))));
    }

    #[test]
    fn resize_rebuilds_dashboard_with_context() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.handle_key(key(KeyCode::Right));
        app.handle_event(AppEvent::Resize(130, 40));
        assert!(matches!(&app.screen, Screen::Dashboard(v)
            if v.columns == 3 && v.selected == Some(1) && v.width == 130));
    }

    #[test]
    fn tick_only_wanted_while_animating() {
        let (mut app, _dir) = app_with_store();
        assert!(app.wants_tick());
        app.handle_event(AppEvent::Tick);
        assert_eq!(app.frame, 1);
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.wants_tick());
    }

    #[test]
    fn degraded_mode_without_store() {
        let mut app = App::new(None, 100, 30);
        sign_up(&mut app, "Ann", "a@b.com");
        let number = account_number_shown(&app);
        assert!(account_number::validate(&number).is_ok());
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Dashboard);
        assert_eq!(app.user_name, "Ann");
        assert!(app.session_id.is_none());

        app.enter(AppState::SignIn, None);
        type_str(&mut app, "1111222233334444");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Dashboard);

        app.enter(AppState::Lesson, Some("basics"));
        app.handle_key(key(KeyCode::Char('c')));
        assert!(matches!(&app.screen, Screen::Lesson(v) if v.error.is_some()));
    }

    #[test]
    fn shutdown_ends_open_session() {
        let (mut app, dir) = app_with_store();
        sign_up(&mut app, "Ann", "a@b.com");
        app.handle_key(key(KeyCode::Enter));
        let session_id = app.session_id.unwrap();
        app.shutdown();
        assert!(app.session_id.is_none());

        let reopened = AccountStore::open(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            reopened.end_session(session_id),
            Err(StoreError::SessionClosed(_))
        ));
    }

    fn sign_in_error(app: &App) -> String {
        match &app.screen {
            Screen::SignIn(view) => view.error.clone().unwrap(),
            _ => panic!("not on the sign-in form"),
        }
    }

    #[test]
    fn leaving_a_lesson_selects_its_module_on_the_dashboard() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::Dashboard, None);
        app.enter(AppState::Lesson, Some("msgraph"));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(matches!(&app.screen, Screen::Dashboard(v) if v.selected == Some(2)));

        app.enter(AppState::MainMenu, None);
        app.enter(AppState::Dashboard, None);
        assert!(matches!(&app.screen, Screen::Dashboard(v) if v.selected == Some(0)));
    }

    #[test]
    fn failed_account_write_keeps_form_on_email() {
        let (mut app, dir) = app_with_store();
        // A directory where the temp file goes makes every save fail.
        std::fs::create_dir(dir.path().join("powerhell.tmp")).unwrap();

        sign_up(&mut app, "Ann", "a@b.com");
        match &app.screen {
            Screen::AccountCreation(form) => {
                assert_eq!(form.focus, Focus::Email);
                assert!(form.error.as_deref().unwrap().starts_with("Could not create account"));
                assert!(form.account_number.is_none());
            }
            _ => panic!("expected the account form"),
        }
        assert_eq!(app.store.as_ref().unwrap().account_count().unwrap(), 0);
        assert!(!dir.path().join("powerhell.json").exists());
        assert!(!app.should_quit);
    }

    #[test]
    fn sign_in_store_failure_is_reported_apart_from_not_found() {
        let (mut app, _dir) = app_with_store();
        app.enter(AppState::SignIn, None);
        type_str(&mut app, "1111222233334444");
        app.handle_key(key(KeyCode::Enter));
        let not_found = sign_in_error(&app);

        app.store.as_ref().unwrap().poison_lock();
        app.enter(AppState::SignIn, None);
        type_str(&mut app, "1111222233334444");
        app.handle_key(key(KeyCode::Enter));
        let failure = sign_in_error(&app);

        assert_eq!(app.state(), AppState::SignIn);
        assert!(failure.starts_with("Sign-in failed"));
        assert_ne!(failure, not_found);
    }
}
