/// Which screen the application is on.
///
/// `MainMenu`, `LearnMenu`, `Studio`, `Settings` and `SignInPlaceholder` are
/// legacy targets: menus still name them, but entering one redirects to
/// [`AppState::ModuleExplorer`] (or [`AppState::SignIn`]) before anything renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppState {
    Intro,
    AccountCreation,
    SignIn,
    AuthMenu,
    ModuleExplorer,
    Dashboard,
    Lesson,
    MainMenu,
    LearnMenu,
    Studio,
    Settings,
    SignInPlaceholder,
}

impl AppState {
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            AppState::MainMenu
                | AppState::LearnMenu
                | AppState::Studio
                | AppState::Settings
                | AppState::SignInPlaceholder
        )
    }

    /// The state a legacy target actually lands on. Modern states map to themselves.
    pub fn redirect(self) -> AppState {
        match self {
            AppState::SignInPlaceholder => AppState::SignIn,
            AppState::MainMenu | AppState::LearnMenu | AppState::Studio | AppState::Settings => {
                AppState::ModuleExplorer
            }
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppState::Intro => "intro",
            AppState::AccountCreation => "account-creation",
            AppState::SignIn => "sign-in",
            AppState::AuthMenu => "auth-menu",
            AppState::ModuleExplorer => "module-explorer",
            AppState::Dashboard => "dashboard",
            AppState::Lesson => "lesson",
            AppState::MainMenu => "main-menu",
            AppState::LearnMenu => "learn-menu",
            AppState::Studio => "studio",
            AppState::Settings => "settings",
            AppState::SignInPlaceholder => "sign-in-placeholder",
        }
    }
}
