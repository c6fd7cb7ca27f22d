use crate::content::MODULES;
use crate::menu::{MenuResult, StaticMenu};
use crate::state::AppState;

/// Payload tags understood by the application for Execute results.
pub const PAYLOAD_ACCOUNT_DETAILS: &str = "account_details";
pub const PAYLOAD_PROGRESS_SUMMARY: &str = "progress_summary";

pub fn auth_menu() -> StaticMenu {
    StaticMenu::builder(
        "PowerHell Authentication",
        "Sign up for a new account or sign in to continue",
    )
    .execute("Sign Up", "Create a new PowerHell learning account", || {
        MenuResult::navigate(AppState::AccountCreation)
            .with_message("Starting account creation process...")
    })
    .execute("Login", "Login to your existing PowerHell account", || {
        MenuResult::navigate(AppState::SignInPlaceholder).with_message("Opening sign-in form...")
    })
    .back("Exit", None)
    .build()
}

pub fn main_menu() -> StaticMenu {
    StaticMenu::builder(
        "PowerHell Main Menu",
        "Choose your learning path or manage your session",
    )
    .navigate("Learn", "Browse the learning modules", AppState::LearnMenu)
    .navigate("Studio", "Practice environments and tools", AppState::Studio)
    .navigate("Settings", "Account and progress details", AppState::Settings)
    .navigate("Dashboard", "Return to the module dashboard", AppState::Dashboard)
    .navigate("Log Out", "End the session and return to sign-in", AppState::AuthMenu)
    .back("Exit", None)
    .build()
}

/// One option per catalog module; selecting it opens the module's first lesson.
pub fn learn_menu() -> StaticMenu {
    let mut builder = StaticMenu::builder(
        "PowerHell Learning Modules",
        "Select a PowerShell learning module to explore",
    );
    for module in MODULES {
        let id = module.id;
        let title = module.title;
        builder = builder.execute(title, module.description, move || {
            MenuResult::navigate(AppState::Lesson)
                .with_payload(id)
                .with_message(format!("Loading {title}..."))
        });
    }
    builder.back("Back to Main Menu", Some(AppState::MainMenu)).build()
}

pub fn studio_menu() -> StaticMenu {
    let tools: [(&str, &str, &str, &str); 4] = [
        (
            "Interactive Console",
            "Launch an interactive PowerShell console for practice",
            "interactive_console",
            "The interactive console needs a PowerShell runtime on this host.",
        ),
        (
            "Script Editor",
            "Create and edit PowerShell scripts",
            "script_editor",
            "Use the Editor tab inside any lesson to work on exercise code.",
        ),
        (
            "Code Challenges",
            "Solve PowerShell coding challenges to test your skills",
            "code_challenges",
            "Every lesson ends with an exercise; open one from the dashboard.",
        ),
        (
            "Snippet Library",
            "Browse useful PowerShell code snippets",
            "snippet_library",
            "Lesson starter code doubles as the snippet library for now.",
        ),
    ];

    let mut builder = StaticMenu::builder(
        "PowerHell Studio",
        "Practice PowerShell in interactive environments",
    );
    for (label, description, tag, message) in tools {
        builder = builder.execute(label, description, move || {
            MenuResult::execute(message).with_payload(tag)
        });
    }
    builder.back("Back to Main Menu", Some(AppState::MainMenu)).build()
}

pub fn settings_menu() -> StaticMenu {
    StaticMenu::builder(
        "PowerHell Settings",
        "Configure your PowerHell learning experience",
    )
    .execute(
        "Account Details",
        "Show the signed-in account and its number",
        || MenuResult::execute("Account details").with_payload(PAYLOAD_ACCOUNT_DETAILS),
    )
    .execute(
        "Progress Summary",
        "Lessons completed, time spent and streak",
        || MenuResult::execute("Progress summary").with_payload(PAYLOAD_PROGRESS_SUMMARY),
    )
    .execute("Theme", "Color theme selection", || {
        MenuResult::execute("Set `theme` in config.toml or pass --theme to change colors.")
            .with_payload("theme_settings")
    })
    .back("Back to Main Menu", Some(AppState::MainMenu))
    .build()
}
