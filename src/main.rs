use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info, warn};

use powerhell::app::App;
use powerhell::config::Config;
use powerhell::event::EventHandler;
use powerhell::logging;
use powerhell::store::AccountStore;
use powerhell::store::json_store::default_data_dir;
use powerhell::ui;
use powerhell::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "powerhell", version, about = "Terminal tutor for learning PowerShell")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for account data and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Run without saving accounts or progress")]
    ephemeral: bool,

    #[arg(long, help = "Animation tick period in milliseconds")]
    tick_rate: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let seed_config = config_error.is_none() && !Config::config_path().exists();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(tick_rate) = cli.tick_rate {
        config.tick_rate_ms = tick_rate;
    }
    config.normalize();

    let data_dir = config.data_dir.clone().unwrap_or_else(default_data_dir);
    let (_log_guard, log_error) = logging::init(&logging::log_dir(&data_dir), &config.log_level);
    match log_error {
        Some(err) => eprintln!("powerhell: file logging disabled: {err:#}"),
        None => info!(dir = %data_dir.display(), "logging initialized"),
    }
    if let Some(err) = config_error {
        warn!("ignoring unreadable config file, using defaults: {err:#}");
    } else if seed_config && let Err(err) = Config::default().save() {
        warn!("could not write default config: {err:#}");
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });

    let store = if cli.ephemeral {
        None
    } else {
        match AccountStore::open(data_dir.clone()) {
            Ok(store) => Some(store),
            Err(err) => {
                error!("data store unavailable, continuing without persistence: {err}");
                None
            }
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(store, size.width, size.height);
    let events = EventHandler::new(Duration::from_millis(config.tick_rate_ms), app.wants_tick());

    let result = run_app(&mut terminal, &mut app, &events, &theme);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    info!("exited");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    theme: &Theme,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app, theme))?;

        app.handle_event(events.next()?);
        events.set_ticking(app.wants_tick());

        if app.should_quit {
            return Ok(());
        }
    }
}
