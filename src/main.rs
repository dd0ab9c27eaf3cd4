use std::{fs::OpenOptions, io::Stdout, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use tasklist::{
    application::controller::TaskListController,
    config::{load_settings, Settings},
    domain::store::TaskStore,
    infrastructure::http_store::HttpTaskStore,
    ui::{self, App, Flow},
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings();
    init_logging(&settings)?;

    let store = HttpTaskStore::from_settings(&settings)?;
    tracing::info!(url = %store.collection_url(), "starting");
    let mut controller = TaskListController::new(store);
    controller.load();
    let mut app = App::new(controller, settings.api_url.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("shutdown");
    res
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file '{}'", settings.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<S: TaskStore>(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App<S>) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if app.on_key(key) == Flow::Quit { break; }
            }
        }
    }
    Ok(())
}
