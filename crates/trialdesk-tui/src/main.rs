use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use trialdesk_core::config_file::load_config;
use trialdesk_core::{Category, HttpService, Overrides, RemoteService, Settings};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Trialdesk: browse trial literature folders, extract key information and
/// draft a protocol summary from a terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the extraction backend
    #[arg(long)]
    api_url: Option<String>,

    /// Directory the summary document is saved to
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Data root shown next to each category
    #[arg(long)]
    data_root: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Directory for log files (default: platform cache dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Check the backend and print the folder listing, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| dirs::cache_dir().map(|d| d.join("trialdesk").join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let _guard = init_logging(&log_dir)?;

    // Resolve config from CLI flags > env vars > config file > defaults
    let file = load_config();
    let settings = Settings::resolve(
        &file,
        &Overrides {
            api_url: args.api_url,
            download_dir: args.download_dir,
            data_root: args.data_root,
            theme: args.theme,
        },
        |key| std::env::var(key).ok(),
    );
    tracing::info!(
        api_url = %settings.api_url,
        download_dir = %settings.download_dir.display(),
        "starting trialdesk"
    );

    let service = Arc::new(HttpService::new(&settings.api_url, settings.request_timeout)?);

    if args.check {
        return run_check(service.as_ref()).await;
    }

    let theme = theme::Theme::by_name(&settings.theme);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(
        theme,
        settings.api_url.clone(),
        settings.data_root.clone(),
        settings.download_dir.clone(),
    );
    if let Ok(size) = terminal.size() {
        app.update(action::Action::Resize(size.width, size.height));
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    let service: Arc<dyn RemoteService> = service;
    tokio::spawn(backend::run(service, cmd_rx, event_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.start_load();

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    tracing::info!("trialdesk exited");
    Ok(())
}

/// Log to a daily-rolling file; the terminal belongs to the UI.
fn init_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::daily(dir, "trialdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

/// Headless check: report backend health and the folder listing.
async fn run_check(service: &dyn RemoteService) -> anyhow::Result<()> {
    if !service.health_check().await {
        anyhow::bail!("backend is not healthy");
    }
    println!("backend: healthy");

    let listing = service.get_all_folders().await;
    for &category in Category::all() {
        let items = listing.items(category);
        println!("{} ({})", category.name(), items.len());
        for item in items {
            println!("  {item}");
        }
    }
    if listing.total_items() == 0 {
        anyhow::bail!("no folders found");
    }
    Ok(())
}
