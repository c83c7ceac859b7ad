// ipwatch - IP history dashboard
// A terminal dashboard for the sharing-watcher backend: users, their
// recent IP sightings, as a tinted table or on a world map.

mod api;
mod app;
mod geo;
mod sighting;
mod theme;
mod ui;
mod view;

use anyhow::{Context, Result};
use api::ApiClient;
use app::{
    config::{DEFAULT_BASE_URL, DEFAULT_IP_LIMIT, DEFAULT_TIMEOUT_SECS},
    event::{handle_key_event, handle_mouse_event},
    AppState, DashboardConfig, HttpFetcher, LimitInput,
};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sighting::User;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use view::{html::HtmlPresenter, Renderer};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ipwatch")]
#[command(about = "Terminal dashboard for per-user IP history", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "IPWATCH_BASE_URL")]
    base_url: String,

    /// Number of IP sightings requested per user
    #[arg(long, default_value_t = DEFAULT_IP_LIMIT, env = "IPWATCH_DEFAULT_LIMIT")]
    limit: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Disable the world map (table view only)
    #[arg(long)]
    no_map: bool,

    /// Write logs to this file
    #[arg(long, env = "IPWATCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Print the details of one user as HTML and exit
    #[arg(long, value_name = "USER_ID")]
    export_html: Option<u64>,
}

impl Cli {
    fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            base_url: self.base_url.clone(),
            default_limit: self.limit,
            request_timeout: Duration::from_secs(self.timeout_secs),
            map_enabled: !self.no_map,
        }
    }
}

/// Install the tracing subscriber
///
/// The TUI owns the terminal, so it only logs when a log file is given.
/// Export mode falls back to stderr.
fn init_logging(log_file: Option<&Path>, stderr_fallback: bool) -> Result<()> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ipwatch=info"))
    };

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if stderr_fallback {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.export_html.is_some())?;

    let config = cli.dashboard_config();
    info!(base_url = %config.base_url, limit = config.default_limit, "Starting ipwatch");

    let api = ApiClient::new(&config.base_url, config.request_timeout)
        .context("Failed to build HTTP client")?;

    if let Some(user_id) = cli.export_html {
        return export_html(&config, api, user_id);
    }

    let fetcher = HttpFetcher::new(api).context("Failed to start fetch runtime")?;
    let mut app = AppState::new(&config, Box::new(fetcher));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    config: &DashboardConfig,
) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app, &config.base_url))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(config.tick_interval())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key.code);
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }
}

/// Fetch one user's history and print the details panel as HTML
fn export_html(config: &DashboardConfig, api: ApiClient, user_id: u64) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let limit = LimitInput::new(config.default_limit).effective();

    let (user, result) = runtime.block_on(async {
        let user = match api.fetch_users().await {
            Ok(users) => users
                .into_iter()
                .find(|u| u.user_id == user_id)
                .unwrap_or_else(|| User::new(user_id)),
            Err(e) => {
                warn!(error = %e, "Failed to load users; using a placeholder name");
                User::new(user_id)
            }
        };
        let result = api.fetch_user_ips(user_id, limit).await;
        (user, result)
    });

    let mut renderer = Renderer::new();
    let mut presenter = HtmlPresenter::new(config.map_enabled);
    let outcome = match result {
        Ok(records) => {
            renderer.accept(user, records, &mut presenter);
            Ok(())
        }
        Err(e) => {
            renderer.fail(&user, e.to_string(), &mut presenter);
            Err(e)
        }
    };

    print!("{}", presenter.markup());
    outcome.with_context(|| format!("Failed to load IP data for user {}", user_id))
}
