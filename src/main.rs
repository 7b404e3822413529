// Svcpoll - Service Poller TUI
// Main entry point

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use svcpoll::api::HttpServiceApi;
use svcpoll::app::App;
use svcpoll::config::Config;
use svcpoll::error::SvcpollError;
use svcpoll::events::{spawn_input_handler, spawn_ticker, AppEvent};
use svcpoll::message::MessageBoard;
use svcpoll::ui::DashboardState;
use svcpoll::version::build_info;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "svcpoll")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poller base URL, overrides the config file
    #[arg(short, long)]
    server: Option<String>,

    /// Seconds between refreshes, overrides the config file
    #[arg(short, long)]
    interval: Option<u64>,

    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    /// Show detailed build information
    #[arg(long)]
    build_info: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info().format_display());
        return Ok(());
    }

    if cli.build_info {
        println!("{}", build_info().format_display());
        println!("\n{}", build_info().format_build_info());
        return Ok(());
    }

    let mut config = Config::load(cli.config)?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(interval) = cli.interval {
        config.refresh_interval_secs = interval;
    }
    config.validate()?;

    // Initialize logging to file
    let log_path = config.log_path();
    let log_file = std::fs::File::create(&log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // Disable ANSI colors in log file
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(
        "Svcpoll starting against {}, logging to {}",
        config.server_url,
        log_path.display()
    );

    run_tui(config).await?;

    Ok(())
}

async fn run_tui(config: Config) -> Result<()> {
    let api = HttpServiceApi::new(&config.server_url, config.request_timeout())?;

    let mut terminal = setup_terminal()?;
    let outcome = run_app(&mut terminal, api, &config).await;
    restore_terminal(&mut terminal)?;

    if let Err(ref err) = outcome {
        tracing::error!("Svcpoll stopped: {:#}", err);
    } else {
        println!("Svcpoll exited. Goodbye!");
    }

    outcome
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| SvcpollError::Terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| SvcpollError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, api: HttpServiceApi, config: &Config) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    spawn_input_handler(tx.clone()).await;

    // The first tick fires immediately and performs the initial load
    spawn_ticker(tx.clone(), config.refresh_interval()).await;

    let mut app = App::new(Arc::new(api), tx.clone())
        .with_dashboard(DashboardState::with_server(config.server_url.clone()))
        .with_messages(MessageBoard::new(config.message_timeout()));

    loop {
        // Clear terminal if full redraw is needed (e.g., after view change)
        if app.needs_full_redraw {
            terminal.clear()?;
            app.needs_full_redraw = false;
        }

        terminal.draw(|f| app.render(f))?;

        match rx.recv().await {
            Some(event) => {
                app.handle_event(event).await?;
                if app.should_quit {
                    break;
                }
            }
            None => break,
        }
    }

    Ok(())
}
