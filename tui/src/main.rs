//! Companion TUI Entry Point
//!
//! Launches the pet and its owner in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (config from $XDG_CONFIG_HOME/companion/config.toml if present)
//! companion-tui
//!
//! # Reproducible run, starting pinned to the floor
//! companion-tui --seed 7 --roam-mode bottom
//!
//! # Logs go to a file; the terminal belongs to the UI
//! RUST_LOG=companion_core=debug companion-tui --log-file /tmp/companion.log
//!
//! # No terminal: run 600 ticks and print a JSON snapshot
//! companion-tui --headless-ticks 600 --seed 7
//! ```

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use companion_core::{load_config, RoamMode, SeededRandom};
use companion_tui::{run_headless, App, AppOptions};

/// Virtual terminal size for headless runs (800x600 px)
const HEADLESS_SIZE: (u16, u16) = (200, 76);

/// Pet and owner screen companions, in your terminal
#[derive(Parser, Debug)]
#[command(name = "companion-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "COMPANION_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed (a random one is picked and logged otherwise)
    #[arg(long, env = "COMPANION_SEED")]
    seed: Option<u64>,

    /// Starting roam mode: full, bottom or none
    #[arg(short = 'r', long)]
    roam_mode: Option<RoamMode>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Never ring the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs to this file
    #[arg(long, env = "COMPANION_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Run this many ticks without a terminal and print a JSON snapshot
    #[arg(long, value_name = "TICKS")]
    headless_ticks: Option<u64>,
}

/// Logs never go to stdout: it belongs to the UI or to the JSON report
fn init_logging(log_file: Option<&PathBuf>, headless: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("companion_core=info,companion_tui=info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .with(filter)
                .init();
        }
        None if headless => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
        }
        // Interactive without a log file: stderr would scribble over the UI
        None => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref(), args.headless_ticks.is_some())?;

    let (mut config, source) = load_config(args.config.as_deref())?;
    if let Some(mode) = args.roam_mode {
        config.roam_mode = mode;
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(?source, seed, "Starting companions");

    if let Some(ticks) = args.headless_ticks {
        let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
        let report = run_headless(config, seed, HEADLESS_SIZE, ticks, frame)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("companion-tui needs a terminal (TTY); try --headless-ticks instead");
        std::process::exit(1);
    }

    // Restore the terminal before printing a panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let options = AppOptions {
        fps: args.fps,
        muted: args.mute,
    };
    let result = run_app(&mut terminal, config, seed, options).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: companion_core::EngineConfig,
    seed: u64,
    options: AppOptions,
) -> anyhow::Result<()> {
    let size = crossterm::terminal::size()?;
    let rng = Box::new(SeededRandom::from_seed(seed));
    let mut app = App::new(config, rng, size, options)?;
    app.run(terminal).await
}
