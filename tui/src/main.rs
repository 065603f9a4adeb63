//! Triage TUI Entry Point
//!
//! Launches the terminal triage console.
//!
//! Usage:
//!   triage-tui [OPTIONS]
//!
//! Options:
//!   --config <PATH>     Config file (default: ~/.config/triage-console/console.toml)
//!   --corpus <PATH>     JSON message corpus (default: built-in demo inbox)
//!   --tone <TONE>       Starting tone: professional, empathetic or direct
//!   --reveal-ms <MS>    Delay between revealed draft characters
//!   --theme <THEME>     dark or light
//!   --log-file <PATH>   Where tracing output goes (never the terminal)

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

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

use triage_core::{
    default_config_path, load_config_from_path, Console, ConfigOverrides, ConsoleConfigFile,
    MessageStore, ThemeMode, ToneId,
};
use triage_tui::console_client::ConsoleClient;
use triage_tui::App;

/// Terminal triage console for an insurance broker inbox
#[derive(Debug, Parser)]
#[command(name = "triage-tui", version, about)]
struct Args {
    /// Config file
    #[arg(long, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON message corpus (built-in demo inbox when absent)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Starting tone
    #[arg(long, value_parser = parse_tone)]
    tone: Option<ToneId>,

    /// Delay between revealed draft characters, in milliseconds
    #[arg(long)]
    reveal_ms: Option<u64>,

    /// Theme at startup
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeMode>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_tone(s: &str) -> Result<ToneId, String> {
    ToneId::parse(s).ok_or_else(|| format!("unknown tone '{s}'"))
}

fn parse_theme(s: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(s).ok_or_else(|| format!("unknown theme '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration: file, then environment, then flags
    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;
    overrides_from(&args)
        .apply(&mut config)
        .context("Invalid command-line option")?;

    // Logging goes to a file; the terminal belongs to the UI
    let log_path = args.log_file.clone().or_else(default_log_path);
    init_logging(log_path.as_ref(), &config)?;

    tracing::info!(
        source = ?config.source(),
        tone = %config.initial_tone.as_str(),
        theme = %config.theme.as_str(),
        reveal_ms = config.reveal_interval.as_millis(),
        "Starting triage console"
    );

    let store = match &config.corpus_path {
        Some(path) => MessageStore::load_from_path(path)
            .with_context(|| format!("Failed to load corpus {}", path.display()))?,
        None => MessageStore::demo(),
    };
    tracing::info!(messages = store.len(), "Message store ready");

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: triage-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, store, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: MessageStore,
    config: &ConsoleConfigFile,
) -> anyhow::Result<()> {
    let console = Console::new(store, config.initial_tone);
    let client = ConsoleClient::new(console, config.reveal_interval);
    let mut app = App::new(client, config.theme, config.frame_interval)?;
    app.run(terminal).await?;

    // Show goodbye message after TUI closes
    if let Some(goodbye) = app.goodbye() {
        println!("\n\x1b[35mTriage:\x1b[0m {goodbye}\n");
    }

    Ok(())
}

fn overrides_from(args: &Args) -> ConfigOverrides {
    let mut overrides = ConfigOverrides::new();
    if let Some(path) = &args.corpus {
        overrides = overrides.with_corpus_path(path);
    }
    if let Some(tone) = args.tone {
        overrides = overrides.with_initial_tone(tone);
    }
    if let Some(ms) = args.reveal_ms {
        overrides = overrides.with_reveal_interval_ms(ms);
    }
    if let Some(theme) = args.theme {
        overrides = overrides.with_theme(theme);
    }
    overrides
}

/// `$XDG_STATE_HOME/triage-console/console.log`, falling back to the local data dir
fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("triage-console").join("console.log"))
}

fn init_logging(path: Option<&PathBuf>, config: &ConsoleConfigFile) -> anyhow::Result<()> {
    // RUST_LOG wins over the configured filter
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?,
    };

    let Some(path) = path else {
        // Nowhere to write; stay silent rather than scribble over the UI
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}
