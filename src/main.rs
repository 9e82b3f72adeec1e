//! FieldReport - intervention reports for field technicians
//!
//! A CLI tool that turns a technician's form input into the review
//! table of an intervention report and exports the report payload.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, unreadable session, export failure, etc.)

mod catalog;
mod cli;
mod config;
mod debounce;
mod export;
mod models;
mod report;
mod session;
mod summary;

use anyhow::{Context, Result};
use chrono::Local;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use debounce::Debouncer;
use export::{submit_report, OutboxSink};
use models::SummaryRow;
use session::{format_datetime, Command, FormSession, SessionFile, COMMAND_HELP};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use summary::SummaryEngine;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("FieldReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = if args.interactive {
        run_interactive(&args).await
    } else {
        run_session(&args)
    };

    if let Err(e) = result {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .fieldreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize placeholders, throttling, and export.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    let mut config = if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        Config::load(config_path)?
    } else {
        // Try default location
        match Config::load_default() {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Build a form session from the summary settings.
fn new_session(config: &Config) -> FormSession {
    let engine = SummaryEngine::new()
        .with_placeholders(config.summary.placeholders.iter().cloned())
        .with_comments_fallback(config.summary.comments_fallback.clone());
    FormSession::new(engine)
}

/// Render rows in the configured format.
fn render(rows: &[SummaryRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(report::generate_markdown_summary(rows, Local::now())),
        OutputFormat::Json => report::generate_json_summary(rows),
        OutputFormat::Payload => report::generate_payload_json(rows),
    }
}

/// Write rendered output to the configured file, or stdout.
fn emit(content: &str, config: &Config) -> Result<()> {
    match config.general.output {
        Some(ref output) => {
            report::write_report(content, Path::new(output))
                .with_context(|| format!("Failed to write report to {}", output))?;
            println!("✅ Report saved to: {}", output);
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Replay a session file, render it, and optionally export it.
fn run_session(args: &Args) -> Result<()> {
    let config = load_config(args)?;

    let path = args
        .session
        .as_deref()
        .context("No session file given")?;
    let file = SessionFile::load(path)?;

    let mut session = new_session(&config);
    file.apply(&mut session);

    let rows = session.snapshot();
    info!("Review table has {} rows", rows.len());
    emit(&render(&rows, config.general.format)?, &config)?;

    if args.export {
        let mut sink = OutboxSink::new(&config.export.outbox);
        submit_report(&mut session, &mut sink, &config.export.table)?;
        println!("📤 Report exported to {}", config.export.outbox);
    }

    Ok(())
}

/// Lock the shared form session. A poisoned lock means an edit panicked
/// half-way, so the form is no longer trusted.
fn lock_session(session: &Mutex<FormSession>) -> Result<MutexGuard<'_, FormSession>> {
    session
        .lock()
        .map_err(|_| anyhow::anyhow!("Form session lock poisoned"))
}

/// Print the review table of `session` to stdout.
fn print_table(session: &Mutex<FormSession>) -> Result<()> {
    let session = lock_session(session)?;
    println!("{}", report::generate_table(&session.snapshot()));
    Ok(())
}

/// Edit the form from stdin. Text edits refresh the table after the
/// quiet window; selections and explicit commands refresh it at once.
async fn run_interactive(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let session = Arc::new(Mutex::new(new_session(&config)));
    let mut debouncer = Debouncer::new(Duration::from_millis(config.summary.throttle_ms));
    let mut sink = OutboxSink::new(&config.export.outbox);

    lock_session(&session)?
        .set_field(models::TextField::Datetime, &format_datetime(Local::now()));

    println!("📝 Interactive report. Type 'help' for commands.");
    debug!("Refresh throttle: {:?}", debouncer.delay());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("⚠️  {}", e);
                continue;
            }
        };

        match command {
            Command::Set { field, value } => {
                lock_session(&session)?.set_field(field, &value);
                let session = Arc::clone(&session);
                debouncer.call(move || {
                    if let Err(e) = print_table(&session) {
                        warn!("Skipping refresh: {}", e);
                    }
                });
            }
            Command::Select { kind, value, text } => {
                debouncer.cancel();
                lock_session(&session)?.select(kind, &value, text.as_deref());
                print_table(&session)?;
            }
            Command::Show => {
                debouncer.cancel();
                print_table(&session)?;
            }
            Command::Export => {
                debouncer.cancel();
                let mut s = lock_session(&session)?;
                match submit_report(&mut s, &mut sink, &config.export.table) {
                    Ok(_) => println!("📤 Report exported to {}", sink.path().display()),
                    Err(e) => eprintln!("❌ Export failed: {:#}", e),
                }
            }
            Command::Help => println!("{}", COMMAND_HELP),
            Command::Quit => break,
        }
    }

    if debouncer.is_pending() {
        debug!("Dropping pending refresh");
        debouncer.cancel();
    }
    info!("Interactive session closed");
    Ok(())
}
