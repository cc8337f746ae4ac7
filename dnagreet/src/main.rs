//! dnagreet - Digital DNA dynamic greeting
//!
//! Each invocation is one page load: the visit is recorded once, then the
//! greeting is rendered. With `--watch` the greeting keeps refreshing on the
//! configured timers until Ctrl+C.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Visits: $XDG_DATA_HOME/dnagreet/visits.db (~/.local/share/dnagreet/visits.db)
//! - Logs: $XDG_STATE_HOME/dnagreet/dnagreet.log (~/.local/state/dnagreet/dnagreet.log)
//! - Config: $XDG_CONFIG_HOME/dnagreet/config.toml (~/.config/dnagreet/config.toml)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use dnagreet_core::config::StorageBackend;
use dnagreet_core::format::{format_relative_time, percent_bar};
use dnagreet_core::{
    Config, GreetingSession, GreetingView, LiveGreeting, LiveTimers, RandomSource,
    SeededRandom, SystemClock, ThreadRandom,
};
use tokio::sync::Notify;

#[derive(Parser, Debug)]
#[command(name = "dnagreet")]
#[command(about = "Digital DNA dynamic greeting")]
#[command(version)]
struct Args {
    /// Page that linked here (overrides greeting.referrer from config)
    #[arg(long)]
    referrer: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Seed for reproducible message, focus and energy picks
    #[arg(long)]
    seed: Option<u64>,

    /// Keep refreshing until Ctrl+C
    #[arg(short, long)]
    watch: bool,

    /// Stop watch mode after this many seconds
    #[arg(long, requires = "watch")]
    for_secs: Option<u64>,

    /// Keep the visit record in memory for this run only
    #[arg(long)]
    memory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _log_guard = dnagreet_core::logging::init(&config.logging).ok();

    tracing::info!(watch = args.watch, format = ?args.format, "dnagreet starting");

    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }
    let store = dnagreet_core::store::open_configured(&config.storage);

    let rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    };
    let referrer = args.referrer.clone().or_else(|| config.greeting.referrer.clone());

    let session = GreetingSession::start(store.as_ref(), Arc::new(SystemClock), rng, referrer);
    drop(store);

    if args.watch {
        run_watch_mode(session, LiveTimers::from(&config.greeting), &args)
    } else {
        print_view(&session.view(), args.format)
    }
}

/// Re-render on both timers until Ctrl+C or `--for-secs` elapses.
fn run_watch_mode(session: GreetingSession, timers: LiveTimers, args: &Args) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        signal.notify_one();
    })
    .context("failed to set Ctrl+C handler")?;

    if args.format == OutputFormat::Text {
        println!(
            "Watch mode active (refresh every {}s, status every {}s). Press Ctrl+C to stop.",
            timers.refresh_interval.as_secs(),
            timers.status_poll.as_secs()
        );
        println!();
    }

    let format = args.format;
    let limit = args.for_secs.map(Duration::from_secs);

    runtime.block_on(async move {
        let mut live = LiveGreeting::start(session, timers, move |view| {
            if let Err(e) = render(view, format) {
                tracing::warn!(error = %e, "Failed to render greeting");
            }
        });

        match limit {
            Some(limit) => {
                tokio::select! {
                    _ = shutdown.notified() => {}
                    _ = tokio::time::sleep(limit) => {}
                }
            }
            None => shutdown.notified().await,
        }

        tracing::info!(refreshes = live.refresh_count(), "Watch mode finished");
        live.stop();
    });

    Ok(())
}

fn print_view(view: &GreetingView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(view)?);
        }
        OutputFormat::Text => print_terminal(view),
    }
    Ok(())
}

/// Watch-mode rendering: one line of JSON per render, or a full card.
fn render(view: &GreetingView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(view)?),
        OutputFormat::Text => {
            print_terminal(view);
            println!("{}", "─".repeat(48));
        }
    }
    Ok(())
}

fn print_terminal(view: &GreetingView) {
    let greeting = &view.greeting;

    println!(
        "{} • {} • {}",
        greeting.greeting, view.current_time, view.dynamic_status
    );
    println!("{}", greeting.personal_message);
    if !greeting.background_context.is_empty() {
        println!("{}", greeting.background_context);
    }
    println!("{}", greeting.time_context);
    println!();

    println!("   Mood:          {}", greeting.mood);
    println!(
        "   Energy:        {} {}%",
        percent_bar(greeting.energy_level, 20),
        greeting.energy_level
    );
    println!("   Current focus: {}", greeting.current_focus);

    let visitor = &view.visitor_context;
    match visitor.last_visit {
        Some(last) if visitor.is_returning => println!(
            "   Visits:        {} (last visit {})",
            visitor.visit_count,
            format_relative_time(last, Utc::now())
        ),
        _ if visitor.is_returning => println!("   Visits:        {}", visitor.visit_count),
        _ => println!("   Visits:        {} (first visit)", visitor.visit_count),
    }
    println!();
}
