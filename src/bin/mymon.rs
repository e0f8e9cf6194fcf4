//! mymon - Live MySQL health dashboard.
//!
//! Samples server status counters on a fixed cadence, derives rate metrics
//! (QPS, TPS, I/O, cache efficiency) and renders them in a terminal
//! dashboard with bounded trend history.
//!
//! Usage:
//!   mymon                  # monitor the "default" connection
//!   mymon prod             # monitor the "prod" connection
//!   mymon prod -c my.toml  # custom config file

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use mymon::collector::{MysqlSource, Sampler};
use mymon::config::ConfigFile;
use mymon::monitor::{Scheduler, SnapshotStore};
use mymon::tui::{App, Event, EventHandler};

/// Live MySQL health dashboard.
#[derive(Parser)]
#[command(name = "mymon", about = "Live MySQL health dashboard", version)]
struct Args {
    /// Connection name from the config file.
    #[arg(value_name = "CONNECTION", default_value = "default")]
    connection: String,

    /// Path to the config file.
    #[arg(short, long, default_value = "mymon.toml")]
    config: PathBuf,

    /// Sampling interval in milliseconds (overrides the config file).
    #[arg(long, value_name = "MS")]
    sample_interval_ms: Option<u64>,

    /// Dashboard refresh interval in milliseconds (overrides the config file).
    #[arg(long, value_name = "MS")]
    refresh_interval_ms: Option<u64>,

    /// Connection ceiling for the gauges (overrides the config file).
    #[arg(long, value_name = "N")]
    max_connections: Option<i64>,

    /// Increase logging verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - disable logging entirely.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber.
///
/// Defaults to errors only: the dashboard owns the terminal, so anything
/// chattier belongs behind -v. Records go to stderr to stay off the
/// alternate screen.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        let level = match verbose {
            0 => Level::ERROR,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        EnvFilter::from_default_env()
            .add_directive(format!("mymon={}", level).parse().unwrap())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    // Configuration errors are the one fatal class: fail fast, before any
    // sampling starts.
    let config_file = match ConfigFile::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = match config_file.resolve(&args.connection) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(ms) = args.sample_interval_ms {
        config.sample_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = args.refresh_interval_ms {
        config.refresh_interval = Duration::from_millis(ms);
    }
    if let Some(n) = args.max_connections {
        config.max_connections = n;
    }

    let mut source = match MysqlSource::from_url(&config.url) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Transient unreachability is not fatal; the source reconnects on each
    // tick and the dashboard shows stale-but-available numbers meanwhile.
    match source.try_connect() {
        Ok(()) => info!(
            "connected to {} (MySQL {})",
            args.connection,
            source.server_version().unwrap_or("unknown")
        ),
        Err(e) => warn!("initial connection failed, will keep retrying: {}", e),
    }

    let title = match source.server_version() {
        Some(version) => format!("{} (MySQL {})", args.connection, version),
        None => args.connection.clone(),
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let r = running.clone();
        if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
            warn!("failed to set Ctrl-C handler: {}", e);
        }
    }

    let store = Arc::new(SnapshotStore::new());
    let events = EventHandler::new();
    let refresh_tx = events.sender();

    let scheduler = Scheduler::new(
        Sampler::new(source),
        store.clone(),
        &config,
        running.clone(),
    );
    let handle = scheduler.start(move || {
        // The dashboard may already be gone during shutdown.
        let _ = refresh_tx.send(Event::Tick);
    });

    let app = App::new(store, running.clone(), title);
    let result = app.run(events);

    running.store(false, Ordering::SeqCst);
    handle.join();

    if let Err(e) = result {
        eprintln!("Error running dashboard: {}", e);
        std::process::exit(1);
    }
}
