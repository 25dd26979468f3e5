use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rote_config::Config;
use rote_core::storage::{FileSlot, MemorySlot, Slot};
use rote_core::{CardStore, EngineContext, Page};
use rote_io::BridgePage;
use tokio::io::BufReader;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

mod completion;
mod controller;
mod events;
mod io;
mod schedule;
mod status;
mod supervise;
mod triggers;

#[cfg(test)]
mod tests;

use self::controller::EngineController;
use self::supervise::supervise;

/// Drives vocabulary exercises on a page session bridged over stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "rote")]
#[command(version)]
struct Args {
    /// JSON config file; environment overrides still apply
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the saved cards
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Keep learned cards in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Start with the solvers paused
    #[arg(long)]
    paused: bool,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let run_id = Uuid::new_v4();
    let code = runtime.block_on(async {
        match run(args).instrument(tracing::info_span!("run", %run_id)).await {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("{:#}", e);
                ExitCode::FAILURE
            }
        }
    });

    // Stdin reads block a worker thread; do not wait on them forever.
    runtime.shutdown_timeout(Duration::from_secs(1));
    code
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Stdout carries the page bridge, so logs go to stderr.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(atty::is(atty::Stream::Stderr)),
            )
            .init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::new(),
    };

    if let Some(dir) = &args.state_dir {
        config.storage.state_dir = dir.clone();
    }
    if args.ephemeral {
        config.storage.ephemeral = true;
    }
    if args.paused {
        config.engine.start_active = false;
    }

    Ok(config)
}

fn open_store(config: &Config) -> CardStore {
    let slot: Box<dyn Slot> = if config.storage.ephemeral {
        tracing::info!("Ephemeral store, cards will not be saved");
        Box::new(MemorySlot::new())
    } else {
        let slot = FileSlot::new(&config.storage.state_dir, &config.storage.slot_key);
        tracing::info!("Cards stored in {}", slot.path().display());
        Box::new(slot)
    };
    CardStore::load(slot)
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    tracing::info!("Starting rote");

    let store = open_store(&config);
    let ctx = EngineContext::new(store, config.engine.start_active);

    let page: Arc<dyn Page> = Arc::new(BridgePage::connect(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ));

    let controller = EngineController::new(config.clone());
    let status = controller.status();
    let mut tasks = controller.spawn_tasks(page.clone(), ctx);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let outcome = supervise(page.as_ref(), &config.completion, &mut tasks, shutdown).await;

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task ended with error during shutdown: {:#}", e);
        }
    }

    let status = status.borrow().clone();
    tracing::info!(?status, ?outcome, "Stopped");
    Ok(ExitCode::from(outcome.exit_code()))
}
