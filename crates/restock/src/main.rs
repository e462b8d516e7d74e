//! Restock sync agent: drains the offline submission queue when connectivity
//! returns.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use restock::config::Command;
use restock::status::fetch_status;
use restock::{
    init_tracing, shutdown_signal, AgentError, CliArgs, Config, ConnectivityMonitor, Drainer,
    HttpRemote, ResponseTracker, SlotStore, SubmissionQueue, SyncAgent,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = CliArgs::parse();

    let config = match Config::from_path(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::Status => status(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Agent failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn status(config: Config) -> Result<(), AgentError> {
    let remote = HttpRemote::new(&config.remote)?;
    let report = fetch_status(&remote).await?;
    print!("{report}");
    Ok(())
}

async fn run(config: Config) -> Result<(), AgentError> {
    info!(
        remote = %config.remote.base_url,
        data_dir = %config.queue.data_dir.display(),
        "Starting restock sync agent"
    );

    let slots = Arc::new(SlotStore::open(&config.queue.data_dir).await?);
    let queue = Arc::new(SubmissionQueue::new(slots.clone()));
    let remote = Arc::new(HttpRemote::new(&config.remote)?);
    let drainer = Arc::new(Drainer::new(queue, remote.clone()));

    let shutdown = CancellationToken::new();

    let (monitor, online) = ConnectivityMonitor::new(remote.clone(), config.poll_interval());
    let tracker = ResponseTracker::new(slots, remote);
    let agent = SyncAgent::new(drainer, online.clone());

    let monitor_task = tokio::spawn(monitor.run(shutdown.clone()));
    let agent_task = tokio::spawn(agent.run(shutdown.clone()));
    let tracker_task = tokio::spawn(tracker.run(online, config.notify_interval(), shutdown.clone()));

    shutdown_signal().await;
    info!("Shutting down");
    shutdown.cancel();

    monitor_task.await?;
    agent_task.await?;
    tracker_task.await?;

    Ok(())
}
