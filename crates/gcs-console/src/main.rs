//! Headless operator console.
//!
//! Wires the engine loop to logging render surfaces, runs the scripted
//! telemetry scenario, and forwards stdin lines as chat commands. Type
//! `quit` (or close stdin) to end the mission and shut down.

mod render;
mod scenario;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcs_engine::{persistence, run_engine, Engine, EngineEvent, MissionState, OperatorAction};
use gcs_reasoning::OllamaClient;

use crate::render::{LogMap, LogPanel};

#[derive(Parser, Debug)]
#[command(about = "Headless drone operator console")]
struct Args {
    /// Reasoning service URL
    #[arg(long, default_value = "http://localhost:11434")]
    reasoning_url: String,

    /// Chat model served by the reasoning endpoint
    #[arg(long, default_value = "llama3.2")]
    model: String,

    /// Root folder for mission artifacts
    #[arg(long, default_value = "./missions")]
    mission_root: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gcs_console=info".parse()?)
                .add_directive("gcs_engine=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let state = MissionState::new(Utc::now());
    let mission_dir = persistence::ensure_mission_dir(&args.mission_root, state.mission_id())?;
    tracing::info!(mission = state.mission_id(), dir = %mission_dir.display(), "mission started");

    let reasoning = Arc::new(OllamaClient::new(args.reasoning_url, args.model));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, _) = broadcast::channel(1);

    let engine = Engine::new(
        state,
        Box::new(LogMap::default()),
        Box::new(LogPanel),
        reasoning,
        events_tx.clone(),
    );
    let engine_task = tokio::spawn(run_engine(engine, events_rx, shutdown_tx.subscribe()));
    tokio::spawn(scenario::run(events_tx.clone()));

    // Chat runs on stdin; every line goes through the dispatch pipeline.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let text = line.trim().to_string();
        if text.eq_ignore_ascii_case("quit") {
            break;
        }
        if !text.is_empty() {
            let _ = events_tx.send(EngineEvent::ChatSubmitted { text });
        }
    }

    let _ = events_tx.send(EngineEvent::Operator(OperatorAction::EndMission));
    // Give the engine a moment to drain before pulling the plug.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let _ = shutdown_tx.send(());
    let _ = engine_task.await;

    tracing::info!("console shut down");
    Ok(())
}
