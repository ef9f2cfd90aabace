// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stride session replay
//!
//! Runs one session against simulated sensors from a JSON script and prints
//! the final summary. Useful for exercising checkpoint data and the API
//! without a phone.

use anyhow::Context;
use serde::Deserialize;
use std::sync::Arc;
use stride_tracker::{
    config::Config,
    models::{FixedCheckpointTemplate, Participant, Session},
    sensors::{SimulatedLocation, SimulatedPedometer},
    storage::FileStore,
    AppShell,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// A replay script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Replay {
    session: ReplaySession,
    #[serde(default)]
    actions: Vec<ReplayAction>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum ReplaySession {
    Daily {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    Friend {
        id: String,
        target_steps: u64,
        participants: Vec<Participant>,
    },
    Event {
        id: String,
        #[serde(default)]
        fixed: Vec<FixedCheckpointTemplate>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum ReplayAction {
    Walk { steps: u64 },
    MoveTo { latitude: f64, longitude: f64 },
    Wait { ticks: u32 },
    Capture,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let path = std::env::args()
        .nth(1)
        .context("usage: stride-tracker <replay.json>")?;
    let script = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read replay script {}", path))?;
    let replay: Replay = serde_json::from_str(&script).context("Invalid replay script")?;

    let config = Config::from_env()?;
    tracing::info!(api = %config.api_base_url, replay = %path, "Starting session replay");

    let storage = Arc::new(FileStore::new(&config.storage_dir));
    let shell = AppShell::init(config, storage).await;
    tracing::info!(count = shell.catalog.len(), "Checkpoint catalog loaded");

    let api = Arc::new(shell.api_client().await?);
    let pedometer = Arc::new(SimulatedPedometer::new());
    let location = Arc::new(SimulatedLocation::new());
    let controller = shell
        .controller(api, pedometer.clone(), location.clone())
        .await;

    let session = match replay.session {
        ReplaySession::Daily { id } => Session::daily(id),
        ReplaySession::Friend {
            id,
            target_steps,
            participants,
        } => Session::friend(id, target_steps, participants),
        ReplaySession::Event { id, fixed } => {
            let checkpoints = shell.catalog.for_event(&id);
            let mut session = Session::event(id, checkpoints);
            if let Session::Event(event) = &mut session {
                event.fixed_templates = fixed;
            }
            session
        }
    };
    controller.start(session).await?;

    let tick = shell.config.tick_interval;
    for action in replay.actions {
        match action {
            ReplayAction::Walk { steps } => {
                pedometer.walk(steps);
            }
            ReplayAction::MoveTo {
                latitude,
                longitude,
            } => {
                location.move_to(latitude, longitude);
            }
            ReplayAction::Wait { ticks } => tokio::time::sleep(tick * ticks).await,
            ReplayAction::Capture => match controller.capture().await {
                Ok(outcome) => tracing::info!(
                    checkpoint = %outcome.checkpoint.name,
                    total_points = outcome.total_points,
                    "Captured"
                ),
                Err(e) => tracing::warn!(error = %e, "Capture failed"),
            },
        }
        // Let the sensor tasks observe the action
        tokio::task::yield_now().await;
    }

    let summary = controller.end().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    shell.dispose(Some(&controller)).await;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stride_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
