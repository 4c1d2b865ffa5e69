//! Battle demo binary.
//!
//! Loads content (embedded or from `BATTLE_CONTENT_DIR`), lets the heuristic
//! AI play both sides and logs the outcome.
//!
//! ```bash
//! RUST_LOG=battle_runtime=debug cargo run -p battle-cli
//! BATTLE_SEED=7 BATTLE_JSON_EVENTS=1 cargo run -p battle-cli
//! ```

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use battle_content::{ContentBundle, ContentFactory};
use battle_core::{BattleEngine, Side};
use battle_runtime::{BattleSession, EventBus, FileSaveRepository, HeuristicAi, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::CliConfig;

const FINAL_SLOT: &str = "last-battle";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    let bundle = load_content(&config)?;
    tracing::info!(
        seed = bundle.config.game_seed,
        combatants = bundle.roster.len(),
        "content loaded"
    );

    let engine = BattleEngine::new(bundle.config, bundle.roster);
    let ai = Arc::new(HeuristicAi::default());
    let events = EventBus::new();
    let mut session = BattleSession::new(engine)
        .with_event_bus(events.clone())
        .with_provider(Side::Player, ai.clone())
        .with_provider(Side::Enemy, ai);

    if let Some(dir) = &config.save_dir {
        let repository = FileSaveRepository::new(dir)
            .with_context(|| format!("opening save directory {}", dir.display()))?;
        session = session.with_repository(Arc::new(repository));
    }

    let printer = config.json_events.then(|| spawn_printer(&events));

    let report = session.run_battle().await?;
    match report.winner {
        Some(side) => tracing::info!(%side, turns = report.turns, "battle won"),
        None => tracing::info!(turns = report.turns, "battle drawn"),
    }

    for combatant in session.engine().roster().iter() {
        tracing::info!(
            id = %combatant.id,
            name = %combatant.name,
            residual = combatant.stats.residual_hp(),
            fatal = combatant.stats.fatal_hp(),
            alive = combatant.is_alive(),
            "final state"
        );
    }

    if config.save_dir.is_some() {
        session.save(FINAL_SLOT)?;
    }

    drop(session);
    drop(events);
    if let Some(printer) = printer {
        printer.await?;
    }
    Ok(())
}

fn load_content(config: &CliConfig) -> Result<ContentBundle> {
    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::builtin(),
    };
    let mut bundle = factory.load_bundle().context("loading battle content")?;
    if let Some(seed) = config.seed {
        bundle.config.game_seed = seed;
    }
    if let Some(max_turns) = config.max_turns {
        bundle.config.max_turns = max_turns;
    }
    Ok(bundle)
}

/// Prints events from every topic as JSON lines until the bus is dropped.
fn spawn_printer(events: &EventBus) -> JoinHandle<()> {
    let receivers = events.subscribe_multiple(&[
        Topic::Turn,
        Topic::Input,
        Topic::Resolution,
        Topic::Battle,
    ]);
    tokio::spawn(async move {
        let mut handles = Vec::new();
        for (topic, mut rx) in receivers {
            handles.push(tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(err) => tracing::warn!(?topic, error = %err, "event not printable"),
                        },
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(?topic, skipped, "event printer lagged")
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "event printer task failed");
            }
        }
    })
}
