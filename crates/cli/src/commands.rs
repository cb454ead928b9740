//! Subcommand implementations.

use crate::output;
use bs_core::config::loader::{load_config, state_dir, CONFIG_DIR};
use bs_core::engine::runner::StepRequest;
use bs_core::registry::factory::BatchFactory;
use bs_core::state::driver::drive_with;
use bs_core::state::manager::BatchManager;
use bs_core::store::file_store::FileStatusStore;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::ipc::{Event, Op};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Load the project under `root` and wire it to file-backed status.
async fn load_manager(root: &Path) -> Result<BatchManager> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;
    let registry = BatchFactory::registry(&config, root).map_err(|e| eyre!("{e:#}"))?;
    let store = Arc::new(FileStatusStore::new(state_dir(root)));

    debug!(root = %root.display(), batches = registry.len(), "project loaded");
    Ok(BatchManager::new(registry, store.clone(), store, config.global))
}

pub async fn list(root: &Path) -> Result<()> {
    let manager = load_manager(root).await?;
    if manager.registry().is_empty() {
        println!("No batches configured in {}", root.join(CONFIG_DIR).display());
        return Ok(());
    }
    for definition in manager.registry().list() {
        output::print_batch(&definition);
    }
    Ok(())
}

pub async fn step(
    root: &Path,
    process_id: &str,
    current_step: u64,
    total_from_request: u64,
    args: Vec<(String, Value)>,
) -> Result<()> {
    let manager = load_manager(root).await?;
    let request = StepRequest::new(current_step, total_from_request)
        .with_overrides(args.into_iter().collect::<QueryArgs>());

    let result = manager.run_step_with(process_id, request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn run(
    root: &Path,
    process_id: &str,
    max_steps: Option<u64>,
    json: bool,
    args: Vec<(String, Value)>,
) -> Result<()> {
    let manager = load_manager(root).await?;
    let max_steps = max_steps.unwrap_or(manager.global().max_steps);
    let overrides: QueryArgs = args.into_iter().collect();

    let last = drive_with(&manager, process_id, &overrides, max_steps, |result| {
        if !json {
            output::print_step(result);
            return;
        }
        match serde_json::to_string(result) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "could not encode step result"),
        }
    })
    .await?;

    if !json {
        output::print_summary(&last);
    }
    Ok(())
}

pub async fn reset(root: &Path, process_id: &str) -> Result<()> {
    let manager = load_manager(root).await?;
    let result = manager.reset(process_id).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn status(root: &Path, process_id: &str) -> Result<()> {
    let manager = load_manager(root).await?;
    match manager.run_status(process_id).await? {
        Some(record) => output::print_run_status(process_id, &record),
        None => println!("{process_id} has not run yet"),
    }
    Ok(())
}

/// Answer one `Op` per stdin line with one `Event` per stdout line.
///
/// Malformed lines are answered with an `error` event; the loop ends at EOF.
pub async fn serve(root: &Path) -> Result<()> {
    let manager = load_manager(root).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<Op>(line) {
            Ok(op) => manager.handle(op).await,
            Err(e) => Event::Error {
                process_id: String::new(),
                error: format!("invalid request: {e}"),
            },
        };

        let mut encoded = serde_json::to_string(&event)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
