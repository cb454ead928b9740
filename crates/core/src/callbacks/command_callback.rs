//! Per-item callback that runs an external command.

use crate::callbacks::base::{CallbackError, ItemCallback};
use async_trait::async_trait;
use bs_protocol::item_models::Item;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Environment variable carrying the item identity to the command.
pub const ITEM_ID_ENV: &str = "BATCH_STEP_ITEM_ID";

/// Runs a command once per item.
///
/// The item is written to the command's stdin as JSON and its identity is
/// exported in [`ITEM_ID_ENV`]. A zero exit status marks the item as
/// succeeded; anything else is a per-item failure whose message is the
/// command's trimmed stderr.
pub struct CommandCallback {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandCallback {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: PathBuf::from("."),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }
}

#[async_trait]
impl ItemCallback for CommandCallback {
    async fn call(&self, item: &Item) -> Result<(), CallbackError> {
        let payload = serde_json::to_vec(item)
            .map_err(|e| CallbackError(format!("Failed to encode item: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env(ITEM_ID_ENV, &item.id)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CallbackError(format!("Failed to spawn '{}': {e}", self.program)))?;

        // Feed stdin while stderr is drained, or a chatty command that reads
        // late would block on a full pipe
        let stdin = child.stdin.take();
        let item_id = item.id.clone();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(&payload).await {
                    debug!(item_id = %item_id, error = %e, "command did not read its input");
                }
            }
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CallbackError(format!("Failed to wait for '{}': {e}", self.program)))?;
        if let Err(e) = writer.await {
            debug!(item_id = %item.id, error = %e, "stdin writer did not complete");
        }

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(CallbackError(format!(
                "'{}' exited with {}",
                self.program, output.status
            )))
        } else {
            Err(CallbackError(stderr))
        }
    }
}
