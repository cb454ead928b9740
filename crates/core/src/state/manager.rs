//! Batch manager for dispatching driver requests.
//!
//! The BatchManager is the single entry point a transport talks to. It looks
//! batches up in the registry, runs steps and resets against the status
//! stores, and persists the run status at the end of every invocation.

use crate::engine::error::{BatchError, BatchResult};
use crate::engine::runner::{StepRequest, StepRunner};
use crate::registry::BatchRegistry;
use crate::store::base::{ItemStatusStore, RunStatusStore};
use crate::store::memory_store::MemoryStatusStore;
use bs_protocol::config_models::GlobalConfig;
use bs_protocol::ipc::{Event, Op};
use bs_protocol::run_models::RunStatusRecord;
use bs_protocol::step_models::{StepResult, StepStatus};
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatches step, reset and status requests to registered batches.
///
/// The manager holds no per-run state; everything a step needs is either in
/// the request or in the stores. It does not serialize concurrent requests
/// for the same process id; that is left to the transport.
pub struct BatchManager {
    registry: BatchRegistry,
    item_store: Arc<dyn ItemStatusStore>,
    run_store: Arc<dyn RunStatusStore>,
    global: GlobalConfig,
}

impl BatchManager {
    /// Create a new BatchManager.
    ///
    /// # Arguments
    ///
    /// * `registry` - The registered batch definitions
    /// * `item_store` - Per-item status records
    /// * `run_store` - Per-process run status records
    /// * `global` - Global settings (default page size, offset argument)
    pub fn new(
        registry: BatchRegistry,
        item_store: Arc<dyn ItemStatusStore>,
        run_store: Arc<dyn RunStatusStore>,
        global: GlobalConfig,
    ) -> Self {
        Self {
            registry,
            item_store,
            run_store,
            global,
        }
    }

    /// Create a manager whose stores live in memory.
    pub fn in_memory(registry: BatchRegistry, global: GlobalConfig) -> Self {
        let store = Arc::new(MemoryStatusStore::new());
        Self::new(registry, store.clone(), store, global)
    }

    pub fn registry(&self) -> &BatchRegistry {
        &self.registry
    }

    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    /// Run one step of a batch with its default query arguments.
    ///
    /// # Arguments
    ///
    /// * `process_id` - The batch to run
    /// * `current_step` - 1-based step number
    /// * `total_from_request` - `total_num_results` of the previous response
    ///
    /// # Errors
    ///
    /// Returns an error if the process is unknown, the step number is 0, or
    /// the result source or a store fails. A failed step is recorded as
    /// `failed` in the run status before the error is returned.
    pub async fn run_step(
        &self,
        process_id: &str,
        current_step: u64,
        total_from_request: u64,
    ) -> BatchResult<StepResult> {
        self.run_step_with(process_id, StepRequest::new(current_step, total_from_request))
            .await
    }

    /// Run one step with an explicit request, including query overrides.
    pub async fn run_step_with(
        &self,
        process_id: &str,
        request: StepRequest,
    ) -> BatchResult<StepResult> {
        let definition = self.registry.get(process_id)?;
        let runner = StepRunner::new(&definition, self.item_store.as_ref(), &self.global);

        match runner.run(&request).await {
            Ok(result) => {
                let messages = result
                    .result_errors
                    .iter()
                    .map(|e| format!("{}: {}", e.item_id, e.message))
                    .collect();
                self.run_store
                    .save_run_status(process_id, &RunStatusRecord::now(result.status, messages))
                    .await?;
                Ok(result)
            }
            Err(e) => {
                warn!(process_id, step = request.current_step, error = %e, "step failed");
                let record = RunStatusRecord::now(StepStatus::Failed, vec![e.to_string()]);
                if let Err(store_err) = self.run_store.save_run_status(process_id, &record).await {
                    warn!(process_id, error = %store_err, "could not record failed step");
                }
                Err(e)
            }
        }
    }

    /// Clear all per-item status of a batch and mark the run as reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the process is unknown or a store fails.
    pub async fn reset(&self, process_id: &str) -> BatchResult<StepResult> {
        let definition = self.registry.get(process_id)?;

        self.item_store.clear_all(definition.process_id()).await?;
        self.run_store
            .save_run_status(
                process_id,
                &RunStatusRecord::now(StepStatus::Reset, Vec::new()),
            )
            .await?;

        info!(process_id, "batch reset");
        Ok(StepResult::reset(process_id))
    }

    /// Last persisted run status of a batch, if it ever ran.
    pub async fn run_status(&self, process_id: &str) -> BatchResult<Option<RunStatusRecord>> {
        self.registry.get(process_id)?;
        Ok(self.run_store.load_run_status(process_id).await?)
    }

    /// Serve one driver request. Errors are answered with `Event::Error`.
    pub async fn handle(&self, op: Op) -> Event {
        match op {
            Op::RunStep {
                process_id,
                current_step,
                total_from_request,
            } => {
                let result = self
                    .run_step(&process_id, current_step, total_from_request)
                    .await;
                Self::into_event(process_id, result.map(Event::StepResult))
            }
            Op::Reset { process_id } => {
                let result = self.reset(&process_id).await;
                Self::into_event(process_id, result.map(Event::StepResult))
            }
            Op::GetRunStatus { process_id } => {
                let result = self.run_status(&process_id).await;
                let event = result.map(|record| Event::RunStatus {
                    process_id: process_id.clone(),
                    record,
                });
                Self::into_event(process_id, event)
            }
        }
    }

    fn into_event(process_id: String, result: BatchResult<Event>) -> Event {
        result.unwrap_or_else(|e: BatchError| Event::Error {
            process_id,
            error: e.to_string(),
        })
    }
}
