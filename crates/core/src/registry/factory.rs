//! Batch factory for creating definitions from configuration files.

use crate::callbacks::command_callback::CommandCallback;
use crate::config::models::{AppConfig, BatchSpec, SourceSpec};
use crate::registry::definition::BatchDefinition;
use crate::registry::BatchRegistry;
use crate::sources::adapters::JsonFileSource;
use crate::sources::base::Pagination;
use anyhow::{Context, Result};
use bs_protocol::config_models::GlobalConfig;
use std::path::Path;
use std::sync::Arc;

/// Factory turning `.batch-step/batches/*.yaml` specs into batch definitions.
pub struct BatchFactory;

impl BatchFactory {
    /// Create a definition from a spec.
    ///
    /// Relative source paths are resolved against `root`, and callbacks run
    /// with `root` as their working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting definition fails validation.
    pub fn create(spec: &BatchSpec, root: &Path, global: &GlobalConfig) -> Result<BatchDefinition> {
        let limit_param = spec
            .config
            .page_size_param
            .clone()
            .unwrap_or_else(|| global.page_size_param.clone());
        let pagination = Pagination {
            offset_param: global.offset_param.clone(),
            limit_param: Some(limit_param),
            default_limit: usize::try_from(global.default_page_size).unwrap_or(1),
        };

        let source = match &spec.source {
            SourceSpec::JsonFile(path) => {
                JsonFileSource::new(root.join(path)).with_pagination(pagination)
            }
        };

        let callback = CommandCallback::new(spec.callback.command.clone(), spec.callback.args.clone())
            .with_working_dir(root);

        BatchDefinition::from_config(spec.config.clone())
            .source(Arc::new(source))
            .callback(Arc::new(callback))
            .build()
            .with_context(|| format!("Invalid batch '{}'", spec.config.process_id))
    }

    /// Build a registry holding every batch of `config`.
    pub fn registry(config: &AppConfig, root: &Path) -> Result<BatchRegistry> {
        let mut registry = BatchRegistry::new();
        for spec in &config.batches {
            registry.register(Self::create(spec, root, &config.global)?)?;
        }
        Ok(registry)
    }
}
