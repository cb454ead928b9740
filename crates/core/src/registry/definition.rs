//! Batch definitions.
//!
//! A `BatchDefinition` binds a [`BatchConfig`] to the collaborators that do
//! the actual work: the result source the batch pages through and the
//! callback applied to every item.

use crate::callbacks::base::ItemCallback;
use crate::engine::error::{BatchError, BatchResult};
use crate::sources::base::ResultSource;
use bs_protocol::batch_models::{BatchConfig, QueryArgs};
use bs_protocol::config_models::GlobalConfig;
use std::sync::Arc;

/// Extension point reporting the page size used for step accounting.
///
/// Receives the batch configuration and the page size derived from the query
/// arguments; returns the page size the batch actually paginates by.
pub type PageSizeHook = Arc<dyn Fn(&BatchConfig, i64) -> i64 + Send + Sync>;

/// Immutable per-batch-type definition. Created once at registration.
pub struct BatchDefinition {
    config: BatchConfig,
    source: Arc<dyn ResultSource>,
    callback: Arc<dyn ItemCallback>,
    page_size_hook: Option<PageSizeHook>,
}

impl std::fmt::Debug for BatchDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDefinition")
            .field("config", &self.config)
            .field("page_size_hook", &self.page_size_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl BatchDefinition {
    /// Start building a definition for `process_id`.
    pub fn builder(process_id: impl Into<String>) -> BatchDefinitionBuilder {
        BatchDefinitionBuilder {
            config: BatchConfig::new(process_id, ""),
            source: None,
            callback: None,
            page_size_hook: None,
        }
    }

    /// Start building a definition from an already-parsed configuration.
    pub fn from_config(config: BatchConfig) -> BatchDefinitionBuilder {
        BatchDefinitionBuilder {
            config,
            source: None,
            callback: None,
            page_size_hook: None,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn process_id(&self) -> &str {
        &self.config.process_id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn default_args(&self) -> &QueryArgs {
        &self.config.default_args
    }

    pub fn source(&self) -> &dyn ResultSource {
        self.source.as_ref()
    }

    pub fn callback(&self) -> &dyn ItemCallback {
        self.callback.as_ref()
    }

    /// Query argument the page size travels in: the batch's own
    /// `page_size_param`, or `default_param` when it has none.
    pub fn page_size_param<'a>(&'a self, default_param: &'a str) -> &'a str {
        self.config.page_size_param.as_deref().unwrap_or(default_param)
    }

    /// Page size the query paginates by: the value of the page-size argument
    /// in `args`, or the global default when the argument is absent.
    pub fn query_page_size(&self, args: &QueryArgs, global: &GlobalConfig) -> BatchResult<i64> {
        let page_size = args
            .get_i64(self.page_size_param(&global.page_size_param))
            .unwrap_or(global.default_page_size);
        ensure_positive_page_size(&self.config.process_id, page_size)
    }

    /// Page size used for step accounting, after the override hook and the
    /// configured override have had their say.
    pub fn effective_page_size(&self, query_page_size: i64) -> BatchResult<i64> {
        let page_size = match (&self.page_size_hook, self.config.page_size_override) {
            (Some(hook), _) => hook(&self.config, query_page_size),
            (None, Some(fixed)) => fixed,
            (None, None) => query_page_size,
        };
        ensure_positive_page_size(&self.config.process_id, page_size)
    }
}

fn ensure_positive_page_size(process_id: &str, page_size: i64) -> BatchResult<i64> {
    if page_size <= 0 {
        return Err(BatchError::InvalidConfiguration(format!(
            "{process_id}: page size must be a positive integer, got {page_size}"
        )));
    }
    Ok(page_size)
}

/// Builder for [`BatchDefinition`]. Validation happens in [`build`].
///
/// [`build`]: BatchDefinitionBuilder::build
pub struct BatchDefinitionBuilder {
    config: BatchConfig,
    source: Option<Arc<dyn ResultSource>>,
    callback: Option<Arc<dyn ItemCallback>>,
    page_size_hook: Option<PageSizeHook>,
}

impl BatchDefinitionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn default_arg(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.config.default_args.set(key, value);
        self
    }

    pub fn default_args(mut self, args: QueryArgs) -> Self {
        self.config.default_args = args;
        self
    }

    pub fn page_size_param(mut self, param: impl Into<String>) -> Self {
        self.config.page_size_param = Some(param.into());
        self
    }

    pub fn page_size_override(mut self, page_size: i64) -> Self {
        self.config.page_size_override = Some(page_size);
        self
    }

    pub fn page_size_hook(mut self, hook: PageSizeHook) -> Self {
        self.page_size_hook = Some(hook);
        self
    }

    pub fn source(mut self, source: Arc<dyn ResultSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn callback(mut self, callback: Arc<dyn ItemCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Validate and produce the definition.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::InvalidConfiguration` if:
    /// - The process id is empty or contains characters other than ASCII
    ///   letters, digits, `-` and `_`
    /// - The name is empty
    /// - No result source or no callback was supplied
    /// - A configured page size (argument or override) is not positive
    pub fn build(self) -> BatchResult<BatchDefinition> {
        let config = self.config;
        let process_id = config.process_id.clone();
        let invalid = |reason: &str| {
            BatchError::InvalidConfiguration(format!("{process_id}: {reason}"))
        };

        if process_id.is_empty() {
            return Err(BatchError::InvalidConfiguration(
                "process id must not be empty".to_string(),
            ));
        }
        if !process_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(
                "process id may only contain ASCII letters, digits, '-' and '_'",
            ));
        }
        if config.name.trim().is_empty() {
            return Err(invalid("a batch name is required"));
        }
        let source = self
            .source
            .ok_or_else(|| invalid("a result source is required"))?;
        let callback = self
            .callback
            .ok_or_else(|| invalid("an item callback is required"))?;

        if let Some(param) = config.page_size_param.as_deref() {
            if config.default_args.get(param).is_some() {
                match config.default_args.get_i64(param) {
                    Some(page_size) if page_size > 0 => {}
                    _ => {
                        return Err(invalid(&format!(
                            "default argument '{param}' must be a positive integer"
                        )))
                    }
                }
            }
        }
        if let Some(page_size) = config.page_size_override {
            ensure_positive_page_size(&process_id, page_size)?;
        }

        Ok(BatchDefinition {
            config,
            source,
            callback,
            page_size_hook: self.page_size_hook,
        })
    }
}
