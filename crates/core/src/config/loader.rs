//! Reads a project's `.batch-step/` directory.
//!
//! ```text
//! .batch-step/
//!   config.toml        GlobalConfig
//!   batches/*.yaml     one BatchSpec per file (.yml also accepted)
//!   state/             run and item status, written by FileStatusStore
//! ```

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::{AppConfig, BatchSpec};
use bs_protocol::config_models::GlobalConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the configuration directory under a project root.
pub const CONFIG_DIR: &str = ".batch-step";

/// Directory holding persisted run and item status.
pub fn state_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join("state")
}

/// Load the configuration of the project at `root`.
///
/// Missing pieces fall back to defaults: no `.batch-step/` at all, no
/// `config.toml`, or no `batches/` directory are not errors.
///
/// # Errors
///
/// Fails on unreadable or malformed files, on a process id declared twice,
/// and on a non-positive `default-page-size`.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let bs_dir = root.join(CONFIG_DIR);
    if !bs_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&bs_dir)?;
    let batches = load_batches(&bs_dir)?;

    Ok(AppConfig { global, batches })
}

fn load_global_config(bs_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = bs_dir.join("config.toml");
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: config_path.clone(),
            source,
        })?;

    if config.default_page_size <= 0 {
        return Err(ConfigError::Invalid {
            path: config_path,
            reason: format!(
                "default-page-size must be a positive integer, got {}",
                config.default_page_size
            ),
        });
    }

    Ok(config)
}

/// Batch files in file-name order.
fn load_batches(bs_dir: &Path) -> ConfigResult<Vec<BatchSpec>> {
    let batches_dir = bs_dir.join("batches");
    if !batches_dir.exists() {
        return Ok(Vec::new());
    }

    let mut batches = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(&batches_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::Walk {
            path: batches_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let batch: BatchSpec =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(first) = seen.get(&batch.config.process_id) {
            return Err(ConfigError::DuplicateProcess {
                process_id: batch.config.process_id.clone(),
                path: path.to_path_buf(),
                first: first.clone(),
            });
        }
        seen.insert(batch.config.process_id.clone(), path.to_path_buf());

        batches.push(batch);
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::SourceSpec;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let bs_dir = root.join(CONFIG_DIR);

        fs::create_dir_all(bs_dir.join("batches")).expect("Failed to create batches dir");

        fs::write(bs_dir.join("config.toml"), "default-page-size = 20\nmax-steps = 50")
            .expect("Failed to write config.toml");

        let batch_yaml = r#"process-id: purge-drafts
name: Purge drafts
default-args:
  status: draft
  per_page: 5
page-size-param: per_page
source:
  json-file: data/posts.json
callback:
  command: ./purge.sh
  args: ["--force"]
"#;
        fs::write(bs_dir.join("batches/purge.yaml"), batch_yaml)
            .expect("Failed to write batch file");
        // Non-YAML files are ignored
        fs::write(bs_dir.join("batches/README.md"), "# notes").expect("Failed to write readme");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.global.default_page_size, 20);
        assert_eq!(config.global.max_steps, 50);
        assert_eq!(config.global.offset_param, "offset");
        assert_eq!(config.global.page_size_param, "per_page");

        assert_eq!(config.batches.len(), 1);
        let batch = &config.batches[0];
        assert_eq!(batch.config.process_id, "purge-drafts");
        assert_eq!(batch.config.name, "Purge drafts");
        assert_eq!(batch.config.default_args.get_i64("per_page"), Some(5));
        assert_eq!(batch.config.page_size_param.as_deref(), Some("per_page"));
        assert_eq!(batch.source, SourceSpec::JsonFile(PathBuf::from("data/posts.json")));
        assert_eq!(batch.callback.command, "./purge.sh");
        assert_eq!(batch.callback.args, vec!["--force".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_directory_returns_defaults() {
        let dir = tempdir().unwrap();

        let config = load_config(dir.path()).await.unwrap();

        assert_eq!(config.global, GlobalConfig::default());
        assert!(config.batches.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_process_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let batches = dir.path().join(CONFIG_DIR).join("batches");
        fs::create_dir_all(&batches).unwrap();

        let yaml = "process-id: dup\nname: Dup\nsource:\n  json-file: a.json\ncallback:\n  command: \"true\"\n";
        fs::write(batches.join("a.yaml"), yaml).unwrap();
        fs::write(batches.join("b.yml"), yaml).unwrap();

        let err = load_config(dir.path()).await.unwrap_err();
        match err {
            ConfigError::DuplicateProcess {
                process_id,
                path,
                first,
            } => {
                assert_eq!(process_id, "dup");
                assert!(first.ends_with("a.yaml"));
                assert!(path.ends_with("b.yml"));
            }
            other => panic!("expected a duplicate process error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_toml_and_yaml() {
        let dir = tempdir().unwrap();
        let bs_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&bs_dir).unwrap();
        fs::write(bs_dir.join("config.toml"), "default-page-size = [").unwrap();

        let err = load_config(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));

        fs::write(bs_dir.join("config.toml"), "default-page-size = 0").unwrap();
        let err = load_config(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        fs::remove_file(bs_dir.join("config.toml")).unwrap();
        fs::create_dir_all(bs_dir.join("batches")).unwrap();
        fs::write(bs_dir.join("batches/bad.yaml"), "name: [unterminated").unwrap();
        let err = load_config(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
