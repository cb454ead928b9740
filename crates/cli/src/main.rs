//! `batch-step`: run resumable, step-wise batch jobs from the command line.

mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "batch-step", version, about = "Run resumable, step-wise batch jobs")]
struct Cli {
    /// Project root containing the `.batch-step/` directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured batches
    List,

    /// Run a single step and print its result envelope as JSON
    Step {
        process_id: String,

        /// 1-based step number
        #[arg(long, default_value_t = 1)]
        step: u64,

        /// `total_num_results` reported by the previous step
        #[arg(long, default_value_t = 0)]
        total: u64,

        /// Query argument override (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_query_arg)]
        args: Vec<(String, Value)>,
    },

    /// Run a batch until it finishes
    Run {
        process_id: String,

        /// Give up after this many steps (defaults to `max-steps` in config.toml)
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print every envelope as a JSON line instead of a progress line
        #[arg(long)]
        json: bool,

        /// Query argument override (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_query_arg)]
        args: Vec<(String, Value)>,
    },

    /// Forget which items succeeded so the next run processes everything
    Reset { process_id: String },

    /// Show the last recorded run status
    Status { process_id: String },

    /// Answer JSON-line requests from stdin on stdout
    Serve,
}

/// Parse `key=value`. Values that are valid JSON keep their type, anything
/// else is taken as a string.
fn parse_query_arg(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();

    let cli = Cli::parse();
    let root = cli.root;

    match cli.command {
        Command::List => commands::list(&root).await,
        Command::Step {
            process_id,
            step,
            total,
            args,
        } => commands::step(&root, &process_id, step, total, args).await,
        Command::Run {
            process_id,
            max_steps,
            json,
            args,
        } => commands::run(&root, &process_id, max_steps, json, args).await,
        Command::Reset { process_id } => commands::reset(&root, &process_id).await,
        Command::Status { process_id } => commands::status(&root, &process_id).await,
        Command::Serve => commands::serve(&root).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_arg() {
        assert_eq!(
            parse_query_arg("per_page=5").unwrap(),
            ("per_page".to_string(), json!(5))
        );
        assert_eq!(
            parse_query_arg("status=draft").unwrap(),
            ("status".to_string(), json!("draft"))
        );
        assert_eq!(
            parse_query_arg("filter={\"a\":1}").unwrap(),
            ("filter".to_string(), json!({ "a": 1 }))
        );
        assert!(parse_query_arg("novalue").is_err());
        assert!(parse_query_arg("=5").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
