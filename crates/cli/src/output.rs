//! Human-readable terminal output.

use bs_core::registry::definition::BatchDefinition;
use bs_protocol::run_models::RunStatusRecord;
use bs_protocol::step_models::{StepResult, StepStatus};
use colored::{ColoredString, Colorize};

pub fn status_label(status: StepStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        StepStatus::Running => label.yellow(),
        StepStatus::Finished => label.green(),
        StepStatus::NoResult => label.blue(),
        StepStatus::Failed => label.red(),
        StepStatus::Reset => label.cyan(),
    }
}

pub fn print_batch(definition: &BatchDefinition) {
    println!("{}  {}", definition.process_id().bold(), definition.name());
}

pub fn print_step(result: &StepResult) {
    println!(
        "step {}/{} {:>3}% {} ({} items, {} errors)",
        result.current_step,
        result.total_steps,
        result.progress,
        status_label(result.status),
        result.query_results.len(),
        result.result_errors.len()
    );
    for error in &result.result_errors {
        println!("  {} {}: {}", "error".red(), error.item_id, error.message);
    }
}

pub fn print_summary(result: &StepResult) {
    let outcome = if result.success {
        "ok".green()
    } else {
        "with errors".red()
    };
    println!(
        "{} {} after {} results ({})",
        result.process_id.bold(),
        status_label(result.status),
        result.total_num_results,
        outcome
    );
}

pub fn print_run_status(process_id: &str, record: &RunStatusRecord) {
    println!(
        "{} {} at {}",
        process_id.bold(),
        status_label(record.status),
        record.timestamp.to_rfc3339()
    );
    for message in &record.messages {
        println!("  {message}");
    }
}
