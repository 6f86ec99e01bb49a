//! Re-create missing cards in every mapped target list.

use std::process::ExitCode;

use chrono::Utc;
use redoit_core::redo_all;

fn main() -> ExitCode {
    redoit_cli::init_tracing();
    println!("Attempting to recreate recurring cards...");

    let result = redoit_cli::connect()
        .and_then(|(config, remote)| Ok(redo_all(&remote, &config, Utc::now())?));
    match result {
        Ok(summary) => {
            println!(
                "...Successfully recreated {} cards across {} mappings on {} boards",
                summary.cloned, summary.mappings, summary.boards
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "redoit failed");
            println!("... Failed to recreate recurring cards with error {e:#}");
            ExitCode::FAILURE
        }
    }
}
