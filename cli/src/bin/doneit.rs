//! Move every completed card into its board's "Done" list.

use std::process::ExitCode;

use redoit_core::done_all;

fn main() -> ExitCode {
    redoit_cli::init_tracing();
    println!("Attempting to move completed cards...");

    let result = redoit_cli::connect()
        .and_then(|(config, remote)| Ok(done_all(&remote, &config.credentials)?));
    match result {
        Ok(summary) => {
            println!(
                "...Successfully moved {} completed cards on {} boards",
                summary.moved, summary.boards
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "doneit failed");
            println!("... Failed to move completed cards with error {e:#}");
            ExitCode::FAILURE
        }
    }
}
