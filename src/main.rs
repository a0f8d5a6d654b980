// gcalsync-desync
// Removes every blocker event gcalsync placed on remote calendars.

use anyhow::Context;
use gcalsync::utils::logging;
use gcalsync::{desync_calendars, DesyncOptions};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let options = DesyncOptions::default();
    let mut stdout = std::io::stdout().lock();

    match desync_calendars(&options, &mut stdout)
        .await
        .context("Calendar desynchronization failed")
    {
        Ok(summary) => {
            log::info!(
                "Removed {} blocker events ({} already absent)",
                summary.purged,
                summary.not_found
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            logging::log_error_with_context(&e, "desync");
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
