//! Command implementations for the CSV H3 processor CLI
//!
//! Each command lives in its own module:
//! - `process`: index one CSV file and report the counts
//! - `resolutions`: print the H3 resolution catalogue

pub mod process;
pub mod resolutions;
pub mod shared;

pub use shared::JobReport;

use crate::cli::args::{Args, Commands};
use anyhow::anyhow;
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand named in `args`
///
/// A running job checks `cancellation_token` before each row.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> anyhow::Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args, cancellation_token).await?;
            Ok(())
        }
        Some(Commands::Resolutions(resolutions_args)) => {
            resolutions::run_resolutions(&resolutions_args)
        }
        None => Err(anyhow!("No command given")),
    }
}
