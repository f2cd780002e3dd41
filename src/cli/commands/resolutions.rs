//! Resolutions command: prints the H3 resolution catalogue

use crate::cli::args::{OutputFormat, ResolutionsArgs};
use crate::constants::{DEFAULT_RESOLUTION, RESOLUTION_LEVELS};
use anyhow::Context;
use colored::*;

pub fn run_resolutions(args: &ResolutionsArgs) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Human => print_table(),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(RESOLUTION_LEVELS)
                .context("Failed to serialise resolution table")?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn print_table() -> anyhow::Result<()> {
    println!("{}", "H3 Resolutions".bright_green().bold());
    println!(
        "{}",
        format!(
            "{:>5}  {:<14} {:<12} {}",
            "Level", "Scale", "Edge", "Use case"
        )
        .bright_cyan()
    );

    for level in RESOLUTION_LEVELS {
        let line = format!(
            "{:>5}  {:<14} {:<12} {} (e.g. {})",
            level.level, level.scale, level.edge_length, level.use_case, level.examples
        );
        if level.level == DEFAULT_RESOLUTION {
            println!("{} {}", line.bright_white().bold(), "[default]".bright_yellow());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
