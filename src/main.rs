use clap::Parser;
use csv_h3_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancelled on Ctrl-C; the running job stops before its next row
        let cancellation_token = CancellationToken::new();

        let run = commands::run(args, cancellation_token.clone());
        tokio::pin!(run);

        tokio::select! {
            result = &mut run => result,
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                        cancellation_token.cancel();
                    }
                    Err(e) => eprintln!("Failed to install CTRL+C handler: {}", e),
                }
                run.await
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("csv-h3 - H3 Geospatial Indexing for CSV Files");
    println!("=============================================");
    println!();
    println!("Append an H3 cell index to every row of a CSV file that has");
    println!("latitude and longitude columns.");
    println!();
    println!("USAGE:");
    println!("    csv-h3 <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process       Add an h3_index column to a CSV file (main command)");
    println!("    resolutions   List H3 resolutions with approximate cell sizes");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Index a file at the default resolution (8):");
    println!("    csv-h3 process points.csv");
    println!();
    println!("    # Custom columns, resolution and output:");
    println!("    csv-h3 process points.csv --lat-column lat_deg --lng-column lon_deg \\");
    println!("                              -r 10 -o indexed.csv");
    println!();
    println!("    # Headerless, semicolon-delimited input with coordinates in columns 2 and 3:");
    println!("    csv-h3 process raw.csv --no-headers --lat-column 2 --lng-column 3 -d ';'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    csv-h3 <COMMAND> --help");
}
