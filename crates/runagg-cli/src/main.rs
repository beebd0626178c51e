use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    aggregate::{self, AggregateArgs},
    layout::{self, LayoutArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "runagg", about = "Replicate log aggregation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the summary and time-series tables from replicate directories.
    Aggregate(AggregateArgs),
    /// Print the default layout as YAML, ready to be edited and passed back.
    Layout(LayoutArgs),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result: Result<(), Box<dyn Error>> = match cli.command {
        Command::Aggregate(args) => aggregate::run(&args),
        Command::Layout(args) => layout::run(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
