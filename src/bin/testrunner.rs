use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use beebasm_testrunner::{default_assembler, run, Config};

use clap::Parser;
use log::LevelFilter;
use regex::Regex;
use simple_logger::SimpleLogger;

/// Run the beebasm regression tests
#[derive(Parser)]
#[command(name = "testrunner")]
struct Cli {
    /// Show test output on standard output instead of logging it to a file
    #[arg(short, long)]
    verbose: bool,

    /// Assembler under test [default: ./beebasm]
    #[arg(long)]
    assembler: Option<PathBuf>,

    /// Root of the test tree
    #[arg(long, default_value = "test")]
    root: PathBuf,

    /// Log file [default: <ROOT>/testlog.txt]
    #[arg(long)]
    log: Option<PathBuf>,

    /// Only run tests whose path below the root matches this regex
    #[arg(long)]
    filter: Option<Regex>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("{e}");
    }

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            println!("FAILURE: cannot determine working directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let assembler = cli
        .assembler
        .map(|a| cwd.join(a))
        .unwrap_or_else(|| default_assembler(&cwd));

    let mut config = Config::new(assembler, cwd.join(cli.root));
    config.verbose = cli.verbose;
    config.filter = cli.filter;
    if let Some(log) = cli.log {
        config.log_path = cwd.join(log);
    }

    match run(&config) {
        Ok(_) => {
            println!("SUCCESS: beebasm tests succeeded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("FAILURE: {e}");
            ExitCode::FAILURE
        }
    }
}
