mod cli;
mod commands;
mod error;
mod paths;

use std::fs;
use std::fs::File;

use clap::Parser;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::error::exit_with_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::run(cli).await {
        exit_with_error(e);
    }
}

fn terminal_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Warnings and above go to stderr (more with `-v`); everything from debug
/// up goes to `latest.log` in the cache directory.
fn init_logging(verbose: u8) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level(verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    paths::rotate_logs();
    if let Some(log_path) = paths::log_file() {
        if let Some(parent) = log_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("warning: cannot create log directory {}: {}", parent.display(), e);
            }
        }
        match File::create(&log_path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("warning: cannot open log file {}: {}", log_path.display(), e),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("warning: logging disabled: {}", e);
    }
    log::debug!("tatua {} starting", env!("CARGO_PKG_VERSION"));
}
