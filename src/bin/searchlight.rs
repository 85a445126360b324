//! Searchlight CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use searchlight::cli::args::SearchlightArgs;
use searchlight::cli::commands::execute_command;

fn main() {
    let args = SearchlightArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
