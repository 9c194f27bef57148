//! Parse lambda calculus expressions and print their canonical forms to
//! standard output.
//!
//! Example usage:
//!
//!     cargo run -- --expression "(X1)LY1.(X1)"
//!     cargo run -- --demo
//!     cargo run -- --random-count 5 --seed 42 --verbose

use clap::Parser;
use lambda_fsm_parser::end_to_end::{run_parser, RunConfig};
use log::{LevelFilter, Log, Metadata, Record};

// Writes log records to standard error.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        return metadata.level() <= log::max_level();
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
    let run_config = RunConfig::parse();

    let max_level = if run_config.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level);
    }

    let run_result = run_parser(&run_config);

    match run_result {
        Ok(output) => {
            println!("{}", output);
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            std::process::exit(1);
        }
    }
}
