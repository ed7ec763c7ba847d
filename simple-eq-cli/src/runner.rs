use clap::ArgMatches;
use log::{debug, error};
use simple_eq_lib::ChainSettings;

use crate::cli;
use crate::cli::error::Result;

/// Dispatch the selected subcommand and return the process exit code.
pub fn run(args: &ArgMatches) -> Result<i32> {
    match args.subcommand() {
        Some(("render", sub)) => cli::render::run_render(sub),
        Some(("response", sub)) => cli::response::run_response(sub),
        Some(("bench", sub)) => cli::bench::run_bench(sub),
        Some(("create", sub)) => run_create(sub),
        Some((name, _)) => {
            error!("Unknown command: {}", name);
            Ok(-1)
        }
        None => Ok(-1),
    }
}

fn run_create(args: &ArgMatches) -> Result<i32> {
    match args.subcommand() {
        Some(("settings-json", _)) => {
            debug!("Emitting default settings");
            println!("{}", ChainSettings::default().to_json_pretty()?);
            Ok(0)
        }
        _ => Ok(-1),
    }
}
