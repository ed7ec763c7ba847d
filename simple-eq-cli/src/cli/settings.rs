//! Resolve chain settings from a JSON file plus command-line overrides.

use clap::ArgMatches;
use log::info;
use simple_eq_lib::{ChainSettings, ParameterStore, Slope};

use super::error::Result;

/// Build the settings for a command.
///
/// Starts from `--settings` (or defaults), applies any per-parameter flags,
/// then passes everything through a [`ParameterStore`] so values are clamped
/// and snapped exactly as a host would.
pub fn resolve_settings(args: &ArgMatches) -> Result<ChainSettings> {
    let mut settings = match args.get_one::<String>("settings") {
        Some(path) => {
            info!("Loading settings from {}", path);
            ChainSettings::from_json_file(path)?
        }
        None => ChainSettings::default(),
    };

    if let Some(&value) = args.get_one::<f32>("peak-freq") {
        settings.peak_freq = value;
    }
    if let Some(&value) = args.get_one::<f32>("peak-gain") {
        settings.peak_gain_db = value;
    }
    if let Some(&value) = args.get_one::<f32>("peak-q") {
        settings.peak_q = value;
    }
    if let Some(&value) = args.get_one::<f32>("low-cut-freq") {
        settings.low_cut_freq = value;
    }
    if let Some(&value) = args.get_one::<Slope>("low-cut-slope") {
        settings.low_cut_slope = value;
    }
    if let Some(&value) = args.get_one::<f32>("high-cut-freq") {
        settings.high_cut_freq = value;
    }
    if let Some(&value) = args.get_one::<Slope>("high-cut-slope") {
        settings.high_cut_slope = value;
    }

    let store = ParameterStore::new();
    settings.write_to_store(&store);
    Ok(ChainSettings::from_store(&store))
}
