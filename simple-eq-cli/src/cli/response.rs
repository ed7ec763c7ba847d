//! Frequency response report for a settings snapshot.

use clap::ArgMatches;
use serde::Serialize;
use simple_eq_lib::constants::DEFAULT_SAMPLE_RATE;
use simple_eq_lib::{ChainSettings, FilterChainEngine};

use super::error::Result;
use super::settings::resolve_settings;

const MIN_FREQ_HZ: f64 = 20.0;
const MAX_FREQ_HZ: f64 = 20_000.0;

#[derive(Debug, Serialize)]
pub struct ResponsePoint {
    pub freq_hz: f64,
    pub magnitude_db: f32,
}

#[derive(Debug, Serialize)]
pub struct ResponseReport {
    pub sample_rate: f64,
    pub settings: ChainSettings,
    pub points: Vec<ResponsePoint>,
}

/// Run the `response` subcommand.
pub fn run_response(args: &ArgMatches) -> Result<i32> {
    let sample_rate = args
        .get_one::<f64>("sample-rate")
        .copied()
        .unwrap_or(DEFAULT_SAMPLE_RATE as f64);
    let frequencies: Vec<f64> = match args.get_many::<f64>("frequency") {
        Some(values) => values.copied().collect(),
        None => log_spaced(args.get_one::<usize>("points").copied().unwrap_or(31)),
    };

    let settings = resolve_settings(args)?;
    let report = build_report(sample_rate, settings, &frequencies)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

pub fn build_report(
    sample_rate: f64,
    settings: ChainSettings,
    frequencies: &[f64],
) -> Result<ResponseReport> {
    let mut engine = FilterChainEngine::new(sample_rate)?;
    engine.update_filters(&settings)?;

    let points = frequencies
        .iter()
        .zip(engine.response_db(frequencies))
        .map(|(&freq_hz, magnitude_db)| ResponsePoint {
            freq_hz,
            magnitude_db,
        })
        .collect();

    Ok(ResponseReport {
        sample_rate,
        settings,
        points,
    })
}

/// `count` frequencies spaced evenly on a log axis from 20Hz to 20kHz.
pub fn log_spaced(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![MIN_FREQ_HZ],
        _ => {
            let ratio = (MAX_FREQ_HZ / MIN_FREQ_HZ).ln() / (count - 1) as f64;
            (0..count)
                .map(|idx| MIN_FREQ_HZ * (ratio * idx as f64).exp())
                .collect()
        }
    }
}
