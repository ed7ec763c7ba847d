//! CLI argument definitions for `simple-eq`.

use clap::{value_parser, Arg, ArgAction, Command};
use simple_eq_lib::Slope;

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("SimpleEQ")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Offline host for the SimpleEQ three-band equalizer")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Suppress log output on stderr"),
        )
        .subcommand(
            Command::new("render")
                .about("Filter a WAV file block by block and write the result")
                .arg(
                    Arg::new("INPUT")
                        .help("Input WAV file (mono or stereo)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("OUTPUT")
                        .help("Output WAV file")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .value_name("SAMPLES")
                        .default_value("512")
                        .value_parser(value_parser!(usize))
                        .help("Samples per channel handed to the processor per block"),
                )
                .args(settings_args()),
        )
        .subcommand(
            Command::new("response")
                .about("Print the magnitude response of the configured chain as JSON")
                .arg(
                    Arg::new("sample-rate")
                        .long("sample-rate")
                        .value_name("HZ")
                        .default_value("44100")
                        .value_parser(value_parser!(f64))
                        .help("Sample rate used for the filter design"),
                )
                .arg(
                    Arg::new("points")
                        .long("points")
                        .value_name("COUNT")
                        .default_value("31")
                        .value_parser(value_parser!(usize))
                        .help("Number of log-spaced frequencies between 20Hz and 20kHz"),
                )
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .short('f')
                        .value_name("HZ")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(f64))
                        .help("Evaluate at this frequency instead (repeatable)"),
                )
                .args(settings_args()),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .subcommand_required(true)
                .subcommand(
                    Command::new("settings-json")
                        .about("Print the default ChainSettings JSON payload"),
                ),
        )
        .subcommand(
            Command::new("bench")
                .about("Run a synthetic filter chain benchmark")
                .arg(
                    Arg::new("sweep")
                        .long("sweep")
                        .action(ArgAction::SetTrue)
                        .help("Sweep over several block sizes"),
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .value_name("SAMPLES")
                        .default_value("512")
                        .value_parser(value_parser!(usize))
                        .help("Block size for a single run"),
                )
                .arg(
                    Arg::new("input-seconds")
                        .long("input-seconds")
                        .value_name("SECONDS")
                        .default_value("1.0")
                        .value_parser(value_parser!(f32))
                        .help("Length of the noise input in seconds"),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .value_name("COUNT")
                        .default_value("5")
                        .value_parser(value_parser!(usize))
                        .help("Number of timed iterations"),
                )
                .args(settings_args()),
        )
}

/// Settings file plus per-parameter overrides shared by several commands.
fn settings_args() -> Vec<Arg> {
    vec![
        Arg::new("settings")
            .long("settings")
            .short('s')
            .value_name("PATH")
            .help("Path to a ChainSettings JSON file"),
        Arg::new("peak-freq")
            .long("peak-freq")
            .value_name("HZ")
            .value_parser(value_parser!(f32))
            .help("Peak center frequency (20-20000)"),
        Arg::new("peak-gain")
            .long("peak-gain")
            .value_name("DB")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f32))
            .help("Peak gain in dB (-24 to 24)"),
        Arg::new("peak-q")
            .long("peak-q")
            .value_name("Q")
            .value_parser(value_parser!(f32))
            .help("Peak quality (0.1-10)"),
        Arg::new("low-cut-freq")
            .long("low-cut-freq")
            .value_name("HZ")
            .value_parser(value_parser!(f32))
            .help("Low cut frequency (20-20000)"),
        Arg::new("low-cut-slope")
            .long("low-cut-slope")
            .value_name("DB_PER_OCT")
            .value_parser(parse_slope)
            .help("Low cut slope: 12, 24, 36 or 48"),
        Arg::new("high-cut-freq")
            .long("high-cut-freq")
            .value_name("HZ")
            .value_parser(value_parser!(f32))
            .help("High cut frequency (20-20000)"),
        Arg::new("high-cut-slope")
            .long("high-cut-slope")
            .value_name("DB_PER_OCT")
            .value_parser(parse_slope)
            .help("High cut slope: 12, 24, 36 or 48"),
    ]
}

fn parse_slope(value: &str) -> Result<Slope, String> {
    let trimmed = value.trim().to_ascii_lowercase();
    let digits = trimmed
        .strip_suffix("db/oct")
        .unwrap_or(trimmed.as_str())
        .trim();
    Slope::ALL
        .iter()
        .copied()
        .find(|slope| slope.db_per_octave().to_string() == digits)
        .ok_or_else(|| format!("expected 12, 24, 36 or 48, got \"{}\"", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn parses_slope_labels() {
        assert_eq!(parse_slope("24"), Ok(Slope::Db24));
        assert_eq!(parse_slope("48 db/Oct"), Ok(Slope::Db48));
        assert!(parse_slope("18").is_err());
    }

    #[test]
    fn render_accepts_overrides() {
        let matches = build_cli()
            .try_get_matches_from([
                "simple-eq",
                "render",
                "in.wav",
                "out.wav",
                "--peak-gain",
                "-6",
                "--low-cut-slope",
                "36",
            ])
            .expect("parse");
        let (name, render) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "render");
        assert_eq!(render.get_one::<f32>("peak-gain"), Some(&-6.0));
        assert_eq!(render.get_one::<Slope>("low-cut-slope"), Some(&Slope::Db36));
        assert_eq!(render.get_one::<usize>("block-size"), Some(&512));
    }
}
