//! Offline rendering of WAV files through the equalizer.

use std::sync::Arc;

use clap::ArgMatches;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use simple_eq_lib::constants::DEFAULT_BLOCK_SIZE;
use simple_eq_lib::processor::{BusLayout, ChannelSet};
use simple_eq_lib::{EqProcessor, ParameterStore};

use super::error::{CliError, Result};
use super::settings::resolve_settings;

/// Run the `render` subcommand.
pub fn run_render(args: &ArgMatches) -> Result<i32> {
    let input = args
        .get_one::<String>("INPUT")
        .ok_or_else(|| CliError::Unsupported("missing input path".to_string()))?;
    let output = args
        .get_one::<String>("OUTPUT")
        .ok_or_else(|| CliError::Unsupported("missing output path".to_string()))?;
    let block_size = args
        .get_one::<usize>("block-size")
        .copied()
        .unwrap_or(DEFAULT_BLOCK_SIZE)
        .max(1);

    let settings = resolve_settings(args)?;
    let (spec, mut channels) = read_wav(input)?;

    let layout = channel_layout(spec.channels as usize);
    if !EqProcessor::is_bus_layout_supported(&layout) {
        return Err(CliError::Unsupported(format!(
            "{} channels, only mono or stereo input can be filtered",
            spec.channels
        )));
    }

    let params = Arc::new(ParameterStore::new());
    settings.write_to_store(&params);
    let mut processor = EqProcessor::with_parameters(params);
    processor.prepare(spec.sample_rate as f64, block_size)?;

    let frames = channels.first().map_or(0, Vec::len);
    render_blocks(&mut processor, &mut channels, block_size)?;
    write_wav(output, spec, &channels)?;

    info!(
        "Rendered {} frames ({} channel(s) at {}Hz) to {}",
        frames, spec.channels, spec.sample_rate, output
    );
    Ok(0)
}

fn channel_layout(channels: usize) -> BusLayout {
    let set = match channels {
        0 => ChannelSet::Disabled,
        1 => ChannelSet::Mono,
        2 => ChannelSet::Stereo,
        n => ChannelSet::Discrete(n),
    };
    BusLayout::new(set, set)
}

/// Hand `channels` to the processor in blocks of at most `block_size` frames.
pub fn render_blocks(
    processor: &mut EqProcessor,
    channels: &mut [Vec<f32>],
    block_size: usize,
) -> Result<()> {
    let frames = channels.first().map_or(0, Vec::len);
    let num_channels = channels.len();
    let mut start = 0;

    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        processor.process_block(&mut block, num_channels)?;
        start = end;
    }
    Ok(())
}

/// Read a WAV file into deinterleaved `f32` channels in `-1..1`.
pub fn read_wav(path: &str) -> Result<(WavSpec, Vec<Vec<f32>>)> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_channels = (spec.channels as usize).max(1);

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / scale) as f32))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = samples.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for (idx, sample) in samples.into_iter().enumerate() {
        channels[idx % num_channels].push(sample);
    }
    Ok((spec, channels))
}

/// Write deinterleaved channels using `spec`'s format.
pub fn write_wav(path: &str, spec: WavSpec, channels: &[Vec<f32>]) -> Result<()> {
    let mut writer = WavWriter::create(path, spec)?;
    let frames = channels.first().map_or(0, Vec::len);
    let scale = int_scale(spec.bits_per_sample);

    for frame in 0..frames {
        for channel in channels {
            let sample = channel[frame];
            match spec.sample_format {
                SampleFormat::Float => writer.write_sample(sample)?,
                SampleFormat::Int => {
                    let value = (sample as f64 * scale).round().clamp(-scale, scale - 1.0);
                    writer.write_sample(value as i32)?
                }
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

fn int_scale(bits_per_sample: u16) -> f64 {
    (1_i64 << (bits_per_sample.clamp(1, 32) - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_spec() -> WavSpec {
        WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn int_wav_survives_write_and_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tone.wav");
        let path = path.to_string_lossy().into_owned();
        let channels = vec![vec![0.5, -0.25, 0.0], vec![-0.5, 0.25, 1.0]];

        write_wav(&path, stereo_spec(), &channels).expect("write");
        let (spec, decoded) = read_wav(&path).expect("read");

        assert_eq!(spec, stereo_spec());
        assert_eq!(decoded.len(), 2);
        for (original, read) in channels.iter().flatten().zip(decoded.iter().flatten()) {
            assert!((original - read).abs() < 1.0e-4, "{original} vs {read}");
        }
    }

    #[test]
    fn render_blocks_handles_partial_last_block() {
        let mut processor = EqProcessor::new();
        processor.prepare(44_100.0, 4).expect("prepare");
        let mut channels = vec![vec![0.1_f32; 10], vec![0.1_f32; 10]];
        render_blocks(&mut processor, &mut channels, 4).expect("render");
        assert_eq!(channels[0].len(), 10);
        assert_eq!(channels[0], channels[1]);
    }

    #[test]
    fn layout_matches_channel_count() {
        assert!(EqProcessor::is_bus_layout_supported(&channel_layout(1)));
        assert!(EqProcessor::is_bus_layout_supported(&channel_layout(2)));
        assert!(!EqProcessor::is_bus_layout_supported(&channel_layout(4)));
    }
}
