//! Synthetic throughput benchmarks for the stereo filter chain.

use rand::Rng;

use crate::engine::FilterChainEngine;
use crate::error::EqError;
use crate::settings::ChainSettings;

/// Configuration parameters for a filter chain benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct DspBenchConfig {
    pub sample_rate: u32,
    pub input_seconds: f32,
    pub block_size: usize,
    pub iterations: usize,
    pub settings: ChainSettings,
}

/// Timing results from a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct DspBenchResult {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub audio_time_ms: f64,
    pub rt_factor: f64,
    pub blocks: usize,
}

/// Run a benchmark for a single block size.
///
/// Filters are updated before every block, as a host callback would.
///
/// # Errors
/// Returns [`EqError::InvalidSampleRate`] if `config.sample_rate` is zero.
pub fn bench_filter_chain(config: DspBenchConfig) -> Result<DspBenchResult, EqError> {
    let input_len = (config.sample_rate as f32 * config.input_seconds).max(1.0) as usize;
    let block_size = config.block_size.max(1);

    let mut rng = rand::thread_rng();
    let input_left: Vec<f32> = (0..input_len)
        .map(|_| rng.gen_range(-1.0_f32..1.0_f32))
        .collect();
    let input_right: Vec<f32> = (0..input_len)
        .map(|_| rng.gen_range(-1.0_f32..1.0_f32))
        .collect();

    let mut engine = FilterChainEngine::new(config.sample_rate as f64)?;
    let mut times: Vec<f64> = Vec::with_capacity(config.iterations.max(1));
    let mut left = input_left.clone();
    let mut right = input_right.clone();

    for _ in 0..config.iterations.max(1) {
        left.copy_from_slice(&input_left);
        right.copy_from_slice(&input_right);
        engine.reset();

        let start = std::time::Instant::now();
        for (l, r) in left
            .chunks_mut(block_size)
            .zip(right.chunks_mut(block_size))
        {
            engine.update_filters(&config.settings)?;
            engine.process(l, r)?;
        }
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        times.push(elapsed);
    }

    let min_ms = times
        .iter()
        .copied()
        .fold(f64::INFINITY, |a, b| a.min(b));
    let max_ms = times.iter().copied().fold(0.0_f64, |a, b| a.max(b));
    let avg_ms = times.iter().sum::<f64>() / times.len() as f64;
    let audio_time_ms = (input_len as f64 / config.sample_rate as f64) * 1000.0;
    let rt_factor = if audio_time_ms > 0.0 {
        avg_ms / audio_time_ms
    } else {
        0.0
    };

    Ok(DspBenchResult {
        avg_ms,
        min_ms: if min_ms.is_finite() { min_ms } else { 0.0 },
        max_ms,
        audio_time_ms,
        rt_factor,
        blocks: input_len.div_ceil(block_size),
    })
}

/// Run a sweep of block sizes using a shared base configuration.
///
/// # Errors
/// Propagates the first failing run.
pub fn bench_filter_chain_sweep(
    base: &DspBenchConfig,
    block_sizes: &[usize],
) -> Result<Vec<(usize, DspBenchResult)>, EqError> {
    let mut results = Vec::with_capacity(block_sizes.len());
    for &block_size in block_sizes {
        let config = DspBenchConfig {
            block_size,
            ..*base
        };
        results.push((block_size, bench_filter_chain(config)?));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(block_size: usize) -> DspBenchConfig {
        DspBenchConfig {
            sample_rate: 8_000,
            input_seconds: 0.05,
            block_size,
            iterations: 2,
            settings: ChainSettings::default(),
        }
    }

    #[test]
    fn counts_blocks_and_audio_time() {
        let result = bench_filter_chain(config(64)).expect("bench");
        assert_eq!(result.blocks, 7);
        assert!((result.audio_time_ms - 50.0).abs() < 1e-9);
        assert!(result.min_ms <= result.max_ms);
    }

    #[test]
    fn sweep_reports_each_block_size() {
        let sizes = [32, 128];
        let results = bench_filter_chain_sweep(&config(0), &sizes).expect("sweep");
        let reported: Vec<usize> = results.iter().map(|(size, _)| *size).collect();
        assert_eq!(reported, sizes);
    }

    #[test]
    fn zero_sample_rate_is_an_error() {
        let config = DspBenchConfig {
            sample_rate: 0,
            ..config(64)
        };
        assert!(bench_filter_chain(config).is_err());
    }
}
