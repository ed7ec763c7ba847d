use clap::ArgMatches;

use super::error::Result;

/// Run the `bench` subcommand and return its exit code.
pub fn run_bench(args: &ArgMatches) -> Result<i32> {
    if args.get_flag("sweep") {
        return run_sweep_bench(args);
    }
    run_single_bench(args)
}

fn run_single_bench(_args: &ArgMatches) -> Result<i32> {
    // Single block size for quick comparisons.
    #[cfg(not(feature = "bench"))]
    {
        eprintln!("Benchmarking requires the `bench` feature.");
        Ok(1)
    }
    #[cfg(feature = "bench")]
    {
        use simple_eq_lib::diagnostics::bench::bench_filter_chain;

        let args = _args;
        let config = base_config(args)?;
        let result = bench_filter_chain(config)?;

        println!(
            "EQ bench (block={} input={}s iters={}): avg {:.2}ms (min {:.2}ms max {:.2}ms), audio {:.2}ms, rt {:.4}x, blocks {}",
            config.block_size,
            config.input_seconds,
            config.iterations,
            result.avg_ms,
            result.min_ms,
            result.max_ms,
            result.audio_time_ms,
            result.rt_factor,
            result.blocks
        );
        Ok(0)
    }
}

fn run_sweep_bench(_args: &ArgMatches) -> Result<i32> {
    // Sweep common host block sizes.
    #[cfg(not(feature = "bench"))]
    {
        eprintln!("Benchmarking requires the `bench` feature.");
        Ok(1)
    }
    #[cfg(feature = "bench")]
    {
        use simple_eq_lib::diagnostics::bench::bench_filter_chain_sweep;

        let args = _args;
        let block_sizes = [32, 64, 128, 256, 512, 1024, 2048];
        let base = base_config(args)?;
        let results = bench_filter_chain_sweep(&base, &block_sizes)?;

        println!(
            "EQ sweep (input={}s iters={})",
            base.input_seconds, base.iterations
        );
        println!("block | avg_ms | min_ms | max_ms |   rt_x | blocks");
        for (block_size, result) in results {
            println!(
                "{:>5} | {:>6.2} | {:>6.2} | {:>6.2} | {:>6.4} | {:>6}",
                block_size,
                result.avg_ms,
                result.min_ms,
                result.max_ms,
                result.rt_factor,
                result.blocks
            );
        }
        Ok(0)
    }
}

#[cfg(feature = "bench")]
fn base_config(args: &ArgMatches) -> Result<simple_eq_lib::diagnostics::bench::DspBenchConfig> {
    use simple_eq_lib::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};

    Ok(simple_eq_lib::diagnostics::bench::DspBenchConfig {
        sample_rate: DEFAULT_SAMPLE_RATE,
        input_seconds: args.get_one::<f32>("input-seconds").copied().unwrap_or(1.0),
        block_size: args
            .get_one::<usize>("block-size")
            .copied()
            .unwrap_or(DEFAULT_BLOCK_SIZE),
        iterations: args.get_one::<usize>("iterations").copied().unwrap_or(5),
        settings: super::settings::resolve_settings(args)?,
    })
}
