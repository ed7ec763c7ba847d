//! Shared defaults for offline processing and benchmarks.

/// Sample rate used when none is supplied (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Block size used by offline hosts and benchmarks (samples per channel).
pub const DEFAULT_BLOCK_SIZE: usize = 512;
