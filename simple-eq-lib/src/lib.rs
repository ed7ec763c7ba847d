//! # SimpleEQ Library
//!
//! A stereo three-band equalizer: a Butterworth low-cut, a parametric peak and a
//! Butterworth high-cut, with selectable 12 to 48 dB/oct cut slopes.
//!
//! The [`processor::EqProcessor`] samples a lock-free [`params::ParameterStore`]
//! at the start of every block, recomputes coefficients and applies them to
//! the left and right [`dsp::MonoChain`]s before filtering the block in place.

pub mod constants;
#[cfg(feature = "bench")]
pub mod diagnostics;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;
pub mod processor;
pub mod settings;

pub use engine::FilterChainEngine;
pub use error::EqError;
pub use params::{ParameterId, ParameterStore};
pub use processor::EqProcessor;
pub use settings::{ChainSettings, Slope};
