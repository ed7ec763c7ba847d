//! DSP components: biquad sections, coefficient design, cut cascades and channel chains.

pub mod biquad;
pub mod cascade;
pub mod chain;
pub mod design;
pub mod level;

pub use biquad::{update_coefficients, BiquadCoefficients, CoefficientSet, FilterSection};
pub use cascade::{update_cut_cascade, CutCascade};
pub use chain::{ChainPosition, MonoChain};
pub use design::{
    make_highpass_cascade, make_lowpass_cascade, make_peak_coefficients, CascadeCoefficients,
    MAX_CASCADE_SECTIONS,
};
