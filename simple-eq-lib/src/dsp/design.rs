//! Coefficient factory for the peak band and the Butterworth cut cascades.
//!
//! Cut filters of order `N` are split into `ceil(N / 2)` sections. Odd orders
//! start with a first-order section; the remaining conjugate pole pairs follow
//! in ascending angle from the real axis, so the lowest-Q section comes first.
//! Every cascade is returned as exactly [`MAX_CASCADE_SECTIONS`] slots with
//! unused trailing slots holding pass-through coefficients.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::EqError;

use super::biquad::{identity_coefficients, BiquadCoefficients, CoefficientSet};

/// Number of sections in a cut cascade.
pub const MAX_CASCADE_SECTIONS: usize = 4;

/// Highest Butterworth order a cascade can hold.
pub const MAX_BUTTERWORTH_ORDER: usize = MAX_CASCADE_SECTIONS * 2;

/// Highest design frequency as a fraction of the sample rate.
pub const MAX_FREQ_RATIO: f64 = 0.49;

const MIN_FREQ_HZ: f64 = 1.0;
const FALLBACK_FREQ_HZ: f64 = 1_000.0;
const MIN_Q: f64 = 0.1;
const MAX_Q: f64 = 10.0;
const DEFAULT_Q: f64 = 1.0;
const MIN_LINEAR_GAIN: f64 = 1.0e-6;

/// Fixed-width coefficient slots for one cut cascade.
pub type CascadeCoefficients = [CoefficientSet; MAX_CASCADE_SECTIONS];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PassKind {
    LowPass,
    HighPass,
}

/// Peaking (bell) biquad.
///
/// `linear_gain` is an amplitude ratio, not dB; convert with
/// [`db_to_linear`](super::level::db_to_linear) first.
///
/// # Errors
/// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite rate.
pub fn make_peak_coefficients(
    sample_rate: f64,
    center_freq: f64,
    q: f64,
    linear_gain: f64,
) -> Result<CoefficientSet, EqError> {
    let sample_rate = validate_sample_rate(sample_rate)?;
    let freq = sanitize_freq(center_freq, sample_rate);
    let q = sanitize_q(q);
    let amplitude = sanitize_linear_gain(linear_gain).sqrt();

    let w0 = 2.0 * PI * freq / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);

    let b0 = 1.0 + alpha * amplitude;
    let b1 = -2.0 * cos_w0;
    let b2 = 1.0 - alpha * amplitude;
    let a0 = 1.0 + alpha / amplitude;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha / amplitude;

    Ok(Arc::new(BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)))
}

/// Butterworth high-pass of the given order, used by the low-cut band.
///
/// # Errors
/// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite rate.
pub fn make_highpass_cascade(
    cutoff_freq: f64,
    sample_rate: f64,
    order: usize,
) -> Result<CascadeCoefficients, EqError> {
    butterworth_cascade(PassKind::HighPass, cutoff_freq, sample_rate, order)
}

/// Butterworth low-pass of the given order, used by the high-cut band.
///
/// # Errors
/// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite rate.
pub fn make_lowpass_cascade(
    cutoff_freq: f64,
    sample_rate: f64,
    order: usize,
) -> Result<CascadeCoefficients, EqError> {
    butterworth_cascade(PassKind::LowPass, cutoff_freq, sample_rate, order)
}

/// Number of sections a Butterworth filter of `order` occupies.
pub fn sections_for_order(order: usize) -> usize {
    order.clamp(1, MAX_BUTTERWORTH_ORDER).div_ceil(2)
}

/// Reject sample rates the designs cannot use.
///
/// # Errors
/// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite rate.
pub fn validate_sample_rate(sample_rate: f64) -> Result<f64, EqError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EqError::InvalidSampleRate(sample_rate))
    }
}

fn butterworth_cascade(
    kind: PassKind,
    cutoff_freq: f64,
    sample_rate: f64,
    order: usize,
) -> Result<CascadeCoefficients, EqError> {
    let sample_rate = validate_sample_rate(sample_rate)?;
    let freq = sanitize_freq(cutoff_freq, sample_rate);
    let order = order.clamp(1, MAX_BUTTERWORTH_ORDER);

    let identity = identity_coefficients();
    let mut slots: CascadeCoefficients = std::array::from_fn(|_| Arc::clone(&identity));
    let mut slot = 0;

    if order % 2 == 1 {
        slots[slot] = Arc::new(first_order(kind, freq, sample_rate));
        slot += 1;
    }

    for k in 0..order / 2 {
        let q = pole_pair_q(order, k);
        slots[slot] = Arc::new(second_order(kind, freq, sample_rate, q));
        slot += 1;
    }

    Ok(slots)
}

/// Q of the `k`-th conjugate pole pair of an order-`order` Butterworth filter.
fn pole_pair_q(order: usize, k: usize) -> f64 {
    let theta = if order % 2 == 0 {
        PI * (2 * k + 1) as f64 / (2 * order) as f64
    } else {
        PI * (k + 1) as f64 / order as f64
    };
    1.0 / (2.0 * theta.cos())
}

fn second_order(kind: PassKind, freq: f64, sample_rate: f64, q: f64) -> BiquadCoefficients {
    let w0 = 2.0 * PI * freq / sample_rate;
    let cos_w0 = w0.cos();
    let alpha = w0.sin() / (2.0 * q);

    let (b0, b1, b2) = match kind {
        PassKind::LowPass => {
            let b1 = 1.0 - cos_w0;
            (b1 / 2.0, b1, b1 / 2.0)
        }
        PassKind::HighPass => {
            let b0 = (1.0 + cos_w0) / 2.0;
            (b0, -1.0 - cos_w0, b0)
        }
    };
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)
}

fn first_order(kind: PassKind, freq: f64, sample_rate: f64) -> BiquadCoefficients {
    let n = (PI * freq / sample_rate).tan();
    let a0 = n + 1.0;
    let a1 = n - 1.0;

    match kind {
        PassKind::LowPass => BiquadCoefficients::normalized(n, n, 0.0, a0, a1, 0.0),
        PassKind::HighPass => BiquadCoefficients::normalized(1.0, -1.0, 0.0, a0, a1, 0.0),
    }
}

fn sanitize_freq(freq: f64, sample_rate: f64) -> f64 {
    let max = sample_rate * MAX_FREQ_RATIO;
    let freq = if freq.is_finite() {
        freq
    } else {
        FALLBACK_FREQ_HZ
    };
    freq.clamp(MIN_FREQ_HZ.min(max), max)
}

fn sanitize_q(q: f64) -> f64 {
    if !q.is_finite() {
        return DEFAULT_Q;
    }
    q.clamp(MIN_Q, MAX_Q)
}

fn sanitize_linear_gain(gain: f64) -> f64 {
    if !gain.is_finite() {
        return 1.0;
    }
    gain.max(MIN_LINEAR_GAIN)
}
