//! Second-order IIR sections with shared, swappable coefficient handles.

use std::f64::consts::PI;
use std::sync::Arc;

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Pass-through coefficients.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Build coefficients from raw terms, dividing everything by `a0`.
    pub fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }

    /// True when every coefficient is within `tolerance` of [`Self::IDENTITY`].
    pub fn is_identity(&self, tolerance: f64) -> bool {
        (self.b0 - 1.0).abs() <= tolerance
            && self.b1.abs() <= tolerance
            && self.b2.abs() <= tolerance
            && self.a1.abs() <= tolerance
            && self.a2.abs() <= tolerance
    }

    /// True when numerator and denominator cancel, giving a flat unity response.
    pub fn has_flat_response(&self, tolerance: f64) -> bool {
        (self.b0 - 1.0).abs() <= tolerance
            && (self.b1 - self.a1).abs() <= tolerance
            && (self.b2 - self.a2).abs() <= tolerance
    }

    /// Linear magnitude of the transfer function at `freq_hz`.
    ///
    /// Evaluates `H(z)` on the unit circle at `z = e^{jw}`.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate;
        let (sin1, cos1) = w.sin_cos();
        let (sin2, cos2) = (2.0 * w).sin_cos();

        let num_re = self.b0 + self.b1 * cos1 + self.b2 * cos2;
        let num_im = -(self.b1 * sin1 + self.b2 * sin2);
        let den_re = 1.0 + self.a1 * cos1 + self.a2 * cos2;
        let den_im = -(self.a1 * sin1 + self.a2 * sin2);

        let den = den_re * den_re + den_im * den_im;
        if den <= 0.0 {
            return f64::INFINITY;
        }
        ((num_re * num_re + num_im * num_im) / den).sqrt()
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Immutable coefficient set shared between the left and right sections
/// of the same filter role.
pub type CoefficientSet = Arc<BiquadCoefficients>;

/// Fresh handle to pass-through coefficients.
pub fn identity_coefficients() -> CoefficientSet {
    Arc::new(BiquadCoefficients::IDENTITY)
}

/// A single biquad with a bypass flag and private sample history.
#[derive(Clone, Debug)]
pub struct FilterSection {
    coefficients: CoefficientSet,
    bypassed: bool,
    x_n1: f64,
    x_n2: f64,
    y_n1: f64,
    y_n2: f64,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSection {
    pub fn new() -> Self {
        Self {
            coefficients: identity_coefficients(),
            bypassed: false,
            x_n1: 0.0,
            x_n2: 0.0,
            y_n1: 0.0,
            y_n2: 0.0,
        }
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Run one sample through the Direct Form I difference equation.
    ///
    /// Bypassed sections return the input unchanged and keep their history.
    #[inline]
    pub fn process_sample(&mut self, sample: f64) -> f64 {
        if self.bypassed {
            return sample;
        }

        let c = &*self.coefficients;
        let y = c.b0 * sample + c.b1 * self.x_n1 + c.b2 * self.x_n2
            - c.a1 * self.y_n1
            - c.a2 * self.y_n2;

        self.x_n2 = self.x_n1;
        self.x_n1 = sample;
        self.y_n2 = self.y_n1;
        self.y_n1 = y;

        y
    }

    /// Clear sample history. Coefficients and bypass state are kept.
    pub fn reset(&mut self) {
        self.x_n1 = 0.0;
        self.x_n2 = 0.0;
        self.y_n1 = 0.0;
        self.y_n2 = 0.0;
    }

    /// Linear magnitude contributed by this section; `1.0` when bypassed.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        if self.bypassed {
            1.0
        } else {
            self.coefficients.magnitude_at(freq_hz, sample_rate)
        }
    }
}

/// Point `section` at `updated`.
///
/// This is a single handle store: the section observes either the previous
/// set or the new one, never a mix. Sample history is left alone.
#[inline]
pub fn update_coefficients(section: &mut FilterSection, updated: &CoefficientSet) {
    section.coefficients = Arc::clone(updated);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_gain() -> CoefficientSet {
        Arc::new(BiquadCoefficients {
            b0: 0.5,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        })
    }

    #[test]
    fn identity_section_passes_samples() {
        let mut section = FilterSection::new();
        for sample in [0.25, -0.5, 1.0, 0.0] {
            assert_eq!(section.process_sample(sample), sample);
        }
    }

    #[test]
    fn bypassed_section_ignores_coefficients() {
        let mut section = FilterSection::new();
        update_coefficients(&mut section, &half_gain());
        section.set_bypassed(true);
        assert_eq!(section.process_sample(0.8), 0.8);
        assert_eq!(section.magnitude_at(1_000.0, 48_000.0), 1.0);
    }

    #[test]
    fn update_coefficients_shares_the_handle() {
        let shared = half_gain();
        let mut left = FilterSection::new();
        let mut right = FilterSection::new();
        update_coefficients(&mut left, &shared);
        update_coefficients(&mut right, &shared);

        assert!(Arc::ptr_eq(left.coefficients(), right.coefficients()));
        assert_eq!(Arc::strong_count(&shared), 3);
        assert_eq!(left.process_sample(1.0), 0.5);
    }

    #[test]
    fn update_coefficients_keeps_history() {
        let one_pole = Arc::new(BiquadCoefficients {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: -0.5,
            a2: 0.0,
        });
        let mut section = FilterSection::new();
        update_coefficients(&mut section, &one_pole);
        assert_eq!(section.process_sample(1.0), 1.0);

        update_coefficients(&mut section, &one_pole);
        assert_eq!(section.process_sample(0.0), 0.5);
    }

    #[test]
    fn reset_clears_history_only() {
        let one_pole = Arc::new(BiquadCoefficients {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: -0.5,
            a2: 0.0,
        });
        let mut section = FilterSection::new();
        update_coefficients(&mut section, &one_pole);
        section.process_sample(1.0);
        section.reset();

        assert_eq!(section.process_sample(0.0), 0.0);
        assert!(Arc::ptr_eq(section.coefficients(), &one_pole));
    }

    #[test]
    fn identity_magnitude_is_flat() {
        let coeffs = BiquadCoefficients::IDENTITY;
        for freq in [20.0, 1_000.0, 19_000.0] {
            assert!((coeffs.magnitude_at(freq, 44_100.0) - 1.0).abs() < 1e-12);
        }
    }
}
