//! Fixed-width cut cascade and the slope-driven activation protocol.

use crate::settings::Slope;

use super::biquad::{update_coefficients, FilterSection};
use super::design::{CascadeCoefficients, MAX_CASCADE_SECTIONS};

/// Four biquads in series; the slope decides how many are live.
#[derive(Clone, Debug)]
pub struct CutCascade {
    sections: [FilterSection; MAX_CASCADE_SECTIONS],
}

impl Default for CutCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl CutCascade {
    /// Cascade with pass-through coefficients and every section bypassed.
    pub fn new() -> Self {
        let sections = std::array::from_fn(|_| {
            let mut section = FilterSection::new();
            section.set_bypassed(true);
            section
        });
        Self { sections }
    }

    pub fn section(&self, index: usize) -> Option<&FilterSection> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[FilterSection; MAX_CASCADE_SECTIONS] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [FilterSection; MAX_CASCADE_SECTIONS] {
        &mut self.sections
    }

    /// Number of sections not bypassed.
    pub fn active_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_bypassed()).count()
    }

    /// Bypass flag of each section, in order.
    pub fn bypass_pattern(&self) -> [bool; MAX_CASCADE_SECTIONS] {
        std::array::from_fn(|idx| self.sections[idx].is_bypassed())
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(sample, |acc, section| section.process_sample(acc))
    }

    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }

    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        self.sections
            .iter()
            .map(|section| section.magnitude_at(freq_hz, sample_rate))
            .product()
    }
}

/// Apply `coefficients` to `cascade` for the given slope.
///
/// All sections are bypassed first, then sections `0..slope.active_sections()`
/// receive their coefficients and are re-enabled in ascending order. Sections
/// past the active count stay bypassed and keep whatever coefficients they
/// held before.
pub fn update_cut_cascade(
    cascade: &mut CutCascade,
    coefficients: &CascadeCoefficients,
    slope: Slope,
) {
    for section in &mut cascade.sections {
        section.set_bypassed(true);
    }

    let active = slope.active_sections().min(MAX_CASCADE_SECTIONS);
    for (section, coeffs) in cascade.sections.iter_mut().zip(coefficients).take(active) {
        update_coefficients(section, coeffs);
        section.set_bypassed(false);
    }
}
