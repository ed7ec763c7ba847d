//! Per-channel processing path: low-cut cascade, peak band, high-cut cascade.

use super::biquad::FilterSection;
use super::cascade::CutCascade;

/// Stage of a [`MonoChain`], in processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainPosition {
    LowCut,
    Peak,
    HighCut,
}

impl ChainPosition {
    pub const ALL: [ChainPosition; 3] = [
        ChainPosition::LowCut,
        ChainPosition::Peak,
        ChainPosition::HighCut,
    ];
}

/// One channel's full filter path with its own sample history.
#[derive(Clone, Debug, Default)]
pub struct MonoChain {
    low_cut: CutCascade,
    peak: FilterSection,
    high_cut: CutCascade,
}

impl MonoChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn low_cut(&self) -> &CutCascade {
        &self.low_cut
    }

    pub fn low_cut_mut(&mut self) -> &mut CutCascade {
        &mut self.low_cut
    }

    pub fn peak(&self) -> &FilterSection {
        &self.peak
    }

    pub fn peak_mut(&mut self) -> &mut FilterSection {
        &mut self.peak
    }

    pub fn high_cut(&self) -> &CutCascade {
        &self.high_cut
    }

    pub fn high_cut_mut(&mut self) -> &mut CutCascade {
        &mut self.high_cut
    }

    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.low_cut.process_sample(sample as f64);
        let x = self.peak.process_sample(x);
        self.high_cut.process_sample(x) as f32
    }

    /// Filter `samples` in place.
    pub fn process_block(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clear the history of every section.
    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }

    /// Linear magnitude of one stage at `freq_hz`.
    pub fn stage_magnitude_at(
        &self,
        position: ChainPosition,
        freq_hz: f64,
        sample_rate: f64,
    ) -> f64 {
        match position {
            ChainPosition::LowCut => self.low_cut.magnitude_at(freq_hz, sample_rate),
            ChainPosition::Peak => self.peak.magnitude_at(freq_hz, sample_rate),
            ChainPosition::HighCut => self.high_cut.magnitude_at(freq_hz, sample_rate),
        }
    }

    /// Linear magnitude of the whole chain at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        ChainPosition::ALL
            .iter()
            .map(|&position| self.stage_magnitude_at(position, freq_hz, sample_rate))
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::biquad::update_coefficients;
    use crate::dsp::cascade::update_cut_cascade;
    use crate::dsp::design::{make_highpass_cascade, make_peak_coefficients};
    use crate::settings::Slope;

    const SAMPLE_RATE: f64 = 44_100.0;

    #[test]
    fn fresh_chain_passes_audio_unchanged() {
        let mut chain = MonoChain::new();
        let mut block = [0.5_f32, -0.25, 1.0, 0.0, -1.0];
        let expected = block;
        chain.process_block(&mut block);
        assert_eq!(block, expected);
    }

    #[test]
    fn magnitude_is_product_of_stages() {
        let mut chain = MonoChain::new();
        let peak = make_peak_coefficients(SAMPLE_RATE, 1_000.0, 1.0, 2.0).expect("peak");
        update_coefficients(chain.peak_mut(), &peak);
        let low = make_highpass_cascade(100.0, SAMPLE_RATE, 4).expect("highpass");
        update_cut_cascade(chain.low_cut_mut(), &low, Slope::Db24);

        let freq = 150.0;
        let expected = chain.low_cut().magnitude_at(freq, SAMPLE_RATE)
            * peak.magnitude_at(freq, SAMPLE_RATE);
        assert!((chain.magnitude_at(freq, SAMPLE_RATE) - expected).abs() < 1e-12);
        assert_eq!(
            chain.stage_magnitude_at(ChainPosition::HighCut, freq, SAMPLE_RATE),
            1.0
        );
    }

    #[test]
    fn reset_silences_ringing_history() {
        let mut chain = MonoChain::new();
        let peak = make_peak_coefficients(SAMPLE_RATE, 500.0, 4.0, 8.0).expect("peak");
        update_coefficients(chain.peak_mut(), &peak);

        let mut impulse = [1.0_f32, 0.0, 0.0, 0.0];
        chain.process_block(&mut impulse);
        assert!(impulse[1..].iter().any(|&s| s != 0.0));

        chain.reset();
        let mut silence = [0.0_f32; 8];
        chain.process_block(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }
}
