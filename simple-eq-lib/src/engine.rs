//! Filter chain engine: turns a settings snapshot into coefficients and
//! applies them, with identical bypass state, to both channel chains.

use log::debug;

use crate::dsp::biquad::update_coefficients;
use crate::dsp::cascade::update_cut_cascade;
use crate::dsp::chain::MonoChain;
use crate::dsp::design::{
    make_highpass_cascade, make_lowpass_cascade, make_peak_coefficients, validate_sample_rate,
};
use crate::dsp::level::{db_to_linear, linear_to_db};
use crate::error::EqError;
use crate::settings::ChainSettings;

/// Left/right filter chains kept in lock-step by [`FilterChainEngine::update_filters`].
#[derive(Clone, Debug)]
pub struct FilterChainEngine {
    sample_rate: f64,
    left: MonoChain,
    right: MonoChain,
    last_settings: Option<ChainSettings>,
}

impl FilterChainEngine {
    /// Create an engine for `sample_rate` with pass-through chains.
    ///
    /// # Errors
    /// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite rate.
    pub fn new(sample_rate: f64) -> Result<Self, EqError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        Ok(Self {
            sample_rate,
            left: MonoChain::new(),
            right: MonoChain::new(),
            last_settings: None,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn left(&self) -> &MonoChain {
        &self.left
    }

    pub fn right(&self) -> &MonoChain {
        &self.right
    }

    /// Settings applied by the most recent update, if any.
    pub fn last_settings(&self) -> Option<&ChainSettings> {
        self.last_settings.as_ref()
    }

    /// Recompute every coefficient set from `settings` and apply it to both chains.
    ///
    /// Call once per block, on the audio thread, before processing that block.
    /// Settings equal to the previous update leave every section untouched.
    ///
    /// # Errors
    /// Only fails if the sample rate is unusable, which [`Self::new`] already rules out.
    pub fn update_filters(&mut self, settings: &ChainSettings) -> Result<(), EqError> {
        if self.last_settings.as_ref() == Some(settings) {
            return Ok(());
        }

        debug!(
            "chain settings: peak {:.1}Hz {:+.1}dB q={:.2}, low cut {:.1}Hz {}, high cut {:.1}Hz {}",
            settings.peak_freq,
            settings.peak_gain_db,
            settings.peak_q,
            settings.low_cut_freq,
            settings.low_cut_slope,
            settings.high_cut_freq,
            settings.high_cut_slope
        );

        self.update_peak_filter(settings)?;
        self.update_low_cut_filter(settings)?;
        self.update_high_cut_filter(settings)?;
        self.last_settings = Some(*settings);
        Ok(())
    }

    fn update_peak_filter(&mut self, settings: &ChainSettings) -> Result<(), EqError> {
        let peak = make_peak_coefficients(
            self.sample_rate,
            settings.peak_freq as f64,
            settings.peak_q as f64,
            db_to_linear(settings.peak_gain_db) as f64,
        )?;
        update_coefficients(self.left.peak_mut(), &peak);
        update_coefficients(self.right.peak_mut(), &peak);
        Ok(())
    }

    fn update_low_cut_filter(&mut self, settings: &ChainSettings) -> Result<(), EqError> {
        let slope = settings.low_cut_slope;
        let coefficients = make_highpass_cascade(
            settings.low_cut_freq as f64,
            self.sample_rate,
            slope.filter_order(),
        )?;
        update_cut_cascade(self.left.low_cut_mut(), &coefficients, slope);
        update_cut_cascade(self.right.low_cut_mut(), &coefficients, slope);
        Ok(())
    }

    fn update_high_cut_filter(&mut self, settings: &ChainSettings) -> Result<(), EqError> {
        let slope = settings.high_cut_slope;
        let coefficients = make_lowpass_cascade(
            settings.high_cut_freq as f64,
            self.sample_rate,
            slope.filter_order(),
        )?;
        update_cut_cascade(self.left.high_cut_mut(), &coefficients, slope);
        update_cut_cascade(self.right.high_cut_mut(), &coefficients, slope);
        Ok(())
    }

    /// Filter a stereo block in place.
    ///
    /// # Errors
    /// Returns [`EqError::ChannelMismatch`] if the two blocks differ in length.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<(), EqError> {
        if left.len() != right.len() {
            return Err(EqError::ChannelMismatch {
                expected: left.len(),
                actual: right.len(),
            });
        }
        self.left.process_block(left);
        self.right.process_block(right);
        Ok(())
    }

    /// Filter a mono block in place through the left chain.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        self.left.process_block(samples);
    }

    /// Clear the sample history of both chains.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Linear magnitude of the configured chain at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        self.left.magnitude_at(freq_hz, self.sample_rate)
    }

    /// Magnitude response in dB at each of `frequencies`.
    pub fn response_db(&self, frequencies: &[f64]) -> Vec<f32> {
        frequencies
            .iter()
            .map(|&freq| linear_to_db(self.magnitude_at(freq) as f32))
            .collect()
    }
}
