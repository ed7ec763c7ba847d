//! Host-facing processor lifecycle around the filter chain engine.

use std::sync::Arc;

use log::{info, warn};

use crate::engine::FilterChainEngine;
use crate::error::EqError;
use crate::params::ParameterStore;
use crate::settings::ChainSettings;

/// Name reported to hosts.
pub const PROCESSOR_NAME: &str = "SimpleEQ";

/// Channel configuration of one bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSet {
    Disabled,
    Mono,
    Stereo,
    Discrete(usize),
}

impl ChannelSet {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(count) => count,
        }
    }
}

/// Main input and output bus configuration proposed by a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusLayout {
    pub input: ChannelSet,
    pub output: ChannelSet,
}

impl BusLayout {
    pub fn new(input: ChannelSet, output: ChannelSet) -> Self {
        Self { input, output }
    }

    pub fn stereo() -> Self {
        Self::new(ChannelSet::Stereo, ChannelSet::Stereo)
    }

    pub fn mono() -> Self {
        Self::new(ChannelSet::Mono, ChannelSet::Mono)
    }
}

/// Stereo equalizer processor.
///
/// The parameter store is shared with the control path; everything else is
/// owned by the audio thread.
#[derive(Debug)]
pub struct EqProcessor {
    params: Arc<ParameterStore>,
    engine: Option<FilterChainEngine>,
    max_block_size: usize,
    warned_oversized_block: bool,
}

impl Default for EqProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl EqProcessor {
    /// Processor with a fresh parameter store at default values.
    pub fn new() -> Self {
        Self::with_parameters(Arc::new(ParameterStore::new()))
    }

    /// Processor reading from an existing parameter store.
    pub fn with_parameters(params: Arc<ParameterStore>) -> Self {
        Self {
            params,
            engine: None,
            max_block_size: 0,
            warned_oversized_block: false,
        }
    }

    pub fn name(&self) -> &'static str {
        PROCESSOR_NAME
    }

    pub fn parameters(&self) -> &Arc<ParameterStore> {
        &self.params
    }

    pub fn engine(&self) -> Option<&FilterChainEngine> {
        self.engine.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.engine.is_some()
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.engine.as_ref().map(FilterChainEngine::sample_rate)
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Only mono-in/mono-out and stereo-in/stereo-out are supported.
    pub fn is_bus_layout_supported(layout: &BusLayout) -> bool {
        matches!(layout.output, ChannelSet::Mono | ChannelSet::Stereo)
            && layout.input == layout.output
    }

    /// Build fresh chains for `sample_rate` and configure them from the store.
    ///
    /// # Errors
    /// Returns [`EqError::InvalidSampleRate`] for a non-positive or non-finite
    /// rate; the processor is left unprepared in that case.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<(), EqError> {
        self.engine = None;
        let mut engine = FilterChainEngine::new(sample_rate)?;
        engine.update_filters(&ChainSettings::from_store(&self.params))?;

        info!(
            "{} prepared at {}Hz, max block {} samples",
            PROCESSOR_NAME, sample_rate, max_block_size
        );
        self.engine = Some(engine);
        self.max_block_size = max_block_size;
        self.warned_oversized_block = false;
        Ok(())
    }

    /// Clear filter history. The processor stays prepared.
    pub fn release_resources(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.reset();
        }
    }

    /// Re-read the store and reconfigure both chains.
    ///
    /// # Errors
    /// Returns [`EqError::NotPrepared`] before a successful [`Self::prepare`].
    pub fn update_filters(&mut self) -> Result<(), EqError> {
        let engine = self.engine.as_mut().ok_or(EqError::NotPrepared)?;
        engine.update_filters(&ChainSettings::from_store(&self.params))
    }

    /// Process one block in place.
    ///
    /// `channels` holds one slice per output channel; the first
    /// `num_input_channels` carry input audio. Output channels without a
    /// matching input are cleared. One input channel runs the left chain
    /// only; two or more run left and right on the first two.
    ///
    /// # Errors
    /// Returns [`EqError::NotPrepared`] before [`Self::prepare`], or
    /// [`EqError::ChannelMismatch`] if the first two channels differ in length.
    pub fn process_block(
        &mut self,
        channels: &mut [&mut [f32]],
        num_input_channels: usize,
    ) -> Result<(), EqError> {
        let engine = self.engine.as_mut().ok_or(EqError::NotPrepared)?;

        let num_inputs = num_input_channels.min(channels.len());
        for channel in channels.iter_mut().skip(num_inputs) {
            channel.fill(0.0);
        }

        let block_len = channels.first().map_or(0, |channel| channel.len());
        if block_len > self.max_block_size && !self.warned_oversized_block {
            warn!(
                "block of {} samples exceeds prepared maximum of {}",
                block_len, self.max_block_size
            );
            self.warned_oversized_block = true;
        }

        engine.update_filters(&ChainSettings::from_store(&self.params))?;

        match num_inputs {
            0 => Ok(()),
            1 => {
                engine.process_mono(&mut *channels[0]);
                Ok(())
            }
            _ => {
                let (left, rest) = channels.split_at_mut(1);
                engine.process(&mut *left[0], &mut *rest[0])
            }
        }
    }

    /// Convenience wrapper for a stereo block.
    ///
    /// # Errors
    /// See [`Self::process_block`].
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<(), EqError> {
        let mut channels = [left, right];
        self.process_block(&mut channels, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterId;
    use crate::settings::Slope;

    #[test]
    fn reports_host_metadata() {
        let processor = EqProcessor::new();
        assert_eq!(processor.name(), "SimpleEQ");
        assert_eq!(processor.tail_length_seconds(), 0.0);
        assert!(!processor.is_prepared());
    }

    #[test]
    fn bus_layout_requires_matching_mono_or_stereo() {
        assert!(EqProcessor::is_bus_layout_supported(&BusLayout::mono()));
        assert!(EqProcessor::is_bus_layout_supported(&BusLayout::stereo()));
        assert!(!EqProcessor::is_bus_layout_supported(&BusLayout::new(
            ChannelSet::Mono,
            ChannelSet::Stereo
        )));
        assert!(!EqProcessor::is_bus_layout_supported(&BusLayout::new(
            ChannelSet::Discrete(6),
            ChannelSet::Discrete(6)
        )));
        assert!(!EqProcessor::is_bus_layout_supported(&BusLayout::new(
            ChannelSet::Disabled,
            ChannelSet::Disabled
        )));
    }

    #[test]
    fn prepare_rejects_invalid_sample_rate() {
        let mut processor = EqProcessor::new();
        assert!(matches!(
            processor.prepare(0.0, 512),
            Err(EqError::InvalidSampleRate(_))
        ));
        assert!(!processor.is_prepared());
    }

    #[test]
    fn process_before_prepare_fails() {
        let mut processor = EqProcessor::new();
        let mut left = [0.0_f32; 16];
        let mut right = [0.0_f32; 16];
        assert!(matches!(
            processor.process_stereo(&mut left, &mut right),
            Err(EqError::NotPrepared)
        ));
    }

    #[test]
    fn prepare_applies_current_parameters() {
        let params = Arc::new(ParameterStore::new());
        params.set(ParameterId::LowCutSlope, 3.0);
        let mut processor = EqProcessor::with_parameters(Arc::clone(&params));
        processor.prepare(48_000.0, 256).expect("prepare");

        let engine = processor.engine().expect("engine");
        assert_eq!(engine.sample_rate(), 48_000.0);
        assert_eq!(engine.left().low_cut().active_count(), 4);
        assert_eq!(engine.right().high_cut().active_count(), 1);
    }

    #[test]
    fn each_block_samples_the_store() {
        let params = Arc::new(ParameterStore::new());
        let mut processor = EqProcessor::with_parameters(Arc::clone(&params));
        processor.prepare(44_100.0, 64).expect("prepare");

        params.set(ParameterId::HighCutSlope, 2.0);
        let mut left = [0.0_f32; 64];
        let mut right = [0.0_f32; 64];
        processor.process_stereo(&mut left, &mut right).expect("process");

        let engine = processor.engine().expect("engine");
        assert_eq!(engine.left().high_cut().active_count(), 3);
        assert_eq!(
            engine.last_settings().map(|s| s.high_cut_slope),
            Some(Slope::Db36)
        );
    }

    #[test]
    fn mono_input_clears_extra_outputs() {
        let mut processor = EqProcessor::new();
        processor.prepare(44_100.0, 8).expect("prepare");

        let mut mono = [0.5_f32; 8];
        let mut spare = [1.0_f32; 8];
        {
            let mut channels: [&mut [f32]; 2] = [&mut mono, &mut spare];
            processor.process_block(&mut channels, 1).expect("process");
        }
        assert!(spare.iter().all(|&s| s == 0.0));
        assert!(mono.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn oversized_blocks_are_still_processed() {
        let mut processor = EqProcessor::new();
        processor.prepare(44_100.0, 4).expect("prepare");
        let mut left = vec![0.25_f32; 32];
        let mut right = vec![0.25_f32; 32];
        processor.process_stereo(&mut left, &mut right).expect("first");
        processor.process_stereo(&mut left, &mut right).expect("second");
        assert_eq!(left, right);
    }

    fn ringing_processor() -> EqProcessor {
        let params = Arc::new(ParameterStore::new());
        params.set(ParameterId::PeakFreq, 500.0);
        params.set(ParameterId::PeakGain, 18.0);
        params.set(ParameterId::PeakQuality, 8.0);
        let mut processor = EqProcessor::with_parameters(params);
        processor.prepare(44_100.0, 16).expect("prepare");

        let mut left = [0.0_f32; 16];
        let mut right = [0.0_f32; 16];
        left[0] = 1.0;
        right[0] = 1.0;
        processor.process_stereo(&mut left, &mut right).expect("impulse");
        assert!(left[8..].iter().any(|&s| s != 0.0));
        assert!(right[8..].iter().any(|&s| s != 0.0));
        processor
    }

    fn assert_silent_output(processor: &mut EqProcessor) {
        let mut left = [0.0_f32; 16];
        let mut right = [0.0_f32; 16];
        processor.process_stereo(&mut left, &mut right).expect("silence");
        assert!(left.iter().all(|&s| s == 0.0), "left {:?}", left);
        assert!(right.iter().all(|&s| s == 0.0), "right {:?}", right);
    }

    #[test]
    fn prepare_clears_history_on_both_channels() {
        let mut processor = ringing_processor();
        processor.prepare(44_100.0, 16).expect("prepare again");
        assert_silent_output(&mut processor);
    }

    #[test]
    fn release_resources_clears_history_on_both_channels() {
        let mut processor = ringing_processor();
        processor.release_resources();
        assert_silent_output(&mut processor);
    }

    #[test]
    fn release_resources_keeps_processor_prepared() {
        let mut processor = EqProcessor::new();
        processor.prepare(44_100.0, 32).expect("prepare");
        processor.release_resources();
        assert!(processor.is_prepared());
        assert_eq!(processor.sample_rate(), Some(44_100.0));
    }
}
