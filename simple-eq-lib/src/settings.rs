//! Chain settings snapshot and cut-filter slopes.

use std::fmt::{Display, Formatter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::level::{deserialize_db_gain, deserialize_hz};
use crate::error::EqError;
use crate::params::{ParameterId, ParameterStore};

pub const DEFAULT_LOW_CUT_FREQ_HZ: f32 = 20.0;
pub const DEFAULT_HIGH_CUT_FREQ_HZ: f32 = 20_000.0;
pub const DEFAULT_PEAK_FREQ_HZ: f32 = 750.0;
pub const DEFAULT_PEAK_GAIN_DB: f32 = 0.0;
pub const DEFAULT_PEAK_Q: f32 = 1.0;

/// Roll-off steepness of a cut filter.
///
/// Ordinal `N` activates `N + 1` cascaded second-order sections.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Slope {
    #[default]
    #[serde(rename = "12 db/Oct", alias = "12")]
    Db12,
    #[serde(rename = "24 db/Oct", alias = "24")]
    Db24,
    #[serde(rename = "36 db/Oct", alias = "36")]
    Db36,
    #[serde(rename = "48 db/Oct", alias = "48")]
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Map a raw choice-parameter value to a slope.
    ///
    /// Fractional values truncate toward zero; out-of-range input saturates.
    pub fn from_choice_value(value: f32) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Slope::Db12;
        }
        let index = (value as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }

    /// Number of non-bypassed sections in a cut cascade.
    pub fn active_sections(self) -> usize {
        self.ordinal() + 1
    }

    /// Butterworth order used for the cascade design.
    pub fn filter_order(self) -> usize {
        2 * self.active_sections()
    }

    pub fn db_per_octave(self) -> u32 {
        12 * self.active_sections() as u32
    }

    /// Display label, also used as the parameter choice text.
    pub fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 db/Oct",
            Slope::Db24 => "24 db/Oct",
            Slope::Db36 => "36 db/Oct",
            Slope::Db48 => "48 db/Oct",
        }
    }
}

impl Display for Slope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of every equalizer parameter for one update cycle.
///
/// Built from the parameter store at the start of each block and discarded
/// once the filters have been updated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    #[serde(alias = "peak_freq_hz", deserialize_with = "deserialize_hz")]
    pub peak_freq: f32,
    #[serde(alias = "peak_gain", deserialize_with = "deserialize_db_gain")]
    pub peak_gain_db: f32,
    #[serde(alias = "peak_quality")]
    pub peak_q: f32,
    #[serde(alias = "low_cut_freq_hz", deserialize_with = "deserialize_hz")]
    pub low_cut_freq: f32,
    #[serde(alias = "high_cut_freq_hz", deserialize_with = "deserialize_hz")]
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            peak_freq: DEFAULT_PEAK_FREQ_HZ,
            peak_gain_db: DEFAULT_PEAK_GAIN_DB,
            peak_q: DEFAULT_PEAK_Q,
            low_cut_freq: DEFAULT_LOW_CUT_FREQ_HZ,
            high_cut_freq: DEFAULT_HIGH_CUT_FREQ_HZ,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}

impl ChainSettings {
    /// Read the current value of every parameter from the store.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            peak_freq: store.get(ParameterId::PeakFreq),
            peak_gain_db: store.get(ParameterId::PeakGain),
            peak_q: store.get(ParameterId::PeakQuality),
            low_cut_freq: store.get(ParameterId::LowCutFreq),
            high_cut_freq: store.get(ParameterId::HighCutFreq),
            low_cut_slope: Slope::from_choice_value(store.get(ParameterId::LowCutSlope)),
            high_cut_slope: Slope::from_choice_value(store.get(ParameterId::HighCutSlope)),
        }
    }

    /// Publish these settings to the store, one parameter at a time.
    pub fn write_to_store(&self, store: &ParameterStore) {
        store.set(ParameterId::PeakFreq, self.peak_freq);
        store.set(ParameterId::PeakGain, self.peak_gain_db);
        store.set(ParameterId::PeakQuality, self.peak_q);
        store.set(ParameterId::LowCutFreq, self.low_cut_freq);
        store.set(ParameterId::HighCutFreq, self.high_cut_freq);
        store.set(ParameterId::LowCutSlope, self.low_cut_slope.ordinal() as f32);
        store.set(ParameterId::HighCutSlope, self.high_cut_slope.ordinal() as f32);
    }

    /// Parse settings from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`EqError::Json`] if the payload is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, EqError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EqError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Pretty-printed JSON representation.
    ///
    /// # Errors
    /// Returns [`EqError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, EqError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
