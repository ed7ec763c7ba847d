//! Parameter layout and the lock-free store shared by the control and audio paths.
//!
//! The control path (UI, automation) writes values with [`ParameterStore::set`];
//! the audio path samples them once per block. Each value is an `f32` stored as
//! its bit pattern in an `AtomicU32`, so reads never block and never tear.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::EqError;
use crate::settings::{
    Slope, DEFAULT_HIGH_CUT_FREQ_HZ, DEFAULT_LOW_CUT_FREQ_HZ, DEFAULT_PEAK_FREQ_HZ,
    DEFAULT_PEAK_GAIN_DB, DEFAULT_PEAK_Q,
};

const PARAMETER_COUNT: usize = 7;

/// Identifier of one host-visible parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterId {
    LowCutFreq,
    HighCutFreq,
    PeakFreq,
    PeakGain,
    PeakQuality,
    LowCutSlope,
    HighCutSlope,
}

impl ParameterId {
    pub const ALL: [ParameterId; PARAMETER_COUNT] = [
        ParameterId::LowCutFreq,
        ParameterId::HighCutFreq,
        ParameterId::PeakFreq,
        ParameterId::PeakGain,
        ParameterId::PeakQuality,
        ParameterId::LowCutSlope,
        ParameterId::HighCutSlope,
    ];

    /// Stable string id, as seen by hosts and settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterId::LowCutFreq => "LowCut Freq",
            ParameterId::HighCutFreq => "HighCut Freq",
            ParameterId::PeakFreq => "Peak Freq",
            ParameterId::PeakGain => "Peak Gain",
            ParameterId::PeakQuality => "Peak Quality",
            ParameterId::LowCutSlope => "LowCut Slope",
            ParameterId::HighCutSlope => "HighCut Slope",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for ParameterId {
    type Err = EqError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| EqError::UnknownParameter(value.to_string()))
    }
}

/// Value range with step snapping and a skewed normalized mapping.
///
/// `skew < 1` spends more of the normalized range on the low end, which is
/// what frequency controls want.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub skew: f32,
}

impl ParameterRange {
    pub fn new(min: f32, max: f32, step: f32, skew: f32) -> Self {
        Self {
            min,
            max,
            step,
            skew,
        }
    }

    /// Clamp to `[min, max]` and snap to the nearest step.
    pub fn constrain(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let value = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return value;
        }

        let min = self.min as f64;
        let step = self.step as f64;
        let steps = ((value as f64 - min) / step).round();
        let snapped = min + steps * step;
        if (snapped - value as f64).abs() < step * 1.0e-4 {
            return value;
        }
        (snapped as f32).clamp(self.min, self.max)
    }

    /// Map a plain value into `0..=1`.
    pub fn to_normalized(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        let proportion = ((self.constrain(value) - self.min) / span).clamp(0.0, 1.0);
        if (self.skew - 1.0).abs() > f32::EPSILON && proportion > 0.0 {
            proportion.powf(self.skew)
        } else {
            proportion
        }
    }

    /// Map a normalized `0..=1` value back into the plain range.
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let mut proportion = if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if (self.skew - 1.0).abs() > f32::EPSILON && proportion > 0.0 {
            proportion = proportion.powf(1.0 / self.skew);
        }
        self.constrain(self.min + (self.max - self.min) * proportion)
    }
}

/// Descriptor of one parameter in the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    pub id: ParameterId,
    pub name: String,
    pub range: ParameterRange,
    pub default: f32,
    /// Choice labels; empty for continuous parameters.
    pub choices: Vec<String>,
}

impl ParameterSpec {
    pub fn float(id: ParameterId, range: ParameterRange, default: f32) -> Self {
        Self {
            id,
            name: id.as_str().to_string(),
            range,
            default: range.constrain(default),
            choices: Vec::new(),
        }
    }

    pub fn choice(id: ParameterId, choices: Vec<String>, default_index: usize) -> Self {
        let last = choices.len().saturating_sub(1);
        Self {
            id,
            name: id.as_str().to_string(),
            range: ParameterRange::new(0.0, last as f32, 1.0, 1.0),
            default: default_index.min(last) as f32,
            choices,
        }
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Human-readable text for a plain value.
    pub fn display_value(&self, value: f32) -> String {
        if self.is_choice() {
            let index = self.range.constrain(value) as usize;
            return self.choices.get(index).cloned().unwrap_or_default();
        }
        format!("{}", self.range.constrain(value))
    }
}

/// Ordered set of parameter descriptors, indexed by [`ParameterId`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterLayout {
    specs: Vec<ParameterSpec>,
}

impl ParameterLayout {
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn spec(&self, id: ParameterId) -> &ParameterSpec {
        &self.specs[id.index()]
    }
}

impl Default for ParameterLayout {
    fn default() -> Self {
        create_parameter_layout()
    }
}

/// The equalizer's seven parameters with their ranges and defaults.
pub fn create_parameter_layout() -> ParameterLayout {
    let frequency = ParameterRange::new(20.0, 20_000.0, 1.0, 0.25);
    let slope_labels: Vec<String> = Slope::ALL
        .iter()
        .map(|slope| slope.label().to_string())
        .collect();

    let specs = ParameterId::ALL
        .iter()
        .map(|&id| match id {
            ParameterId::LowCutFreq => {
                ParameterSpec::float(id, frequency, DEFAULT_LOW_CUT_FREQ_HZ)
            }
            ParameterId::HighCutFreq => {
                ParameterSpec::float(id, frequency, DEFAULT_HIGH_CUT_FREQ_HZ)
            }
            ParameterId::PeakFreq => ParameterSpec::float(id, frequency, DEFAULT_PEAK_FREQ_HZ),
            ParameterId::PeakGain => ParameterSpec::float(
                id,
                ParameterRange::new(-24.0, 24.0, 0.5, 1.0),
                DEFAULT_PEAK_GAIN_DB,
            ),
            ParameterId::PeakQuality => ParameterSpec::float(
                id,
                ParameterRange::new(0.1, 10.0, 0.05, 1.0),
                DEFAULT_PEAK_Q,
            ),
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => {
                ParameterSpec::choice(id, slope_labels.clone(), Slope::default().ordinal())
            }
        })
        .collect();

    ParameterLayout { specs }
}

/// Lock-free `f32` cell.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Current parameter values, safe to share between threads.
#[derive(Debug)]
pub struct ParameterStore {
    layout: ParameterLayout,
    values: [AtomicF32; PARAMETER_COUNT],
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    /// Store initialized to the layout defaults.
    pub fn new() -> Self {
        let layout = create_parameter_layout();
        let values = std::array::from_fn(|idx| AtomicF32::new(layout.specs[idx].default));
        Self { layout, values }
    }

    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    /// Current plain value. Never blocks.
    pub fn get(&self, id: ParameterId) -> f32 {
        self.values[id.index()].load()
    }

    /// Constrain `value` to the parameter range and publish it.
    ///
    /// # Returns
    /// The value actually stored.
    pub fn set(&self, id: ParameterId, value: f32) -> f32 {
        let value = self.layout.spec(id).range.constrain(value);
        self.values[id.index()].store(value);
        value
    }

    pub fn get_normalized(&self, id: ParameterId) -> f32 {
        self.layout.spec(id).range.to_normalized(self.get(id))
    }

    /// Publish a host-normalized (`0..=1`) value.
    pub fn set_normalized(&self, id: ParameterId, normalized: f32) -> f32 {
        let value = self.layout.spec(id).range.from_normalized(normalized);
        self.values[id.index()].store(value);
        value
    }

    /// Look up a value by its string id.
    ///
    /// # Errors
    /// Returns [`EqError::UnknownParameter`] if `name` is not a parameter id.
    pub fn get_by_name(&self, name: &str) -> Result<f32, EqError> {
        Ok(self.get(name.parse()?))
    }

    /// Set a value by its string id.
    ///
    /// # Errors
    /// Returns [`EqError::UnknownParameter`] if `name` is not a parameter id.
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<f32, EqError> {
        Ok(self.set(name.parse()?, value))
    }

    pub fn reset_to_defaults(&self) {
        for spec in self.layout.specs() {
            self.values[spec.id.index()].store(spec.default);
        }
    }
}
