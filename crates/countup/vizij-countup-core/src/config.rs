//! Options and constructor parameters for a count-up run.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default run length when none (or an unusable one) is given.
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Length of the hold phase used when retargeting a running animation.
pub const RESUME_DURATION_MS: f64 = 1000.0;

/// Largest number of decimal places rendered.
pub const MAX_DECIMALS: u32 = 20;

/// Display options. Every field is optional on the wire; missing fields take
/// their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountUpOptions {
    /// Ease-out-expo when true, linear otherwise.
    pub use_easing: bool,
    /// Insert `separator` every three integer digits.
    pub use_grouping: bool,
    pub separator: String,
    pub decimal: String,
}

impl Default for CountUpOptions {
    fn default() -> Self {
        Self {
            use_easing: true,
            use_grouping: true,
            separator: ",".to_string(),
            decimal: ".".to_string(),
        }
    }
}

impl CountUpOptions {
    /// Parse a (possibly partial) options object, e.g. `{"separator": " "}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Everything needed to build an [`Animator`](crate::Animator) apart from its
/// sink and scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountConfig {
    pub start_value: f64,
    pub end_value: f64,
    /// Requested decimal places; negative values clamp to 0.
    pub decimals: i32,
    /// Run length in seconds; `None`, zero, negative or non-finite means 2s.
    pub duration_secs: Option<f64>,
    pub options: CountUpOptions,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            start_value: 0.0,
            end_value: 0.0,
            decimals: 0,
            duration_secs: Some(DEFAULT_DURATION_MS / 1000.0),
            options: CountUpOptions::default(),
        }
    }
}

impl CountConfig {
    pub fn new(start_value: f64, end_value: f64) -> Self {
        Self {
            start_value,
            end_value,
            ..Self::default()
        }
    }

    pub fn decimals(mut self, decimals: i32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn options(mut self, options: CountUpOptions) -> Self {
        self.options = options;
        self
    }

    /// Decimal places after clamping into `[0, MAX_DECIMALS]`.
    pub fn normalized_decimals(&self) -> u32 {
        normalize_decimals(self.decimals)
    }

    /// Duration in milliseconds after falling back to the default.
    pub fn normalized_duration_ms(&self) -> f64 {
        normalize_duration_ms(self.duration_secs).unwrap_or(DEFAULT_DURATION_MS)
    }
}

pub(crate) fn normalize_decimals(decimals: i32) -> u32 {
    decimals.clamp(0, MAX_DECIMALS as i32) as u32
}

/// Seconds to milliseconds; `None` when the input is unusable.
pub(crate) fn normalize_duration_ms(secs: Option<f64>) -> Option<f64> {
    let ms = secs? * 1000.0;
    (ms.is_finite() && ms > 0.0).then_some(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_merge_with_defaults() {
        let opts = CountUpOptions::from_json(r#"{"separator":" ","useEasing":false}"#).unwrap();
        assert!(!opts.use_easing);
        assert!(opts.use_grouping);
        assert_eq!(opts.separator, " ");
        assert_eq!(opts.decimal, ".");
    }

    #[test]
    fn bad_options_json_is_reported() {
        let err = CountUpOptions::from_json(r#"{"useGrouping":"yes"}"#).unwrap_err();
        assert!(matches!(err, crate::CountUpError::InvalidOptions { .. }));
    }

    #[test]
    fn decimals_and_duration_normalize() {
        assert_eq!(CountConfig::new(0.0, 1.0).decimals(-3).normalized_decimals(), 0);
        assert_eq!(CountConfig::new(0.0, 1.0).decimals(99).normalized_decimals(), MAX_DECIMALS);
        assert_eq!(CountConfig::new(0.0, 1.0).duration_secs(2.5).normalized_duration_ms(), 2500.0);
        assert_eq!(CountConfig::new(0.0, 1.0).duration_secs(0.0).normalized_duration_ms(), 2000.0);
        assert_eq!(CountConfig::new(0.0, 1.0).duration_secs(-1.0).normalized_duration_ms(), 2000.0);
        assert_eq!(
            CountConfig::new(0.0, 1.0).duration_secs(f64::NAN).normalized_duration_ms(),
            2000.0
        );
        let cfg = CountConfig {
            duration_secs: None,
            ..CountConfig::new(0.0, 1.0)
        };
        assert_eq!(cfg.normalized_duration_ms(), 2000.0);
    }
}
