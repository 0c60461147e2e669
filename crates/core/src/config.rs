//! Overlay configuration - display text and timing.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Site name used when neither a loading name nor a title is configured.
pub const DEFAULT_SITE_NAME: &str = "CLOUD09_SPACE";

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value outside its allowed range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Loading cover configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Name shown on the cover
    pub site_name: Option<String>,

    /// Site title, used when `site_name` is unset
    pub title: Option<String>,

    /// Status text per phase
    pub labels: PhaseLabels,

    /// Optional decorative image URL
    pub loading_image: Option<String>,

    /// Timer and easing parameters
    pub timing: TimingConfig,
}

impl OverlayConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.timing.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The name to display: loading name, then title, then the built-in default.
    pub fn resolved_site_name(&self) -> &str {
        [self.site_name.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_SITE_NAME)
    }

    /// Set the loading site name.
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Set the timing parameters.
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }
}

/// Status text shown under the percentage for each phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseLabels {
    /// Shown while initializing
    pub init: String,
    pub loading: String,
    pub complete: String,
    pub sweeping: String,
    pub fadeout: String,
}

impl Default for PhaseLabels {
    fn default() -> Self {
        Self {
            init: "INITIALIZING".to_string(),
            loading: "LOADING".to_string(),
            complete: "READY".to_string(),
            sweeping: "LAUNCHING".to_string(),
            fadeout: "WELCOME".to_string(),
        }
    }
}

impl PhaseLabels {
    /// Label for a visible phase; `None` once unmounted.
    pub fn for_phase(&self, phase: Phase) -> Option<&str> {
        match phase {
            Phase::Init => Some(&self.init),
            Phase::Loading => Some(&self.loading),
            Phase::Complete => Some(&self.complete),
            Phase::Sweeping => Some(&self.sweeping),
            Phase::Fadeout => Some(&self.fadeout),
            Phase::Unmounted => None,
        }
    }
}

/// Timer periods, phase durations and easing parameters.
///
/// Durations are stored as milliseconds so config files stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Target estimation period
    pub tick_interval_ms: u64,
    /// Animation frame period
    pub frame_interval_ms: u64,
    /// Hard deadline after which progress is forced to 100
    pub safety_timeout_ms: u64,
    /// Init → Loading delay
    pub init_delay_ms: u64,
    /// Latch → Complete delay
    pub complete_delay_ms: u64,
    /// Complete → Sweeping delay
    pub sweep_delay_ms: u64,
    /// Sweeping → Fadeout delay
    pub sweep_duration_ms: u64,
    /// Fadeout → Unmounted delay
    pub fadeout_duration_ms: u64,
    /// Highest target allowed while the loading flag is set
    pub soft_cap: u8,
    /// Fraction of the remaining gap covered per frame
    pub easing: f64,
    /// Gap below which the animation snaps to its target
    pub snap_threshold: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            frame_interval_ms: 16,
            safety_timeout_ms: 5000,
            init_delay_ms: 100,
            complete_delay_ms: 100,
            sweep_delay_ms: 150,
            sweep_duration_ms: 500,
            fadeout_duration_ms: 400,
            soft_cap: 95,
            easing: 0.1,
            snap_threshold: 0.5,
        }
    }
}

impl TimingConfig {
    /// Create the default timing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the safety timeout.
    pub fn with_safety_timeout(mut self, timeout: Duration) -> Self {
        self.safety_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the animation frame period.
    pub fn with_frame_interval(mut self, period: Duration) -> Self {
        self.frame_interval_ms = period.as_millis() as u64;
        self
    }

    /// Set the soft cap.
    pub fn with_soft_cap(mut self, cap: u8) -> Self {
        self.soft_cap = cap;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn complete_delay(&self) -> Duration {
        Duration::from_millis(self.complete_delay_ms)
    }

    pub fn sweep_delay(&self) -> Duration {
        Duration::from_millis(self.sweep_delay_ms)
    }

    pub fn sweep_duration(&self) -> Duration {
        Duration::from_millis(self.sweep_duration_ms)
    }

    pub fn fadeout_duration(&self) -> Duration {
        Duration::from_millis(self.fadeout_duration_ms)
    }

    /// Check every value is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than zero"));
        }
        if self.frame_interval_ms == 0 {
            return Err(invalid("frame_interval_ms", "must be greater than zero"));
        }
        if self.soft_cap > 100 {
            return Err(invalid(
                "soft_cap",
                format!("{} is above 100", self.soft_cap),
            ));
        }
        if !(self.easing > 0.0 && self.easing <= 1.0) {
            return Err(invalid(
                "easing",
                format!("{} is outside (0, 1]", self.easing),
            ));
        }
        if !(self.snap_threshold > 0.0) {
            return Err(invalid("snap_threshold", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_name_fallback_chain() {
        let mut config = OverlayConfig::default();
        assert_eq!(config.resolved_site_name(), DEFAULT_SITE_NAME);

        config.title = Some("My Blog".to_string());
        assert_eq!(config.resolved_site_name(), "My Blog");

        config.site_name = Some("ENDSPACE".to_string());
        assert_eq!(config.resolved_site_name(), "ENDSPACE");
    }

    #[test]
    fn test_blank_site_name_falls_through() {
        let config = OverlayConfig {
            site_name: Some("  ".to_string()),
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_site_name(), "Title");
    }

    #[test]
    fn test_labels_per_phase() {
        let labels = PhaseLabels::default();
        assert_eq!(labels.for_phase(Phase::Init), Some("INITIALIZING"));
        assert_eq!(labels.for_phase(Phase::Complete), Some("READY"));
        assert_eq!(labels.for_phase(Phase::Fadeout), Some("WELCOME"));
        assert_eq!(labels.for_phase(Phase::Unmounted), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json_str(
            r#"{ "site_name": "NODE", "labels": { "complete": "GO" }, "timing": { "safety_timeout_ms": 3000 } }"#,
        )
        .unwrap();

        assert_eq!(config.resolved_site_name(), "NODE");
        assert_eq!(config.labels.complete, "GO");
        assert_eq!(config.labels.loading, "LOADING");
        assert_eq!(config.timing.safety_timeout(), Duration::from_millis(3000));
        assert_eq!(config.timing.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_default_timing_is_valid() {
        assert!(TimingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_timing_rejected() {
        let zero_tick = TimingConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_tick.validate(),
            Err(ConfigError::Invalid { field: "tick_interval_ms", .. })
        ));

        let cap = TimingConfig::default().with_soft_cap(101);
        assert!(matches!(
            cap.validate(),
            Err(ConfigError::Invalid { field: "soft_cap", .. })
        ));

        let easing = TimingConfig {
            easing: 0.0,
            ..Default::default()
        };
        assert!(easing.validate().is_err());
    }

    #[test]
    fn test_invalid_json_surfaces_error() {
        let err = OverlayConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let err = OverlayConfig::from_json_str(r#"{ "timing": { "frame_interval_ms": 0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("frame_interval_ms"));
    }
}
