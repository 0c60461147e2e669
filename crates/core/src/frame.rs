//! Overlay view model - what a host draws for one render.

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::phase::Phase;

/// Everything needed to draw the cover at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayFrame {
    /// Displayed percentage, 0-100
    pub percent: u8,

    /// Current phase
    pub phase: Phase,

    /// Status text for the phase
    pub status: String,

    /// Site name shown vertically beside the bar
    pub site_name: String,

    /// Decorative image, if configured
    pub loading_image: Option<String>,
}

impl OverlayFrame {
    /// Build the frame for a phase and percentage.
    pub fn new(config: &OverlayConfig, phase: Phase, percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            phase,
            status: config.labels.for_phase(phase).unwrap_or_default().to_string(),
            site_name: config.resolved_site_name().to_string(),
            loading_image: config.loading_image.clone(),
        }
    }

    /// Value for the `--progress` custom property.
    pub fn progress_css(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Class added to the cover element for this phase.
    pub fn css_class(&self) -> &'static str {
        self.phase.as_str()
    }

    /// Whether the full-screen sweep is covering the page.
    pub fn sweep_active(&self) -> bool {
        matches!(self.phase, Phase::Sweeping | Phase::Fadeout)
    }

    /// Whether the cover is fading out.
    pub fn is_fading(&self) -> bool {
        self.phase == Phase::Fadeout
    }
}
