//! Per-viewer evaluation context.
use crate::whitelist::TrustLevel;

/// Everything a rule may look at when deciding visibility for one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerContext {
    /// Current date as `MM/DD`. Compared verbatim.
    pub current_date: String,
    /// Ambient light sample, usually the intensity of the scene's key light.
    pub ambient_light: f32,
    pub viewer_identity: String,
    pub viewer_trust_level: TrustLevel,
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self {
            current_date: String::new(),
            ambient_light: 1.0,
            viewer_identity: String::new(),
            viewer_trust_level: TrustLevel::Visitor,
        }
    }
}

impl ViewerContext {
    pub fn new(current_date: impl Into<String>) -> Self {
        Self {
            current_date: current_date.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, current_date: impl Into<String>) -> Self {
        self.current_date = current_date.into();
        self
    }

    pub fn with_ambient_light(mut self, ambient_light: f32) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    pub fn with_viewer(mut self, identity: impl Into<String>, trust_level: TrustLevel) -> Self {
        self.viewer_identity = identity.into();
        self.viewer_trust_level = trust_level;
        self
    }
}

/// Formats a calendar day as zero-padded `MM/DD`.
pub fn month_day(month: u32, day: u32) -> String {
    format!("{month:02}/{day:02}")
}
