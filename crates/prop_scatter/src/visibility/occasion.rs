//! Authoring presets that pair a display label with a visibility rule.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::visibility::VisibilityRule;

/// Calendar occasions offered by placement tools.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Occasion {
    Christmas,
    Halloween,
    Easter,
    /// Author-supplied `MM/DD` date.
    Custom(String),
    AlwaysVisible,
}

impl Occasion {
    pub fn label(&self) -> &'static str {
        match self {
            Occasion::Christmas => "Christmas",
            Occasion::Halloween => "Halloween",
            Occasion::Easter => "Easter",
            Occasion::Custom(_) => "Custom",
            Occasion::AlwaysVisible => "No Date (Always Visible)",
        }
    }

    pub fn date(&self) -> Option<&str> {
        match self {
            Occasion::Christmas => Some("12/25"),
            Occasion::Halloween => Some("10/31"),
            Occasion::Easter => Some("04/09"),
            Occasion::Custom(date) => Some(date.as_str()),
            Occasion::AlwaysVisible => None,
        }
    }

    pub fn rule(&self) -> VisibilityRule {
        match self.date() {
            Some(date) => VisibilityRule::by_date(date),
            None => VisibilityRule::AlwaysVisible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_map_to_fixed_dates() {
        assert_eq!(Occasion::Christmas.rule(), VisibilityRule::by_date("12/25"));
        assert_eq!(Occasion::Halloween.date(), Some("10/31"));
        assert_eq!(Occasion::Easter.date(), Some("04/09"));
        assert_eq!(
            Occasion::Custom("07/04".into()).rule(),
            VisibilityRule::by_date("07/04")
        );
        assert_eq!(Occasion::AlwaysVisible.rule(), VisibilityRule::AlwaysVisible);
        assert_eq!(Occasion::Custom("x".into()).label(), "Custom");
    }
}
