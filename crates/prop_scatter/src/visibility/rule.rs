//! Declarative visibility rules attached to placed instances.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::whitelist::WhitelistMode;

/// Reference to a named whitelist plus the list it should be checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhitelistRule {
    /// Name of the whitelist record.
    pub whitelist: String,
    /// Overrides the record's persisted mode when set.
    pub mode: Option<WhitelistMode>,
}

/// Condition deciding whether an instance is revealed to a viewer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VisibilityRule {
    #[default]
    AlwaysVisible,
    /// Revealed when the viewer's `MM/DD` date equals this string exactly.
    ByDate(String),
    /// Revealed when ambient light is at or below this threshold.
    ByLightLevel(f32),
    ByWhitelist(WhitelistRule),
    /// Revealed when any clause is; clauses are checked in order.
    AnyOf(Vec<VisibilityRule>),
}

impl VisibilityRule {
    pub fn by_date(date: impl Into<String>) -> Self {
        VisibilityRule::ByDate(date.into())
    }

    pub fn by_light_level(threshold: f32) -> Self {
        VisibilityRule::ByLightLevel(threshold)
    }

    /// Checks the named whitelist using the given list.
    pub fn by_whitelist(whitelist: impl Into<String>, mode: WhitelistMode) -> Self {
        VisibilityRule::ByWhitelist(WhitelistRule {
            whitelist: whitelist.into(),
            mode: Some(mode),
        })
    }

    /// Checks the named whitelist using whatever mode the record was saved with.
    pub fn by_whitelist_record_mode(whitelist: impl Into<String>) -> Self {
        VisibilityRule::ByWhitelist(WhitelistRule {
            whitelist: whitelist.into(),
            mode: None,
        })
    }

    pub fn any_of(rules: impl IntoIterator<Item = VisibilityRule>) -> Self {
        VisibilityRule::AnyOf(rules.into_iter().collect())
    }

    /// Date-or-light combination used by decorative props.
    pub fn date_or_light(date: impl Into<String>, threshold: f32) -> Self {
        Self::any_of([Self::by_date(date), Self::by_light_level(threshold)])
    }

    /// Whether the rule itself carries usable parameters.
    ///
    /// Only the top level is checked; `AnyOf` clauses are judged when evaluated.
    pub fn is_well_formed(&self) -> bool {
        match self {
            VisibilityRule::AlwaysVisible => true,
            VisibilityRule::ByDate(date) => !date.trim().is_empty(),
            VisibilityRule::ByLightLevel(threshold) => threshold.is_finite(),
            VisibilityRule::ByWhitelist(rule) => !rule.whitelist.trim().is_empty(),
            VisibilityRule::AnyOf(rules) => !rules.is_empty(),
        }
    }

    /// First enable date found in the rule, for reports.
    pub fn enable_date(&self) -> Option<&str> {
        match self {
            VisibilityRule::ByDate(date) => Some(date.as_str()),
            VisibilityRule::AnyOf(rules) => rules.iter().find_map(VisibilityRule::enable_date),
            _ => None,
        }
    }
}
