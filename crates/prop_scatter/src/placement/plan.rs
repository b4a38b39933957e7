//! Commands and configuration consumed by the placement planner.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::{NodeHandle, Template};
use crate::sampling::PlacementConstraints;
use crate::visibility::{Occasion, VisibilityRule};

/// Rule attached to every instance of a batch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleAssignment {
    pub rule: VisibilityRule,
    /// Overrides `rule` with [`VisibilityRule::AlwaysVisible`].
    pub always_visible: bool,
    /// Label shown in placement reports.
    pub label: Option<String>,
}

impl RuleAssignment {
    pub fn new(rule: VisibilityRule) -> Self {
        Self {
            rule,
            always_visible: false,
            label: None,
        }
    }

    pub fn always_visible() -> Self {
        Self::new(VisibilityRule::AlwaysVisible).with_always_visible(true)
    }

    /// Rule and label taken from an authoring preset.
    pub fn from_occasion(occasion: &Occasion) -> Self {
        Self::new(occasion.rule()).with_label(occasion.label())
    }

    pub fn with_always_visible(mut self, always_visible: bool) -> Self {
        self.always_visible = always_visible;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The rule instances actually receive.
    pub fn resolve(&self) -> VisibilityRule {
        if self.always_visible {
            VisibilityRule::AlwaysVisible
        } else {
            self.rule.clone()
        }
    }
}

/// What to do when one instance cannot find a free position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverlapPolicy {
    /// Fail the batch. Instances placed earlier in the batch remain.
    #[default]
    AbortBatch,
    /// Skip the instance and keep going.
    SkipInstance,
}

/// Request to place `count` instances of `template` inside the planner's area.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceBatchCommand {
    pub template: Template,
    /// Explicit instance name. When blank, names are generated as `<prefix>_<ordinal>`.
    pub name: Option<String>,
    pub constraints: PlacementConstraints,
    pub count: usize,
    pub rules: RuleAssignment,
    pub parent: Option<NodeHandle>,
    pub on_overlap_failure: OverlapPolicy,
}

impl PlaceBatchCommand {
    pub fn new(template: Template, count: usize) -> Self {
        Self {
            template,
            name: None,
            constraints: PlacementConstraints::default(),
            count,
            rules: RuleAssignment::default(),
            parent: None,
            on_overlap_failure: OverlapPolicy::default(),
        }
    }

    /// Single-instance command, as issued by one-at-a-time tools.
    pub fn single(template: Template) -> Self {
        Self::new(template, 1)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_constraints(mut self, constraints: PlacementConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_rules(mut self, rules: RuleAssignment) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.on_overlap_failure = policy;
        self
    }

    /// Explicit name if one was given and is not blank.
    pub(crate) fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Limits and behavior of a [`crate::placement::planner::PlacementPlanner`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Largest `count` a single command may request.
    pub max_per_batch: usize,
    /// Cap on the total number of placed instances, if any.
    pub max_placed: Option<usize>,
    /// Remove the area after a completed batch.
    pub consume_area_after_batch: bool,
    /// Group created as parent when a command names none.
    pub default_parent_name: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::props()
    }
}

impl PlannerConfig {
    /// Collectible-style placement: at most five instances in total.
    pub fn collectibles() -> Self {
        Self {
            max_per_batch: 5,
            max_placed: Some(5),
            consume_area_after_batch: false,
            default_parent_name: None,
        }
    }

    /// Decorative props: up to fifty per batch, grouped under `PlacedProps`.
    pub fn props() -> Self {
        Self {
            max_per_batch: 50,
            max_placed: None,
            consume_area_after_batch: true,
            default_parent_name: Some("PlacedProps".to_owned()),
        }
    }

    pub fn with_max_per_batch(mut self, max: usize) -> Self {
        self.max_per_batch = max;
        self
    }

    pub fn with_max_placed(mut self, max: Option<usize>) -> Self {
        self.max_placed = max;
        self
    }

    pub fn with_consume_area_after_batch(mut self, consume: bool) -> Self {
        self.consume_area_after_batch = consume;
        self
    }

    pub fn with_default_parent_name(mut self, name: Option<String>) -> Self {
        self.default_parent_name = name;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_per_batch == 0 {
            return Err(Error::InvalidConfig("max_per_batch must be >= 1".into()));
        }
        if self.max_placed == Some(0) {
            return Err(Error::InvalidConfig("max_placed must be >= 1".into()));
        }
        if let Some(name) = &self.default_parent_name {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "default_parent_name must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}
