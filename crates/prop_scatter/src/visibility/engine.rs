//! Rule evaluation against a viewer context.
//!
//! [`VisibilityEngine::evaluate`] is a pure function of the rule, the context
//! and the whitelist lookup; hosts call it once per instance on every refresh
//! tick and it never accumulates state between calls.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::placement::scene::SceneGraph;
use crate::placement::{InstanceDescriptor, InstanceId};
use crate::visibility::{VisibilityRule, ViewerContext, WhitelistRule};
use crate::whitelist::{WhitelistCatalog, WhitelistLookup};

/// What to decide when a rule cannot be evaluated normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailurePolicy {
    /// Default to visible.
    FailOpen,
    /// Default to hidden.
    FailClosed,
}

impl FailurePolicy {
    #[inline]
    pub fn is_visible(self) -> bool {
        matches!(self, FailurePolicy::FailOpen)
    }
}

/// Revealed or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    Hidden,
    Revealed,
}

impl VisibilityState {
    pub fn is_revealed(self) -> bool {
        matches!(self, VisibilityState::Revealed)
    }
}

impl From<bool> for VisibilityState {
    fn from(revealed: bool) -> Self {
        if revealed {
            VisibilityState::Revealed
        } else {
            VisibilityState::Hidden
        }
    }
}

/// Failure policies for the engine.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisibilityConfig {
    /// Applied to a missing rule or one with unusable parameters.
    pub malformed_rule: FailurePolicy,
    /// Applied when a referenced whitelist cannot be resolved.
    pub missing_whitelist: FailurePolicy,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            malformed_rule: FailurePolicy::FailOpen,
            missing_whitelist: FailurePolicy::FailClosed,
        }
    }
}

impl VisibilityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_malformed_rule(mut self, policy: FailurePolicy) -> Self {
        self.malformed_rule = policy;
        self
    }

    pub fn with_missing_whitelist(mut self, policy: FailurePolicy) -> Self {
        self.missing_whitelist = policy;
        self
    }
}

/// Evaluates [`VisibilityRule`]s, resolving whitelist names through `W`.
#[derive(Debug, Clone)]
pub struct VisibilityEngine<W = WhitelistCatalog> {
    whitelists: W,
    config: VisibilityConfig,
}

impl VisibilityEngine<WhitelistCatalog> {
    /// Engine with no whitelists; every whitelist rule hits the missing-whitelist policy.
    pub fn without_whitelists() -> Self {
        Self::new(WhitelistCatalog::new())
    }
}

impl<W: WhitelistLookup> VisibilityEngine<W> {
    pub fn new(whitelists: W) -> Self {
        Self {
            whitelists,
            config: VisibilityConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VisibilityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn whitelists(&self) -> &W {
        &self.whitelists
    }

    /// Returns `true` when `rule` reveals the instance for this viewer.
    pub fn evaluate(&self, rule: &VisibilityRule, ctx: &ViewerContext) -> bool {
        if !rule.is_well_formed() {
            debug!(
                "Malformed visibility rule {:?}; applying {:?}.",
                rule, self.config.malformed_rule
            );
            return self.config.malformed_rule.is_visible();
        }

        match rule {
            VisibilityRule::AlwaysVisible => true,
            VisibilityRule::ByDate(date) => ctx.current_date == *date,
            VisibilityRule::ByLightLevel(threshold) => ctx.ambient_light <= *threshold,
            VisibilityRule::ByWhitelist(whitelist) => self.evaluate_whitelist(whitelist, ctx),
            VisibilityRule::AnyOf(rules) => rules.iter().any(|r| self.evaluate(r, ctx)),
        }
    }

    /// Like [`Self::evaluate`], treating an absent rule as malformed.
    pub fn evaluate_optional(&self, rule: Option<&VisibilityRule>, ctx: &ViewerContext) -> bool {
        match rule {
            Some(rule) => self.evaluate(rule, ctx),
            None => self.config.malformed_rule.is_visible(),
        }
    }

    pub fn state(&self, rule: &VisibilityRule, ctx: &ViewerContext) -> VisibilityState {
        self.evaluate(rule, ctx).into()
    }

    /// Evaluates every instance for one refresh tick.
    pub fn refresh(
        &self,
        instances: &[InstanceDescriptor],
        ctx: &ViewerContext,
    ) -> Vec<(InstanceId, VisibilityState)> {
        instances
            .iter()
            .map(|instance| (instance.id, self.state(&instance.rule, ctx)))
            .collect()
    }

    /// Pushes the refreshed states into the scene. Returns how many are revealed.
    pub fn apply<S: SceneGraph + ?Sized>(
        &self,
        instances: &[InstanceDescriptor],
        ctx: &ViewerContext,
        scene: &mut S,
    ) -> Result<usize> {
        let mut revealed = 0;
        for instance in instances {
            let visible = self.evaluate(&instance.rule, ctx);
            scene.set_visible(instance.node, visible)?;
            revealed += usize::from(visible);
        }
        Ok(revealed)
    }

    fn evaluate_whitelist(&self, rule: &WhitelistRule, ctx: &ViewerContext) -> bool {
        let Some(record) = self.whitelists.lookup(&rule.whitelist) else {
            debug!(
                "Whitelist '{}' unavailable; applying {:?}.",
                rule.whitelist, self.config.missing_whitelist
            );
            return self.config.missing_whitelist.is_visible();
        };
        let mode = rule.mode.unwrap_or(record.mode);
        record.admits_with(mode, &ctx.viewer_identity, ctx.viewer_trust_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitelist::{TrustLevel, WhitelistMode, WhitelistRecord};

    fn ctx() -> ViewerContext {
        ViewerContext::new("12/25")
            .with_ambient_light(0.5)
            .with_viewer("Alice", TrustLevel::User)
    }

    fn engine() -> VisibilityEngine {
        let catalog: WhitelistCatalog = [
            WhitelistRecord::new("trusted").with_trust_levels([TrustLevel::TrustedUser]),
            WhitelistRecord::new("names")
                .with_usernames(["Alice", "Bob"])
                .with_trust_levels([TrustLevel::Visitor])
                .with_mode(WhitelistMode::ByTrustLevel),
        ]
        .into_iter()
        .collect();
        VisibilityEngine::new(catalog)
    }

    #[test]
    fn always_visible_is_revealed() {
        assert!(engine().evaluate(&VisibilityRule::AlwaysVisible, &ctx()));
    }

    #[test]
    fn date_requires_exact_match() {
        let e = engine();
        let rule = VisibilityRule::by_date("12/25");
        assert!(e.evaluate(&rule, &ctx()));
        assert!(!e.evaluate(&rule, &ctx().with_date("12/24")));

        let padded = VisibilityRule::by_date("04/09");
        assert!(!e.evaluate(&padded, &ctx().with_date("4/9")));
        assert!(e.evaluate(&padded, &ctx().with_date("04/09")));
    }

    #[test]
    fn light_threshold_is_inclusive() {
        let e = engine();
        let rule = VisibilityRule::by_light_level(0.3);
        assert!(e.evaluate(&rule, &ctx().with_ambient_light(0.2)));
        assert!(!e.evaluate(&rule, &ctx().with_ambient_light(0.4)));
        assert!(e.evaluate(&rule, &ctx().with_ambient_light(0.3)));
        assert!(!e.evaluate(&rule, &ctx().with_ambient_light(f32::NAN)));
    }

    #[test]
    fn trust_level_membership() {
        let e = engine();
        let rule = VisibilityRule::by_whitelist("trusted", WhitelistMode::ByTrustLevel);
        let trusted = ctx().with_viewer("Zed", TrustLevel::TrustedUser);
        let known = ctx().with_viewer("Zed", TrustLevel::KnownUser);
        assert!(e.evaluate(&rule, &trusted));
        assert!(!e.evaluate(&rule, &known));
    }

    #[test]
    fn identity_membership_is_case_sensitive() {
        let e = engine();
        let rule = VisibilityRule::by_whitelist("names", WhitelistMode::ByIdentity);
        assert!(e.evaluate(&rule, &ctx()));
        assert!(!e.evaluate(&rule, &ctx().with_viewer("alice", TrustLevel::User)));
    }

    #[test]
    fn record_mode_used_when_rule_defers() {
        let e = engine();
        let rule = VisibilityRule::by_whitelist_record_mode("names");
        // "names" is saved in trust mode and only admits visitors.
        assert!(!e.evaluate(&rule, &ctx()));
        assert!(e.evaluate(&rule, &ctx().with_viewer("Nobody", TrustLevel::Visitor)));
    }

    #[test]
    fn any_of_short_circuits_in_order() {
        let e = engine();
        let rule = VisibilityRule::date_or_light("10/31", 0.3);
        assert!(!e.evaluate(&rule, &ctx()));
        assert!(e.evaluate(&rule, &ctx().with_date("10/31")));
        assert!(e.evaluate(&rule, &ctx().with_ambient_light(0.1)));

        // A malformed clause after a true one is never reached.
        let closed = VisibilityEngine::without_whitelists().with_config(
            VisibilityConfig::new().with_malformed_rule(FailurePolicy::FailClosed),
        );
        let rule = VisibilityRule::any_of([
            VisibilityRule::AlwaysVisible,
            VisibilityRule::by_date(""),
        ]);
        assert!(closed.evaluate(&rule, &ctx()));
    }

    #[test]
    fn malformed_rules_follow_policy() {
        let open = engine();
        let closed = engine()
            .with_config(VisibilityConfig::new().with_malformed_rule(FailurePolicy::FailClosed));
        let broken = [
            VisibilityRule::by_date(" "),
            VisibilityRule::by_light_level(f32::INFINITY),
            VisibilityRule::by_whitelist("", WhitelistMode::ByIdentity),
            VisibilityRule::any_of([]),
        ];
        for rule in &broken {
            assert!(open.evaluate(rule, &ctx()), "{rule:?}");
            assert!(!closed.evaluate(rule, &ctx()), "{rule:?}");
        }
        assert!(open.evaluate_optional(None, &ctx()));
        assert!(!closed.evaluate_optional(None, &ctx()));
    }

    #[test]
    fn missing_whitelist_fails_closed_by_default() {
        let rule = VisibilityRule::by_whitelist("gone", WhitelistMode::ByIdentity);
        assert!(!engine().evaluate(&rule, &ctx()));

        let open = engine()
            .with_config(VisibilityConfig::new().with_missing_whitelist(FailurePolicy::FailOpen));
        assert!(open.evaluate(&rule, &ctx()));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let e = engine();
        let rule = VisibilityRule::date_or_light("12/25", 0.1);
        let first = e.state(&rule, &ctx());
        for _ in 0..10 {
            assert_eq!(e.state(&rule, &ctx()), first);
        }
        assert_eq!(first, VisibilityState::Revealed);
    }
}
