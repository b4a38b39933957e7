//! Whitelist records and the trust vocabulary they are written in.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Coarse viewer classification supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrustLevel {
    Visitor,
    #[serde(alias = "New User")]
    NewUser,
    User,
    #[serde(alias = "Known User")]
    KnownUser,
    #[serde(alias = "Trusted User")]
    TrustedUser,
}

impl TrustLevel {
    /// All levels from least to most trusted.
    pub const ALL: [TrustLevel; 5] = [
        TrustLevel::Visitor,
        TrustLevel::NewUser,
        TrustLevel::User,
        TrustLevel::KnownUser,
        TrustLevel::TrustedUser,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::Visitor => "Visitor",
            TrustLevel::NewUser => "NewUser",
            TrustLevel::User => "User",
            TrustLevel::KnownUser => "KnownUser",
            TrustLevel::TrustedUser => "TrustedUser",
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustLevel {
    type Err = Error;

    /// Accepts both `TrustedUser` and the spaced `Trusted User` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.split_whitespace().collect();
        TrustLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == compact)
            .ok_or_else(|| Error::Other(format!("unknown trust level '{s}'")))
    }
}

/// Which list of a [`WhitelistRecord`] decides admission.
///
/// Persisted as an integer: `0` for identity, `1` for trust level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WhitelistMode {
    #[default]
    ByIdentity,
    ByTrustLevel,
}

impl From<WhitelistMode> for u8 {
    fn from(mode: WhitelistMode) -> Self {
        match mode {
            WhitelistMode::ByIdentity => 0,
            WhitelistMode::ByTrustLevel => 1,
        }
    }
}

impl TryFrom<u8> for WhitelistMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WhitelistMode::ByIdentity),
            1 => Ok(WhitelistMode::ByTrustLevel),
            other => Err(format!("unknown whitelist type {other}")),
        }
    }
}

/// Access-control configuration persisted under a unique name.
///
/// `usernames` and `trust_levels` are kept independently; `mode` picks the one
/// consulted during evaluation and the other is retained untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistRecord {
    pub name: String,
    /// Case-sensitive identities in authoring order. Duplicates are kept.
    pub usernames: Vec<String>,
    pub trust_levels: BTreeSet<TrustLevel>,
    pub mode: WhitelistMode,
}

impl WhitelistRecord {
    /// Creates an empty identity-mode record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usernames: Vec::new(),
            trust_levels: BTreeSet::new(),
            mode: WhitelistMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: WhitelistMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usernames.extend(usernames.into_iter().map(Into::into));
        self
    }

    pub fn with_trust_levels<I>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = TrustLevel>,
    {
        self.trust_levels.extend(levels);
        self
    }

    pub fn add_username(&mut self, username: impl Into<String>) {
        self.usernames.push(username.into());
    }

    /// Returns `true` when the level was not already allowed.
    pub fn allow_trust_level(&mut self, level: TrustLevel) -> bool {
        self.trust_levels.insert(level)
    }

    pub fn contains_username(&self, identity: &str) -> bool {
        self.usernames.iter().any(|u| u == identity)
    }

    pub fn allows_trust_level(&self, level: TrustLevel) -> bool {
        self.trust_levels.contains(&level)
    }

    /// Checks a viewer against the list selected by `mode`.
    pub fn admits_with(&self, mode: WhitelistMode, identity: &str, level: TrustLevel) -> bool {
        match mode {
            WhitelistMode::ByIdentity => self.contains_username(identity),
            WhitelistMode::ByTrustLevel => self.allows_trust_level(level),
        }
    }

    /// Checks a viewer using the record's own mode.
    pub fn admits(&self, identity: &str, level: TrustLevel) -> bool {
        self.admits_with(self.mode, identity, level)
    }
}

/// On-disk layout: exactly `usernames`, `trustLevels` and `whitelistType`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WhitelistFile {
    pub(crate) usernames: Vec<String>,
    pub(crate) trust_levels: Vec<TrustLevel>,
    pub(crate) whitelist_type: WhitelistMode,
}

impl WhitelistFile {
    pub(crate) fn into_record(self, name: impl Into<String>) -> WhitelistRecord {
        WhitelistRecord {
            name: name.into(),
            usernames: self.usernames,
            trust_levels: self.trust_levels.into_iter().collect(),
            mode: self.whitelist_type,
        }
    }
}

impl From<&WhitelistRecord> for WhitelistFile {
    fn from(record: &WhitelistRecord) -> Self {
        Self {
            usernames: record.usernames.clone(),
            trust_levels: record.trust_levels.iter().copied().collect(),
            whitelist_type: record.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_level_parses_both_spellings() {
        assert_eq!(
            "TrustedUser".parse::<TrustLevel>().unwrap(),
            TrustLevel::TrustedUser
        );
        assert_eq!(
            "Known User".parse::<TrustLevel>().unwrap(),
            TrustLevel::KnownUser
        );
        assert!("Moderator".parse::<TrustLevel>().is_err());
    }

    #[test]
    fn trust_levels_are_ordered_by_tier() {
        let mut sorted = TrustLevel::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, TrustLevel::ALL);
        assert!(TrustLevel::Visitor < TrustLevel::TrustedUser);
    }

    #[test]
    fn usernames_are_case_sensitive_and_not_deduplicated() {
        let mut record = WhitelistRecord::new("vip").with_usernames(["Alice", "Bob"]);
        record.add_username("Alice");
        assert_eq!(record.usernames.len(), 3);
        assert!(record.contains_username("Alice"));
        assert!(!record.contains_username("alice"));
    }

    #[test]
    fn mode_selects_the_authoritative_list() {
        let record = WhitelistRecord::new("mixed")
            .with_usernames(["Alice"])
            .with_trust_levels([TrustLevel::TrustedUser]);

        assert!(record.admits("Alice", TrustLevel::Visitor));
        assert!(!record.admits("Mallory", TrustLevel::TrustedUser));

        let by_trust = record.clone().with_mode(WhitelistMode::ByTrustLevel);
        assert!(by_trust.admits("Mallory", TrustLevel::TrustedUser));
        assert!(!by_trust.admits("Alice", TrustLevel::Visitor));
        assert_eq!(by_trust.usernames, record.usernames);
    }

    #[test]
    fn file_layout_uses_legacy_field_names() {
        let record = WhitelistRecord::new("x")
            .with_usernames(["Alice"])
            .with_trust_levels([TrustLevel::NewUser])
            .with_mode(WhitelistMode::ByTrustLevel);
        let json = serde_json::to_value(WhitelistFile::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "usernames": ["Alice"],
                "trustLevels": ["NewUser"],
                "whitelistType": 1
            })
        );
    }

    #[test]
    fn file_accepts_spaced_levels_and_rejects_unknown_type() {
        let file: WhitelistFile = serde_json::from_str(
            r#"{"usernames":[],"trustLevels":["Trusted User","Visitor"],"whitelistType":0}"#,
        )
        .unwrap();
        let record = file.into_record("legacy");
        assert!(record.allows_trust_level(TrustLevel::TrustedUser));
        assert!(record.allows_trust_level(TrustLevel::Visitor));

        let bad = serde_json::from_str::<WhitelistFile>(
            r#"{"usernames":[],"trustLevels":[],"whitelistType":7}"#,
        );
        assert!(bad.is_err());
    }
}
