//! File-backed whitelist persistence.
//!
//! Each record lives in its own JSON file named `<prefix><name>.<extension>`
//! (by default `whitelist_<name>.json`) inside one directory. Saves overwrite
//! the whole file and are not transactional: a crash mid-write can corrupt
//! the previous version, and two sessions saving the same name race with
//! last-writer-wins. The store assumes a single writer.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CreateOutcome, Error, Result};
use crate::whitelist::record::WhitelistFile;
use crate::whitelist::{WhitelistCatalog, WhitelistRecord};

pub const DEFAULT_FILE_PREFIX: &str = "whitelist_";
pub const DEFAULT_FILE_EXTENSION: &str = "json";

/// Where and under which naming convention whitelist files are stored.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhitelistStoreConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub file_extension: String,
}

impl Default for WhitelistStoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("whitelists"),
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
            file_extension: DEFAULT_FILE_EXTENSION.to_owned(),
        }
    }
}

impl WhitelistStoreConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("directory must not be empty".into()));
        }
        if self.file_extension.is_empty() || self.file_extension.contains(['/', '\\', '.']) {
            return Err(Error::InvalidConfig(
                "file_extension must be a bare, non-empty extension".into(),
            ));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(Error::InvalidConfig(
                "file_prefix must not contain path separators".into(),
            ));
        }
        Ok(())
    }
}

/// Loads, saves and enumerates [`WhitelistRecord`]s keyed by name.
#[derive(Debug, Clone)]
pub struct WhitelistStore {
    config: WhitelistStoreConfig,
}

impl WhitelistStore {
    pub fn try_new(config: WhitelistStoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Opens a store with the default naming convention in `directory`.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        Self::try_new(WhitelistStoreConfig::new(directory))
    }

    pub fn config(&self) -> &WhitelistStoreConfig {
        &self.config
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.config.directory.join(format!(
            "{}{}.{}",
            self.config.file_prefix, name, self.config.file_extension
        )))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    /// Loads `name`, creating an empty record first when no file exists.
    ///
    /// Content that does not parse is reported as [`Error::StoreCorrupt`].
    pub fn load(&self, name: &str) -> Result<WhitelistRecord> {
        let path = self.path_for(name)?;
        match fs::read(&path) {
            Ok(content) => {
                let record = parse_record(name, &content)?;
                info!("Whitelist loaded successfully: {}.", path.display());
                Ok(record)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Whitelist file {} not found; creating a new one.",
                    path.display()
                );
                self.create_if_absent(name).map(|(record, _)| record)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the file for `record.name` with the full record.
    pub fn save(&self, record: &WhitelistRecord) -> Result<()> {
        let path = self.path_for(&record.name)?;
        self.write_file(&path, &WhitelistFile::from(record))?;
        info!("Whitelist saved successfully: {}.", path.display());
        Ok(())
    }

    /// Writes an empty identity-mode record unless `name` already exists.
    ///
    /// An existing entry is left untouched and returned as stored.
    pub fn create_if_absent(&self, name: &str) -> Result<(WhitelistRecord, CreateOutcome)> {
        let path = self.path_for(name)?;
        if path.is_file() {
            warn!("Whitelist file already exists: {}.", path.display());
            let content = fs::read(&path)?;
            return Ok((parse_record(name, &content)?, CreateOutcome::AlreadyExists));
        }

        let record = WhitelistRecord::new(name);
        self.write_file(&path, &WhitelistFile::from(&record))?;
        info!("New whitelist created: {}.", path.display());
        Ok((record, CreateOutcome::Created))
    }

    /// Names of all stored whitelists, sorted. A missing directory lists nothing.
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.config.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{}", self.config.file_extension);
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let name = file_name
                .strip_prefix(self.config.file_prefix.as_str())
                .and_then(|rest| rest.strip_suffix(suffix.as_str()));
            if let Some(name) = name.filter(|n| validate_name(n).is_ok()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads every listed whitelist into a lookup catalog.
    pub fn load_catalog(&self) -> Result<WhitelistCatalog> {
        let mut catalog = WhitelistCatalog::new();
        for name in self.list_available()? {
            catalog.insert(self.load(&name)?);
        }
        Ok(catalog)
    }

    fn write_file(&self, path: &Path, file: &WhitelistFile) -> Result<()> {
        fs::create_dir_all(&self.config.directory)?;
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| Error::Other(format!("failed to encode whitelist: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Anything that is not a valid whitelist document, binary content included, is corrupt.
fn parse_record(name: &str, content: &[u8]) -> Result<WhitelistRecord> {
    let file: WhitelistFile =
        serde_json::from_slice(content).map_err(|source| Error::StoreCorrupt {
            name: name.to_owned(),
            source,
        })?;
    Ok(file.into_record(name))
}

/// Names become part of a file name, so they must be non-blank single path components.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
    {
        return Err(Error::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::whitelist::{TrustLevel, WhitelistLookup, WhitelistMode};

    fn store() -> (TempDir, WhitelistStore) {
        let dir = TempDir::new().unwrap();
        let store = WhitelistStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn path_follows_naming_convention() {
        let (_dir, store) = store();
        let path = store.path_for("vip").unwrap();
        assert_eq!(path.file_name().unwrap(), "whitelist_vip.json");
        assert!(matches!(
            store.path_for("../escape"),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(store.path_for("  "), Err(Error::InvalidName(_))));
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let record = WhitelistRecord::new("staff")
            .with_usernames(["Alice", "bob", "Alice"])
            .with_trust_levels([TrustLevel::KnownUser, TrustLevel::TrustedUser])
            .with_mode(WhitelistMode::ByTrustLevel);
        store.save(&record).unwrap();
        assert_eq!(store.load("staff").unwrap(), record);
    }

    #[test]
    fn save_overwrites_previous_version() {
        let (_dir, store) = store();
        let mut record = WhitelistRecord::new("staff").with_usernames(["Alice"]);
        store.save(&record).unwrap();
        record.usernames = vec!["Carol".into()];
        store.save(&record).unwrap();
        assert_eq!(store.load("staff").unwrap().usernames, vec!["Carol"]);
    }

    #[test]
    fn load_missing_creates_empty_record() {
        let (_dir, store) = store();
        assert!(!store.exists("fresh").unwrap());
        let record = store.load("fresh").unwrap();
        assert_eq!(record, WhitelistRecord::new("fresh"));
        assert!(store.exists("fresh").unwrap());
    }

    #[test]
    fn create_if_absent_is_idempotent() {
        let (_dir, store) = store();
        let (first, outcome) = store.create_if_absent("events").unwrap();
        assert_eq!(outcome, CreateOutcome::Created);
        let bytes = fs::read(store.path_for("events").unwrap()).unwrap();

        let (second, outcome) = store.create_if_absent("events").unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(first, second);
        assert_eq!(fs::read(store.path_for("events").unwrap()).unwrap(), bytes);
    }

    #[test]
    fn create_if_absent_keeps_existing_content() {
        let (_dir, store) = store();
        let record = WhitelistRecord::new("keep").with_usernames(["Dora"]);
        store.save(&record).unwrap();
        let (existing, outcome) = store.create_if_absent("keep").unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(existing, record);
    }

    #[test]
    fn empty_record_file_matches_legacy_layout() {
        let (_dir, store) = store();
        store.create_if_absent("blank").unwrap();
        let text = fs::read_to_string(store.path_for("blank").unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"usernames": [], "trustLevels": [], "whitelistType": 0})
        );
    }

    #[test]
    fn malformed_content_is_store_corrupt() {
        let (_dir, store) = store();
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path_for("broken").unwrap(), "{ not json").unwrap();
        let err = store.load("broken").unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { ref name, .. } if name == "broken"));

        fs::write(
            store.path_for("broken").unwrap(),
            r#"{"usernames":[],"trustLevels":["Moderator"],"whitelistType":0}"#,
        )
        .unwrap();
        assert!(matches!(
            store.create_if_absent("broken"),
            Err(Error::StoreCorrupt { .. })
        ));

        fs::write(store.path_for("binary").unwrap(), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.load("binary"),
            Err(Error::StoreCorrupt { ref name, .. }) if name == "binary"
        ));
        assert!(matches!(
            store.create_if_absent("binary"),
            Err(Error::StoreCorrupt { .. })
        ));
    }

    #[test]
    fn list_available_filters_by_convention() {
        let (_dir, store) = store();
        assert!(store.list_available().unwrap().is_empty());

        store.save(&WhitelistRecord::new("zeta")).unwrap();
        store.save(&WhitelistRecord::new("alpha")).unwrap();
        fs::write(store.directory().join("notes.txt"), "x").unwrap();
        fs::write(store.directory().join("whitelist_old.bak"), "x").unwrap();
        fs::write(store.directory().join("other_beta.json"), "{}").unwrap();

        assert_eq!(store.list_available().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn load_catalog_indexes_records_by_name() {
        let (_dir, store) = store();
        store
            .save(&WhitelistRecord::new("vip").with_usernames(["Alice"]))
            .unwrap();
        store.save(&WhitelistRecord::new("crew")).unwrap();
        let catalog = store.load_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup("vip").unwrap().contains_username("Alice"));
    }

    #[test]
    fn custom_convention_is_respected() {
        let dir = TempDir::new().unwrap();
        let config = WhitelistStoreConfig::new(dir.path())
            .with_file_prefix("acl-")
            .with_file_extension("txt");
        let store = WhitelistStore::try_new(config).unwrap();
        store.save(&WhitelistRecord::new("doors")).unwrap();
        assert!(dir.path().join("acl-doors.txt").is_file());
        assert_eq!(store.list_available().unwrap(), vec!["doors"]);
    }

    #[test]
    fn config_validation() {
        assert!(WhitelistStoreConfig::new("")
            .validate()
            .is_err());
        assert!(WhitelistStoreConfig::new("d")
            .with_file_extension(".json")
            .validate()
            .is_err());
        assert!(WhitelistStoreConfig::new("d")
            .with_file_prefix("a/b")
            .validate()
            .is_err());
        assert!(WhitelistStoreConfig::default().validate().is_ok());
    }
}
