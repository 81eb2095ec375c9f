//! Policy tables and their configuration loading
//!
//! The two caller tables (privileged and general) are static
//! configuration: loaded once at startup, read-only afterwards. A TOML
//! document is the canonical on-disk form; embedders can also assemble a
//! [`PolicyStore`] in code through the builder.

use crate::error::{AuthError, Result};
use crate::identity::{CallerId, Fingerprint};
use crate::scope::Scope;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The policy entry for one caller: its accepted fingerprints and the
/// scopes it may be authorized for.
#[derive(Debug, Clone)]
pub struct CallerConfiguration {
    caller: CallerId,
    fingerprints: HashSet<Fingerprint>,
    scopes: HashSet<Scope>,
}

impl CallerConfiguration {
    /// Create a configuration entry.
    pub fn new(
        caller: impl Into<CallerId>,
        fingerprints: impl IntoIterator<Item = Fingerprint>,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        Self {
            caller: caller.into(),
            fingerprints: fingerprints.into_iter().collect(),
            scopes: scopes.into_iter().collect(),
        }
    }

    /// The caller this entry configures.
    pub fn caller(&self) -> &CallerId {
        &self.caller
    }

    /// Whether the live fingerprint is in the accepted set.
    pub fn accepts(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    /// Whether the scope is in this caller's allowed set.
    pub fn allows(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }
}

/// One `[[privileged]]` / `[[general]]` table entry as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigEntry {
    /// Caller identifier
    pub caller: String,
    /// Accepted certificate fingerprints (colon-hex)
    pub fingerprints: Vec<String>,
    /// Scopes the caller may be authorized for
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// The deserialized policy document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Pre-vetted callers that bypass user consent
    #[serde(default)]
    pub privileged: Vec<ConfigEntry>,
    /// Callers requiring a per-scope consent grant
    #[serde(default)]
    pub general: Vec<ConfigEntry>,
}

impl PolicyConfig {
    /// Parse a policy document from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ParseError`] if the TOML is invalid or does
    /// not match the expected schema.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }

    /// Load a policy document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ReadError`] if the file cannot be read, or
    /// [`AuthError::ParseError`] if the TOML is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AuthError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }
}

/// The static caller tables consulted by the access gate.
///
/// Lookups are pure; the store is never mutated after construction and is
/// safe to share across threads without locking.
#[derive(Debug, Default)]
pub struct PolicyStore {
    privileged: HashMap<CallerId, CallerConfiguration>,
    general: HashMap<CallerId, CallerConfiguration>,
}

impl PolicyStore {
    /// Start building a store in code.
    pub fn builder() -> PolicyStoreBuilder {
        PolicyStoreBuilder::default()
    }

    /// Build a store from a parsed policy document.
    pub fn from_config(config: PolicyConfig) -> Self {
        let mut builder = Self::builder();
        for entry in config.privileged {
            builder = builder.privileged(entry.into());
        }
        for entry in config.general {
            builder = builder.general(entry.into());
        }
        builder.build()
    }

    /// Parse and build from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ParseError`] on an invalid document.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(Self::from_config(PolicyConfig::from_toml_str(document)?))
    }

    /// Load and build from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if reading or parsing fails.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_config(PolicyConfig::load_from_file(path)?))
    }

    /// The privileged-table entry for a caller, if any.
    pub fn privileged(&self, caller: &CallerId) -> Option<&CallerConfiguration> {
        self.privileged.get(caller)
    }

    /// The general-table entry for a caller, if any.
    pub fn general(&self, caller: &CallerId) -> Option<&CallerConfiguration> {
        self.general.get(caller)
    }
}

impl From<ConfigEntry> for CallerConfiguration {
    fn from(entry: ConfigEntry) -> Self {
        Self::new(
            entry.caller,
            entry.fingerprints.into_iter().map(Fingerprint::new),
            entry.scopes.into_iter().map(Scope::new),
        )
    }
}

/// Builder for in-code [`PolicyStore`] assembly.
#[derive(Debug, Default)]
pub struct PolicyStoreBuilder {
    store: PolicyStore,
}

impl PolicyStoreBuilder {
    /// Add a privileged-table entry; a second entry for the same caller
    /// replaces the first.
    #[must_use]
    pub fn privileged(mut self, configuration: CallerConfiguration) -> Self {
        self.store
            .privileged
            .insert(configuration.caller.clone(), configuration);
        self
    }

    /// Add a general-table entry; a second entry for the same caller
    /// replaces the first.
    #[must_use]
    pub fn general(mut self, configuration: CallerConfiguration) -> Self {
        self.store
            .general
            .insert(configuration.caller.clone(), configuration);
        self
    }

    /// Finish building.
    pub fn build(self) -> PolicyStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[privileged]]
caller = "com.acme.hub"
fingerprints = ["AA:BB:CC"]
scopes = ["READ_OPEN_DATA", "WRITE_OPEN_DATA"]

[[general]]
caller = "com.x.y"
fingerprints = ["11:22:33", "44:55:66"]
scopes = ["READ_OPEN_DATA"]
"#;

    #[test]
    fn parses_both_tables() {
        let store = PolicyStore::from_toml_str(SAMPLE).unwrap();

        let hub = store.privileged(&CallerId::new("com.acme.hub")).unwrap();
        assert!(hub.accepts(&Fingerprint::new("AA:BB:CC")));
        assert!(hub.allows(&Scope::new("READ_OPEN_DATA")));
        assert!(!hub.allows(&Scope::new("READ_OTHER")));

        let general = store.general(&CallerId::new("com.x.y")).unwrap();
        assert!(general.accepts(&Fingerprint::new("44:55:66")));
        assert!(store.privileged(&CallerId::new("com.x.y")).is_none());
    }

    #[test]
    fn fingerprints_normalize_case_on_load() {
        let store = PolicyStore::from_toml_str(
            r#"
[[general]]
caller = "com.x.y"
fingerprints = ["aa:bb:cc"]
scopes = ["S"]
"#,
        )
        .unwrap();
        let entry = store.general(&CallerId::new("com.x.y")).unwrap();
        assert!(entry.accepts(&Fingerprint::new("AA:BB:CC")));
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let store = PolicyStore::from_toml_str("").unwrap();
        assert!(store.privileged(&CallerId::new("anyone")).is_none());
        assert!(store.general(&CallerId::new("anyone")).is_none());
    }

    #[test]
    fn invalid_document_is_a_parse_error() {
        let result = PolicyStore::from_toml_str("[[general]]\ncaller = 42");
        assert!(matches!(result, Err(AuthError::ParseError(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let store = PolicyStore::load_from_file(file.path()).unwrap();
        assert!(store.general(&CallerId::new("com.x.y")).is_some());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = PolicyStore::load_from_file(Path::new("/nonexistent/policy.toml"));
        assert!(matches!(result, Err(AuthError::ReadError { .. })));
    }

    #[test]
    fn builder_replaces_duplicate_caller() {
        let store = PolicyStore::builder()
            .general(CallerConfiguration::new(
                "com.x.y",
                [Fingerprint::new("AA")],
                [Scope::new("OLD")],
            ))
            .general(CallerConfiguration::new(
                "com.x.y",
                [Fingerprint::new("AA")],
                [Scope::new("NEW")],
            ))
            .build();
        let entry = store.general(&CallerId::new("com.x.y")).unwrap();
        assert!(entry.allows(&Scope::new("NEW")));
        assert!(!entry.allows(&Scope::new("OLD")));
    }
}
