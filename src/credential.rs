use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::error::SyncError;
use crate::validation::{check_no_nul, check_non_empty, check_present};

// ---------------------------------------------------------------------------
// Credential spec
// ---------------------------------------------------------------------------

/// Declarative description of one Jenkins credential.
///
/// Deserialized from the caller's JSON list. `value` and `value2` are secrets
/// and are never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialSpec {
    pub id: String,
    pub description: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value2: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl CredentialSpec {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            value: value.into(),
            kind: kind.into(),
            value2: None,
            username: None,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_value2(mut self, value2: impl Into<String>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    /// Check required fields before anything is sent to the wrapper.
    pub fn validate(&self) -> Result<(), String> {
        check_present("id", &self.id)?;
        check_non_empty("value", &self.value)?;
        check_present("type", &self.kind)?;
        check_no_nul("id", &self.id)?;
        check_no_nul("description", &self.description)?;
        check_no_nul("value", &self.value)?;
        check_no_nul("type", &self.kind)?;
        if let Some(username) = &self.username {
            check_present("username", username)?;
            check_no_nul("username", username)?;
        }
        if let Some(value2) = &self.value2 {
            check_no_nul("value2", value2)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSpec")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("value", &"[REDACTED]")
            .field("kind", &self.kind)
            .field("value2", &self.value2.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// List parsing
// ---------------------------------------------------------------------------

/// Parse a JSON array of credential specs, keeping input order.
///
/// Elements are decoded one by one so a malformed entry is reported with its
/// position in the list.
pub fn parse_list(json: &str) -> Result<Vec<CredentialSpec>, SyncError> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| SyncError::InvalidList(e.to_string()))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| SyncError::InvalidSpec {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Validate every spec and reject duplicate ids.
pub fn validate_all(specs: &[CredentialSpec]) -> Result<(), SyncError> {
    let mut seen = HashSet::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        spec.validate()
            .map_err(|reason| SyncError::InvalidSpec { index, reason })?;
        if !seen.insert(spec.id.as_str()) {
            return Err(SyncError::InvalidSpec {
                index,
                reason: format!("duplicate credential id '{}'", spec.id),
            });
        }
    }
    Ok(())
}
