use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Outcome record
// ---------------------------------------------------------------------------

/// Raw wrapper outcome for one credential. Serializes as `{"<id>": "<outcome>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub id: String,
    pub outcome: String,
}

impl OutcomeRecord {
    pub fn new(id: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            outcome: outcome.into(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        OutcomeKind::classify(&self.outcome)
    }
}

impl Serialize for OutcomeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id, &self.outcome)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Outcome classification (summary logging only)
// ---------------------------------------------------------------------------

/// Result classes the wrapper reports for `add_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeKind {
    UpToDate,
    Updated,
    UpdatedFailed,
    Added,
    AddedFailed,
    Unknown,
}

impl OutcomeKind {
    pub fn classify(raw: &str) -> Self {
        match raw.trim() {
            "up-to-date" => Self::UpToDate,
            "updated" => Self::Updated,
            "updated-failed" => Self::UpdatedFailed,
            "added" => Self::Added,
            "added-failed" => Self::AddedFailed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::Updated => "updated",
            Self::UpdatedFailed => "updated-failed",
            Self::Added => "added",
            Self::AddedFailed => "added-failed",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::UpdatedFailed | Self::AddedFailed)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Ordered outcomes of one run, one record per input credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Report {
    records: Vec<OutcomeRecord>,
}

impl Report {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records per outcome class.
    pub fn summary(&self) -> BTreeMap<OutcomeKind, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }
}
