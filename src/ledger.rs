//! History ledger: the append-only record of every rating change
//!
//! The ledger is the engine's only durable artifact. Records are held in
//! canonical append order (the order the grouper produced rounds in); replay
//! for state reconstruction always uses that order. The externally visible
//! view is a derived display ordering, never stored back.

use crate::error::{RatingError, Result};
use crate::rating::RatingKey;
use crate::types::{RatingRecord, RatingScope};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Append-only sequence of rating records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<RatingRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<RatingRecord>) -> Self {
        Self { records }
    }

    /// Records in canonical append order
    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn push(&mut self, record: RatingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Externally visible ordering: date ascending, initialization records
    /// before same-day competition records, then athlete name. Stable, and
    /// purely a presentation pass; the append order is untouched.
    pub fn display_order(&self) -> Vec<RatingRecord> {
        let mut view = self.records.clone();
        view.sort_by(|a, b| {
            (a.date, a.competed, &a.name).cmp(&(b.date, b.competed, &b.name))
        });
        view
    }

    /// Reconstruct the current rating snapshot by replaying competed records
    /// in append order and keeping the last elo_after per key.
    pub fn replay(&self, scope: RatingScope) -> HashMap<RatingKey, f64> {
        let mut state = HashMap::new();
        for record in self.records.iter().filter(|r| r.competed) {
            let key = RatingKey::new(scope, &record.name, &record.discipline);
            state.insert(key, record.elo_after);
        }
        state
    }

    /// Latest competition date present in the ledger
    pub fn frontier(&self) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|r| r.competed)
            .map(|r| r.date)
            .max()
    }

    /// Persist the ledger as JSON.
    ///
    /// The ledger is never partially written: the records are serialized
    /// fully, written to a temporary sibling file, and renamed over the
    /// target only on success. A failed save leaves any previously saved
    /// ledger untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        let json = serde_json::to_vec(&self.records).context("Failed to serialize ledger")?;

        let mut tmp = NamedTempFile::new_in(parent).with_context(|| {
            format!("Failed to create temporary ledger file in {}", parent.display())
        })?;
        tmp.write_all(&json)
            .with_context(|| format!("Failed to write ledger to {}", tmp.path().display()))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to persist ledger to {}", path.display()))?;

        info!("Saved {} ledger records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Load a previously saved ledger.
    ///
    /// A missing file is [`RatingError::StateNotFound`] so callers can fall
    /// back to a full computation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RatingError::StateNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open ledger file {}", path.display()))?;
        let records: Vec<RatingRecord> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse ledger file {}", path.display()))?;

        Ok(Self { records })
    }
}
