//! Cross-deployment resource registry.
//!
//! Created clusters are recorded here so other deployment units can find
//! and import them by name. The composition engine only ever appends;
//! records are never updated or deleted from this side.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use stackform_common::error::{Result, StackformError};
use stackform_common::types::ResourceId;

/// A created resource, as recorded in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Provider identifier of the resource.
    pub identifier: ResourceId,
    /// Logical name other units look the resource up by.
    pub logical_name: String,
    /// Deployment unit that created the resource.
    pub owning_unit_name: String,
}

impl RegistryRecord {
    /// Lookup key of the record under `prefix`: `<prefix>/<unit>/<name>`.
    #[must_use]
    pub fn parameter_name(&self, prefix: &str) -> String {
        format!(
            "{}/{}/{}",
            prefix.trim_end_matches('/'),
            self.owning_unit_name,
            self.logical_name
        )
    }
}

/// Append-only store of created resources.
pub trait ResourceRegistry: Send + Sync {
    /// Records a created resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn save(&self, record: RegistryRecord) -> Result<()>;
}

/// Registry kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    records: Mutex<Vec<RegistryRecord>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every saved record, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<RegistryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of saved records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceRegistry for InMemoryRegistry {
    fn save(&self, record: RegistryRecord) -> Result<()> {
        tracing::debug!(name = %record.logical_name, unit = %record.owning_unit_name, "registry save");
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }
}

/// Registry persisted as a JSON-lines file, one record per line.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRegistry {
    /// Creates a registry appending to `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in the file. A missing file holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line fails to parse.
    pub fn load(&self) -> Result<Vec<RegistryRecord>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    fn io_error(&self, source: std::io::Error) -> StackformError {
        StackformError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResourceRegistry for JsonFileRegistry {
    fn save(&self, record: RegistryRecord) -> Result<()> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tracing::info!(
            path = %self.path.display(),
            name = %record.logical_name,
            unit = %record.owning_unit_name,
            "registry record appended"
        );
        Ok(())
    }
}
