//! TOML snapshot persistence
//!
//! The engine exports and imports plain [`Snapshot`] data; this store owns
//! the file format.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::services::{MorphologyService, RestoreReport};
use crate::domain::{Placeholders, Snapshot};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

pub struct TomlSnapshotStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl TomlSnapshotStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Read the snapshot; `None` if the file does not exist yet.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> InfraResult<Option<Snapshot>> {
        if !self.exists() {
            debug!("no snapshot yet");
            return Ok(None);
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| InfraError::io(format!("read {}", self.path.display()), e))?;
        let snapshot: Snapshot = toml::from_str(&content).map_err(|e| InfraError::Snapshot {
            message: format!("parse {}: {}", self.path.display(), e),
        })?;
        debug!(
            "snapshot: {} roots, {} schemes",
            snapshot.roots.len(),
            snapshot.schemes.len()
        );
        Ok(Some(snapshot))
    }

    #[instrument(level = "debug", skip(self, snapshot), fields(path = %self.path.display()))]
    pub fn save(&self, snapshot: &Snapshot) -> InfraResult<()> {
        let content = toml::to_string_pretty(snapshot).map_err(|e| InfraError::Snapshot {
            message: format!("serialize: {}", e),
        })?;
        self.fs
            .ensure_parent(&self.path)
            .map_err(|e| InfraError::io(format!("create parent of {}", self.path.display()), e))?;
        self.fs
            .write(&self.path, &content)
            .map_err(|e| InfraError::io(format!("write {}", self.path.display()), e))
    }

    /// Rebuild an engine from the stored snapshot, if any.
    pub fn restore(&self, placeholders: Placeholders) -> InfraResult<Option<MorphologyService>> {
        let Some(snapshot) = self.load()? else {
            return Ok(None);
        };
        let (service, report) = MorphologyService::from_snapshot(snapshot, placeholders);
        log_restore_report(&self.path, &report);
        Ok(Some(service))
    }
}

fn log_restore_report(path: &Path, report: &RestoreReport) {
    if report.is_clean() {
        return;
    }
    for name in &report.skipped_schemes {
        warn!("{}: skipped scheme '{}' (not restorable)", path.display(), name);
    }
    for root in &report.invalid_roots {
        warn!("{}: skipped invalid root '{}'", path.display(), root);
    }
    for root in &report.duplicate_roots {
        warn!("{}: skipped duplicate root '{}'", path.display(), root);
    }
}
