//! Service container for dependency injection
//!
//! Wires settings, the filesystem and the storage collaborators together and
//! hands out a ready engine.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::MorphologyService;
use crate::config::Settings;
use crate::domain::Placeholders;
use crate::infrastructure::loader::RootFileLoader;
use crate::infrastructure::store::TomlSnapshotStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding settings and I/O collaborators.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    placeholders: Placeholders,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let placeholders = settings.placeholders()?;
        let settings = Arc::new(settings);

        Ok(Self {
            settings,
            fs,
            placeholders,
        })
    }

    pub fn snapshot_store(&self) -> TomlSnapshotStore {
        TomlSnapshotStore::new(Arc::clone(&self.fs), self.settings.state_path())
    }

    pub fn root_loader(&self) -> RootFileLoader {
        RootFileLoader::new(Arc::clone(&self.fs))
    }

    /// Engine restored from the snapshot, or a fresh one with built-in
    /// schemes, seeded from `roots_file` when configured.
    #[instrument(level = "debug", skip(self))]
    pub fn open_service(&self) -> InfraResult<MorphologyService> {
        if let Some(service) = self.snapshot_store().restore(self.placeholders)? {
            debug!("restored engine with {} roots", service.root_count());
            return Ok(service);
        }

        let mut service = MorphologyService::with_placeholders(self.placeholders)?;
        if let Some(roots_file) = &self.settings.roots_file {
            info!("seeding roots from {}", roots_file.display());
            self.root_loader().load_into(roots_file, &mut service)?;
        }
        Ok(service)
    }

    /// Write the engine state back to the snapshot file.
    pub fn persist(&self, service: &MorphologyService) -> InfraResult<()> {
        let store = self.snapshot_store();
        store.save(&service.snapshot())?;
        debug!(
            "saved {} roots to {}",
            service.root_count(),
            store.path().display()
        );
        Ok(())
    }
}
