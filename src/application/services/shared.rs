//! Thread-safe handle to a derivation engine
//!
//! The engine itself has no locking. Tree rotations must never be observed
//! half done, so every mutation takes the write lock; pure reads share the
//! read lock.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument};

use crate::application::services::MorphologyService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    Analysis, Derivation, LoadReport, RootEntry, SchemeSummary, SchemeType, Snapshot,
    Validation,
};

/// Cloneable handle; clones share one engine.
#[derive(Debug, Clone)]
pub struct SharedMorphology {
    inner: Arc<RwLock<MorphologyService>>,
}

impl SharedMorphology {
    pub fn new(service: MorphologyService) -> Self {
        Self {
            inner: Arc::new(RwLock::new(service)),
        }
    }

    fn read(&self) -> ApplicationResult<RwLockReadGuard<'_, MorphologyService>> {
        self.inner
            .read()
            .map_err(|e| ApplicationError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> ApplicationResult<RwLockWriteGuard<'_, MorphologyService>> {
        self.inner
            .write()
            .map_err(|e| ApplicationError::LockPoisoned(e.to_string()))
    }

    /// Run a read-only closure against the engine.
    pub fn with_read<T>(&self, f: impl FnOnce(&MorphologyService) -> T) -> ApplicationResult<T> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    // ------------- mutations (write lock) -------------

    #[instrument(level = "debug", skip(self))]
    pub fn add_root(&self, root: &str) -> ApplicationResult<()> {
        self.write()?.add_root(root)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, roots))]
    pub fn load_roots(&self, roots: Vec<String>) -> ApplicationResult<LoadReport> {
        let report = self.write()?.load_roots(roots);
        debug!("load_roots: {:?}", report);
        Ok(report)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_scheme(&self, name: &str, scheme_type: SchemeType) -> ApplicationResult<()> {
        self.write()?.add_scheme(name, scheme_type)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, rule))]
    pub fn add_explicit_scheme<F>(
        &self,
        name: &str,
        scheme_type: SchemeType,
        rule: F,
    ) -> ApplicationResult<()>
    where
        F: Fn(char, char, char) -> String + Send + Sync + 'static,
    {
        self.write()?.add_explicit_scheme(name, scheme_type, rule)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn modify_scheme(&self, name: &str, new_pattern: &str) -> ApplicationResult<()> {
        self.write()?.modify_scheme(name, new_pattern)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_scheme(&self, name: &str) -> ApplicationResult<()> {
        self.write()?.remove_scheme(name)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn generate(&self, root: &str, scheme: &str) -> ApplicationResult<String> {
        Ok(self.write()?.generate(root, scheme)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self, root: &str, word: &str) -> ApplicationResult<Validation> {
        Ok(self.write()?.validate(root, word)?)
    }

    // ------------- reads (read lock) -------------

    #[instrument(level = "debug", skip(self))]
    pub fn analyze(&self, word: &str) -> ApplicationResult<Option<Analysis>> {
        let guard = self.read()?;
        debug!("analyze: search space {}", guard.search_space());
        Ok(guard.analyze(word))
    }

    /// Copy of the node for `root`, taken under the read lock.
    pub fn find_root(&self, root: &str) -> ApplicationResult<RootEntry> {
        let guard = self.read()?;
        let node = guard.find_root(root)?;
        Ok(RootEntry {
            root: node.root().clone(),
            derivations: node.derivations().to_vec(),
        })
    }

    pub fn contains_root(&self, root: &str) -> ApplicationResult<bool> {
        Ok(self.read()?.find_root(root).is_ok())
    }

    pub fn list_roots(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.read()?.list_roots())
    }

    pub fn list_schemes(&self) -> ApplicationResult<Vec<SchemeSummary>> {
        Ok(self.read()?.list_schemes())
    }

    pub fn popular_schemes(&self, limit: usize) -> ApplicationResult<Vec<SchemeSummary>> {
        Ok(self.read()?.popular_schemes(limit))
    }

    pub fn list_derivations(&self, root: &str) -> ApplicationResult<Vec<Derivation>> {
        Ok(self.read()?.list_derivations(root)?.to_vec())
    }

    pub fn snapshot(&self) -> ApplicationResult<Snapshot> {
        Ok(self.read()?.snapshot())
    }
}
