//! Flat-file root loader
//!
//! One root per line, UTF-8. Surrounding whitespace is trimmed and blank
//! lines are ignored; everything else goes through the engine's own
//! validation.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::MorphologyService;
use crate::domain::LoadReport;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

pub struct RootFileLoader {
    fs: Arc<dyn FileSystem>,
}

impl RootFileLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Candidate roots in file order.
    pub fn read_roots(&self, path: &Path) -> InfraResult<Vec<String>> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read roots file {}", path.display()), e))?;
        Ok(parse_roots(&content))
    }

    /// Read `path` and add every root to `service`.
    #[instrument(level = "debug", skip(self, service))]
    pub fn load_into(&self, path: &Path, service: &mut MorphologyService) -> InfraResult<LoadReport> {
        let roots = self.read_roots(path)?;
        debug!("load_into: {} candidate lines", roots.len());
        let report = service.load_roots(roots);
        info!(
            "loaded {} roots from {} ({} duplicates, {} invalid)",
            report.added,
            path.display(),
            report.duplicates,
            report.invalid
        );
        Ok(report)
    }
}

fn parse_roots(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
