//! Derivation engine
//!
//! Owns the root store and the scheme registry and implements generation,
//! validation and reverse analysis on top of them. Every operation is
//! synchronous, does no I/O and returns a typed result.

use rayon::prelude::*;

use crate::domain::{
    builtin_scheme, builtin_schemes, Analysis, Derivation, DerivationRecord, DomainError,
    DomainResult, InsertOutcome, LoadReport, Placeholders, Root, RootNode, RootRecord, RootStore,
    Scheme, SchemeRecord, SchemeRegistry, SchemeSummary, SchemeType, Snapshot, Validation,
};

/// What could not be carried over when rebuilding from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Explicit schemes with no built-in counterpart, or invalid dynamic patterns
    pub skipped_schemes: Vec<String>,
    /// Root records that are not exactly three letters
    pub invalid_roots: Vec<String>,
    /// Root records listed more than once
    pub duplicate_roots: Vec<String>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_schemes.is_empty()
            && self.invalid_roots.is_empty()
            && self.duplicate_roots.is_empty()
    }
}

/// The derivation engine.
#[derive(Debug)]
pub struct MorphologyService {
    store: RootStore,
    registry: SchemeRegistry,
    placeholders: Placeholders,
}

impl MorphologyService {
    /// Engine seeded with the built-in schemes and default placeholders.
    pub fn new() -> DomainResult<Self> {
        Self::with_placeholders(Placeholders::default())
    }

    /// Engine seeded with the built-in schemes.
    pub fn with_placeholders(placeholders: Placeholders) -> DomainResult<Self> {
        let mut service = Self::empty(placeholders);
        for scheme in builtin_schemes()? {
            service.registry.add(scheme)?;
        }
        Ok(service)
    }

    /// Engine without any scheme.
    pub fn empty(placeholders: Placeholders) -> Self {
        Self {
            store: RootStore::new(),
            registry: SchemeRegistry::new(),
            placeholders,
        }
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn store(&self) -> &RootStore {
        &self.store
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    // ------------- roots -------------

    pub fn add_root(&mut self, root: &str) -> DomainResult<()> {
        let root = Root::new(root)?;
        let text = root.to_string();
        match self.store.insert(root) {
            InsertOutcome::Added => Ok(()),
            InsertOutcome::AlreadyExists => Err(DomainError::DuplicateRoot(text)),
        }
    }

    /// Add many roots, counting what happened to each.
    pub fn load_roots<I, S>(&mut self, roots: I) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = LoadReport::default();
        for root in roots {
            match self.add_root(root.as_ref()) {
                Ok(()) => report.added += 1,
                Err(DomainError::DuplicateRoot(_)) => report.duplicates += 1,
                Err(_) => report.invalid += 1,
            }
        }
        report
    }

    pub fn find_root(&self, root: &str) -> DomainResult<&RootNode> {
        self.store
            .find(root)
            .ok_or_else(|| DomainError::RootNotFound(root.to_string()))
    }

    /// All roots in ascending order.
    pub fn list_roots(&self) -> Vec<String> {
        self.store.list_all().map(Root::to_string).collect()
    }

    pub fn root_count(&self) -> usize {
        self.store.len()
    }

    pub fn list_derivations(&self, root: &str) -> DomainResult<&[Derivation]> {
        self.find_root(root).map(RootNode::derivations)
    }

    // ------------- schemes -------------

    /// Add a dynamic scheme: `name` is compiled as its own pattern.
    pub fn add_scheme(&mut self, name: &str, scheme_type: SchemeType) -> DomainResult<()> {
        let scheme = Scheme::dynamic(name, scheme_type, &self.placeholders)?;
        self.registry.add(scheme)
    }

    /// Add a scheme with a caller-supplied rule.
    pub fn add_explicit_scheme<F>(
        &mut self,
        name: &str,
        scheme_type: SchemeType,
        rule: F,
    ) -> DomainResult<()>
    where
        F: Fn(char, char, char) -> String + Send + Sync + 'static,
    {
        let scheme = Scheme::explicit(name, scheme_type, rule)?;
        self.registry.add(scheme)
    }

    /// Replace the rule of `name` with `new_pattern`, keeping `name` as the key.
    pub fn modify_scheme(&mut self, name: &str, new_pattern: &str) -> DomainResult<()> {
        self.registry.modify(name, new_pattern, &self.placeholders)
    }

    pub fn remove_scheme(&mut self, name: &str) -> DomainResult<()> {
        self.registry.remove(name).map(|_| ())
    }

    pub fn list_schemes(&self) -> Vec<SchemeSummary> {
        self.registry.list_all()
    }

    pub fn schemes_by_type(&self, scheme_type: SchemeType) -> Vec<SchemeSummary> {
        self.registry.list_by_type(scheme_type)
    }

    /// Most used schemes first, at most `limit`.
    pub fn popular_schemes(&self, limit: usize) -> Vec<SchemeSummary> {
        self.registry.most_used(limit)
    }

    // ------------- derivation -------------

    /// Apply `scheme` to `root` and record the result on the root.
    ///
    /// The scheme's usage counter grows when the word is new for this root.
    pub fn generate(&mut self, root: &str, scheme: &str) -> DomainResult<String> {
        let node = self
            .store
            .find(root)
            .ok_or_else(|| DomainError::RootNotFound(root.to_string()))?;
        let word = self.registry.get(scheme)?.generate(node.root())?;
        if self.record(root, &word, scheme)? {
            let scheme = self.registry.get_mut(scheme)?;
            scheme.set_usage(scheme.usage() + 1);
        }
        Ok(word)
    }

    /// Check whether some registered scheme turns `root` into `word`.
    ///
    /// Schemes are tried in registry order; when several produce the same
    /// word, which one is reported is unspecified. Usage counters are not
    /// touched.
    pub fn validate(&mut self, root: &str, word: &str) -> DomainResult<Validation> {
        let node = self
            .store
            .find(root)
            .ok_or_else(|| DomainError::RootNotFound(root.to_string()))?;
        let matched = self
            .registry
            .iter()
            .find(|s| s.generate(node.root()).is_ok_and(|w| w == word))
            .map(|s| s.name().to_string());

        match matched {
            Some(scheme) => {
                self.record(root, word, &scheme)?;
                Ok(Validation::Valid { scheme })
            }
            None => Ok(Validation::Invalid),
        }
    }

    /// Find the first root (ascending) and a scheme that produce `word`.
    ///
    /// Brute force over roots x schemes; nothing is recorded.
    pub fn analyze(&self, word: &str) -> Option<Analysis> {
        let nodes: Vec<&RootNode> = self.store.iter().collect();
        let registry = &self.registry;
        nodes.par_iter().find_map_first(|node| {
            registry
                .iter()
                .find(|s| s.generate(node.root()).is_ok_and(|w| w == word))
                .map(|s| Analysis {
                    root: node.root().clone(),
                    scheme: s.name().to_string(),
                })
        })
    }

    /// Roots x schemes, the number of candidates `analyze` may try.
    pub fn search_space(&self) -> usize {
        self.store.len().saturating_mul(self.registry.len())
    }

    /// Returns `true` if the word was not yet recorded on `root`.
    fn record(&mut self, root: &str, word: &str, scheme: &str) -> DomainResult<bool> {
        let node = self
            .store
            .find_mut(root)
            .ok_or_else(|| DomainError::RootNotFound(root.to_string()))?;
        Ok(node.add_derivation(Derivation::new(word, scheme)))
    }

    // ------------- snapshot -------------

    /// Plain-data copy of all state, for a storage collaborator.
    pub fn snapshot(&self) -> Snapshot {
        let mut schemes: Vec<SchemeRecord> = self
            .registry
            .iter()
            .map(|s| SchemeRecord {
                name: s.name().to_string(),
                pattern: s.pattern().map(str::to_string),
                dynamic: s.is_dynamic(),
                scheme_type: s.scheme_type(),
                usage: s.usage(),
            })
            .collect();
        schemes.sort_by(|a, b| a.name.cmp(&b.name));

        let roots = self
            .store
            .iter()
            .map(|node| RootRecord {
                root: node.root().to_string(),
                derivations: node
                    .derivations()
                    .iter()
                    .map(|d| DerivationRecord {
                        word: d.word.clone(),
                        scheme: d.scheme.clone(),
                        timestamp: d.created_at,
                    })
                    .collect(),
            })
            .collect();

        Snapshot { schemes, roots }
    }

    /// Rebuild an engine from plain data.
    ///
    /// Explicit schemes are looked up by name among the built-ins; dynamic
    /// ones are recompiled from their pattern under their recorded name.
    pub fn from_snapshot(snapshot: Snapshot, placeholders: Placeholders) -> (Self, RestoreReport) {
        let mut service = Self::empty(placeholders);
        let mut report = RestoreReport::default();

        for record in snapshot.schemes {
            if service.restore_scheme(&record).is_err() {
                report.skipped_schemes.push(record.name);
            }
        }

        for record in snapshot.roots {
            let root = match Root::new(record.root.as_str()) {
                Ok(root) => root,
                Err(_) => {
                    report.invalid_roots.push(record.root);
                    continue;
                }
            };
            if service.store.insert(root) == InsertOutcome::AlreadyExists {
                report.duplicate_roots.push(record.root);
                continue;
            }
            if let Some(node) = service.store.find_mut(&record.root) {
                for d in record.derivations {
                    node.add_derivation(Derivation {
                        word: d.word,
                        scheme: d.scheme,
                        created_at: d.timestamp,
                    });
                }
            }
        }

        (service, report)
    }

    fn restore_scheme(&mut self, record: &SchemeRecord) -> DomainResult<()> {
        let mut scheme = match (&record.pattern, record.dynamic) {
            (Some(pattern), true) => Scheme::compiled(
                record.name.as_str(),
                pattern,
                record.scheme_type,
                &self.placeholders,
            )?,
            _ => builtin_scheme(&record.name)
                .unwrap_or_else(|| Err(DomainError::SchemeNotFound(record.name.clone())))?,
        };
        scheme.set_usage(record.usage);
        self.registry.add(scheme)
    }
}
