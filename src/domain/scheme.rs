//! Schemes and the name-keyed scheme registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::entities::{Root, SchemeType, ROOT_LEN};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::pattern::{CompiledPattern, Placeholders};

/// Caller-supplied transformation of the three root letters.
pub type RuleFn = Arc<dyn Fn(char, char, char) -> String + Send + Sync>;

/// How a scheme turns root letters into a word.
#[derive(Clone)]
pub enum SchemeRule {
    Explicit(RuleFn),
    Compiled(CompiledPattern),
}

impl SchemeRule {
    pub fn apply(&self, letters: [char; ROOT_LEN]) -> String {
        match self {
            SchemeRule::Explicit(rule) => rule(letters[0], letters[1], letters[2]),
            SchemeRule::Compiled(pattern) => pattern.render(letters),
        }
    }
}

impl fmt::Debug for SchemeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeRule::Explicit(_) => f.write_str("Explicit(<fn>)"),
            SchemeRule::Compiled(p) => f.debug_tuple("Compiled").field(&p.source()).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheme {
    name: String,
    rule: SchemeRule,
    scheme_type: SchemeType,
    usage: u64,
}

impl Scheme {
    /// Scheme with a caller-supplied rule.
    pub fn explicit<F>(name: impl Into<String>, scheme_type: SchemeType, rule: F) -> DomainResult<Self>
    where
        F: Fn(char, char, char) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidSchemeName);
        }
        Ok(Self {
            name,
            rule: SchemeRule::Explicit(Arc::new(rule)),
            scheme_type,
            usage: 0,
        })
    }

    /// Scheme whose name is also its pattern.
    pub fn dynamic(
        name: impl Into<String>,
        scheme_type: SchemeType,
        placeholders: &Placeholders,
    ) -> DomainResult<Self> {
        let name = name.into();
        let pattern = name.clone();
        Self::compiled(name, &pattern, scheme_type, placeholders)
    }

    /// Dynamic scheme registered under `name` but compiled from `pattern`,
    /// which is what a modified scheme looks like.
    pub fn compiled(
        name: impl Into<String>,
        pattern: &str,
        scheme_type: SchemeType,
        placeholders: &Placeholders,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidSchemeName);
        }
        let pattern = CompiledPattern::compile(pattern, placeholders)?;
        Ok(Self {
            name,
            rule: SchemeRule::Compiled(pattern),
            scheme_type,
            usage: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &SchemeRule {
        &self.rule
    }

    pub fn scheme_type(&self) -> SchemeType {
        self.scheme_type
    }

    pub fn usage(&self) -> u64 {
        self.usage
    }

    pub(crate) fn set_usage(&mut self, usage: u64) {
        self.usage = usage;
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.rule, SchemeRule::Compiled(_))
    }

    /// Pattern text for dynamic schemes.
    pub fn pattern(&self) -> Option<&str> {
        match &self.rule {
            SchemeRule::Compiled(p) => Some(p.source()),
            SchemeRule::Explicit(_) => None,
        }
    }

    /// Generate the word for `root`.
    pub fn generate(&self, root: &Root) -> DomainResult<String> {
        let letters = root.letters().ok_or_else(|| DomainError::GenerationFailure {
            root: root.to_string(),
            scheme: self.name.clone(),
        })?;
        Ok(self.rule.apply(letters))
    }
}

/// Listing entry for a registered scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeSummary {
    pub name: String,
    pub dynamic: bool,
    pub pattern: Option<String>,
    pub scheme_type: SchemeType,
    pub usage: u64,
}

impl From<&Scheme> for SchemeSummary {
    fn from(scheme: &Scheme) -> Self {
        Self {
            name: scheme.name.clone(),
            dynamic: scheme.is_dynamic(),
            pattern: scheme.pattern().map(str::to_string),
            scheme_type: scheme.scheme_type,
            usage: scheme.usage,
        }
    }
}

/// Name-keyed schemes. Iteration order is unspecified.
#[derive(Debug, Default, Clone)]
pub struct SchemeRegistry {
    schemes: HashMap<String, Scheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn add(&mut self, scheme: Scheme) -> DomainResult<()> {
        if self.schemes.contains_key(scheme.name()) {
            return Err(DomainError::DuplicateScheme(scheme.name));
        }
        self.schemes.insert(scheme.name.clone(), scheme);
        Ok(())
    }

    pub fn get(&self, name: &str) -> DomainResult<&Scheme> {
        self.schemes
            .get(name)
            .ok_or_else(|| DomainError::SchemeNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> DomainResult<&mut Scheme> {
        self.schemes
            .get_mut(name)
            .ok_or_else(|| DomainError::SchemeNotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> DomainResult<Scheme> {
        self.schemes
            .remove(name)
            .ok_or_else(|| DomainError::SchemeNotFound(name.to_string()))
    }

    /// Replace the rule of `name` with the compiled `new_pattern`.
    ///
    /// The registry key stays `name`; the scheme becomes dynamic. The name
    /// is looked up first, and the rule is untouched if compilation fails.
    pub fn modify(
        &mut self,
        name: &str,
        new_pattern: &str,
        placeholders: &Placeholders,
    ) -> DomainResult<()> {
        let scheme = self.get_mut(name)?;
        let compiled = CompiledPattern::compile(new_pattern, placeholders)?;
        scheme.rule = SchemeRule::Compiled(compiled);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheme> + '_ {
        self.schemes.values()
    }

    pub fn list_all(&self) -> Vec<SchemeSummary> {
        self.iter().map(SchemeSummary::from).collect()
    }

    /// Up to `limit` schemes, most used first, ties by name.
    pub fn most_used(&self, limit: usize) -> Vec<SchemeSummary> {
        let mut ranked: Vec<&Scheme> = self.iter().collect();
        ranked.sort_by(|a, b| b.usage.cmp(&a.usage).then_with(|| a.name.cmp(&b.name)));
        ranked.into_iter().take(limit).map(SchemeSummary::from).collect()
    }

    pub fn list_by_type(&self, scheme_type: SchemeType) -> Vec<SchemeSummary> {
        self.iter()
            .filter(|s| s.scheme_type == scheme_type)
            .map(SchemeSummary::from)
            .collect()
    }
}
