//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Number of letters in a root.
pub const ROOT_LEN: usize = 3;

/// A triliteral root, e.g. `كتب`.
///
/// Length is counted in characters, not bytes, so Arabic roots (2 bytes per
/// letter in UTF-8) and Latin transliterations are treated alike.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Root(String);

impl Root {
    /// Validate and wrap a root. No trimming is done here.
    pub fn new(text: impl Into<String>) -> DomainResult<Self> {
        let text = text.into();
        if text.chars().count() != ROOT_LEN {
            return Err(DomainError::InvalidRoot(text));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three root letters in order.
    ///
    /// Returns `None` only if the invariant of `new` was bypassed.
    pub fn letters(&self) -> Option<[char; ROOT_LEN]> {
        let mut chars = self.0.chars();
        let letters = [chars.next()?, chars.next()?, chars.next()?];
        match chars.next() {
            Some(_) => None,
            None => Some(letters),
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Root {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Root> for String {
    fn from(root: Root) -> Self {
        root.0
    }
}

impl FromStr for Root {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Root {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A word generated from a root, together with the scheme that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub word: String,
    pub scheme: String,
    pub created_at: DateTime<Utc>,
}

impl Derivation {
    pub fn new(word: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            scheme: scheme.into(),
            created_at: Utc::now(),
        }
    }
}

/// Grammatical category of a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeType {
    /// فعل
    Verb,
    /// اسم فاعل
    ActiveParticiple,
    /// اسم مفعول
    PassiveParticiple,
    /// مصدر
    VerbalNoun,
    /// صيغة مبالغة
    Intensive,
    /// اسم مكان
    PlaceNoun,
    /// اسم آلة
    InstrumentNoun,
    #[default]
    Custom,
}

impl SchemeType {
    pub const ALL: [SchemeType; 8] = [
        SchemeType::Verb,
        SchemeType::ActiveParticiple,
        SchemeType::PassiveParticiple,
        SchemeType::VerbalNoun,
        SchemeType::Intensive,
        SchemeType::PlaceNoun,
        SchemeType::InstrumentNoun,
        SchemeType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeType::Verb => "verb",
            SchemeType::ActiveParticiple => "active_participle",
            SchemeType::PassiveParticiple => "passive_participle",
            SchemeType::VerbalNoun => "verbal_noun",
            SchemeType::Intensive => "intensive",
            SchemeType::PlaceNoun => "place_noun",
            SchemeType::InstrumentNoun => "instrument_noun",
            SchemeType::Custom => "custom",
        }
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SchemeType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown scheme type: {}", s))
    }
}

/// Outcome of validating a word against a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid { scheme: String },
    Invalid,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

/// A successful reverse analysis: the word is `scheme` applied to `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub root: Root,
    pub scheme: String,
}

/// Owned copy of a stored root and the words recorded on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEntry {
    pub root: Root,
    pub derivations: Vec<Derivation>,
}

/// Counts from a bulk root load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

// ------------- persisted layout -------------

/// Plain-data derivation as kept by a storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationRecord {
    pub word: String,
    pub scheme: String,
    pub timestamp: DateTime<Utc>,
}

/// Plain-data root with its derivations, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRecord {
    pub root: String,
    #[serde(default)]
    pub derivations: Vec<DerivationRecord>,
}

/// Plain-data scheme. Explicit schemes carry no pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub dynamic: bool,
    #[serde(default)]
    pub scheme_type: SchemeType,
    #[serde(default)]
    pub usage: u64,
}

/// Everything needed to rebuild an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub schemes: Vec<SchemeRecord>,
    #[serde(default)]
    pub roots: Vec<RootRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_counts_chars_not_bytes() {
        assert!(Root::new("كتب").is_ok());
        assert!(Root::new("ktb").is_ok());
        assert_eq!(
            Root::new("كت"),
            Err(DomainError::InvalidRoot("كت".to_string()))
        );
        assert!(Root::new("كتبة").is_err());
    }

    #[test]
    fn test_root_letters() {
        let root = Root::new("قرأ").unwrap();
        assert_eq!(root.letters(), Some(['ق', 'ر', 'أ']));
    }

    #[test]
    fn test_scheme_type_parse() {
        assert_eq!(
            "active-participle".parse::<SchemeType>(),
            Ok(SchemeType::ActiveParticiple)
        );
        assert!("adjective".parse::<SchemeType>().is_err());
    }
}
