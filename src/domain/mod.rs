//! Domain layer: entities and morphology core
//!
//! This layer is independent of external concerns (no I/O, no logging, no config loading).

pub mod arena;
pub mod builtin;
pub mod entities;
pub mod error;
pub mod pattern;
pub mod scheme;
pub mod tree_traits;

pub use arena::{InOrderIterator, InsertOutcome, RootNode, RootStore};
pub use builtin::{builtin_names, builtin_scheme, builtin_schemes};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use pattern::{CompiledPattern, Instruction, Placeholders};
pub use scheme::{RuleFn, Scheme, SchemeRegistry, SchemeRule, SchemeSummary};
pub use tree_traits::TreeNodeConvert;
