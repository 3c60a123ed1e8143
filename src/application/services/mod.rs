//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! `MorphologyService` is the derivation engine; `SharedMorphology` serializes
//! access to it for concurrent callers.

mod morphology;
mod shared;

pub use morphology::{MorphologyService, RestoreReport};
pub use shared::SharedMorphology;
