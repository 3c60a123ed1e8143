//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, the storage collaborators
//! and wires up services.

pub mod di;
pub mod error;
pub mod loader;
pub mod store;
pub mod traits;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
