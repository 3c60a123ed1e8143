//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Infra(InfraError::from(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Snapshot { .. } => crate::exitcode::DATAERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(d) => domain_exit_code(d),
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::LockPoisoned(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

fn domain_exit_code(e: &DomainError) -> i32 {
    match e {
        DomainError::RootNotFound(_) | DomainError::SchemeNotFound(_) => crate::exitcode::NOINPUT,
        DomainError::GenerationFailure { .. } => crate::exitcode::SOFTWARE,
        DomainError::InvalidRoot(_)
        | DomainError::DuplicateRoot(_)
        | DomainError::InvalidPattern { .. }
        | DomainError::InvalidSchemeName
        | DomainError::DuplicateScheme(_)
        | DomainError::InvalidPlaceholders(_) => crate::exitcode::DATAERR,
    }
}
