use thiserror::Error;

/// Why a resolution attempt could not sign in. Each variant carries the
/// status text (or transport error) of the failing request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Failed to get instance info: {0}")]
    Instance(String),
    #[error("Failed to get current user info: {0}")]
    Account(String),
}
