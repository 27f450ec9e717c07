use thiserror::Error;

/// Errors surfaced while loading or validating authorization configuration.
///
/// These are the only errors allowed to escape to the caller, and only at
/// construction time. Per-request faults never cross the engine boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize authz config: {0}")]
    Deserialize(String),
    #[error("invalid authz config: {0}")]
    Invalid(String),
}

/// Failure reported by a single claim source.
///
/// The aggregator treats any such failure as "claim absent" for that source
/// only; it never aborts the overall check.
#[derive(Clone, Debug, Error)]
pub enum SourceError {
    #[error("claim source unavailable: {0}")]
    Unavailable(String),
    #[error("claim source query failed: {0}")]
    Query(String),
}
