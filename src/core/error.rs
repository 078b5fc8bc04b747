use thiserror::Error;

/// Rejected mount-time configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame count must be at least 1")]
    EmptySequence,
    #[error("frame extension must not be empty")]
    MissingExtension,
    #[error("invalid value {value:?} for `{key}`")]
    InvalidAttribute { key: &'static str, value: String },
}
