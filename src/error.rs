use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Two input points report the same identity.
    #[error("duplicate point identity: {identity:?}")]
    DuplicateIdentity {
        /// The identity shared by more than one point.
        identity: String,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
