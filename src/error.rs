//! Error types for semclust.

use thiserror::Error;

/// Errors that can occur during indexing/search operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Empty index (nothing inserted yet).
    #[error("index is empty")]
    EmptyIndex,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The prefilter projection of an item was NaN or infinite.
    #[error("prefilter projection is not finite: {0}")]
    NonFiniteProjection(f64),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(ClusterError::EmptyIndex.to_string(), "index is empty");
        assert_eq!(
            ClusterError::InvalidParameter("capacity must be > 0".into()).to_string(),
            "invalid parameter: capacity must be > 0"
        );
        assert!(ClusterError::NonFiniteProjection(f64::NAN)
            .to_string()
            .contains("NaN"));
    }
}
