//! Terrain generation error types.

/// Errors raised before any sampling begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A generation parameter is outside its valid domain.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// Human-readable description of the constraint that was violated.
        reason: String,
    },

    /// A raw sample vector does not match the requested grid dimensions.
    #[error("heightmap of resolution {resolution} needs {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Requested grid resolution.
        resolution: u32,
        /// `resolution * resolution`.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
}

impl TerrainError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
