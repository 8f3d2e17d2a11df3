use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotationError {
    #[error("invalid axis order {0:?}: expected three distinct letters from X, Y, Z")]
    InvalidAxisOrder(String),

    #[error("unknown axis {0:?}: expected one of X, Y, Z")]
    UnknownAxis(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("{stage}: reconstruction residual {max_residual:e} exceeds tolerance {tolerance:e}")]
    DecompositionResidual {
        stage: &'static str,
        max_residual: f64,
        tolerance: f64,
    },

    #[error("{0} is singular")]
    Singular(&'static str),

    #[error("point count mismatch: {observed} observed vs {reprojected} reprojected")]
    PointCountMismatch { observed: usize, reprojected: usize },

    #[error("point set is empty")]
    EmptyPointSet,
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
}
