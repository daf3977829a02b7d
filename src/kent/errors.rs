//! Errors for the Kent distribution (construction preconditions, sample
//! validation, normalizer overflow, and fitting failures).
//!
//! This module defines the domain error type, [`KentError`], shared by the
//! geometry helpers, the distribution constructors, the estimators, and the
//! maximum-likelihood refiner.
//!
//! ## Conventions
//! - **Indices are 0-based**; point indices refer to rows of an `N × 3` batch.
//! - Constructor preconditions (orthonormality, non-zero primary axis, finite
//!   non-negative `kappa`/`beta`) fail fast and are never silently repaired.
//! - [`KentError::NormalizerOverflow`] is an internal signal: the exact series
//!   could not be represented and callers of `log_normalize` fall back to the
//!   asymptotic form instead of surfacing it.
//! - Optimizer/backend errors are normalized to
//!   [`KentError::OptimizationFailed`] with a human-readable status.
use crate::optimization::errors::OptError;

/// Crate-wide result alias for Kent operations that may produce [`KentError`].
pub type KentResult<T> = Result<T, KentError>;

/// Unified error type for the Kent distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum KentError {
    // ---- Construction preconditions ----
    /// Two frame axes are not orthogonal within tolerance.
    NotOrthonormal { first: usize, second: usize, dot: f64 },

    /// A frame axis does not have unit length within tolerance.
    NotUnitLength { axis: usize, norm_sq: f64 },

    /// The primary axis vector of the two-vector form has zero length.
    ZeroPrimaryAxis,

    /// Concentration must be finite and non-negative.
    InvalidKappa { value: f64 },

    /// Ovalness must be finite and non-negative.
    InvalidBeta { value: f64 },

    /// Spherical angles must be finite.
    InvalidAngle { name: &'static str, value: f64 },

    /// Vector or matrix input has the wrong shape.
    ShapeMismatch { expected: &'static str, found: Vec<usize> },

    // ---- Sample validation ----
    /// Estimation requires at least one point.
    EmptySample,

    /// A coordinate of an input point is NaN/±inf.
    NonFinitePoint { index: usize, value: f64 },

    /// Sample moments do not determine a distribution (e.g. zero mean
    /// resultant or all points identical).
    DegenerateSample { reason: &'static str },

    // ---- Numerics ----
    /// The normalizing-constant series is not representable as an `f64`.
    NormalizerOverflow { kappa: f64, beta: f64 },

    /// The normalizing-constant series did not meet its stopping rule.
    SeriesNotConverged { kappa: f64, beta: f64, terms: usize },

    // ---- Fitting ----
    /// Fit options are inconsistent.
    InvalidVerbosity { interval: usize, reason: &'static str },

    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// A progress/warning sink failed to accept output.
    ReporterFailed { reason: String },
}

impl std::error::Error for KentError {}

impl std::fmt::Display for KentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction preconditions ----
            KentError::NotOrthonormal { first, second, dot } => {
                let (a, b) = (first + 1, second + 1);
                write!(f, "Axes gamma{a} and gamma{b} are not orthogonal: dot = {dot}")
            }
            KentError::NotUnitLength { axis, norm_sq } => {
                write!(f, "Axis gamma{} is not a unit vector: squared norm = {norm_sq}", axis + 1)
            }
            KentError::ZeroPrimaryAxis => {
                write!(f, "Primary axis vector must have non-zero length.")
            }
            KentError::InvalidKappa { value } => {
                write!(f, "Invalid kappa: {value}, must be finite and >= 0")
            }
            KentError::InvalidBeta { value } => {
                write!(f, "Invalid beta: {value}, must be finite and >= 0")
            }
            KentError::InvalidAngle { name, value } => {
                write!(f, "Invalid angle {name}: {value}, must be finite")
            }
            KentError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected}, found {found:?}")
            }

            // ---- Sample validation ----
            KentError::EmptySample => {
                write!(f, "Sample is empty.")
            }
            KentError::NonFinitePoint { index, value } => {
                write!(f, "Point at index {index} has a non-finite coordinate: {value}")
            }
            KentError::DegenerateSample { reason } => {
                write!(f, "Degenerate sample: {reason}")
            }

            // ---- Numerics ----
            KentError::NormalizerOverflow { kappa, beta } => {
                write!(f, "Normalizing constant overflows for kappa = {kappa}, beta = {beta}")
            }
            KentError::SeriesNotConverged { kappa, beta, terms } => {
                write!(
                    f,
                    "Normalizing series did not converge after {terms} terms for kappa = {kappa}, beta = {beta}"
                )
            }

            // ---- Fitting ----
            KentError::InvalidVerbosity { interval, reason } => {
                write!(f, "Invalid verbosity interval {interval}: {reason}")
            }
            KentError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            KentError::ReporterFailed { reason } => {
                write!(f, "Reporter failed: {reason}")
            }
        }
    }
}

impl From<std::io::Error> for KentError {
    fn from(err: std::io::Error) -> Self {
        KentError::ReporterFailed { reason: err.to_string() }
    }
}

impl From<OptError> for KentError {
    fn from(err: OptError) -> Self {
        KentError::OptimizationFailed { status: err.to_string() }
    }
}
