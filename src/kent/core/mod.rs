//! kent::core — geometry, special functions, normalizer, options, validation.
//!
//! Purpose
//! -------
//! Hold the numerical building blocks the distribution, sampler, and
//! estimators share: the orthonormal frame and its angles ([`frame`]),
//! log-space Bessel functions ([`special`]), the normalizing constant and
//! its cache ([`normalizer`]), fit/sampler configuration ([`options`]), and
//! boundary checks ([`validation`]).
//!
//! Conventions
//! -----------
//! - Frames are `3 × 3` `ndarray` matrices with the axes as columns.
//! - Nothing here logs except the normalizer's fallback path.

pub mod frame;
pub mod normalizer;
pub mod options;
pub mod special;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::frame::{Frame, axes_to_angles, axis_to_angles, matrix_gamma, matrix_h, matrix_k};
pub use self::normalizer::{
    NormalizerCache, SeriesSum, asymptotic_log_normalize, log_normalize, normalize,
    normalize_series,
};
pub use self::options::{
    CONTOUR_GRID_POINTS, DEFAULT_LEVEL_SAMPLES, KentFitOptions, SAMPLE_BATCH_SIZE, Verbosity,
};
pub use self::validation::{
    ORTHONORMAL_TOL, verify_angles, verify_beta, verify_kappa, verify_orthonormal,
    verify_points_shape, verify_sample, verify_vector3,
};

pub mod prelude {
    pub use super::frame::Frame;
    pub use super::normalizer::NormalizerCache;
    pub use super::options::{KentFitOptions, Verbosity};
}
