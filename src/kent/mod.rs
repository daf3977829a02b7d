//! kent — the Kent (Fisher–Bingham-5) distribution on the unit sphere.
//!
//! Purpose
//! -------
//! Provide the distribution as a value type ([`KentDistribution`]), a
//! sampling session around it ([`KentSampler`]), and estimators that fit it
//! to direction data ([`models`]).
//!
//! Key behaviors
//! -------------
//! - Construction from angles, an orthonormal triple, two scaled vectors, or
//!   a rotation matrix, all canonicalized to one frame convention.
//! - Density, log-density, and the normalizing constant `c(κ, β)` with an
//!   asymptotic fallback when `c` overflows.
//! - Rejection sampling, percentile levels of `−ln f`, and level-set
//!   contours.
//! - Moment estimation and penalized maximum-likelihood refinement.
//!
//! Invariants & assumptions
//! ------------------------
//! - Points are `f64` arrays whose last axis has length 3; inputs to the
//!   estimators should be unit vectors.
//! - Constructors accept any finite `κ, β ≥ 0`. Estimators only return
//!   `κ ≥ 1e-6`, `2β ≤ κ`.
//!
//! Conventions
//! -----------
//! - `Γ = H(θ, φ) · K(ψ)`; `γ₁` is the mean direction, `γ₂` the major and
//!   `γ₃` the minor axis.
//! - Errors are [`KentError`]; fit options are [`KentFitOptions`].

pub mod core;
pub mod distribution;
pub mod errors;
pub mod models;
pub mod sampler;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{Frame, KentFitOptions, NormalizerCache, Verbosity};
pub use self::distribution::KentDistribution;
pub use self::errors::{KentError, KentResult};
pub use self::models::{KentFit, estimate_moments, fit_mle};
pub use self::sampler::{Contour, KentSampler};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_kent::kent::prelude::*;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::distribution::KentDistribution;
    pub use super::errors::{KentError, KentResult};
    pub use super::models::prelude::*;
    pub use super::sampler::{Contour, KentSampler};
}
