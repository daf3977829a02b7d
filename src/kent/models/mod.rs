//! models — estimators for the Kent distribution.
//!
//! Purpose
//! -------
//! Turn an `N × 3` batch of unit vectors into a [`KentDistribution`]: a
//! closed-form moment estimate ([`estimate_moments`]) and its
//! maximum-likelihood refinement ([`fit_mle`]), which runs the shared
//! L-BFGS optimizer on [`KentLikelihood`].
//!
//! Key behaviors
//! -------------
//! - Both estimators validate the sample (shape, non-empty, finite) and
//!   return parameters with `κ ≥ KAPPA_FLOOR` and `2β ≤ κ`.
//! - The refiner reports through an injected [`FitReporter`], shared with
//!   the optimizer as a [`SharedReporter`]; choosing a [`TracingReporter`],
//!   [`WriterReporter`], or [`SilentReporter`] decides where progress and
//!   warnings end up.
//! - Non-convergence yields `converged = false` plus a warning, not an
//!   error.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use rust_kent::kent::models::prelude::*;
//! # fn demo(xs: ndarray::ArrayView2<f64>) -> rust_kent::kent::errors::KentResult<()> {
//! let fit = fit_mle(xs, &KentFitOptions::default(), &shared(TracingReporter))?;
//! println!("{}", fit.distribution);
//! # Ok(())
//! # }
//! ```
//!
//! [`KentDistribution`]: crate::kent::distribution::KentDistribution

pub mod mle;
pub mod moments;
pub mod reporter;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mle::{KentFit, KentLikelihood, fit_mle, refine, theta_from_distribution};
pub use self::moments::estimate_moments;
pub use self::reporter::{
    FitReporter, IterationRecord, SharedReporter, SilentReporter, TracingReporter, WriterReporter,
    shared,
};

pub mod prelude {
    pub use super::mle::{KentFit, fit_mle};
    pub use super::moments::estimate_moments;
    pub use super::reporter::{
        FitReporter, SharedReporter, SilentReporter, TracingReporter, WriterReporter, shared,
    };
    pub use crate::kent::core::options::{KentFitOptions, Verbosity};
}
