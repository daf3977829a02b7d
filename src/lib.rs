//! rust_kent — the Kent (Fisher–Bingham-5) distribution on the sphere.
//!
//! Purpose
//! -------
//! Serve as the crate root: model directional data on the unit sphere in
//! three dimensions with the five-parameter Kent distribution, evaluate its
//! density and normalizing constant, simulate from it, and fit it to data.
//!
//! Key behaviors
//! -------------
//! - [`kent`]: the distribution value type, its sampler session, and the
//!   moment / maximum-likelihood estimators.
//! - [`optimization`]: a generic `argmin`-backed maximizer for any
//!   [`LogLikelihood`](optimization::loglik_optimizer::LogLikelihood),
//!   with finite-difference gradients, iterate tracing, and the
//!   reparameterizations the Kent fit uses.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerics are `f64`; points are `ndarray` arrays whose last axis
//!   has length 3.
//! - Library code reports failures as `Result`s ([`kent::KentError`],
//!   [`optimization::errors::OptError`]); panics indicate bugs.
//! - Logging goes through `tracing`; no subscriber is installed here.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use rust_kent::kent::prelude::*;
//!
//! # fn main() -> KentResult<()> {
//! let truth = KentDistribution::from_angles(1.0, 0.5, 0.2, 25.0, 5.0)?;
//! let xs = KentSampler::seeded(truth, 7).draw(1000);
//! let fit = fit_mle(xs.view(), &KentFitOptions::default(), &shared(SilentReporter))?;
//! println!("{} (converged: {})", fit.distribution, fit.converged);
//! # Ok(())
//! # }
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code in each module.
//! - `tests/integration_kent_pipeline.rs` runs simulate → moment estimate →
//!   maximum likelihood end to end.

pub mod kent;
pub mod optimization;
