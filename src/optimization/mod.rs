//! optimization — MLE stack, parameter transforms, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used for model fitting: an Argmin-backed
//! log-likelihood maximizer, the transforms that map unconstrained optimizer
//! variables onto constrained model parameters, and a single error/result
//! surface. Callers implement a log-likelihood, choose tolerances, and get
//! fitted parameters plus diagnostics without touching solver details.
//!
//! Key behaviors
//! -------------
//! - Expose [`loglik_optimizer::maximize`] and its configuration
//!   ([`loglik_optimizer::MLEOptions`], [`loglik_optimizer::Tolerances`]).
//! - Supply the `κ`/`β` reparameterization and constraint penalty in
//!   [`numerical_stability`].
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into [`errors::OptError`] with the alias [`errors::OptResult`].
//!
//! Conventions
//! -----------
//! - All solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; user-facing
//!   outcomes are expressed in terms of `ℓ`.
//! - Public entrypoints return `OptResult<T>`; callers never see raw Argmin
//!   errors.
//! - This module does no logging or I/O; progress and warnings are the
//!   caller's concern (see `kent::models::reporter`).
//!
//! Downstream usage
//! ----------------
//! - `kent::models::mle` implements `LogLikelihood` for the Kent family and
//!   calls `maximize`.
//! - Front-ends can import the surface via `optimization::prelude::*`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
