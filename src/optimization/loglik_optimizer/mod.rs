//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run L-BFGS with a
//! configurable line search, tolerances, and finite-difference gradients.
//!
//! Key behaviors
//! -------------
//! - Convert user log-likelihoods into Argmin cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - [`maximize`] validates the initial guess with [`LogLikelihood::check`],
//!   selects a solver via [`builders`], and executes it via
//!   [`run::run_lbfgs`].
//! - Every iterate is recorded by [`observer::TraceObserver`] and returned
//!   in [`OptimOutcome::trace`]; [`maximize_with_listener`] also hands each
//!   one to an [`IterateListener`] while the solver runs.
//! - Solver runtime failures and the iteration cap produce an outcome with
//!   `converged = false` carrying the best point seen, instead of an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `-ℓ(θ)`; user
//!   code implements `ℓ(θ)` and optionally `∇ℓ(θ)`, never the cost.
//! - [`LogLikelihood::value`] treats invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values, not panics.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; mapping to
//!   constrained model parameters is the model's job (see
//!   [`numerical_stability`](crate::optimization::numerical_stability)).
//! - This layer never logs; models and reporters above it do.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions in [`adapter`], finite differences in
//!   [`finite_diff`], builders, the runner on toy quadratics, observer
//!   buffering, and outcome/option invariants in [`traits`].
//! - The Kent integration tests exercise [`maximize`] end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod observer;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{maximize, maximize_with_listener};
pub use self::observer::{IterateListener, SharedListener};
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta, TracePoint};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta, TracePoint};
}
