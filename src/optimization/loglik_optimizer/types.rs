//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! log-likelihood optimizer so the rest of the optimization code can stay
//! agnostic to `ndarray` and Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, and scalar
//!   costs (`Theta`, `Grad`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`) and the per-iteration record kept by the trace observer
//!   (`TracePoint`).
//! - Expose pre-wired L-BFGS solver aliases for both line-search strategies.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors are `ndarray` containers over `f64`.
//! - `Cost` is the minimized objective `c(θ) = -ℓ(θ)`; higher layers handle
//!   the sign flip back to log-likelihood space.
//!
//! Testing notes
//! -------------
//! - Only aliases and a plain record type live here; they are exercised by
//!   the builder, runner, and observer tests.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` in the optimizer's unconstrained space.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)` derived from a
/// log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// One accepted iterate as seen by the trace observer.
///
/// `value` is the log-likelihood `ℓ(θ)` at `theta` (sign already flipped
/// back from the cost).
#[derive(Debug, Clone, PartialEq)]
pub struct TracePoint {
    pub iteration: u64,
    pub theta: Theta,
    pub value: f64,
}

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
