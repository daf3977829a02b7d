//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        types::TracePoint,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`); unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size (default 7).
///
/// Default:
/// - `tols`: `tol_grad = None`, `tol_cost = 1e-8`, `max_iter = 100`
/// - `line_searcher`: `MoreThuente`
/// - `lbfgs_mem`: `None`
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// Validation of numeric tolerances happens inside [`Tolerances::new`];
    /// this constructor only checks the L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: None, tol_cost: Some(1e-8), max_iter: Some(100) },
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` if the solver stopped on one of its own criteria;
///   `false` when it was still running, hit the iteration cap, or failed at
///   runtime and the outcome was recovered from the trace.
/// - `status`: human-readable termination status or failure message.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`
///   (empty for recovered outcomes).
/// - `grad_norm`: norm of the last available gradient, if present.
/// - `trace`: every iterate the observer saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub trace: Vec<TracePoint>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>, trace: Vec<TracePoint>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                (false, format!("{termination:?}"))
            }
            _ => (true, format!("{termination:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm, trace })
    }

    /// Best-effort outcome after the solver failed at runtime.
    ///
    /// Takes the best finite iterate from `trace`, falling back to `theta0`
    /// and its log-likelihood `value0` when no iterate was recorded. The
    /// outcome is never marked converged; `status` carries the failure.
    pub fn recovered(theta0: Theta, value0: f64, status: String, trace: Vec<TracePoint>) -> Self {
        let best = trace
            .iter()
            .filter(|p| p.value.is_finite() && p.theta.iter().all(|v| v.is_finite()))
            .max_by(|a, b| a.value.total_cmp(&b.value));
        let (theta_hat, value) = match best {
            Some(p) if p.value >= value0 || !value0.is_finite() => (p.theta.clone(), p.value),
            _ => (theta0, value0),
        };
        let iterations = trace.len();
        Self {
            theta_hat,
            value,
            converged: false,
            status,
            iterations,
            fn_evals: FnEvalMap::new(),
            grad_norm: None,
            trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance and options validation.
    // - Mapping of argmin termination states to `converged`.
    // - Recovery of the best iterate from a trace.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // All-`None` tolerances, zero iterations, and zero memory are rejected.
    fn options_validation_rejects_empty_and_zero_settings() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
        assert!(matches!(
            Tolerances::new(None, Some(-1.0), None),
            Err(OptError::InvalidTolCost { .. })
        ));
        let tols = Tolerances::new(None, Some(1e-8), Some(100)).unwrap();
        assert!(matches!(
            MLEOptions::new(tols, LineSearcher::MoreThuente, Some(0)),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
        assert_eq!(MLEOptions::default().tols, tols);
    }

    #[test]
    // Purpose
    // -------
    // Line searchers parse case-insensitively.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("moreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!("bfgs".parse::<LineSearcher>().is_err());
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as not converged; a solver's
    // own stopping rule is reported as converged.
    fn iteration_cap_is_not_convergence() {
        let capped = OptimOutcome::new(
            Some(array![1.0]),
            -2.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            100,
            FnEvalMap::new(),
            None,
            Vec::new(),
        )
        .unwrap();
        assert!(!capped.converged);

        let done = OptimOutcome::new(
            Some(array![1.0]),
            -2.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
            Vec::new(),
        )
        .unwrap();
        assert!(done.converged);
        assert_eq!(done.grad_norm, Some(5.0));
    }

    #[test]
    // Purpose
    // -------
    // A recovered outcome returns the best finite traced iterate, or the
    // starting point when nothing better was recorded.
    //
    // Given
    // -----
    // - A trace with a NaN value, a mediocre iterate, and a best iterate.
    //
    // Expect
    // ------
    // - The best iterate wins; an empty trace falls back to `theta0`.
    fn recovered_outcome_picks_best_finite_iterate() {
        let trace = vec![
            TracePoint { iteration: 1, theta: array![0.5], value: -3.0 },
            TracePoint { iteration: 2, theta: array![0.7], value: f64::NAN },
            TracePoint { iteration: 3, theta: array![0.9], value: -1.0 },
        ];
        let out = OptimOutcome::recovered(array![0.0], -5.0, "failed".into(), trace);
        assert_eq!(out.theta_hat, array![0.9]);
        assert_eq!(out.value, -1.0);
        assert_eq!(out.iterations, 3);
        assert!(!out.converged);

        let out = OptimOutcome::recovered(array![0.0], -5.0, "failed".into(), Vec::new());
        assert_eq!(out.theta_hat, array![0.0]);
        assert_eq!(out.value, -5.0);
    }
}
