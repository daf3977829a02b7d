//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! Selects an L-BFGS solver for the configured line search, wraps the model
//! in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), and delegates the run
//! to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        observer::SharedListener,
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(&theta0, data)`.
/// - Builds an L-BFGS solver with **More–Thuente** or **Hager–Zhang** line
///   search based on `opts.line_searcher`.
/// - Runs it through `run_lbfgs`, which records the iterate trace and turns
///   solver runtime failures into a non-converged outcome.
///
/// # Errors
/// - Propagates any error from `f.check` or from evaluating `ℓ(θ₀)`.
/// - Propagates builder errors for rejected tolerances.
///
/// # Example
/// ```
/// use ndarray::array;
/// use rust_kent::optimization::errors::OptResult;
/// use rust_kent::optimization::loglik_optimizer::{
///     LogLikelihood, MLEOptions, Theta, maximize,
/// };
///
/// struct Peak;
/// impl LogLikelihood for Peak {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta[0] - 1.0).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Peak, array![0.0], &(), &MLEOptions::default())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), rust_kent::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    maximize_with_listener(f, theta0, data, opts, None)
}

/// [`maximize`], additionally forwarding every recorded iterate to
/// `listener` while the solver runs.
///
/// # Errors
/// As [`maximize`].
pub fn maximize_with_listener<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions, listener: Option<SharedListener>,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver, listener)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver, listener)
        }
    }
}
