//! Shared L-BFGS runner.
//!
//! Executes a configured solver on an [`ArgMinAdapter`], records every
//! iterate through a [`TraceObserver`], and normalizes the result into an
//! [`OptimOutcome`]. A runtime failure of the solver (line search giving up,
//! a cost error at a trial point) does not discard the work done so far: the
//! best recorded iterate is returned with `converged = false` and the failure
//! message as its status.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
        observer::{SharedListener, TraceObserver},
    },
};
use argmin::core::{
    CostFunction, Executor, IterState, Solver, State, observers::ObserverMode,
};

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// # Behavior
/// - Evaluates `ℓ(θ₀)` up front; a starting point the model rejects is an
///   error, not a recoverable outcome.
/// - Sets `θ₀` and, when present, `opts.tols.max_iter` on the executor state.
/// - Forwards each iterate to `listener`, if any, as it is recorded.
/// - On success, builds the outcome from the final state (best parameter,
///   best cost, termination status, counters, last gradient, trace).
/// - On a solver error, falls back to [`OptimOutcome::recovered`].
///
/// # Errors
/// - The model's error for `θ₀`.
/// - Validation errors from [`OptimOutcome::new`].
/// - [`OptError::TraceUnavailable`] if the trace cannot be read back.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
    listener: Option<SharedListener>,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>>,
{
    let value0 = -problem.cost(&theta0).map_err(OptError::from)?;
    let observer = match listener {
        Some(listener) => TraceObserver::with_listener(listener),
        None => TraceObserver::new(),
    };

    let start = theta0.clone();
    let mut optimizer = Executor::new(problem, solver)
        .configure(|state| state.param(start))
        .add_observer(observer.clone(), ObserverMode::Always);
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    match optimizer.run() {
        Ok(result) => {
            let mut state = result.state().clone();
            let iterations = state.get_iter();
            let function_counts = state.get_func_counts().clone();
            let termination = state.get_termination_status().clone();
            let grad = state.take_gradient();
            OptimOutcome::new(
                state.take_best_param(),
                -state.get_best_cost(),
                termination,
                iterations,
                function_counts,
                grad,
                observer.take()?,
            )
        }
        Err(err) => {
            let status = OptError::from(err).to_string();
            Ok(OptimOutcome::recovered(theta0, value0, status, observer.take()?))
        }
    }
}
