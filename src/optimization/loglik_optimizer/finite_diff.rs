//! finite_diff — finite-difference gradients with error capture.
//!
//! Purpose
//! -------
//! Approximate the gradient of the optimizer cost when a model does not
//! supply one, without losing errors raised inside the cost closure.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] tries a central-difference gradient first and retries
//!   with forward differences when the central pass hit an error or
//!   produced a non-finite entry.
//! - [`run_fd_diff`] is the forward-difference pass with error capture and
//!   validation.
//!
//! Conventions
//! -----------
//! - `finitediff` closures must return `f64`, so the cost closure writes the
//!   first error it sees into a `RefCell<Option<Error>>` and returns `NaN`.
//!   The helpers turn that captured error back into an `Err`.
//! - Step sizes are the `finitediff` defaults (`√ε` scaled), which is about
//!   `1.5e-8` for unit-scale parameters.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, validation::validate_grad},
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of `cost`, central first, forward on failure.
///
/// `cost` is called many times; any error it returns is captured and, if the
/// forward pass still fails, propagated as the result.
///
/// # Errors
/// - The first error raised by `cost` during the forward pass.
/// - `OptError::InvalidGradient` / `OptError::GradientDimMismatch` if the
///   forward-difference gradient fails validation.
pub fn fd_gradient<C>(theta: &Theta, cost: C) -> OptResult<Grad>
where
    C: Fn(&Theta) -> Result<f64, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let func = |x: &Theta| -> f64 {
        match cost(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &func, &closure_err)
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, and returns the captured error
/// if `func` signalled one; otherwise validates and returns the gradient.
///
/// # Errors
/// - The error captured in `closure_err` (via `From<Error> for OptError`).
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Central-difference accuracy on a smooth objective.
    // - Fallback to forward differences when the central pass fails.
    // - Error capture from the cost closure.
    //
    // They intentionally DO NOT cover:
    // - Optimizer runs; see `run` and the integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The central-difference gradient of a smooth function matches the
    // analytic gradient closely.
    //
    // Given
    // -----
    // - `f(x, y) = cos(x) + x·y²` at `(0.3, -1.2)`.
    //
    // Expect
    // ------
    // - Both components agree with `(-sin x + y², 2xy)` to 1e-7.
    fn fd_gradient_matches_analytic_gradient() {
        let theta = array![0.3, -1.2];
        let grad = fd_gradient(&theta, |t: &Theta| Ok(t[0].cos() + t[0] * t[1] * t[1])).unwrap();
        assert_relative_eq!(grad[0], -(0.3f64).sin() + 1.44, epsilon = 1e-7);
        assert_relative_eq!(grad[1], 2.0 * 0.3 * -1.2, epsilon = 1e-7);
    }

    #[test]
    // Purpose
    // -------
    // A cost that fails only to the left of the point is still
    // differentiated, by the forward pass.
    //
    // Given
    // -----
    // - A cost that errors for `x < 1` evaluated at `x = 1`.
    //
    // Expect
    // ------
    // - `Ok(grad)` with the slope of the right-hand branch.
    fn fd_gradient_falls_back_to_forward_differences() {
        let theta = array![1.0];
        let cost = |t: &Theta| -> Result<f64, Error> {
            if t[0] < 1.0 {
                Err(OptError::NonFiniteCost { value: f64::NAN }.into())
            } else {
                Ok(3.0 * t[0])
            }
        };
        let grad = fd_gradient(&theta, cost).unwrap();
        assert_relative_eq!(grad[0], 3.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error raised everywhere by the cost is surfaced unchanged.
    fn fd_gradient_propagates_cost_errors() {
        let theta = array![0.0, 0.0];
        let err = fd_gradient(&theta, |_: &Theta| -> Result<f64, Error> {
            Err(OptError::Model { text: "bad point".into() }.into())
        })
        .unwrap_err();
        assert_eq!(err, OptError::Model { text: "bad point".into() });
    }

    #[test]
    // Purpose
    // -------
    // A closure that returns NaN without signalling an error is caught by
    // gradient validation.
    fn run_fd_diff_rejects_non_finite_gradient() {
        let theta = array![0.0, 1.0];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let err = run_fd_diff(&theta, &|_x: &Theta| f64::NAN, &closure_err).unwrap_err();
        assert!(matches!(err, OptError::InvalidGradient { index: 0, .. }));
    }
}
