//! Argmin adapter for user log-likelihoods.
//!
//! [`ArgMinAdapter`] exposes a [`LogLikelihood`] as an argmin minimization
//! problem: the cost is `-ℓ(θ)` and the gradient is either `-∇ℓ(θ)` from the
//! model or a finite-difference gradient of the cost.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user’s `value`; a non-finite value
    /// becomes `OptError::NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// - An analytic `∇ℓ(θ)` from the model is validated and negated.
    /// - `OptError::GradientNotImplemented` switches to [`fd_gradient`] on
    ///   the cost, which already carries the sign.
    /// - Any other model error is propagated.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => Ok(fd_gradient(theta, |x| self.cost(x))?),
            Err(e) => Err(e.into()),
        }
    }
}
