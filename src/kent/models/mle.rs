//! Maximum-likelihood refinement of a Kent fit.
//!
//! The refiner maximizes the mean log-likelihood
//! `ℓ(θ) = (1/N) Σᵢ ln f(xᵢ; θ)` over the unconstrained vector
//!
//! ```text
//! θ = (θ, φ, ψ, x_κ, x_β),   κ = KAPPA_FLOOR + |x_κ|,   β = |x_β|
//! ```
//!
//! starting from the moment estimate. The unimodality constraint `2β ≤ κ`
//! is handled by an exterior penalty: an infeasible point is evaluated at
//! `β = κ/2` and charged `CONSTRAINT_PENALTY · (2β − κ)²`. The reported
//! distribution is always the projected, feasible one.
//!
//! One [`NormalizerCache`] lives inside [`KentLikelihood`] for the duration
//! of a fit, so repeated `(κ, β)` pairs (finite-difference probes of the
//! angles) skip the series.
//!
//! Progress and the non-convergence warning are not printed here; they go
//! to the [`FitReporter`] the caller passes in. Progress is streamed from
//! the optimizer's iteration observer while the solver runs, so the
//! reporter arrives as a [`SharedReporter`].
use std::{
    cell::RefCell,
    sync::{Arc, Mutex, MutexGuard},
};

use ndarray::{Array2, ArrayView2, array};
use tracing::debug;

use crate::{
    kent::{
        core::{
            normalizer::NormalizerCache,
            options::{KentFitOptions, Verbosity},
            validation::verify_sample,
        },
        distribution::KentDistribution,
        errors::{KentError, KentResult},
        models::{
            moments::estimate_moments,
            reporter::{FitReporter, IterationRecord, SharedReporter},
        },
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            IterateListener, LogLikelihood, SharedListener, Theta, TracePoint,
            maximize_with_listener, validation::validate_theta_input,
        },
        numerical_stability::transformations::{
            CONSTRAINT_PENALTY, beta_from_free, free_from_beta, free_from_kappa, kappa_from_free,
            project_ovalness,
        },
    },
};

/// Length of the optimizer vector.
pub const N_PARAMS: usize = 5;

/// Model-space view of an optimizer vector.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ModelParams {
    theta: f64,
    phi: f64,
    psi: f64,
    kappa: f64,
    beta: f64,
    violation: f64,
}

impl ModelParams {
    fn from_theta(t: &Theta) -> Self {
        let kappa = kappa_from_free(t[3]);
        let (beta, violation) = project_ovalness(kappa, beta_from_free(t[4]));
        ModelParams { theta: t[0], phi: t[1], psi: t[2], kappa, beta, violation }
    }

    fn distribution(&self) -> KentResult<KentDistribution> {
        KentDistribution::from_angles(self.theta, self.phi, self.psi, self.kappa, self.beta)
    }

    fn record(&self, iteration: usize, value: f64) -> IterationRecord {
        IterationRecord {
            iteration,
            theta: self.theta,
            phi: self.phi,
            psi: self.psi,
            kappa: self.kappa,
            beta: self.beta,
            neg_log_likelihood: -value,
        }
    }
}

/// Optimizer vector for a distribution.
pub fn theta_from_distribution(k: &KentDistribution) -> Theta {
    array![k.theta(), k.phi(), k.psi(), free_from_kappa(k.kappa()), free_from_beta(k.beta())]
}

/// Penalized mean log-likelihood of a Kent sample.
#[derive(Debug, Default)]
pub struct KentLikelihood {
    cache: RefCell<NormalizerCache>,
}

impl KentLikelihood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feasible distribution described by an optimizer vector.
    pub fn distribution_at(&self, theta: &Theta) -> KentResult<KentDistribution> {
        ModelParams::from_theta(theta).distribution()
    }

    /// Number of distinct `(κ, β)` pairs normalized so far.
    pub fn cached_normalizers(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl LogLikelihood for KentLikelihood {
    type Data = Array2<f64>;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let p = ModelParams::from_theta(theta);
        let dist = p.distribution()?;
        let ln_c = self.cache.borrow_mut().log_normalize(p.kappa, p.beta);
        let n = data.nrows() as f64;
        let sum: f64 = data.rows().into_iter().map(|x| dist.unnormalized_log_pdf(x)).sum();
        Ok(sum / n - ln_c - CONSTRAINT_PENALTY * p.violation * p.violation)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta_input(theta, N_PARAMS)?;
        verify_sample(data.view())?;
        Ok(())
    }
}

fn lock<T>(shared: &Arc<Mutex<T>>) -> KentResult<MutexGuard<'_, T>> {
    shared
        .lock()
        .map_err(|_| KentError::ReporterFailed { reason: "reporter lock poisoned".into() })
}

/// Forwards throttled solver iterates to the caller's reporter during a run.
///
/// The observer callback cannot fail the solver, so the first reporter
/// error is parked here and surfaced once `maximize` returns.
struct ProgressStream<R> {
    reporter: SharedReporter<R>,
    verbosity: Verbosity,
    next: usize,
    failure: Option<KentError>,
}

impl<R: FitReporter + Send> IterateListener for ProgressStream<R> {
    fn on_iterate(&mut self, point: &TracePoint) {
        let iteration = self.next;
        self.next += 1;
        if self.failure.is_some() || !self.verbosity.reports(iteration) {
            return;
        }
        let record = ModelParams::from_theta(&point.theta).record(iteration, point.value);
        if let Err(err) = lock(&self.reporter).and_then(|mut r| r.progress(&record)) {
            self.failure = Some(err);
        }
    }
}

/// Result of [`fit_mle`].
#[derive(Debug, Clone, PartialEq)]
pub struct KentFit {
    /// Refined, feasible distribution.
    pub distribution: KentDistribution,
    /// Starting point (the moment estimate unless given explicitly).
    pub initial: KentDistribution,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    /// `(1/N) Σ ln f(xᵢ)` at `distribution`.
    pub mean_log_likelihood: f64,
    /// Every recorded iterate, when requested.
    pub trace: Option<Vec<IterationRecord>>,
}

/// Fit a Kent distribution to an `N × 3` batch of unit vectors: moment
/// estimate, then maximum-likelihood refinement.
///
/// # Errors
/// - Sample and moment-estimator errors from [`estimate_moments`].
/// - [`KentError::OptimizationFailed`](crate::kent::errors::KentError) for
///   invalid optimizer options or an unusable starting point.
/// - [`KentError::ReporterFailed`](crate::kent::errors::KentError) when the
///   reporter cannot write.
///
/// Non-convergence is not an error: the best iterate is returned with
/// `converged = false` and the solver status goes to `reporter.warning`.
pub fn fit_mle<R: FitReporter + Send + 'static>(
    xs: ArrayView2<f64>, opts: &KentFitOptions, reporter: &SharedReporter<R>,
) -> KentResult<KentFit> {
    let initial = estimate_moments(xs)?;
    refine(xs, initial, opts, reporter)
}

/// Maximum-likelihood refinement from an explicit starting distribution.
///
/// # Errors
/// As [`fit_mle`], without the moment-estimator step.
pub fn refine<R: FitReporter + Send + 'static>(
    xs: ArrayView2<f64>, initial: KentDistribution, opts: &KentFitOptions,
    reporter: &SharedReporter<R>,
) -> KentResult<KentFit> {
    verify_sample(xs)?;
    debug!(n = xs.nrows(), start = %initial, "starting Kent MLE");
    let stream = if opts.verbosity.is_quiet() {
        None
    } else {
        lock(reporter)?.header(&initial)?;
        Some(Arc::new(Mutex::new(ProgressStream {
            reporter: Arc::clone(reporter),
            verbosity: opts.verbosity,
            next: 0,
            failure: None,
        })))
    };

    let data = xs.to_owned();
    let model = KentLikelihood::new();
    let listener = stream.clone().map(|s| s as SharedListener);
    let outcome = maximize_with_listener(
        &model,
        theta_from_distribution(&initial),
        &data,
        &opts.mle_opts,
        listener,
    )?;
    if let Some(stream) = &stream {
        if let Some(err) = lock(stream)?.failure.take() {
            return Err(err);
        }
    }
    let distribution = model.distribution_at(&outcome.theta_hat)?;
    debug!(
        fit = %distribution,
        converged = outcome.converged,
        iterations = outcome.iterations,
        normalizers = model.cached_normalizers(),
        "finished Kent MLE"
    );

    if !outcome.converged {
        lock(reporter)?.warning(&format!("Kent MLE did not converge: {}", outcome.status))?;
    }

    let mean_log_likelihood = distribution.log_likelihood(&xs)? / xs.nrows() as f64;
    Ok(KentFit {
        distribution,
        initial,
        converged: outcome.converged,
        status: outcome.status,
        iterations: outcome.iterations,
        mean_log_likelihood,
        trace: opts.return_intermediate_values.then(|| trace_records(&outcome.trace)),
    })
}

fn trace_records(trace: &[TracePoint]) -> Vec<IterationRecord> {
    trace
        .iter()
        .enumerate()
        .map(|(i, point)| ModelParams::from_theta(&point.theta).record(i, point.value))
        .collect()
}
