//! Integration tests for Kent simulation and fitting.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: a known distribution, seeded
//!   rejection sampling, the moment estimate, and maximum-likelihood
//!   refinement through the shared L-BFGS optimizer.
//! - Check the user-facing fit configuration: verbosity throttling, the
//!   iterate trace, and where non-convergence warnings go.
//!
//! Coverage
//! --------
//! - `kent::sampler::KentSampler`: seeded draws feeding the estimators.
//! - `kent::models::moments::estimate_moments` and
//!   `kent::models::mle::fit_mle`: parameter recovery and its improvement
//!   with sample size.
//! - `kent::models::reporter`: writer and tracing sinks.
//! - `optimization::loglik_optimizer`: `MLEOptions` / `Tolerances` with an
//!   iteration cap.
//!
//! Exclusions
//! ----------
//! - Normalizer, frame, and density reference values; these are covered
//!   by unit tests.
//! - Statistical calibration of the sampler beyond what parameter recovery
//!   implies.
use ndarray::Array2;
use rust_kent::{
    kent::{
        KentDistribution, KentFitOptions, KentSampler, Verbosity, estimate_moments, fit_mle,
        models::{SilentReporter, TracingReporter, WriterReporter, shared},
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// Purpose
/// -------
/// Draw `n` points from `truth` with a fixed seed.
fn simulate(truth: &KentDistribution, n: usize, seed: u64) -> Array2<f64> {
    KentSampler::seeded(truth.clone(), seed).draw(n)
}

/// Purpose
/// -------
/// Squared error of an estimate: relative errors of `κ` and `β` plus the
/// angular error `1 − γ₁·γ₁*` of the mean direction.
fn squared_error(est: &KentDistribution, truth: &KentDistribution) -> f64 {
    let dk = est.kappa() / truth.kappa() - 1.0;
    let db = est.beta() / truth.beta() - 1.0;
    let da = 1.0 - est.gamma1().dot(&truth.gamma1());
    dk * dk + db * db + da
}

fn truth() -> KentDistribution {
    KentDistribution::from_angles(0.9, 1.7, 0.4, 20.0, 4.0).unwrap()
}

#[test]
// Purpose
// -------
// Both estimators recover the generating distribution, and the refined
// fit is at least as good as the moment estimate.
//
// Given
// -----
// - 5000 draws from kent(0.9, 1.7, 0.4, 20, 4) (β/κ = 0.2).
// - Default fit options and a silent reporter.
//
// Expect
// ------
// - Mean directions within 0.001 (cosine) of the truth for both.
// - The refined κ within 5% and β within 15%.
// - The refined mean log-likelihood is not below the moment estimate's.
// - The refined squared error is at most four times the moment error
//   (plus a small floor for sampling noise).
fn moment_then_mle_recovers_parameters() {
    let truth = truth();
    let xs = simulate(&truth, 5000, 11);

    let moments = estimate_moments(xs.view()).unwrap();
    let fit = fit_mle(xs.view(), &KentFitOptions::default(), &shared(SilentReporter)).unwrap();
    let mle = &fit.distribution;

    assert!(moments.gamma1().dot(&truth.gamma1()) > 0.999);
    assert!(mle.gamma1().dot(&truth.gamma1()) > 0.999);
    assert!((mle.kappa() / 20.0 - 1.0).abs() < 0.05, "kappa = {}", mle.kappa());
    assert!((mle.beta() / 4.0 - 1.0).abs() < 0.15, "beta = {}", mle.beta());
    assert!(2.0 * mle.beta() <= mle.kappa());

    let n = xs.nrows() as f64;
    let ll_moments = moments.log_likelihood(&xs).unwrap() / n;
    assert!(fit.mean_log_likelihood >= ll_moments - 1e-12);
    assert!(squared_error(mle, &truth) <= 4.0 * squared_error(&moments, &truth) + 1e-3);
}

#[test]
// Purpose
// -------
// Estimation error shrinks as the sample grows.
//
// Given
// -----
// - Three seeds; samples of 200 and 8000 points from the same truth.
//
// Expect
// ------
// - The summed MLE squared error over seeds is smaller for 8000 points.
// - The summed moment-estimate mean-direction error is smaller too.
fn estimation_error_shrinks_with_sample_size() {
    let truth = truth();
    let mut mle_err = [0.0; 2];
    let mut dir_err = [0.0; 2];
    for seed in [1u64, 2, 3] {
        for (slot, n) in [200usize, 8000].into_iter().enumerate() {
            let xs = simulate(&truth, n, seed * 100 + n as u64);
            let fit =
                fit_mle(xs.view(), &KentFitOptions::default(), &shared(SilentReporter)).unwrap();
            mle_err[slot] += squared_error(&fit.distribution, &truth);
            dir_err[slot] += 1.0 - fit.initial.gamma1().dot(&truth.gamma1());
        }
    }
    assert!(mle_err[1] < mle_err[0], "errors: {mle_err:?}");
    assert!(dir_err[1] < dir_err[0], "errors: {dir_err:?}");
}

#[test]
// Purpose
// -------
// Hitting the iteration cap is a warning, not an error, and the warning
// reaches a writable sink with its `Warning: ` prefix.
//
// Given
// -----
// - 1000 draws; `max_iter = 1`; verbose every iteration; writer reporter
//   on an in-memory buffer.
//
// Expect
// ------
// - `fit_mle` returns `Ok` with `converged == false`.
// - The output starts with the header listing the moment estimates and
//   ends with a `Warning: ` line carrying the solver status.
fn iteration_cap_warns_through_writer() {
    let xs = simulate(&truth(), 1000, 5);
    let tols = Tolerances::new(None, Some(1e-8), Some(1)).unwrap();
    let mle_opts = MLEOptions::new(tols, LineSearcher::MoreThuente, None).unwrap();
    let opts = KentFitOptions::new(mle_opts, Verbosity::every(1).unwrap(), false);

    let reporter = shared(WriterReporter::new(Vec::new()));
    let fit = fit_mle(xs.view(), &opts, &reporter).unwrap();
    let text = String::from_utf8(reporter.lock().unwrap().get_ref().clone()).unwrap();

    assert!(!fit.converged);
    assert!(text.starts_with("******** Maximum Likelihood Estimation ********"));
    assert!(text.contains("Initial moment estimates are:"));
    let last = text.lines().last().unwrap();
    assert!(last.starts_with("Warning: Kent MLE did not converge"), "{last}");
    assert!(last.contains(&fit.status));
}

#[test]
// Purpose
// -------
// The iterate trace is attached on request, and progress output is
// throttled to every n-th iterate.
//
// Given
// -----
// - 2000 draws; `return_intermediate_values = true`; verbosity every 3;
//   writer reporter.
//
// Expect
// ------
// - A non-empty trace with consecutive iteration indices and feasible
//   parameters.
// - Exactly ⌈len / 3⌉ progress lines.
fn trace_and_throttled_progress() {
    let xs = simulate(&truth(), 2000, 8);
    let opts = KentFitOptions::new(MLEOptions::default(), Verbosity::every(3).unwrap(), true);

    let reporter = shared(WriterReporter::new(Vec::new()));
    let fit = fit_mle(xs.view(), &opts, &reporter).unwrap();
    let text = String::from_utf8(reporter.lock().unwrap().get_ref().clone()).unwrap();

    let trace = fit.trace.as_ref().unwrap();
    assert!(!trace.is_empty());
    for (i, record) in trace.iter().enumerate() {
        assert_eq!(record.iteration, i);
        assert!(2.0 * record.beta <= record.kappa);
        assert!(record.neg_log_likelihood.is_finite());
    }
    let progress_lines =
        text.lines().filter(|l| l.starts_with('[') && !l.starts_with("[iteration]")).count();
    assert_eq!(progress_lines, trace.len().div_ceil(3));
}

#[test]
// Purpose
// -------
// The tracing sink and the quiet default run without output errors.
fn tracing_reporter_runs_quietly_by_default() {
    let xs = simulate(&truth(), 500, 13);
    let fit = fit_mle(xs.view(), &KentFitOptions::default(), &shared(TracingReporter)).unwrap();
    assert!(fit.mean_log_likelihood.is_finite());
    assert!(fit.trace.is_none());
}
