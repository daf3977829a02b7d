//! Kent options — configuration for fitting and sampling.
//!
//! Purpose
//! -------
//! Collect the knobs of the maximum-likelihood refiner in one validated
//! struct, [`KentFitOptions`], and the fixed sizes used by the sampler and
//! the contour builder as crate constants.
//!
//! Key behaviors
//! -------------
//! - [`KentFitOptions`] bundles optimizer settings ([`MLEOptions`]), progress
//!   throttling ([`Verbosity`]), and whether the iterate trace is returned.
//! - [`Verbosity::every`] rejects a zero reporting interval.
//!
//! Conventions
//! -----------
//! - Where warnings go is not an option here; it is decided by the
//!   `FitReporter` passed to `fit_mle`.
//! - Defaults reproduce the reference fitter: cost tolerance `1e-8`, at most
//!   100 iterations, quiet, no trace.
use crate::{
    kent::errors::{KentError, KentResult},
    optimization::loglik_optimizer::MLEOptions,
};

/// Candidates drawn per rejection-sampling batch.
pub const SAMPLE_BATCH_SIZE: usize = 10_000;

/// Sample count used by `level`/`contour` when the caller does not choose.
pub const DEFAULT_LEVEL_SAMPLES: usize = 10_000;

/// Number of grid points along the major-axis coordinate of a contour.
pub const CONTOUR_GRID_POINTS: usize = 100_000;

/// How often the refiner reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No progress output; warnings are still reported.
    #[default]
    Quiet,
    /// A header, then every `n`-th iteration (`n ≥ 1`).
    Every(usize),
}

impl Verbosity {
    /// Report every `n`-th iteration.
    ///
    /// # Errors
    /// [`KentError::InvalidVerbosity`] when `n == 0`.
    pub fn every(n: usize) -> KentResult<Self> {
        if n == 0 {
            return Err(KentError::InvalidVerbosity {
                interval: n,
                reason: "Reporting interval must be at least 1.",
            });
        }
        Ok(Verbosity::Every(n))
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Verbosity::Quiet | Verbosity::Every(0))
    }

    /// Whether iteration `iter` (0-based) is reported.
    pub fn reports(&self, iter: usize) -> bool {
        match *self {
            Verbosity::Quiet | Verbosity::Every(0) => false,
            Verbosity::Every(n) => iter % n == 0,
        }
    }
}

/// Configuration of the maximum-likelihood refiner.
#[derive(Debug, Clone, PartialEq)]
pub struct KentFitOptions {
    pub mle_opts: MLEOptions,
    pub verbosity: Verbosity,
    pub return_intermediate_values: bool,
}

impl KentFitOptions {
    pub fn new(
        mle_opts: MLEOptions, verbosity: Verbosity, return_intermediate_values: bool,
    ) -> KentFitOptions {
        KentFitOptions { mle_opts, verbosity, return_intermediate_values }
    }

    /// Default options with progress every `n` iterations.
    ///
    /// # Errors
    /// [`KentError::InvalidVerbosity`] when `n == 0`.
    pub fn verbose(n: usize) -> KentResult<KentFitOptions> {
        Ok(KentFitOptions { verbosity: Verbosity::every(n)?, ..KentFitOptions::default() })
    }
}

impl Default for KentFitOptions {
    fn default() -> Self {
        KentFitOptions::new(MLEOptions::default(), Verbosity::Quiet, false)
    }
}
