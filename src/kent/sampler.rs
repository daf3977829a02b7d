//! sampler — rejection sampling, density levels, and contours for one
//! Kent distribution.
//!
//! Purpose
//! -------
//! Own the mutable state that sampling needs (random source, queued
//! surplus draws, sorted level cache) next to an immutable
//! [`KentDistribution`], so the distribution itself stays a plain value.
//!
//! Key behaviors
//! -------------
//! - [`KentSampler::draw`] uses rejection from the uniform sphere: batches
//!   of isotropic Gaussian vectors are normalized and accepted with
//!   probability `exp(f(x) − f_max)`. Accepted points beyond the request are
//!   queued and handed out first on the next call.
//! - [`KentSampler::level`] returns the `p`-th percentile of `−ln f(X)` over
//!   a cached, sorted sample; it only resamples when the cache is smaller
//!   than requested.
//! - [`KentSampler::contour`] traces the curve on the sphere where
//!   `−ln f(x)` equals a percentile level.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every drawn point has unit norm up to rounding.
//! - A seeded sampler is fully deterministic.
//! - Out-of-range percentiles yield `NaN` (and a warning event), never an
//!   error or a panic.
use std::collections::VecDeque;
use std::f64::consts::{PI, SQRT_2};

use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use tracing::{debug, warn};

use crate::kent::{
    core::{
        frame::axis_to_angles,
        options::{CONTOUR_GRID_POINTS, DEFAULT_LEVEL_SAMPLES, SAMPLE_BATCH_SIZE},
    },
    distribution::KentDistribution,
};

/// Points on a density level set, in ambient and spherical coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// `M × 3` unit vectors.
    pub points: Array2<f64>,
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
}

impl Contour {
    fn empty() -> Self {
        Contour { points: Array2::zeros((0, 3)), theta: Vec::new(), phi: Vec::new() }
    }

    fn from_points(points: Array2<f64>) -> Self {
        let (theta, phi): (Vec<f64>, Vec<f64>) =
            points.rows().into_iter().map(axis_to_angles).unzip();
        Contour { points, theta, phi }
    }

    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }
}

/// Sampling session for one distribution.
#[derive(Debug, Clone)]
pub struct KentSampler<R: Rng = ChaCha8Rng> {
    dist: KentDistribution,
    rng: R,
    pending: VecDeque<[f64; 3]>,
    levels: Vec<f64>,
}

impl KentSampler<ChaCha8Rng> {
    /// Deterministic sampler seeded with `seed`.
    pub fn seeded(dist: KentDistribution, seed: u64) -> Self {
        Self::new(dist, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> KentSampler<R> {
    pub fn new(dist: KentDistribution, rng: R) -> Self {
        KentSampler { dist, rng, pending: VecDeque::new(), levels: Vec::new() }
    }

    pub fn distribution(&self) -> &KentDistribution {
        &self.dist
    }

    pub fn into_distribution(self) -> KentDistribution {
        self.dist
    }

    /// Accepted draws waiting to be handed out.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Sorted `−ln f` values backing [`level`](Self::level).
    pub fn cached_levels(&self) -> &[f64] {
        &self.levels
    }

    /// Run one rejection batch, queueing the accepted points.
    fn fill_batch(&mut self) {
        let lfmax = self.dist.log_pdf_max(false);
        let mut accepted = 0usize;
        for _ in 0..SAMPLE_BATCH_SIZE {
            let mut x: [f64; 3] = [
                self.rng.sample(StandardNormal),
                self.rng.sample(StandardNormal),
                self.rng.sample(StandardNormal),
            ];
            let norm = (x[0] * x[0] + x[1] * x[1] + x[2] * x[2]).sqrt();
            if norm == 0.0 {
                continue;
            }
            x.iter_mut().for_each(|v| *v /= norm);
            let lp = self.dist.unnormalized_log_pdf(ArrayView1::from(&x[..]));
            let u: f64 = self.rng.r#gen();
            if u < (lp - lfmax).exp() {
                self.pending.push_back(x);
                accepted += 1;
            }
        }
        debug!(accepted, batch = SAMPLE_BATCH_SIZE, "rejection batch");
    }

    /// `n × 3` independent draws.
    pub fn draw(&mut self, n: usize) -> Array2<f64> {
        while self.pending.len() < n {
            self.fill_batch();
        }
        let out: Vec<[f64; 3]> = self.pending.drain(..n).collect();
        Array2::from_shape_fn((n, 3), |(i, c)| out[i][c])
    }

    /// A single draw as a 3-vector.
    pub fn draw_one(&mut self) -> Array1<f64> {
        self.draw(1).row(0).to_owned()
    }

    /// Value `ℓ` of `−ln f` below which `percentile` percent of the mass
    /// lies, estimated from at least `n_samples` draws.
    ///
    /// The sorted sample is cached; a later call reuses it whenever it holds
    /// at least `n_samples` values. Returns `NaN` when `percentile` is
    /// outside `[0, 100)` or no sample is available.
    pub fn level(&mut self, percentile: f64, n_samples: usize) -> f64 {
        if !(0.0..100.0).contains(&percentile) {
            warn!(percentile, "percentile must lie in [0, 100); returning NaN");
            return f64::NAN;
        }
        if self.levels.len() < n_samples {
            let xs = self.draw(n_samples);
            let ln_c = self.dist.log_normalize();
            let mut levels: Vec<f64> = xs
                .rows()
                .into_iter()
                .map(|x| ln_c - self.dist.unnormalized_log_pdf(x))
                .collect();
            levels.sort_by(f64::total_cmp);
            self.levels = levels;
        }
        let size = self.levels.len();
        if size == 0 {
            warn!("no samples available for level; returning NaN");
            return f64::NAN;
        }
        let loc = (size - 1) as f64 * percentile / 100.0;
        let idx = loc.floor() as usize;
        let frac = loc - idx as f64;
        match self.levels.get(idx + 1) {
            Some(&next) if frac > 0.0 => self.levels[idx] * (1.0 - frac) + next * frac,
            _ => self.levels[idx],
        }
    }

    /// Curve where `−ln f(x)` equals `level(percentile)`.
    ///
    /// Empty when the level is `NaN` or the level set does not meet the
    /// sphere.
    pub fn contour(&mut self, percentile: f64) -> Contour {
        let lev = self.level(percentile, DEFAULT_LEVEL_SAMPLES);
        if !lev.is_finite() {
            return Contour::empty();
        }
        let (k, b) = (self.dist.kappa(), self.dist.beta());
        let target = self.dist.log_normalize() - lev;
        let local = if b == 0.0 { circle_level_set(k, target) } else { oval_level_set(k, b, target) };
        if local.is_empty() {
            return Contour::empty();
        }
        let gamma = self.dist.frame().matrix();
        let points = Array2::from_shape_fn((local.len(), 3), |(i, r)| {
            let x = &local[i];
            gamma[[r, 0]] * x[0] + gamma[[r, 1]] * x[1] + gamma[[r, 2]] * x[2]
        });
        Contour::from_points(points)
    }
}

/// Frame-local solutions of `κ x₁ = target` on the sphere (β = 0).
fn circle_level_set(k: f64, target: f64) -> Vec<[f64; 3]> {
    if k == 0.0 {
        return Vec::new();
    }
    let x1 = target / k;
    if !(x1.abs() <= 1.0) {
        return Vec::new();
    }
    let r = (1.0 - x1 * x1).sqrt();
    (0..CONTOUR_GRID_POINTS)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / CONTOUR_GRID_POINTS as f64;
            [x1, r * a.cos(), r * a.sin()]
        })
        .collect()
}

/// Frame-local solutions of `κ x₁ + β(x₂² − x₃²) = target` on the sphere.
///
/// Eliminating `x₃² = 1 − x₁² − x₂²` leaves a quadratic in `x₁` for each
/// `x₂` on a uniform grid; both roots and both signs of `(x₂, x₃)` are kept.
fn oval_level_set(k: f64, b: f64, target: f64) -> Vec<[f64; 3]> {
    let disc0 = k * k + 4.0 * b * (b + target);
    if !(disc0 >= 0.0) {
        return Vec::new();
    }
    let x2_max = (disc0.sqrt() / (2.0 * SQRT_2 * b)).min(1.0);
    let step = 2.0 * x2_max / (CONTOUR_GRID_POINTS - 1) as f64;
    let mut out = Vec::new();
    for root_sign in [1.0, -1.0] {
        for mirror in [1.0, -1.0] {
            for i in 0..CONTOUR_GRID_POINTS {
                let x2 = -x2_max + step * i as f64;
                let disc = k * k + 4.0 * b * (b + target - 2.0 * b * x2 * x2);
                if !(disc >= 0.0) {
                    continue;
                }
                let x1 = (-k + root_sign * disc.sqrt()) / (2.0 * b);
                let rest = 1.0 - x1 * x1 - x2 * x2;
                if !(rest >= 0.0) {
                    continue;
                }
                out.push([x1, mirror * x2, mirror * rest.sqrt()]);
            }
        }
    }
    out
}
