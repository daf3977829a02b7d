//! distribution — the five-parameter Kent (FB5) distribution on the sphere.
//!
//! Purpose
//! -------
//! Represent one Kent distribution as an immutable value: an orthonormal
//! frame `Γ = (γ₁, γ₂, γ₃)`, a concentration `κ`, and an ovalness `β`, with
//! density
//!
//! ```text
//! f(x) = exp(κ γ₁·x + β[(γ₂·x)² − (γ₃·x)²]) / c(κ, β)
//! ```
//!
//! Key behaviors
//! -------------
//! - Four equivalent constructors (angles, orthonormal triple, two scaled
//!   vectors, rotation matrix), plus [`KentDistribution::from_frame`]. All
//!   of them canonicalize the frame through an angle round-trip, so equal
//!   rotations give identical axes whichever form was used.
//! - Density and log-density over any array whose last axis has length 3,
//!   with or without the normalizing constant.
//! - Closed-form density maximum and its location ([`KentDistribution::mode`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `κ, β` are finite and non-negative. `2β ≤ κ` (unimodality) is *not*
//!   enforced here; a debug event is emitted when it fails. The estimators
//!   always return parameters inside that domain.
//! - `ln c(κ, β)` is computed at most once per instance and memoized.
//!
//! Conventions
//! -----------
//! - Sampling state (queued draws, percentile cache) lives in
//!   [`KentSampler`](crate::kent::sampler::KentSampler), not here.
use std::cell::OnceCell;
use std::fmt;

use ndarray::{Array, ArrayBase, ArrayView1, ArrayView2, Axis, Data, RemoveAxis, array};
use tracing::debug;

use crate::kent::{
    core::{
        frame::{Frame, arbitrary_orthogonal_unit, axes_to_angles, axis_to_angles},
        normalizer,
        validation::{
            verify_angles, verify_beta, verify_kappa, verify_orthonormal, verify_points_shape,
            verify_vector3,
        },
    },
    errors::{KentError, KentResult},
};

#[derive(Debug, Clone)]
pub struct KentDistribution {
    frame: Frame,
    kappa: f64,
    beta: f64,
    log_norm: OnceCell<f64>,
}

impl PartialEq for KentDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.kappa == other.kappa && self.beta == other.beta
    }
}

impl KentDistribution {
    /// Distribution with frame `Γ = H(θ, φ) · K(ψ)`.
    ///
    /// # Errors
    /// [`KentError::InvalidAngle`], [`KentError::InvalidKappa`],
    /// [`KentError::InvalidBeta`].
    pub fn from_angles(theta: f64, phi: f64, psi: f64, kappa: f64, beta: f64) -> KentResult<Self> {
        verify_angles(theta, phi, psi)?;
        let frame = Frame::from_angles(theta, phi, psi);
        let (t, p, s) = axes_to_angles(frame.gamma1(), frame.gamma2());
        Self::from_frame(Frame::from_angles(t, p, s), kappa, beta)
    }

    /// Distribution with explicit orthonormal axes.
    ///
    /// # Errors
    /// [`KentError::ShapeMismatch`], [`KentError::NotOrthonormal`] or
    /// [`KentError::NotUnitLength`] (tolerance 1e-10), plus the parameter
    /// errors of [`from_angles`](Self::from_angles).
    pub fn from_axes(
        gamma1: ArrayView1<f64>, gamma2: ArrayView1<f64>, gamma3: ArrayView1<f64>, kappa: f64,
        beta: f64,
    ) -> KentResult<Self> {
        verify_orthonormal([gamma1.view(), gamma2.view(), gamma3.view()])?;
        Self::from_frame(Frame::from_axes(gamma1, gamma2), kappa, beta)
    }

    /// Distribution from `A = κ γ₁` and `B = β γ₂`; `γ₃` is implied.
    ///
    /// `A` may be arbitrarily short but not zero. `B` may be zero, in which
    /// case some unit vector orthogonal to `γ₁` is used as `γ₂`.
    ///
    /// # Errors
    /// [`KentError::ZeroPrimaryAxis`] when `|A| = 0`; shape/finiteness errors
    /// for malformed vectors.
    pub fn from_vectors(a: ArrayView1<f64>, b: ArrayView1<f64>) -> KentResult<Self> {
        verify_vector3(a)?;
        verify_vector3(b)?;
        let kappa = a[0].hypot(a[1]).hypot(a[2]);
        let beta = b[0].hypot(b[1]).hypot(b[2]);
        if kappa == 0.0 {
            return Err(KentError::ZeroPrimaryAxis);
        }
        let gamma1 = &a / kappa;
        let gamma2 =
            if beta == 0.0 { arbitrary_orthogonal_unit(gamma1.view()) } else { &b / beta };
        Self::from_frame(Frame::from_axes(gamma1.view(), gamma2.view()), kappa, beta)
    }

    /// Distribution from a `3 × 3` rotation matrix whose columns are the axes.
    ///
    /// # Errors
    /// [`KentError::ShapeMismatch`] for a non-`3 × 3` input, then as
    /// [`from_axes`](Self::from_axes).
    pub fn from_matrix(gamma: ArrayView2<f64>, kappa: f64, beta: f64) -> KentResult<Self> {
        if gamma.shape() != [3, 3] {
            return Err(KentError::ShapeMismatch {
                expected: "3 x 3 matrix",
                found: gamma.shape().to_vec(),
            });
        }
        Self::from_axes(gamma.column(0), gamma.column(1), gamma.column(2), kappa, beta)
    }

    /// Distribution on an already-built frame.
    ///
    /// # Errors
    /// [`KentError::InvalidKappa`], [`KentError::InvalidBeta`].
    pub fn from_frame(frame: Frame, kappa: f64, beta: f64) -> KentResult<Self> {
        let kappa = verify_kappa(kappa)?;
        let beta = verify_beta(beta)?;
        if 2.0 * beta > kappa {
            debug!(kappa, beta, "2*beta exceeds kappa; density is not unimodal");
        }
        Ok(Self { frame, kappa, beta, log_norm: OnceCell::new() })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn theta(&self) -> f64 {
        self.frame.theta()
    }

    pub fn phi(&self) -> f64 {
        self.frame.phi()
    }

    pub fn psi(&self) -> f64 {
        self.frame.psi()
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma1(&self) -> ArrayView1<'_, f64> {
        self.frame.gamma1()
    }

    pub fn gamma2(&self) -> ArrayView1<'_, f64> {
        self.frame.gamma2()
    }

    pub fn gamma3(&self) -> ArrayView1<'_, f64> {
        self.frame.gamma3()
    }

    /// `ln c(κ, β)`, memoized per instance.
    pub fn log_normalize(&self) -> f64 {
        *self.log_norm.get_or_init(|| normalizer::log_normalize(self.kappa, self.beta))
    }

    /// `c(κ, β)` from the exact series.
    ///
    /// # Errors
    /// [`KentError::NormalizerOverflow`] when `c` exceeds `f64::MAX`; use
    /// [`log_normalize`](Self::log_normalize) in that regime.
    pub fn normalize(&self) -> KentResult<f64> {
        normalizer::normalize(self.kappa, self.beta)
    }

    /// `κ γ₁·x + β[(γ₂·x)² − (γ₃·x)²]` for a single 3-vector.
    pub(crate) fn unnormalized_log_pdf(&self, x: ArrayView1<f64>) -> f64 {
        let g = self.frame.matrix();
        let proj = |c: usize| g[[0, c]] * x[0] + g[[1, c]] * x[1] + g[[2, c]] * x[2];
        let (g1x, g2x, g3x) = (proj(0), proj(1), proj(2));
        self.kappa * g1x + self.beta * (g2x * g2x - g3x * g3x)
    }

    /// Log-density over the last axis of `xs` (`(3,)`, `(N, 3)`,
    /// `(N, M, 3)`, ...).
    ///
    /// # Errors
    /// [`KentError::ShapeMismatch`] when the last axis is not of length 3.
    pub fn log_pdf<S, D>(
        &self, xs: &ArrayBase<S, D>, normalize: bool,
    ) -> KentResult<Array<f64, D::Smaller>>
    where
        S: Data<Elem = f64>,
        D: RemoveAxis,
    {
        verify_points_shape(xs)?;
        let shift = if normalize { self.log_normalize() } else { 0.0 };
        let last = Axis(xs.ndim() - 1);
        Ok(xs.map_axis(last, |x| self.unnormalized_log_pdf(x) - shift))
    }

    /// Density over the last axis of `xs`; see [`log_pdf`](Self::log_pdf).
    pub fn pdf<S, D>(&self, xs: &ArrayBase<S, D>, normalize: bool) -> KentResult<Array<f64, D::Smaller>>
    where
        S: Data<Elem = f64>,
        D: RemoveAxis,
    {
        Ok(self.log_pdf(xs, normalize)?.mapv_into(f64::exp))
    }

    /// Log-density at one point.
    pub fn log_pdf_at(&self, x: ArrayView1<f64>, normalize: bool) -> KentResult<f64> {
        verify_vector3(x)?;
        let shift = if normalize { self.log_normalize() } else { 0.0 };
        Ok(self.unnormalized_log_pdf(x) - shift)
    }

    /// Density at one point.
    pub fn pdf_at(&self, x: ArrayView1<f64>, normalize: bool) -> KentResult<f64> {
        self.log_pdf_at(x, normalize).map(f64::exp)
    }

    /// Sum of the normalized log-density over all points in `xs`.
    pub fn log_likelihood<S, D>(&self, xs: &ArrayBase<S, D>) -> KentResult<f64>
    where
        S: Data<Elem = f64>,
        D: RemoveAxis,
    {
        Ok(self.log_pdf(xs, true)?.sum())
    }

    /// First frame-local coordinate of the density maximum.
    ///
    /// `1` (the mean direction) when `2β ≤ κ`; `κ/(2β)` on the two-mode
    /// side of the boundary.
    fn mode_x1(&self) -> f64 {
        if self.beta == 0.0 { 1.0 } else { (self.kappa / (2.0 * self.beta)).min(1.0) }
    }

    /// Maximum of the log-density over the sphere.
    pub fn log_pdf_max(&self, normalize: bool) -> f64 {
        let x1 = self.mode_x1();
        let fmax = self.kappa * x1 + self.beta * (1.0 - x1 * x1);
        if normalize { fmax - self.log_normalize() } else { fmax }
    }

    /// Maximum of the density over the sphere.
    pub fn pdf_max(&self, normalize: bool) -> f64 {
        self.log_pdf_max(normalize).exp()
    }

    /// Spherical coordinates `(θ, φ)` of a density maximum.
    pub fn mode(&self) -> (f64, f64) {
        let x1 = self.mode_x1();
        let local = array![x1, (1.0 - x1 * x1).max(0.0).sqrt(), 0.0];
        let x = self.frame.to_global(local.view());
        axis_to_angles(x.view())
    }
}

impl fmt::Display for KentDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kent({}, {}, {}, {}, {})",
            self.theta(),
            self.phi(),
            self.psi(),
            self.kappa,
            self.beta
        )
    }
}
