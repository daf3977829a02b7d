//! Moment estimator for the Kent distribution.
//!
//! Takes the sample mean direction as `γ₁`, rotates the second-moment
//! matrix into the plane orthogonal to it, and reads the major/minor axes
//! off the eigenvectors of that `2 × 2` block. `κ` and `β` follow from the
//! mean resultant length `r₁` and the eigenvalue gap `r₂` via the
//! large-concentration inverses
//!
//! ```text
//! κ = 1/(2 − 2r₁ − r₂) + 1/(2 − 2r₁ + r₂)
//! β = ½ · (1/(2 − 2r₁ − r₂) − 1/(2 − 2r₁ + r₂))
//! ```
//!
//! The estimate always satisfies `2β < κ`; `β` is biased low for small
//! `κ`, which the maximum-likelihood refiner corrects.
use nalgebra::Matrix2;
use ndarray::{Array1, ArrayView2, Axis, array};

use crate::{
    kent::{
        core::{
            frame::{Frame, axis_to_angles, matrix_h},
            validation::verify_sample,
        },
        distribution::KentDistribution,
        errors::{KentError, KentResult},
    },
    optimization::numerical_stability::transformations::KAPPA_FLOOR,
};

/// Smallest accepted `2 − 2r₁ ∓ r₂`; below it the sample is a point mass.
const MIN_DISPERSION: f64 = 1e-12;

/// Moment estimate of a Kent distribution from an `N × 3` batch of unit
/// vectors.
///
/// # Errors
/// - Sample validation errors from [`verify_sample`].
/// - [`KentError::DegenerateSample`] when the mean resultant vanishes or
///   the points show no spread around it.
pub fn estimate_moments(xs: ArrayView2<f64>) -> KentResult<KentDistribution> {
    verify_sample(xs)?;
    let n = xs.nrows() as f64;
    let xbar = xs.mean_axis(Axis(0)).ok_or(KentError::EmptySample)?;
    let s = xs.t().dot(&xs) / n;

    let r1 = xbar.dot(&xbar).sqrt();
    if !(r1 > 0.0) {
        return Err(KentError::DegenerateSample { reason: "mean resultant length is zero" });
    }
    let gamma1 = &xbar / r1;
    let (theta, phi) = axis_to_angles(gamma1.view());
    let h = matrix_h(theta, phi);
    let b = h.t().dot(&s).dot(&h);

    let eig = Matrix2::new(b[[1, 1]], b[[1, 2]], b[[2, 1]], b[[2, 2]]).symmetric_eigen();
    let (major, minor) = if eig.eigenvalues[0] >= eig.eigenvalues[1] { (0, 1) } else { (1, 0) };
    let v = eig.eigenvectors.column(major);
    let gamma2: Array1<f64> = h.dot(&array![0.0, v[0], v[1]]);
    let r2 = eig.eigenvalues[major] - eig.eigenvalues[minor];

    let d_minus = 2.0 - 2.0 * r1 - r2;
    let d_plus = 2.0 - 2.0 * r1 + r2;
    if !(d_minus > MIN_DISPERSION && d_plus > MIN_DISPERSION) {
        return Err(KentError::DegenerateSample { reason: "points show no spread around the mean" });
    }
    let kappa = (1.0 / d_minus + 1.0 / d_plus).max(KAPPA_FLOOR);
    let beta = 0.5 * (1.0 / d_minus - 1.0 / d_plus);

    KentDistribution::from_frame(Frame::from_axes(gamma1.view(), gamma2.view()), kappa, beta)
}
