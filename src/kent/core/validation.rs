//! Validation helpers for Kent parameters, frames, and point batches.
//!
//! These checks run once at the boundary (constructors, estimators, the
//! likelihood model) so that the numerical code behind them can assume
//! finite inputs with the documented shapes.
use crate::kent::errors::{KentError, KentResult};
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Dimension};

/// Tolerance for orthogonality and unit length of user-supplied axes.
pub const ORTHONORMAL_TOL: f64 = 1e-10;

/// Validate the concentration parameter.
///
/// # Errors
/// Returns [`KentError::InvalidKappa`] when `kappa` is NaN/±inf or negative.
pub fn verify_kappa(kappa: f64) -> KentResult<f64> {
    if !kappa.is_finite() || kappa < 0.0 {
        return Err(KentError::InvalidKappa { value: kappa });
    }
    Ok(kappa)
}

/// Validate the ovalness parameter.
///
/// # Errors
/// Returns [`KentError::InvalidBeta`] when `beta` is NaN/±inf or negative.
pub fn verify_beta(beta: f64) -> KentResult<f64> {
    if !beta.is_finite() || beta < 0.0 {
        return Err(KentError::InvalidBeta { value: beta });
    }
    Ok(beta)
}

/// Validate that the spherical angles are finite.
pub fn verify_angles(theta: f64, phi: f64, psi: f64) -> KentResult<()> {
    for (name, value) in [("theta", theta), ("phi", phi), ("psi", psi)] {
        if !value.is_finite() {
            return Err(KentError::InvalidAngle { name, value });
        }
    }
    Ok(())
}

/// Validate that a vector has exactly three finite components.
pub fn verify_vector3(v: ArrayView1<f64>) -> KentResult<()> {
    if v.len() != 3 {
        return Err(KentError::ShapeMismatch { expected: "vector of length 3", found: vec![v.len()] });
    }
    for &value in v.iter() {
        if !value.is_finite() {
            return Err(KentError::NonFinitePoint { index: 0, value });
        }
    }
    Ok(())
}

/// Check that three axes form an orthonormal triple.
///
/// Pairwise inner products must be below [`ORTHONORMAL_TOL`] in magnitude and
/// each squared norm must be within the same tolerance of one.
///
/// # Errors
/// - [`KentError::ShapeMismatch`] if an axis is not a 3-vector.
/// - [`KentError::NotOrthonormal`] for the first non-orthogonal pair.
/// - [`KentError::NotUnitLength`] for the first axis with a bad norm.
pub fn verify_orthonormal<'a>(axes: [ArrayView1<'a, f64>; 3]) -> KentResult<()> {
    for axis in &axes {
        verify_vector3(axis.view())?;
    }
    for (first, second) in [(0, 1), (1, 2), (2, 0)] {
        let dot = axes[first].dot(&axes[second]);
        if dot.abs() >= ORTHONORMAL_TOL {
            return Err(KentError::NotOrthonormal {
                first: first.min(second),
                second: first.max(second),
                dot,
            });
        }
    }
    for (axis, v) in axes.iter().enumerate() {
        let norm_sq = v.dot(v);
        if (norm_sq - 1.0).abs() >= ORTHONORMAL_TOL {
            return Err(KentError::NotUnitLength { axis, norm_sq });
        }
    }
    Ok(())
}

/// Check that a batch of points has a trailing axis of length 3.
///
/// Any leading shape is accepted (`(3,)`, `(N, 3)`, `(N, M, 3)`, ...).
pub fn verify_points_shape<S, D>(xs: &ArrayBase<S, D>) -> KentResult<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    match xs.shape().last() {
        Some(3) => Ok(()),
        _ => Err(KentError::ShapeMismatch {
            expected: "array whose last axis has length 3",
            found: xs.shape().to_vec(),
        }),
    }
}

/// Validate an `N × 3` sample used for estimation.
///
/// # Errors
/// - [`KentError::ShapeMismatch`] when the sample is not `N × 3`.
/// - [`KentError::EmptySample`] when `N == 0`.
/// - [`KentError::NonFinitePoint`] for the first row with a NaN/±inf entry.
pub fn verify_sample(xs: ArrayView2<f64>) -> KentResult<()> {
    verify_points_shape(&xs)?;
    if xs.nrows() == 0 {
        return Err(KentError::EmptySample);
    }
    for (index, row) in xs.rows().into_iter().enumerate() {
        if let Some(&value) = row.iter().find(|v| !v.is_finite()) {
            return Err(KentError::NonFinitePoint { index, value });
        }
    }
    Ok(())
}
