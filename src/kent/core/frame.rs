//! frame — orthonormal Kent frames and their spherical-angle parameterization.
//!
//! Purpose
//! -------
//! Convert between the three spherical angles `(θ, φ, ψ)` and the orthonormal
//! frame `Γ = (γ₁, γ₂, γ₃)` of a Kent distribution, and provide the small
//! vector helpers the constructors need.
//!
//! Key behaviors
//! -------------
//! - Build `Γ = H(θ, φ) · K(ψ)`; the columns of `Γ` are `γ₁, γ₂, γ₃`.
//! - Recover `(θ, φ)` from `γ₁` and `ψ` from `γ₂` rotated into the
//!   `H`-aligned frame.
//! - Canonicalize any frame through an angle round-trip so that every
//!   constructor shares one sign/ordering convention.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ ∈ [0, π]`, `φ, ψ ∈ (-π, π]` on output.
//! - At the poles (`γ₁ = ±e₁`) `φ` is not identified; `atan2(0, 0) = 0`
//!   is used and the remaining rotation is absorbed into `ψ`.
//! - A frame built from angles is orthonormal to ~1e-15 and survives the
//!   angles → frame → angles → frame round-trip to ~1e-12.
//!
//! Conventions
//! -----------
//! - Vectors are `ndarray` 3-vectors; frames are `3 × 3` matrices whose
//!   columns are the axes.
//! - `θ` is computed as `atan2(√(γ₁,y² + γ₁,z²), γ₁,x)`, which equals
//!   `arccos(γ₁,x)` but keeps full precision near the poles.
use nalgebra::Vector3;
use ndarray::{Array1, Array2, ArrayView1, array};

/// Rotation `H(θ, φ)` that maps `e₁` onto the mean direction.
pub fn matrix_h(theta: f64, phi: f64) -> Array2<f64> {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    array![[ct, -st, 0.0], [st * cp, ct * cp, -sp], [st * sp, ct * sp, cp]]
}

/// Rotation `K(ψ)` about `e₁` that orients the major/minor axes.
pub fn matrix_k(psi: f64) -> Array2<f64> {
    let (s, c) = psi.sin_cos();
    array![[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

/// Frame matrix `Γ = H(θ, φ) · K(ψ)`.
pub fn matrix_gamma(theta: f64, phi: f64, psi: f64) -> Array2<f64> {
    matrix_h(theta, phi).dot(&matrix_k(psi))
}

/// Spherical coordinates `(θ, φ)` of a unit vector.
///
/// Also used to report sample points and contour points in angle form.
pub fn axis_to_angles(gamma1: ArrayView1<f64>) -> (f64, f64) {
    let theta = gamma1[1].hypot(gamma1[2]).atan2(gamma1[0]);
    let phi = gamma1[2].atan2(gamma1[1]);
    (theta, phi)
}

/// Full angles `(θ, φ, ψ)` of the frame spanned by `γ₁` and `γ₂`.
///
/// `γ₂` is rotated by `Hᵀ(θ, φ)` and `ψ` is read off its last two
/// coordinates. Only the component of `γ₂` orthogonal to `γ₁` matters.
pub fn axes_to_angles(gamma1: ArrayView1<f64>, gamma2: ArrayView1<f64>) -> (f64, f64, f64) {
    let (theta, phi) = axis_to_angles(gamma1);
    let u = matrix_h(theta, phi).t().dot(&gamma2);
    let psi = u[2].atan2(u[1]);
    (theta, phi, psi)
}

/// Some unit vector orthogonal to `x`.
///
/// Takes the longest of `x × e₁`, `x × e₂`, `x × e₃` so the normalization
/// never divides by a near-zero norm, then rescales it to unit length.
pub fn arbitrary_orthogonal_unit(x: ArrayView1<f64>) -> Array1<f64> {
    let x = Vector3::new(x[0], x[1], x[2]);
    let best = [Vector3::x(), Vector3::y(), Vector3::z()]
        .iter()
        .map(|e| x.cross(e))
        .fold(Vector3::zeros(), |best, c| if c.norm() > best.norm() { c } else { best });
    let unit = best.normalize();
    array![unit.x, unit.y, unit.z]
}

/// Orthonormal Kent frame together with its angle parameterization.
///
/// Always constructed from angles, so `gamma` and `(theta, phi, psi)` agree
/// exactly and two frames describing the same rotation compare equal
/// column-for-column.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    theta: f64,
    phi: f64,
    psi: f64,
    gamma: Array2<f64>,
}

impl Frame {
    /// Frame `Γ = H(θ, φ) · K(ψ)`.
    pub fn from_angles(theta: f64, phi: f64, psi: f64) -> Self {
        Self { theta, phi, psi, gamma: matrix_gamma(theta, phi, psi) }
    }

    /// Canonical frame spanned by `γ₁` and `γ₂` (`γ₃` is implied).
    ///
    /// Goes through [`axes_to_angles`] and back; for a proper rotation the
    /// result reproduces the inputs, for an improper one `γ₃` is flipped.
    pub fn from_axes(gamma1: ArrayView1<f64>, gamma2: ArrayView1<f64>) -> Self {
        let (theta, phi, psi) = axes_to_angles(gamma1, gamma2);
        Self::from_angles(theta, phi, psi)
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn psi(&self) -> f64 {
        self.psi
    }

    /// `(θ, φ, ψ)`.
    pub fn angles(&self) -> (f64, f64, f64) {
        (self.theta, self.phi, self.psi)
    }

    /// Mean direction.
    pub fn gamma1(&self) -> ArrayView1<'_, f64> {
        self.gamma.column(0)
    }

    /// Major axis.
    pub fn gamma2(&self) -> ArrayView1<'_, f64> {
        self.gamma.column(1)
    }

    /// Minor axis.
    pub fn gamma3(&self) -> ArrayView1<'_, f64> {
        self.gamma.column(2)
    }

    /// `3 × 3` matrix with the axes as columns.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.gamma
    }

    /// Map frame-local coordinates `(x₁, x₂, x₃)` back to the sphere's
    /// ambient coordinates: `Γ · x'`.
    pub fn to_global(&self, local: ArrayView1<f64>) -> Array1<f64> {
        self.gamma.dot(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::PI;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Orthonormality of frames built from angles (boundary and random).
    // - The angles → frame → angles → frame round-trip.
    // - The arbitrary orthogonal vector helper.
    //
    // They intentionally DO NOT cover:
    // - Constructor-level consistency; see `kent::distribution`.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-14;

    fn boundary_and_random_angles() -> Vec<(f64, f64, f64)> {
        let mut out = Vec::new();
        for a in [0.0, 0.5 * PI, PI] {
            for b in [-PI, -0.5 * PI, 0.0, 0.5 * PI, PI] {
                for c in [-PI, -0.5 * PI, 0.0, 0.5 * PI, PI] {
                    out.push((a, b, c));
                }
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(666);
        for _ in 0..925 {
            out.push((
                rng.gen_range(0.0..PI),
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
            ));
        }
        out
    }

    fn assert_orthonormal(frame: &Frame) {
        let (g1, g2, g3) = (frame.gamma1(), frame.gamma2(), frame.gamma3());
        assert!(g1.dot(&g2).abs() < TOL);
        assert!(g1.dot(&g3).abs() < TOL);
        assert!(g2.dot(&g3).abs() < TOL);
        assert!((g1.dot(&g1) - 1.0).abs() < TOL);
        assert!((g2.dot(&g2) - 1.0).abs() < TOL);
        assert!((g3.dot(&g3) - 1.0).abs() < TOL);
    }

    #[test]
    // Purpose
    // -------
    // Every frame built from angles is orthonormal, including at the poles
    // and the ±π seams.
    fn frames_from_angles_are_orthonormal() {
        for (theta, phi, psi) in boundary_and_random_angles() {
            assert_orthonormal(&Frame::from_angles(theta, phi, psi));
        }
    }

    #[test]
    // Purpose
    // -------
    // Angles survive the frame round-trip away from the poles (mod 2π), and
    // the rebuilt frame matches the original everywhere.
    //
    // Given
    // -----
    // - Boundary and random (θ, φ, ψ).
    //
    // Expect
    // ------
    // - θ recovered within 1e-12; φ, ψ recovered within 1e-12 mod 2π when
    //   θ ∉ {0, π}; all axes within 1e-12.
    fn angle_round_trip_reproduces_angles_and_axes() {
        for (theta, phi, psi) in boundary_and_random_angles() {
            let frame = Frame::from_angles(theta, phi, psi);
            let (t2, p2, s2) = axes_to_angles(frame.gamma1(), frame.gamma2());
            assert!((theta - t2).abs() < 1e-12);
            if theta != 0.0 && theta != PI {
                let dphi = (phi - p2).abs();
                let dpsi = (psi - s2).abs();
                assert!(dphi < 1e-12 || (dphi - 2.0 * PI).abs() < 1e-12);
                assert!(dpsi < 1e-12 || (dpsi - 2.0 * PI).abs() < 1e-12);
            }
            let rebuilt = Frame::from_angles(t2, p2, s2);
            for (a, b) in frame.matrix().iter().zip(rebuilt.matrix().iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `axis_to_angles` inverts the first column of `H`.
    fn axis_to_angles_inverts_first_column() {
        let (theta, phi) = (0.75, 2.391_592_653_59);
        let h = matrix_h(theta, phi);
        let (t, p) = axis_to_angles(h.column(0));
        assert_relative_eq!(t, theta, epsilon = 1e-14);
        assert_relative_eq!(p, phi, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // The arbitrary orthogonal vector is a unit vector orthogonal to its
    // input, including for coordinate axes where one candidate vanishes.
    fn arbitrary_orthogonal_unit_is_orthonormal_to_input() {
        let inputs = [
            array![1.0, 0.0, 0.0],
            array![0.0, 0.0, -1.0],
            array![0.6, 0.0, 0.8],
            array![1.0, 1.0, 1.0] / 3f64.sqrt(),
        ];
        for x in &inputs {
            let v = arbitrary_orthogonal_unit(x.view());
            assert!(v.dot(x).abs() < TOL);
            assert_relative_eq!(v.dot(&v), 1.0, epsilon = TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // `to_global` of the frame-local basis vectors returns the axes.
    fn to_global_maps_local_basis_to_axes() {
        let frame = Frame::from_angles(1.0, 2.0, 3.0);
        let g2 = frame.to_global(array![0.0, 1.0, 0.0].view());
        for (a, b) in g2.iter().zip(frame.gamma2().iter()) {
            assert_relative_eq!(*a, *b, epsilon = TOL);
        }
    }
}
