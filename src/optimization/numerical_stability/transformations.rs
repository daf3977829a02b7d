//! Parameter transforms between optimizer space and Kent shape parameters.
//!
//! # Provided items
//! - [`KAPPA_FLOOR`]: smallest concentration the fitter will produce.
//! - [`kappa_from_free`] / [`free_from_kappa`]: `κ = floor + |x|` and its
//!   non-negative inverse.
//! - [`beta_from_free`] / [`free_from_beta`]: `β = |x|` and its inverse.
//! - [`CONSTRAINT_PENALTY`] and [`project_ovalness`]: exterior penalty for
//!   the unimodality constraint `2β ≤ κ`.
//!
//! The absolute-value maps make every real `x` a valid parameter, so the
//! solver can move freely; they are not injective, and only the image
//! matters to the model.

/// Minimum concentration; keeps the density away from the flat direction
/// that appears as `κ → 0`.
pub const KAPPA_FLOOR: f64 = 1e-6;

/// Weight of the quadratic penalty on `2β - κ > 0`.
pub const CONSTRAINT_PENALTY: f64 = 1e4;

/// `κ = KAPPA_FLOOR + |x|`.
pub fn kappa_from_free(x: f64) -> f64 {
    KAPPA_FLOOR + x.abs()
}

/// Free variable for a given `κ`; values below the floor map to `0`.
pub fn free_from_kappa(kappa: f64) -> f64 {
    (kappa - KAPPA_FLOOR).max(0.0)
}

/// `β = |x|`.
pub fn beta_from_free(x: f64) -> f64 {
    x.abs()
}

/// Free variable for a given `β` (identity on `β ≥ 0`).
pub fn free_from_beta(beta: f64) -> f64 {
    beta.max(0.0)
}

/// Project `β` onto `2β ≤ κ`.
///
/// Returns the feasible `β` and the violation `max(0, 2β - κ)`; the model
/// evaluates the likelihood at the projected point and subtracts
/// `CONSTRAINT_PENALTY · violation²`.
pub fn project_ovalness(kappa: f64, beta: f64) -> (f64, f64) {
    let violation = (2.0 * beta - kappa).max(0.0);
    if violation > 0.0 { (0.5 * kappa, violation) } else { (beta, 0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Domain of the κ/β maps and their inverses on the valid domain.
    // - Projection onto the unimodality constraint.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Every real maps into the valid domain, and the inverses recover
    // in-domain values.
    fn free_maps_cover_valid_domain_and_invert() {
        for x in [-3.0, -1e-9, 0.0, 0.25, 40.0] {
            assert!(kappa_from_free(x) >= KAPPA_FLOOR);
            assert!(beta_from_free(x) >= 0.0);
        }
        for kappa in [KAPPA_FLOOR, 0.5, 20.0] {
            assert!((kappa_from_free(free_from_kappa(kappa)) - kappa).abs() < 1e-15);
        }
        assert_eq!(free_from_kappa(0.0), 0.0);
        assert_eq!(beta_from_free(free_from_beta(2.5)), 2.5);
    }

    #[test]
    // Purpose
    // -------
    // Feasible pairs pass through untouched; infeasible ones are projected
    // to `β = κ/2` with the violation reported.
    fn project_ovalness_clamps_to_constraint() {
        assert_eq!(project_ovalness(10.0, 4.0), (4.0, 0.0));
        assert_eq!(project_ovalness(10.0, 5.0), (5.0, 0.0));
        assert_eq!(project_ovalness(10.0, 6.0), (5.0, 2.0));
    }
}
