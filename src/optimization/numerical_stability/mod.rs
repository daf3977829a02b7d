//! numerical_stability — parameter transforms for constrained fitting.
//!
//! Purpose
//! -------
//! Map the unconstrained optimizer vector onto Kent shape parameters and
//! handle the unimodality constraint `2β ≤ κ`, so the optimizer can run
//! unconstrained L-BFGS.
//!
//! Key behaviors
//! -------------
//! - `κ = KAPPA_FLOOR + |x|` and `β = |x|` keep both parameters in their
//!   domain for every real input.
//! - `project_ovalness` moves an infeasible `β` onto the constraint and
//!   reports the violation for a quadratic exterior penalty.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; validation happens in the model layer.
//! - Pure functions: no logging, I/O, or global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check the domains, inverses, and the
//!   projection.

pub mod transformations;

pub use self::transformations::{
    CONSTRAINT_PENALTY, KAPPA_FLOOR, beta_from_free, free_from_beta, free_from_kappa,
    kappa_from_free, project_ovalness,
};

pub mod prelude {
    pub use super::transformations::{
        CONSTRAINT_PENALTY, KAPPA_FLOOR, beta_from_free, free_from_beta, free_from_kappa,
        kappa_from_free, project_ovalness,
    };
}
