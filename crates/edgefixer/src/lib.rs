//! Umbrella crate for the `edgefixer` workspace.
//!
//! Re-exports the plane primitives, the line estimator and both border
//! fixers so hosts only need one dependency.

pub use ef_core::*;
pub use ef_fix::*;
pub use ef_lsq::{EdgeEstimator, LinearFit};

/// Estimator errors, kept apart from [`ef_core::Error`].
pub use ef_lsq::Error as EstimatorError;
