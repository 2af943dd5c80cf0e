//! Least-squares reconstruction of one dirty border line.
//!
//! A dirty line usually keeps the structure of its neighbour but with the
//! wrong gain and offset. For every sample `i` of the bad line `x` we fit
//! `y ≈ a·x + b` against the good line `y` over a window centred on `i` and
//! replace `x[i]` with `a·x[i] + b`.
//!
//! Window sums come from prefix tables of `Σx, Σy, Σx², Σxy`, so a line costs
//! `O(n)` regardless of radius. Accumulation is integer-only; only the final
//! slope and intercept are floating point.

mod error;
mod estimator;
pub mod fit;
pub mod moments;

pub use error::Error;
pub use estimator::EdgeEstimator;
pub use fit::LinearFit;
