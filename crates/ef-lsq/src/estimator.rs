use core::mem::size_of;

use ef_core::{BitDepth, Line, LineMut, Sample};
use log::trace;

use crate::Error;
use crate::fit::LinearFit;
use crate::moments::{Moments, integrate, window};

/// Reusable scratch space and solver for one border line at a time.
///
/// Both lines are copied into the scratch buffer before anything is written,
/// so the bad line may sit right next to the good line in the same plane.
/// One estimator serves rows and columns alike; size it for the longest line
/// it will see with [`EdgeEstimator::try_new`].
#[derive(Debug, Clone)]
pub struct EdgeEstimator {
    capacity: usize,
    bad: Vec<u32>,
    good: Vec<u32>,
    moments: Vec<Moments>,
}

impl EdgeEstimator {
    /// Scratch bytes needed for lines of up to `max_len` samples.
    ///
    /// Line copies are widened to `u32`, so the size does not depend on the
    /// sample type.
    pub fn required_bytes(max_len: usize) -> usize {
        let lines = max_len.saturating_mul(2 * size_of::<u32>());
        let table = max_len.saturating_add(1).saturating_mul(size_of::<Moments>());
        lines.saturating_add(table)
    }

    /// Allocates scratch for lines of up to `max_len` samples.
    pub fn try_new(max_len: usize) -> Result<Self, Error> {
        let bytes = Self::required_bytes(max_len);
        let alloc_err = |_| Error::Allocation { bytes };

        let mut bad = Vec::new();
        bad.try_reserve_exact(max_len).map_err(alloc_err)?;
        let mut good = Vec::new();
        good.try_reserve_exact(max_len).map_err(alloc_err)?;
        let mut moments = Vec::new();
        moments
            .try_reserve_exact(max_len.saturating_add(1))
            .map_err(alloc_err)?;

        trace!(target: "ef_lsq::estimator", "scratch for {max_len}-sample lines: {bytes} bytes");

        Ok(Self {
            capacity: max_len,
            bad,
            good,
            moments,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copies the good line into scratch.
    ///
    /// Use together with [`EdgeEstimator::apply`] when the good and bad lines
    /// live in the same plane and cannot be borrowed at the same time.
    pub fn load_good<T: Sample>(&mut self, good: &Line<'_, T>) {
        debug_assert!(good.len() <= self.capacity, "line longer than scratch");
        self.good.clear();
        self.good.extend(good.iter().map(Sample::to_u32));
    }

    /// Rewrites `bad` from the good line stored by the last
    /// [`EdgeEstimator::load_good`].
    ///
    /// Each sample `i` is mapped by the least-squares fit over the window
    /// `[i - radius, i + radius]` clamped to the line; `radius == 0` uses one
    /// fit for the whole line. Results are rounded and clamped to `depth`.
    pub fn apply<T: Sample>(&mut self, bad: &mut LineMut<'_, T>, radius: usize, depth: BitDepth) {
        assert_eq!(
            bad.len(),
            self.good.len(),
            "bad and good lines must have equal length"
        );
        let n = bad.len();
        if n == 0 {
            return;
        }

        self.bad.clear();
        self.bad.extend(bad.as_line().iter().map(Sample::to_u32));
        integrate(&self.bad, &self.good, &mut self.moments);

        let max = depth.max_value();
        if radius == 0 {
            let fit = LinearFit::from_sums(&window(&self.moments, 0, n - 1));
            for x in &mut self.bad {
                *x = fit.apply(*x, max);
            }
        } else {
            for (i, x) in self.bad.iter_mut().enumerate() {
                let l = i.saturating_sub(radius);
                let r = i.saturating_add(radius).min(n - 1);
                let fit = LinearFit::from_sums(&window(&self.moments, l, r));
                *x = fit.apply(*x, max);
            }
        }

        bad.fill_from(self.bad.iter().map(|&v| T::from_u32_saturating(v)));
    }

    /// Reconstructs `bad` from a good line that lives in a separate buffer.
    pub fn fix_line<T: Sample>(
        &mut self,
        bad: &mut LineMut<'_, T>,
        good: &Line<'_, T>,
        radius: usize,
        depth: BitDepth,
    ) {
        self.load_good(good);
        self.apply(bad, radius, depth);
    }
}
