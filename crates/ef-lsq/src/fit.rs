use crate::moments::WindowSums;

/// Affine map `y = slope * x + intercept` from bad samples to good samples.
///
/// `slope` is never negative: windows where the lines are uncorrelated,
/// anti-correlated or where the bad line is flat fall back to the mean of
/// the good line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub const IDENTITY: Self = Self {
        slope: 1.0,
        intercept: 0.0,
    };

    /// Ordinary least squares of `y` on `x` over one window.
    pub fn from_sums(s: &WindowSums) -> Self {
        if s.n == 0 {
            return Self::IDENTITY;
        }

        // Scaled by n to stay in integers: var = n*Sxx - Sx^2, cov = n*Sxy - Sx*Sy.
        let n = s.n as i128;
        let var = n * s.xx as i128 - (s.x as i128) * (s.x as i128);
        let cov = n * s.xy as i128 - (s.x as i128) * (s.y as i128);

        let mean_y = s.y as f64 / s.n as f64;
        if var <= 0 || cov <= 0 {
            return Self {
                slope: 0.0,
                intercept: mean_y,
            };
        }

        let slope = cov as f64 / var as f64;
        let intercept = (s.y as f64 - slope * s.x as f64) / s.n as f64;
        Self { slope, intercept }
    }

    /// Maps `x` and rounds into `[0, max]`.
    #[inline]
    pub fn apply(&self, x: u32, max: u32) -> u32 {
        let v = self.slope * x as f64 + self.intercept;
        if v.is_nan() || v <= 0.0 {
            return 0;
        }
        v.round().min(max as f64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::LinearFit;
    use crate::moments::{integrate, window};

    fn fit(x: &[u32], y: &[u32]) -> LinearFit {
        let mut table = Vec::new();
        integrate(x, y, &mut table);
        LinearFit::from_sums(&window(&table, 0, x.len() - 1))
    }

    #[test]
    fn recovers_exact_affine_relation() {
        let x = [10u32, 20, 30, 40, 50];
        let y: Vec<u32> = x.iter().map(|&v| 2 * v + 5).collect();
        let f = fit(&x, &y);
        assert!((f.slope - 2.0).abs() < 1e-12);
        assert!((f.intercept - 5.0).abs() < 1e-9);
        assert_eq!(f.apply(30, 255), 65);
    }

    #[test]
    fn flat_bad_line_maps_to_good_mean() {
        let f = fit(&[0, 0, 0, 0], &[100, 100, 104, 96]);
        assert_eq!(f.slope, 0.0);
        assert_eq!(f.apply(0, 255), 100);
    }

    #[test]
    fn anti_correlated_window_is_not_inverted() {
        let f = fit(&[1, 2, 3, 4], &[40, 30, 20, 10]);
        assert_eq!(f.slope, 0.0);
        assert_eq!(f.apply(1, 255), 25);
        assert_eq!(f.apply(4, 255), 25);
    }

    #[test]
    fn output_is_clamped_to_depth() {
        let f = LinearFit {
            slope: 4.0,
            intercept: -100.0,
        };
        assert_eq!(f.apply(10, 255), 0);
        assert_eq!(f.apply(200, 255), 255);
        assert_eq!(f.apply(300, 1023), 1023);
        assert_eq!(f.apply(60_000, 65535), 65535);
    }
}
