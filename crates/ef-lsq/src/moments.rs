/// Running sums over a pair of lines, `x` (bad) and `y` (good).
///
/// Entry `k` of a prefix table holds the sums over samples `[0, k)`, so any
/// window `[l, r]` is `table[r + 1] - table[l]`. With 16-bit samples a single
/// product is below `2^32`, so `u64` holds lines of up to `2^32` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Moments {
    pub x: u64,
    pub y: u64,
    pub xx: u64,
    pub xy: u64,
}

/// Sums over one closed window of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSums {
    pub n: u64,
    pub x: u64,
    pub y: u64,
    pub xx: u64,
    pub xy: u64,
}

/// Fills `table` with `x.len() + 1` prefix entries.
pub fn integrate(x: &[u32], y: &[u32], table: &mut Vec<Moments>) {
    debug_assert_eq!(x.len(), y.len());

    table.clear();
    let mut acc = Moments::default();
    table.push(acc);
    for (&xi, &yi) in x.iter().zip(y) {
        let (xi, yi) = (xi as u64, yi as u64);
        acc.x += xi;
        acc.y += yi;
        acc.xx += xi * xi;
        acc.xy += xi * yi;
        table.push(acc);
    }
}

/// Sums over samples `[l, r]` (inclusive).
#[inline]
pub fn window(table: &[Moments], l: usize, r: usize) -> WindowSums {
    debug_assert!(l <= r && r + 1 < table.len());
    let hi = table[r + 1];
    let lo = table[l];
    WindowSums {
        n: (r + 1 - l) as u64,
        x: hi.x - lo.x,
        y: hi.y - lo.y,
        xx: hi.xx - lo.xx,
        xy: hi.xy - lo.xy,
    }
}
