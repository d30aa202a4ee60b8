//! Bisection bracketing on a strictly increasing grid.

/// The interval of a grid that encloses a query value, plus linear blend weights.
///
/// `a` weights `grid[lo]` and `b` weights `grid[hi]`; `a + b == 1`. Values of
/// `x` outside the grid are not clamped: the outermost interval is returned
/// and `a`, `b` fall outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: usize,
    pub hi: usize,
    pub a: f64,
    pub b: f64,
    pub h: f64,
}

impl Bracket {
    /// Locate `x` in `grid` by bisection.
    ///
    /// # Panics
    ///
    /// If `grid` has fewer than two points.
    pub fn locate(x: f64, grid: &[f64]) -> Self {
        assert!(
            grid.len() >= 2,
            "bracketing needs at least 2 grid points, got {}",
            grid.len()
        );

        let mut lo = 0;
        let mut hi = grid.len() - 1;
        while hi - lo > 1 {
            let mid = (hi + lo) >> 1;
            if grid[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = grid[hi] - grid[lo];
        Self {
            lo,
            hi,
            a: (grid[hi] - x) / h,
            b: (x - grid[lo]) / h,
            h,
        }
    }
}
