//! Natural cubic spline (Press et al., Numerical Recipes, "spline"/"splint").

use super::bracket::Bracket;

/// A natural cubic spline through tabulated points.
///
/// Fitting stores the second derivative at every node; evaluation brackets
/// the abscissa and applies the cubic with curvature corrections.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    y2: Vec<f64>,
}

/// Spline value and its first two derivatives at one abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplinePoint {
    pub value: f64,
    pub first_derivative: f64,
    pub second_derivative: f64,
}

impl CubicSpline {
    /// Fit a natural spline (zero second derivative at both ends).
    ///
    /// # Panics
    ///
    /// If `x` and `y` differ in length, have fewer than 3 points, or `x` is
    /// not strictly increasing.
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len(), "spline abscissae and ordinates differ in length");
        assert!(x.len() >= 3, "spline fit needs at least 3 points, got {}", x.len());
        assert!(
            x.windows(2).all(|w| w[1] > w[0]),
            "spline abscissae must be strictly increasing"
        );

        let n = x.len();
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];

        // decomposition sweep of the tridiagonal system
        for i in 1..n - 1 {
            let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            let slope_change =
                (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
            u[i] = (6.0 * slope_change / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        }

        // back substitution
        y2[n - 1] = 0.0;
        for k in (0..n - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            y2,
        }
    }

    /// Evaluate value, first and second derivative at `x0`.
    pub fn evaluate(&self, x0: f64) -> SplinePoint {
        let Bracket { lo, hi, a, b, h } = Bracket::locate(x0, &self.x);
        let (y, y2) = (&self.y, &self.y2);

        let value = a * y[lo]
            + b * y[hi]
            + (a * (a * a - 1.0) * y2[lo] + b * (b * b - 1.0) * y2[hi]) * (h * h) / 6.0;
        let first_derivative = (y[hi] - y[lo]) / h
            + ((3.0 * b * b - 1.0) * y2[hi] - (3.0 * a * a - 1.0) * y2[lo]) * h / 6.0;
        let second_derivative = a * y2[lo] + b * y2[hi];

        SplinePoint {
            value,
            first_derivative,
            second_derivative,
        }
    }

    /// Second derivatives at the nodes.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.y2
    }
}
