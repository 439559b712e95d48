//! Natural cubic spline through tabulated points.
//!
//! Reference tables (branching ratios, running masses) are sampled on a mass
//! grid; the workspace needs them as smooth functions of `MH`. We use the
//! classic natural cubic spline (second derivative zero at both ends):
//!
//! ```text
//! S(x) = A y_i + B y_{i+1} + ((A³ - A) M_i + (B³ - B) M_{i+1}) h_i² / 6
//! A = (x_{i+1} - x) / h_i,  B = 1 - A
//! ```
//!
//! The second derivatives `M_i` come from a small tridiagonal system, solved
//! once at construction. Queries outside the tabulated range are clamped to the
//! nearest endpoint value.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Interpolating natural cubic spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the nodes.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build a spline through `(x[i], y[i])`.
    ///
    /// Requires at least two nodes, finite values and strictly increasing `x`.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        check_nodes(&x, &y)?;
        let m = second_derivatives(&x, &y)?;
        Ok(Self { x, y, m })
    }

    /// Re-check a spline that did not come through [`CubicSpline::new`].
    pub fn validate(&self) -> Result<()> {
        check_nodes(&self.x, &self.y)?;
        if self.m.len() != self.x.len() || self.m.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Expression(format!(
                "spline needs one finite second derivative per node (got {} for {} nodes)",
                self.m.len(),
                self.x.len()
            )));
        }
        Ok(())
    }

    /// Evaluate the spline at `xq`.
    pub fn eval(&self, xq: f64) -> f64 {
        let n = self.x.len();
        if xq <= self.x[0] {
            return self.y[0];
        }
        if xq >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = self.x.partition_point(|v| *v <= xq).saturating_sub(1).min(n - 2);
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - xq) / h;
        let b = 1.0 - a;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// Tabulated abscissas.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Tabulated ordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }
}

fn check_nodes(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(ModelError::Expression(format!(
            "spline needs as many x as y values (got {} and {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(ModelError::Expression("spline needs at least two nodes".into()));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ModelError::Expression("spline nodes must be finite".into()));
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ModelError::Expression("spline x values must be strictly increasing".into()));
    }
    Ok(())
}

fn second_derivatives(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return Ok(m);
    }

    // Interior unknowns M_1..M_{n-2}; M_0 = M_{n-1} = 0.
    let k = n - 2;
    let mut a = DMatrix::<f64>::zeros(k, k);
    let mut rhs = DVector::<f64>::zeros(k);
    for row in 0..k {
        let i = row + 1;
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        if row > 0 {
            a[(row, row - 1)] = h0;
        }
        a[(row, row)] = 2.0 * (h0 + h1);
        if row + 1 < k {
            a[(row, row + 1)] = h1;
        }
        rhs[row] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
    }

    let solved = a
        .lu()
        .solve(&rhs)
        .ok_or_else(|| ModelError::Expression("singular spline system".into()))?;
    m[1..=k].copy_from_slice(solved.as_slice());
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_nodes() {
        let s = CubicSpline::new(vec![120.0, 122.5, 125.0, 127.5, 130.0], vec![2.9, 2.85, 2.8, 2.78, 2.75])
            .unwrap();
        for (x, y) in s.x().iter().zip(s.y()) {
            assert!((s.eval(*x) - y).abs() < 1e-12);
        }
    }

    #[test]
    fn linear_data_is_exact_between_nodes() {
        let s = CubicSpline::new(vec![0.0, 1.0, 3.0, 4.0], vec![1.0, 3.0, 7.0, 9.0]).unwrap();
        assert!((s.eval(2.0) - 5.0).abs() < 1e-12);
        assert!((s.eval(0.25) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_range() {
        let s = CubicSpline::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 15.0]).unwrap();
        assert_eq!(s.eval(0.0), 10.0);
        assert_eq!(s.eval(9.0), 15.0);
    }

    #[test]
    fn rejects_unsorted_nodes() {
        assert!(CubicSpline::new(vec![1.0, 1.0], vec![0.0, 1.0]).is_err());
        assert!(CubicSpline::new(vec![1.0], vec![0.0]).is_err());
    }

    #[test]
    fn validate_catches_inconsistent_derivatives() {
        let good = CubicSpline::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 15.0]).unwrap();
        assert!(good.validate().is_ok());

        let truncated = CubicSpline {
            m: vec![0.0],
            ..good.clone()
        };
        assert!(matches!(truncated.validate(), Err(ModelError::Expression(_))));

        let empty = CubicSpline {
            x: Vec::new(),
            y: Vec::new(),
            m: Vec::new(),
        };
        assert!(matches!(empty.validate(), Err(ModelError::Expression(_))));
    }
}
