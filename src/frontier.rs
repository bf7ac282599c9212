//! Least-squares polynomial fit of the frontier and its uniform sampling.

use ndarray::{Array1, Array2, ArrayView1};
use thiserror::Error;
use tracing::debug;

use crate::dataset::AnchorPoint;

/// Reasons a polynomial cannot be fitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    /// Fewer points than free coefficients.
    #[error("{points} points cannot determine a polynomial of degree {degree}")]
    Underdetermined { points: usize, degree: usize },
    #[error("the data contains NaN or infinite values")]
    NonFinite,
    /// The normal equations have no unique solution (e.g. repeated `x`).
    #[error("the least-squares system is singular")]
    Singular,
}

/// A polynomial with real coefficients stored by ascending power.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Array1<f64>,
}

impl Polynomial {
    /// Return the polynomial of degree `degree` minimizing the squared
    /// residuals on the points (`x[i]`, `y[i]`).  When there are exactly
    /// `degree + 1` distinct abscissas, the polynomial interpolates them.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self, FitError> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch { x: x.len(), y: y.len() })
        }
        if x.len() <= degree {
            return Err(FitError::Underdetermined { points: x.len(), degree })
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite)
        }
        // Vandermonde matrix, column j holds x^j.
        let v = Array2::from_shape_fn((x.len(), degree + 1),
                                      |(i, j)| x[i].powi(j as i32));
        let vt = v.t();
        let coeffs = solve(vt.dot(&v), vt.dot(&ArrayView1::from(y)))?;
        Ok(Polynomial { coeffs })
    }

    /// Evaluate the polynomial at `x` (Horner's rule).
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0., |acc, &c| acc * x + c)
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Coefficients, constant term first.
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coeffs.view()
    }
}

/// Solve the square system `a c = b` by Gaussian elimination with
/// partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>)
         -> Result<Array1<f64>, FitError> {
    let n = b.len();
    let scale = a.iter().fold(0., |m: f64, v| m.max(v.abs()));
    let tol = scale * n as f64 * f64::EPSILON;
    for k in 0 .. n {
        let p = (k .. n)
            .max_by(|&i, &j| a[[i, k]].abs().total_cmp(&a[[j, k]].abs()))
            .unwrap_or(k);
        if !(a[[p, k]].abs() > tol) {
            return Err(FitError::Singular)
        }
        if p != k {
            for j in 0 .. n {
                a.swap([k, j], [p, j]);
            }
            b.swap(k, p);
        }
        for i in k + 1 .. n {
            let f = a[[i, k]] / a[[k, k]];
            for j in k .. n {
                let akj = a[[k, j]];
                a[[i, j]] -= f * akj;
            }
            let bk = b[k];
            b[i] -= f * bk;
        }
    }
    let mut c = Array1::zeros(n);
    for k in (0 .. n).rev() {
        let s: f64 = (k + 1 .. n).map(|j| a[[k, j]] * c[j]).sum();
        c[k] = (b[k] - s) / a[[k, k]];
    }
    Ok(c)
}

/// Return `n` evenly spaced values from `a` to `b`, both included.
/// The last value is exactly `b`.
pub fn linspace(a: f64, b: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, a),
        _ => {
            let step = (b - a) / (n - 1) as f64;
            Array1::from_shape_fn(n, |i| {
                if i == n - 1 { b } else { a + step * i as f64 } })
        }
    }
}

/// Points of a curve, in increasing `x` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Samples {
    pub fn x(&self) -> &[f64] { &self.x }

    pub fn y(&self) -> &[f64] { &self.y }

    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Cubic through the anchor points, the best achievable outcome per
/// cost along the task drift axis.
///
/// The curve only has a meaning on [`FrontierCurve::DOMAIN`].
#[derive(Debug, Clone)]
pub struct FrontierCurve {
    poly: Polynomial,
}

impl FrontierCurve {
    pub const DEGREE: usize = 3;
    pub const DOMAIN: (f64, f64) = (0., 1.);

    pub fn fit(anchors: &[AnchorPoint]) -> Result<Self, FitError> {
        let x: Vec<f64> = anchors.iter().map(|p| p.x).collect();
        let y: Vec<f64> = anchors.iter().map(|p| p.y).collect();
        let poly = Polynomial::fit(&x, &y, Self::DEGREE)?;
        debug!(coefficients = ?poly.coefficients().to_vec(), "fitted frontier");
        Ok(FrontierCurve { poly })
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.poly.eval(x)
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.poly
    }

    /// Evaluate the curve at `n` evenly spaced points covering the
    /// whole domain.
    pub fn sample(&self, n: usize) -> Samples {
        let (a, b) = Self::DOMAIN;
        let x = linspace(a, b, n);
        let y = x.mapv(|x| self.poly.eval(x));
        debug!(n, "sampled frontier");
        Samples { x: x.into_raw_vec(), y: y.into_raw_vec() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ANCHORS;

    #[test]
    fn interpolates_anchors() -> Result<(), FitError> {
        let curve = FrontierCurve::fit(&ANCHORS)?;
        assert_eq!(curve.polynomial().degree(), 3);
        for p in &ANCHORS {
            assert!((curve.value_at(p.x) - p.y).abs() < 1e-6,
                    "f({}) = {} ≠ {}", p.x, curve.value_at(p.x), p.y);
        }
        Ok(())
    }

    #[test]
    fn worked_example() -> Result<(), FitError> {
        let x = [0.05, 0.35, 0.55, 0.85];
        let y = [1.25, 0.90, 0.72, 0.68];
        let p = Polynomial::fit(&x, &y, 3)?;
        assert!((p.eval(0.05) - 1.25).abs() < 1e-6);
        assert!((p.eval(0.85) - 0.68).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn recovers_cubic_from_overdetermined_data() -> Result<(), FitError> {
        let f = |x: f64| 1. - 2. * x + 0.5 * x.powi(3);
        let x: Vec<f64> = (0 .. 7).map(|i| i as f64 / 6.).collect();
        let y: Vec<f64> = x.iter().map(|&x| f(x)).collect();
        let p = Polynomial::fit(&x, &y, 3)?;
        for (c, e) in p.coefficients().iter().zip([1., -2., 0., 0.5]) {
            assert!((c - e).abs() < 1e-9, "{c} ≠ {e}");
        }
        Ok(())
    }

    #[test]
    fn line_through_noisy_points() -> Result<(), FitError> {
        // Residuals ±0.1 symmetric around y = x.
        let p = Polynomial::fit(&[0., 1., 2., 3.], &[0.1, 0.9, 2.1, 2.9], 1)?;
        assert!((p.eval(1.5) - 1.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn fit_errors() {
        assert_eq!(Polynomial::fit(&[0., 1., 2.], &[1., 2., 3.], 3),
                   Err(FitError::Underdetermined { points: 3, degree: 3 }));
        assert_eq!(Polynomial::fit(&[0., 1.], &[1.], 1),
                   Err(FitError::LengthMismatch { x: 2, y: 1 }));
        assert_eq!(Polynomial::fit(&[0., f64::NAN], &[1., 2.], 1),
                   Err(FitError::NonFinite));
        assert_eq!(Polynomial::fit(&[0.5; 4], &[1., 2., 3., 4.], 3),
                   Err(FitError::Singular));
    }

    #[test]
    fn sample_covers_domain() -> Result<(), FitError> {
        let s = FrontierCurve::fit(&ANCHORS)?.sample(400);
        assert_eq!(s.len(), 400);
        assert_eq!(s.x()[0], 0.);
        assert_eq!(s.x()[399], 1.);
        assert!(s.x().windows(2).all(|w| w[0] < w[1]));
        assert!(s.y().iter().all(|y| y.is_finite()));
        Ok(())
    }

    #[test]
    fn logs_plain_coefficients() -> Result<(), FitError> {
        use std::{io, sync::{Arc, Mutex}};

        #[derive(Clone)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Buffer {
            fn write(&mut self, b: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(b);
                Ok(b.len())
            }
            fn flush(&mut self) -> io::Result<()> { Ok(()) }
        }

        let buf = Buffer(Arc::new(Mutex::new(Vec::new())));
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber,
                                          || FrontierCurve::fit(&ANCHORS))?;
        let out = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
        assert!(out.contains("fitted frontier"), "{out}");
        assert!(out.contains("coefficients=["), "{out}");
        assert!(!out.contains("shape="), "{out}");
        Ok(())
    }

    #[test]
    fn linspace_small() {
        assert!(linspace(0., 1., 0).is_empty());
        assert_eq!(linspace(2., 3., 1).to_vec(), vec![2.]);
        assert_eq!(linspace(0., 1., 5).to_vec(), vec![0., 0.25, 0.5, 0.75, 1.]);
    }
}
