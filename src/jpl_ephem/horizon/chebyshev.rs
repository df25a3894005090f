//! Chebyshev series evaluation.
//!
//! Each component of a stored target is a truncated series
//! `f(t) = Σ cₖ·Tₖ(t)` over a sub-interval mapped to `t ∈ [-1, 1]`.
//! The basis is built with the forward recurrences
//!
//! ```text
//! T₀ = 1,  T₁ = t,  Tₙ = 2t·Tₙ₋₁ − Tₙ₋₂
//! T'₀ = 0, T'₁ = 1, T'ₙ = 2t·T'ₙ₋₁ + 2·Tₙ₋₁ − T'ₙ₋₂
//! ```
//!
//! and applied to every component of the sub-interval, so the basis of a
//! 3-component target is computed once. Derivatives are returned with respect
//! to the normalised time `t`; [`super::horizon_records::HorizonRecord`]
//! rescales them to days.

/// Chebyshev basis `Tₖ(t)` (and optionally `T'ₖ(t)`) up to a fixed degree.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevBasis {
    values: Vec<f64>,
    derivatives: Option<Vec<f64>>,
}

impl ChebyshevBasis {
    /// Build the basis for `n_coeffs` terms at normalised time `t`.
    ///
    /// Arguments
    /// -----------------
    /// * `t` — Normalised time ∈ \[-1, 1\].
    /// * `n_coeffs` — Number of series terms (degree + 1).
    /// * `with_derivative` — Also build `T'ₖ(t)`.
    pub fn new(t: f64, n_coeffs: usize, with_derivative: bool) -> Self {
        let mut values = vec![0.0; n_coeffs];
        if n_coeffs > 0 {
            values[0] = 1.0;
        }
        if n_coeffs > 1 {
            values[1] = t;
        }
        let twot = t + t;
        for i in 2..n_coeffs {
            values[i] = twot * values[i - 1] - values[i - 2];
        }

        let derivatives = with_derivative.then(|| {
            let mut deriv = vec![0.0; n_coeffs];
            if n_coeffs > 1 {
                deriv[1] = 1.0;
            }
            for i in 2..n_coeffs {
                deriv[i] = twot * deriv[i - 1] + 2.0 * values[i - 1] - deriv[i - 2];
            }
            deriv
        });

        ChebyshevBasis {
            values,
            derivatives,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `Σ cₖ·Tₖ(t)`, summed from the highest degree down.
    pub fn value(&self, coeffs: &[f64]) -> f64 {
        dot_reversed(coeffs, &self.values)
    }

    /// `Σ cₖ·T'ₖ(t)`, or `None` when the basis was built without derivatives.
    pub fn derivative(&self, coeffs: &[f64]) -> Option<f64> {
        self.derivatives
            .as_ref()
            .map(|deriv| dot_reversed(coeffs, deriv))
    }
}

/// Small terms first: the high-degree coefficients are orders of magnitude
/// below `c₀`.
fn dot_reversed(coeffs: &[f64], basis: &[f64]) -> f64 {
    coeffs
        .iter()
        .zip(basis.iter())
        .rev()
        .fold(0.0, |acc, (c, b)| acc + c * b)
}

/// Evaluate one Chebyshev series at normalised time `t`.
///
/// Return
/// ----------
/// * `(value, derivative)` where the derivative is with respect to `t` and is
///   present only when `want_derivative` is set. A single coefficient gives a
///   constant value and a zero derivative; an empty series evaluates to zero.
pub fn evaluate(coeffs: &[f64], t: f64, want_derivative: bool) -> (f64, Option<f64>) {
    let basis = ChebyshevBasis::new(t, coeffs.len(), want_derivative);
    (basis.value(coeffs), basis.derivative(coeffs))
}

#[cfg(test)]
mod test_chebyshev {
    use super::*;
    use approx::assert_relative_eq;

    // p(t) = 3 − 2t + 0.5t² + 4t³ written in the Chebyshev basis:
    // t² = (T₀ + T₂)/2, t³ = (3T₁ + T₃)/4
    const POLY_CHEB: [f64; 4] = [3.25, 1.0, 0.25, 1.0];

    fn poly(t: f64) -> f64 {
        3.0 - 2.0 * t + 0.5 * t * t + 4.0 * t * t * t
    }

    fn poly_deriv(t: f64) -> f64 {
        -2.0 + t + 12.0 * t * t
    }

    #[test]
    fn test_known_polynomial() {
        for i in 0..=20 {
            let t = -1.0 + i as f64 * 0.1;
            let (value, deriv) = evaluate(&POLY_CHEB, t, true);
            assert_relative_eq!(value, poly(t), max_relative = 1e-13, epsilon = 1e-14);
            assert_relative_eq!(
                deriv.unwrap(),
                poly_deriv(t),
                max_relative = 1e-13,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_basis_matches_closed_form() {
        let t = 0.37;
        let basis = ChebyshevBasis::new(t, 6, true);
        let t2 = 2.0 * t * t - 1.0;
        let t3 = 4.0 * t.powi(3) - 3.0 * t;
        let t5 = 16.0 * t.powi(5) - 20.0 * t.powi(3) + 5.0 * t;
        assert_relative_eq!(basis.values[2], t2, max_relative = 1e-15);
        assert_relative_eq!(basis.values[3], t3, max_relative = 1e-15);
        assert_relative_eq!(basis.values[5], t5, max_relative = 1e-14);

        let deriv = basis.derivatives.as_ref().unwrap();
        assert_relative_eq!(deriv[2], 4.0 * t, max_relative = 1e-15);
        assert_relative_eq!(deriv[3], 12.0 * t * t - 3.0, max_relative = 1e-15);
    }

    #[test]
    fn test_endpoints() {
        // Tₙ(1) = 1, Tₙ(-1) = (-1)ⁿ, T'ₙ(1) = n²
        let coeffs = [0.0, 0.0, 0.0, 0.0, 1.0];
        let (v, d) = evaluate(&coeffs, 1.0, true);
        assert_eq!(v, 1.0);
        assert_eq!(d, Some(16.0));
        let (v, _) = evaluate(&coeffs, -1.0, false);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_single_coefficient() {
        let (v, d) = evaluate(&[42.5], 0.3, true);
        assert_eq!(v, 42.5);
        assert_eq!(d, Some(0.0));
    }

    #[test]
    fn test_two_coefficients() {
        let (v, d) = evaluate(&[1.0, 2.0], -0.5, true);
        assert_eq!(v, 0.0);
        assert_eq!(d, Some(2.0));
    }

    #[test]
    fn test_empty_series() {
        let (v, d) = evaluate(&[], 0.3, true);
        assert_eq!(v, 0.0);
        assert_eq!(d, Some(0.0));
        assert!(ChebyshevBasis::new(0.3, 0, false).is_empty());
    }

    #[test]
    fn test_no_derivative_requested() {
        let basis = ChebyshevBasis::new(0.1, 5, false);
        assert_eq!(basis.derivative(&[1.0, 2.0, 3.0, 4.0, 5.0]), None);
        assert_eq!(basis.len(), 5);
    }
}
