use crate::{Error, Result, RiemannRule};

/// Riemann-sum approximation of a definite integral
///
/// ```text
///        n-1
/// S = dx  Σ  f(a + (i + θ) dx)     dx = (b - a) / n
///        i=0
/// ```
///
/// with θ = 0 (left), 1 (right) or ½ (midpoint). The left rule never samples b and the right
/// rule never samples a.
#[derive(Clone, Debug, PartialEq)]
pub struct RiemannSum {
    pub rule: RiemannRule,
    pub a: f64,
    pub b: f64,
    pub n: usize,
    pub dx: f64,
    /// sample abscissae, one per sub-interval
    pub samples: Vec<f64>,
    /// f evaluated at the samples (rectangle heights)
    pub heights: Vec<f64>,
    pub total: f64,
}

impl RiemannSum {
    /// Returns the rectangles as (x_left, x_right, height)
    pub fn rectangles(&self) -> Vec<(f64, f64, f64)> {
        self.heights
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let x_left = self.a + (i as f64) * self.dx;
                (x_left, x_left + self.dx, h)
            })
            .collect()
    }
}

/// Returns the sample points of a Riemann sum
pub fn riemann_samples(a: f64, b: f64, n: usize, rule: RiemannRule) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(Error::InvalidParameter("the number of sub-intervals must be positive".to_string()));
    }
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::InvalidParameter(format!("bounds must be finite, got [{}, {}]", a, b)));
    }
    let dx = (b - a) / (n as f64);
    let theta = rule.offset();
    Ok((0..n).map(|i| a + (i as f64 + theta) * dx).collect())
}

/// Calculates the Riemann sum of f over [a, b] with n sub-intervals
///
/// `b < a` gives the signed integral. Errors from f (e.g. domain violations) are propagated.
pub fn riemann_sum<F>(a: f64, b: f64, n: usize, rule: RiemannRule, mut f: F) -> Result<RiemannSum>
where
    F: FnMut(f64) -> Result<f64>,
{
    let samples = riemann_samples(a, b, n, rule)?;
    let heights = samples.iter().map(|&x| f(x)).collect::<Result<Vec<_>>>()?;
    let dx = (b - a) / (n as f64);
    let total = dx * heights.iter().sum::<f64>();
    Ok(RiemannSum {
        rule,
        a,
        b,
        n,
        dx,
        samples,
        heights,
        total,
    })
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective_1d;
    use russell_lab::approx_eq;

    #[test]
    fn riemann_samples_captures_errors() {
        assert_eq!(
            riemann_samples(0.0, 1.0, 0, RiemannRule::Left).err(),
            Some(Error::InvalidParameter("the number of sub-intervals must be positive".to_string()))
        );
        assert!(riemann_samples(0.0, f64::INFINITY, 4, RiemannRule::Left).is_err());
    }

    #[test]
    fn riemann_sum_works() {
        // ∫₀² x dx = 2; left underestimates, right overestimates, midpoint is exact
        let left = riemann_sum(0.0, 2.0, 4, RiemannRule::Left, |x| Ok(x)).unwrap();
        let right = riemann_sum(0.0, 2.0, 4, RiemannRule::Right, |x| Ok(x)).unwrap();
        let mid = riemann_sum(0.0, 2.0, 4, RiemannRule::Midpoint, |x| Ok(x)).unwrap();
        approx_eq(left.total, 1.5, 1e-15);
        approx_eq(right.total, 2.5, 1e-15);
        approx_eq(mid.total, 2.0, 1e-15);
        assert_eq!(left.dx, 0.5);
        assert_eq!(left.rectangles()[3], (1.5, 2.0, 1.5));
    }

    #[test]
    fn reversed_bounds_give_signed_integral() {
        let sum = riemann_sum(1.0, 0.0, 100, RiemannRule::Midpoint, |_| Ok(3.0)).unwrap();
        approx_eq(sum.total, -3.0, 1e-14);
    }

    #[test]
    fn domain_violations_are_propagated() {
        let sqrt = objective_1d("sqrt(x)").unwrap();
        assert!(riemann_sum(-1.0, 1.0, 4, RiemannRule::Left, |x| sqrt.value(x)).is_err());
        assert!(riemann_sum(0.0, 1.0, 4, RiemannRule::Left, |x| sqrt.value(x)).is_ok());
    }
}
