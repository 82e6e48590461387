use crate::{DerivativeGuard, Error, ObjectiveTrait, Result, Solution, StepRule, StopRule, run};

/// Newton-Raphson root finding
///
/// ```text
/// x_{i+1} = x_i - f(x_i) / f'(x_i)
/// ```
///
/// Performs up to `max_iterations` steps and stops at the first zero derivative.
/// With [DerivativeGuard::ExactZero] only f'(x) == 0.0 stops the method, so a tiny but
/// nonzero derivative sends the next iterate far away.
#[derive(Clone, Debug)]
pub struct NewtonRaphson<F> {
    function: F,
    max_iterations: usize,
    guard: DerivativeGuard,
}

impl<F: ObjectiveTrait<f64>> NewtonRaphson<F> {
    /// Allocates a new instance with the exact-zero guard
    pub fn new(function: F, max_iterations: usize) -> Self {
        NewtonRaphson {
            function,
            max_iterations,
            guard: DerivativeGuard::ExactZero,
        }
    }

    /// Sets the zero-derivative guard
    pub fn set_guard(&mut self, guard: DerivativeGuard) -> Result<&mut Self> {
        if let DerivativeGuard::Tolerance(tolerance) = guard {
            if !(tolerance >= 0.0 && tolerance.is_finite()) {
                return Err(Error::InvalidParameter(format!(
                    "derivative tolerance must be finite and non-negative, got {}",
                    tolerance
                )));
            }
        }
        self.guard = guard;
        Ok(self)
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    /// Runs the iterations from the initial guess
    pub fn solve(&self, x0: f64) -> Solution<f64> {
        run(self, x0)
    }

    /// Returns the end points of the tangent line at x spanning [x - half_width, x + half_width]
    pub fn tangent_at(&self, x: f64, half_width: f64) -> Result<([f64; 2], [f64; 2])> {
        let fx = self.function.value(&x)?;
        let slope = self.function.gradient(&x)?;
        Ok((
            [x - half_width, fx - slope * half_width],
            [x + half_width, fx + slope * half_width],
        ))
    }

    fn is_zero(&self, derivative: f64) -> bool {
        match self.guard {
            DerivativeGuard::ExactZero => derivative == 0.0,
            DerivativeGuard::Tolerance(tolerance) => f64::abs(derivative) <= tolerance,
        }
    }
}

impl<F: ObjectiveTrait<f64>> StepRule<f64> for NewtonRaphson<F> {
    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }

    fn step(&self, x: &f64) -> Result<f64> {
        let fx = self.function.value(x)?;
        let dfx = self.function.gradient(x)?;
        if self.is_zero(dfx) {
            return Err(Error::ZeroDerivative { x: *x });
        }
        Ok(x - fx / dfx)
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn stop_rule(&self) -> StopRule {
        StopRule::ZeroDerivativeGuard
    }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
