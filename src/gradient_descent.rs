use crate::{Error, FnObjective, ObjectiveTrait, Point, Result, Solution, StepRule, StopRule, run};

/// Gradient descent with a fixed learning rate
///
/// ```text
/// p_{i+1} = p_i - η ∇f(p_i)
/// ```
///
/// Performs exactly `max_iterations` steps; there is no convergence test and no divergence
/// guard. A step size that makes |η ∇f| grow produces a diverging trajectory, which is
/// recorded as is.
#[derive(Clone, Debug)]
pub struct GradientDescent<O> {
    objective: O,
    step_size: f64,
    max_iterations: usize,
}

impl<O> GradientDescent<O> {
    /// Allocates a new instance
    ///
    /// # Parameters
    ///
    /// * `objective` - the function to minimize
    /// * `step_size` - learning rate (η); must be finite
    /// * `max_iterations` - number of steps
    pub fn new(objective: O, step_size: f64, max_iterations: usize) -> Result<Self> {
        if !step_size.is_finite() {
            return Err(Error::InvalidParameter(format!("step size must be finite, got {}", step_size)));
        }
        Ok(GradientDescent {
            objective,
            step_size,
            max_iterations,
        })
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Runs all iterations from the start point
    pub fn minimize<P>(&self, start: P) -> Solution<P>
    where
        P: Point,
        O: ObjectiveTrait<P>,
    {
        run(self, start)
    }
}

impl GradientDescent<()> {
    /// Minimizes a function given as value and gradient closures
    pub fn minimize_with_fn<P, F, G>(
        start: P,
        step_size: f64,
        max_iterations: usize,
        value_fn: F,
        gradient_fn: G,
    ) -> Result<Solution<P>>
    where
        P: Point,
        F: Fn(&P) -> f64,
        G: Fn(&P) -> P,
    {
        let objective = FnObjective::new("closure", value_fn, gradient_fn);
        let solver = GradientDescent::new(objective, step_size, max_iterations)?;
        Ok(solver.minimize(start))
    }
}

impl<P: Point, O: ObjectiveTrait<P>> StepRule<P> for GradientDescent<O> {
    fn name(&self) -> &'static str {
        "gradient descent"
    }

    fn step(&self, p: &P) -> Result<P> {
        let grad = self.objective.gradient(p)?;
        Ok(p.descend(&grad, self.step_size))
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn stop_rule(&self) -> StopRule {
        StopRule::FixedCount
    }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Termination, objective_1d, objective_2d};
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let objective = objective_1d("x^2").unwrap();
        assert_eq!(
            GradientDescent::new(objective, f64::NAN, 10).err(),
            Some(Error::InvalidParameter("step size must be finite, got NaN".to_string()))
        );
    }

    #[test]
    fn minimize_works_1d() {
        // x_{i+1} = x_i - 0.1 * 2 x_i = 0.8 x_i
        let solver = GradientDescent::new(objective_1d("x^2").unwrap(), 0.1, 3).unwrap();
        let solution = solver.minimize(5.0);
        assert_eq!(solution.termination, Termination::Completed);
        assert_eq!(solution.stop_rule, StopRule::FixedCount);
        let xx = solution.trajectory.points();
        assert_eq!(xx.len(), 4);
        approx_eq(xx[1], 4.0, 1e-15);
        approx_eq(xx[2], 3.2, 1e-14);
        approx_eq(xx[3], 2.56, 1e-14);
    }

    #[test]
    fn minimize_works_2d() {
        let solver = GradientDescent::new(objective_2d("x^2+10y^2").unwrap(), 0.05, 2).unwrap();
        let solution = solver.minimize([1.0, 1.0]);
        let pp = solution.trajectory.points();
        approx_eq(pp[1][0], 0.9, 1e-15);
        approx_eq(pp[1][1], 0.0, 1e-15);
        approx_eq(pp[2][0], 0.81, 1e-14);
        approx_eq(pp[2][1], 0.0, 1e-15);
    }

    #[test]
    fn minimize_with_fn_works() {
        let solution =
            GradientDescent::minimize_with_fn(3.0, 0.25, 2, |x: &f64| (x - 1.0).powi(2), |x: &f64| 2.0 * (x - 1.0))
                .unwrap();
        assert_eq!(solution.trajectory.points(), &[3.0, 2.0, 1.5]);
    }

    #[test]
    fn leaving_the_domain_halts() {
        // ln(x+1.1) has a positive derivative, so the iterates move left past -1.1
        let solver = GradientDescent::new(objective_1d("ln(x+1.1)").unwrap(), 1.0, 10).unwrap();
        let solution = solver.minimize(0.0);
        match solution.termination {
            Termination::Halted { error, .. } => {
                assert!(matches!(error, Error::DomainViolation { .. }))
            }
            Termination::Completed => panic!("run should halt"),
        }
        assert!(solution.trajectory.len() < 11);
    }
}
