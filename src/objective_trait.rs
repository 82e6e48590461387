use crate::{Point, Result};

/// Scalar function with an exact derivative (1-D) or gradient (2-D)
pub trait ObjectiveTrait<P: Point> {
    /// Returns a short name used in messages
    fn name(&self) -> &str;

    /// Calculates f(p)
    fn value(&self, p: &P) -> Result<f64>;

    /// Calculates f'(p) in 1-D or ∇f(p) in 2-D
    fn gradient(&self, p: &P) -> Result<P>;
}

impl<P: Point, T: ObjectiveTrait<P> + ?Sized> ObjectiveTrait<P> for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn value(&self, p: &P) -> Result<f64> {
        (**self).value(p)
    }

    fn gradient(&self, p: &P) -> Result<P> {
        (**self).gradient(p)
    }
}

/// Wraps a pair of closures as an objective
pub struct FnObjective<F, G> {
    name: &'static str,
    value_fn: F,
    gradient_fn: G,
}

impl<F, G> FnObjective<F, G> {
    /// Allocates a new instance
    pub fn new(name: &'static str, value_fn: F, gradient_fn: G) -> Self {
        FnObjective {
            name,
            value_fn,
            gradient_fn,
        }
    }
}

impl<P, F, G> ObjectiveTrait<P> for FnObjective<F, G>
where
    P: Point,
    F: Fn(&P) -> f64,
    G: Fn(&P) -> P,
{
    fn name(&self) -> &str {
        self.name
    }

    fn value(&self, p: &P) -> Result<f64> {
        Ok((self.value_fn)(p))
    }

    fn gradient(&self, p: &P) -> Result<P> {
        Ok((self.gradient_fn)(p))
    }
}
