//! Interactive demonstrations of introductory numerical methods
//!
//! * gradient descent on 1-D and 2-D objectives ([GradientDescent], [StepSession])
//! * Newton-Raphson root finding on typed expressions ([NewtonRaphson], [Expression])
//! * Riemann sums ([riemann_sum])
//! * quadric surfaces and their planar cuts ([Quadric])
//!
//! Plots are produced by the [render] module.

pub type StrError = &'static str;

pub mod enums;
mod error;
mod expression;
mod gradient_descent;
mod newton_raphson;
mod objective;
mod objective_trait;
mod point;
mod quadric;
pub mod render;
mod riemann;
mod session;
mod solution;
mod step_rule;

pub use enums::*;
pub use error::*;
pub use expression::*;
pub use gradient_descent::*;
pub use newton_raphson::*;
pub use objective::*;
pub use objective_trait::*;
pub use point::*;
pub use quadric::*;
pub use riemann::*;
pub use session::*;
pub use solution::*;
pub use step_rule::*;
