use crate::{Error, ObjectiveTrait, Result};
use plotpy::linspace;

/// Real domain of a function of one variable
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Domain {
    /// All real numbers
    Real,
    /// x > bound
    GreaterThan(f64),
    /// x ≥ bound
    AtLeast(f64),
}

impl Domain {
    /// Returns true if x belongs to the domain
    pub fn contains(&self, x: f64) -> bool {
        match self {
            Domain::Real => true,
            Domain::GreaterThan(bound) => x > *bound,
            Domain::AtLeast(bound) => x >= *bound,
        }
    }

    /// Restricts the interval [xmin, xmax] to the domain
    ///
    /// Open bounds are pulled in by 0.1% of the interval width.
    /// Returns None if nothing of the interval lies in the domain.
    pub fn clip(&self, xmin: f64, xmax: f64) -> Option<(f64, f64)> {
        let lower = match self {
            Domain::Real => xmin,
            Domain::GreaterThan(bound) => f64::max(xmin, bound + 1e-3 * f64::abs(xmax - xmin)),
            Domain::AtLeast(bound) => f64::max(xmin, *bound),
        };
        if lower > xmax || (lower == xmax && !self.contains(xmax)) {
            None
        } else {
            Some((lower, xmax))
        }
    }
}

/// Function of one variable in the objective registry
pub struct Objective1d {
    /// registry key
    pub key: &'static str,
    /// human-readable formula
    pub label: &'static str,
    /// default plotting interval
    pub plot_range: (f64, f64),
    f: fn(f64) -> f64,
    df: fn(f64) -> f64,
    antiderivative: fn(f64) -> f64,
    domain: Domain,
    derivative_domain: Domain,
}

/// Function of two variables in the objective registry
pub struct Objective2d {
    /// registry key
    pub key: &'static str,
    /// human-readable formula
    pub label: &'static str,
    /// default plotting rectangle (xmin, xmax, ymin, ymax)
    pub plot_range: [f64; 4],
    f: fn(&[f64; 2]) -> f64,
    grad: fn(&[f64; 2]) -> [f64; 2],
}

impl Objective1d {
    /// Returns the domain of f
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the domain of f'
    pub fn derivative_domain(&self) -> Domain {
        self.derivative_domain
    }

    /// Calculates f(x)
    pub fn value(&self, x: f64) -> Result<f64> {
        if !self.domain.contains(x) {
            return Err(self.violation(x));
        }
        Ok((self.f)(x))
    }

    /// Calculates f'(x)
    pub fn derivative(&self, x: f64) -> Result<f64> {
        if !self.derivative_domain.contains(x) {
            return Err(self.violation(x));
        }
        Ok((self.df)(x))
    }

    /// Calculates the exact integral of f over [a, b]
    pub fn integral(&self, a: f64, b: f64) -> Result<f64> {
        for x in [a, b] {
            if !self.domain.contains(x) {
                return Err(self.violation(x));
            }
        }
        Ok((self.antiderivative)(b) - (self.antiderivative)(a))
    }

    /// Samples the curve y = f(x) on [xmin, xmax] restricted to the domain
    pub fn sample(&self, xmin: f64, xmax: f64, count: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        let (lower, upper) = self.domain.clip(xmin, xmax).ok_or_else(|| {
            Error::InvalidParameter(format!("[{}, {}] lies outside the domain of {}", xmin, xmax, self.key))
        })?;
        let xx = linspace(lower, upper, count);
        let yy = xx.iter().map(|&x| self.value(x)).collect::<Result<Vec<_>>>()?;
        Ok((xx, yy))
    }

    fn violation(&self, x: f64) -> Error {
        Error::DomainViolation {
            objective: self.key,
            at: format!("x = {}", x),
        }
    }
}

impl Objective2d {
    /// Calculates f(x, y)
    pub fn value(&self, p: &[f64; 2]) -> f64 {
        (self.f)(p)
    }

    /// Calculates ∇f(x, y)
    pub fn gradient(&self, p: &[f64; 2]) -> [f64; 2] {
        (self.grad)(p)
    }
}

impl ObjectiveTrait<f64> for Objective1d {
    fn name(&self) -> &str {
        self.key
    }

    fn value(&self, p: &f64) -> Result<f64> {
        Objective1d::value(self, *p)
    }

    fn gradient(&self, p: &f64) -> Result<f64> {
        self.derivative(*p)
    }
}

impl ObjectiveTrait<[f64; 2]> for Objective2d {
    fn name(&self) -> &str {
        self.key
    }

    fn value(&self, p: &[f64; 2]) -> Result<f64> {
        Ok(Objective2d::value(self, p))
    }

    fn gradient(&self, p: &[f64; 2]) -> Result<[f64; 2]> {
        Ok(Objective2d::gradient(self, p))
    }
}

/// Looks up a function of one variable by key
pub fn objective_1d(key: &str) -> Result<&'static Objective1d> {
    OBJECTIVES_1D
        .iter()
        .find(|o| o.key == key)
        .ok_or_else(|| Error::UnknownObjective(key.to_string()))
}

/// Looks up a function of two variables by key
pub fn objective_2d(key: &str) -> Result<&'static Objective2d> {
    OBJECTIVES_2D
        .iter()
        .find(|o| o.key == key)
        .ok_or_else(|| Error::UnknownObjective(key.to_string()))
}

// registry //////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Functions of one variable
pub static OBJECTIVES_1D: [Objective1d; 8] = [
    Objective1d {
        key: "x^2",
        label: "f(x) = x²",
        plot_range: (-10.0, 10.0),
        f: |x| x * x,
        df: |x| 2.0 * x,
        antiderivative: |x| x * x * x / 3.0,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
    Objective1d {
        key: "x^4-3x^3+2",
        label: "f(x) = x⁴ - 3x³ + 2",
        plot_range: (-1.5, 3.5),
        f: |x| x.powi(4) - 3.0 * x.powi(3) + 2.0,
        df: |x| 4.0 * x.powi(3) - 9.0 * x * x,
        antiderivative: |x| x.powi(5) / 5.0 - 0.75 * x.powi(4) + 2.0 * x,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
    Objective1d {
        key: "sin(x)+0.1x^2",
        label: "f(x) = sin(x) + 0.1x²",
        plot_range: (-10.0, 10.0),
        f: |x| f64::sin(x) + 0.1 * x * x,
        df: |x| f64::cos(x) + 0.2 * x,
        antiderivative: |x| -f64::cos(x) + x.powi(3) / 30.0,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
    Objective1d {
        key: "cos(x)",
        label: "f(x) = cos(x)",
        plot_range: (-6.5, 6.5),
        f: f64::cos,
        df: |x| -f64::sin(x),
        antiderivative: f64::sin,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
    Objective1d {
        key: "exp(x)",
        label: "f(x) = eˣ",
        plot_range: (-3.0, 3.0),
        f: f64::exp,
        df: f64::exp,
        antiderivative: f64::exp,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
    Objective1d {
        key: "ln(x+1.1)",
        label: "f(x) = ln(x + 1.1)",
        plot_range: (-1.0, 5.0),
        f: |x| f64::ln(x + 1.1),
        df: |x| 1.0 / (x + 1.1),
        antiderivative: |x| (x + 1.1) * f64::ln(x + 1.1) - x,
        domain: Domain::GreaterThan(-1.1),
        derivative_domain: Domain::GreaterThan(-1.1),
    },
    Objective1d {
        key: "sqrt(x)",
        label: "f(x) = √x",
        plot_range: (0.0, 9.0),
        f: f64::sqrt,
        df: |x| 0.5 / f64::sqrt(x),
        antiderivative: |x| 2.0 * x * f64::sqrt(x) / 3.0,
        domain: Domain::AtLeast(0.0),
        derivative_domain: Domain::GreaterThan(0.0),
    },
    Objective1d {
        key: "x^3-2x-5",
        label: "f(x) = x³ - 2x - 5",
        plot_range: (-3.0, 7.0),
        f: |x| x.powi(3) - 2.0 * x - 5.0,
        df: |x| 3.0 * x * x - 2.0,
        antiderivative: |x| 0.25 * x.powi(4) - x * x - 5.0 * x,
        domain: Domain::Real,
        derivative_domain: Domain::Real,
    },
];

/// Functions of two variables
pub static OBJECTIVES_2D: [Objective2d; 5] = [
    Objective2d {
        key: "x^2+y^2",
        label: "f(x, y) = x² + y²",
        plot_range: [-5.0, 5.0, -5.0, 5.0],
        f: |p| p[0] * p[0] + p[1] * p[1],
        grad: |p| [2.0 * p[0], 2.0 * p[1]],
    },
    Objective2d {
        key: "x^2+10y^2",
        label: "f(x, y) = x² + 10y²",
        plot_range: [-5.0, 5.0, -5.0, 5.0],
        f: |p| p[0] * p[0] + 10.0 * p[1] * p[1],
        grad: |p| [2.0 * p[0], 20.0 * p[1]],
    },
    Objective2d {
        key: "rosenbrock",
        label: "f(x, y) = (1 - x)² + 100(y - x²)²",
        plot_range: [-2.0, 2.0, -1.0, 3.0],
        f: |p| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2),
        grad: |p| {
            let r = p[1] - p[0] * p[0];
            [-2.0 * (1.0 - p[0]) - 400.0 * p[0] * r, 200.0 * r]
        },
    },
    Objective2d {
        key: "himmelblau",
        label: "f(x, y) = (x² + y - 11)² + (x + y² - 7)²",
        plot_range: [-5.0, 5.0, -5.0, 5.0],
        f: |p| (p[0] * p[0] + p[1] - 11.0).powi(2) + (p[0] + p[1] * p[1] - 7.0).powi(2),
        grad: |p| {
            let u = p[0] * p[0] + p[1] - 11.0;
            let v = p[0] + p[1] * p[1] - 7.0;
            [4.0 * p[0] * u + 2.0 * v, 2.0 * u + 4.0 * p[1] * v]
        },
    },
    Objective2d {
        key: "sin(x)cos(y)",
        label: "f(x, y) = sin(x) cos(y)",
        plot_range: [-3.2, 3.2, -3.2, 3.2],
        f: |p| f64::sin(p[0]) * f64::cos(p[1]),
        grad: |p| [f64::cos(p[0]) * f64::cos(p[1]), -f64::sin(p[0]) * f64::sin(p[1])],
    },
];

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
