use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Sample placement for a Riemann sum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiemannRule {
    /// Left edges: a, a+dx, ..., b-dx
    Left,
    /// Right edges: a+dx, ..., b
    Right,
    /// Midpoints: a+dx/2, ..., b-dx/2
    Midpoint,
}

/// Coordinate plane used to slice a quadric surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutPlane {
    X0,
    Y0,
    Z0,
}

/// Kind of quadric surface
///
/// ```text
/// Ellipsoid                x²/a² + y²/b² + z²/c² = 1
/// HyperboloidOneSheet      x²/a² + y²/b² - z²/c² = 1
/// HyperboloidTwoSheets     x²/a² + y²/b² - z²/c² = -1
/// EllipticCone             x²/a² + y²/b² - z²/c² = 0
/// EllipticParaboloid       z/c = x²/a² + y²/b²
/// HyperbolicParaboloid     z/c = x²/a² - y²/b²
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadricKind {
    Ellipsoid,
    HyperboloidOneSheet,
    HyperboloidTwoSheets,
    EllipticCone,
    EllipticParaboloid,
    HyperbolicParaboloid,
}

/// Condition that ends an iterative solver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopRule {
    /// Runs exactly max_iterations steps
    FixedCount,
    /// Runs up to max_iterations steps; stops on a zero derivative
    ZeroDerivativeGuard,
}

/// How Newton-Raphson decides that a derivative is zero
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DerivativeGuard {
    /// Only f'(x) == 0.0 stops the method (division by zero)
    ExactZero,
    /// |f'(x)| <= tolerance stops the method
    Tolerance(f64),
}

impl RiemannRule {
    pub const ALL: [RiemannRule; 3] = [RiemannRule::Left, RiemannRule::Right, RiemannRule::Midpoint];

    /// Returns the offset of the sample point within a sub-interval, as a fraction of dx
    pub fn offset(&self) -> f64 {
        match self {
            RiemannRule::Left => 0.0,
            RiemannRule::Right => 1.0,
            RiemannRule::Midpoint => 0.5,
        }
    }
}

impl CutPlane {
    pub const ALL: [CutPlane; 3] = [CutPlane::X0, CutPlane::Y0, CutPlane::Z0];

    /// Returns the labels of the two in-plane coordinates (horizontal, vertical)
    pub fn axes(&self) -> (&'static str, &'static str) {
        match self {
            CutPlane::X0 => ("y", "z"),
            CutPlane::Y0 => ("x", "z"),
            CutPlane::Z0 => ("x", "y"),
        }
    }
}

impl QuadricKind {
    pub const ALL: [QuadricKind; 6] = [
        QuadricKind::Ellipsoid,
        QuadricKind::HyperboloidOneSheet,
        QuadricKind::HyperboloidTwoSheets,
        QuadricKind::EllipticCone,
        QuadricKind::EllipticParaboloid,
        QuadricKind::HyperbolicParaboloid,
    ];

    /// Returns the key used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            QuadricKind::Ellipsoid => "ellipsoid",
            QuadricKind::HyperboloidOneSheet => "hyperboloid1",
            QuadricKind::HyperboloidTwoSheets => "hyperboloid2",
            QuadricKind::EllipticCone => "cone",
            QuadricKind::EllipticParaboloid => "elliptic-paraboloid",
            QuadricKind::HyperbolicParaboloid => "hyperbolic-paraboloid",
        }
    }
}

impl fmt::Display for RiemannRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiemannRule::Left => "left",
            RiemannRule::Right => "right",
            RiemannRule::Midpoint => "midpoint",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for CutPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CutPlane::X0 => "x=0",
            CutPlane::Y0 => "y=0",
            CutPlane::Z0 => "z=0",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for QuadricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for RiemannRule {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(RiemannRule::Left),
            "right" | "r" => Ok(RiemannRule::Right),
            "midpoint" | "mid" | "m" => Ok(RiemannRule::Midpoint),
            _ => Err(Error::InvalidParameter(format!("unknown Riemann rule '{}'", s))),
        }
    }
}

impl FromStr for CutPlane {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "x=0" | "x0" => Ok(CutPlane::X0),
            "y" | "y=0" | "y0" => Ok(CutPlane::Y0),
            "z" | "z=0" | "z0" => Ok(CutPlane::Z0),
            _ => Err(Error::InvalidParameter(format!("unknown cut plane '{}'", s))),
        }
    }
}

impl FromStr for QuadricKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase();
        QuadricKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown quadric '{}'", s)))
    }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
