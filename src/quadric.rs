use crate::{CutPlane, QuadricKind, StrError};
use plotpy::linspace;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Implements a quadric surface with semi-axes (a, b, c)
///
/// Central quadrics are written as
///
/// ```text
/// σx x²/a² + σy y²/b² + σz z²/c² = k
/// ```
///
/// and paraboloids as
///
/// ```text
/// z/c = σx x²/a² + σy y²/b²
/// ```
///
/// Surfaces are sampled through parametrizations, so no square root of a negative number is
/// ever taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadric {
    kind: QuadricKind,
    a: f64,
    b: f64,
    c: f64,
}

/// Gridded patch of a surface, ready for plotting
#[derive(Clone, Debug)]
pub struct SurfaceMesh {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
}

/// Planar cut of a quadric, in the in-plane coordinates (u, v)
///
/// See [CutPlane::axes] for the meaning of u and v.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Conic {
    /// u²/p² + v²/q² = 1
    Ellipse { p: f64, q: f64 },
    /// u²/p² - v²/q² = 1 if opens_along_u; otherwise v²/q² - u²/p² = 1
    Hyperbola { p: f64, q: f64, opens_along_u: bool },
    /// v = k u²
    Parabola { k: f64 },
    /// v = ±slope u
    LinePair { slope: f64 },
    /// only the origin
    Point,
    /// no real points
    Empty,
}

impl Quadric {
    /// Allocates a new instance
    ///
    /// # Parameters
    ///
    /// * `kind` - kind of surface
    /// * `params` - the positive semi-axes `a`, `b` and `c`
    pub fn new(kind: QuadricKind, params: HashMap<&str, f64>) -> Result<Self, StrError> {
        let a = *params.get("a").ok_or("Parameter 'a' not found")?;
        let b = *params.get("b").ok_or("Parameter 'b' not found")?;
        let c = *params.get("c").ok_or("Parameter 'c' not found")?;
        for value in [a, b, c] {
            if !(value > 0.0 && value.is_finite()) {
                return Err("Parameters 'a', 'b' and 'c' must be positive and finite");
            }
        }
        Ok(Quadric { kind, a, b, c })
    }

    pub fn kind(&self) -> QuadricKind {
        self.kind
    }

    /// Returns a formula describing the surface
    pub fn equation(&self) -> String {
        let (a2, b2, c2) = (self.a * self.a, self.b * self.b, self.c * self.c);
        match self.kind {
            QuadricKind::Ellipsoid => format!("x²/{} + y²/{} + z²/{} = 1", a2, b2, c2),
            QuadricKind::HyperboloidOneSheet => format!("x²/{} + y²/{} - z²/{} = 1", a2, b2, c2),
            QuadricKind::HyperboloidTwoSheets => format!("x²/{} + y²/{} - z²/{} = -1", a2, b2, c2),
            QuadricKind::EllipticCone => format!("x²/{} + y²/{} - z²/{} = 0", a2, b2, c2),
            QuadricKind::EllipticParaboloid => format!("z/{} = x²/{} + y²/{}", self.c, a2, b2),
            QuadricKind::HyperbolicParaboloid => format!("z/{} = x²/{} - y²/{}", self.c, a2, b2),
        }
    }

    /// Calculates the residual of the implicit equation (zero on the surface)
    pub fn implicit(&self, x: f64, y: f64, z: f64) -> f64 {
        let xx = x * x / (self.a * self.a);
        let yy = y * y / (self.b * self.b);
        let zz = z * z / (self.c * self.c);
        match self.kind {
            QuadricKind::Ellipsoid => xx + yy + zz - 1.0,
            QuadricKind::HyperboloidOneSheet => xx + yy - zz - 1.0,
            QuadricKind::HyperboloidTwoSheets => xx + yy - zz + 1.0,
            QuadricKind::EllipticCone => xx + yy - zz,
            QuadricKind::EllipticParaboloid => xx + yy - z / self.c,
            QuadricKind::HyperbolicParaboloid => xx - yy - z / self.c,
        }
    }

    /// Returns the curve obtained by slicing the surface with a coordinate plane
    pub fn cut(&self, plane: CutPlane) -> Conic {
        match self.kind {
            QuadricKind::Ellipsoid => self.central_cut(plane, [1.0, 1.0, 1.0], 1.0),
            QuadricKind::HyperboloidOneSheet => self.central_cut(plane, [1.0, 1.0, -1.0], 1.0),
            QuadricKind::HyperboloidTwoSheets => self.central_cut(plane, [1.0, 1.0, -1.0], -1.0),
            QuadricKind::EllipticCone => self.central_cut(plane, [1.0, 1.0, -1.0], 0.0),
            QuadricKind::EllipticParaboloid => self.paraboloid_cut(plane, 1.0),
            QuadricKind::HyperbolicParaboloid => self.paraboloid_cut(plane, -1.0),
        }
    }

    /// Samples the surface as one or more gridded patches
    ///
    /// `extent` bounds the unbounded surfaces: |z| ≤ extent for the one-sheet hyperboloid, the
    /// cone and the elliptic paraboloid; |z| ≤ max(extent, 2c) for the two-sheet hyperboloid, so
    /// both sheets stay visible; |x|, |y| ≤ extent for the hyperbolic paraboloid.
    ///
    /// Returns an error if `extent` is not positive and finite.
    pub fn surface(&self, n: usize, extent: f64) -> Result<Vec<SurfaceMesh>, StrError> {
        check_extent(extent)?;
        let (a, b, c) = (self.a, self.b, self.c);
        let phi = linspace(0.0, 2.0 * PI, n);
        let patches = match self.kind {
            QuadricKind::Ellipsoid => {
                let theta = linspace(0.0, PI, n);
                vec![mesh(&theta, &phi, |t, p| {
                    [a * t.sin() * p.cos(), b * t.sin() * p.sin(), c * t.cos()]
                })]
            }
            QuadricKind::HyperboloidOneSheet => {
                let umax = f64::asinh(extent / c);
                let u = linspace(-umax, umax, n);
                vec![mesh(&u, &phi, |u, p| {
                    [a * u.cosh() * p.cos(), b * u.cosh() * p.sin(), c * u.sinh()]
                })]
            }
            QuadricKind::HyperboloidTwoSheets => {
                let umax = f64::acosh(f64::max(extent / c, 2.0));
                let u = linspace(0.0, umax, n);
                [1.0, -1.0]
                    .iter()
                    .map(|&sheet| {
                        mesh(&u, &phi, |u, p| {
                            [a * u.sinh() * p.cos(), b * u.sinh() * p.sin(), sheet * c * u.cosh()]
                        })
                    })
                    .collect()
            }
            QuadricKind::EllipticCone => {
                let v = linspace(-extent / c, extent / c, n);
                vec![mesh(&v, &phi, |v, p| [a * v * p.cos(), b * v * p.sin(), c * v])]
            }
            QuadricKind::EllipticParaboloid => {
                let r = linspace(0.0, f64::sqrt(extent / c), n);
                vec![mesh(&r, &phi, |r, p| [a * r * p.cos(), b * r * p.sin(), c * r * r])]
            }
            QuadricKind::HyperbolicParaboloid => {
                let s = linspace(-extent, extent, n);
                vec![mesh(&s, &s, |x, y| [x, y, c * (x * x / (a * a) - y * y / (b * b))])]
            }
        };
        Ok(patches)
    }

    /// Cut of σx x²/a² + σy y²/b² + σz z²/c² = k
    fn central_cut(&self, plane: CutPlane, signs: [f64; 3], k: f64) -> Conic {
        let ((su, p), (sv, q)) = match plane {
            CutPlane::X0 => ((signs[1], self.b), (signs[2], self.c)),
            CutPlane::Y0 => ((signs[0], self.a), (signs[2], self.c)),
            CutPlane::Z0 => ((signs[0], self.a), (signs[1], self.b)),
        };
        if k == 0.0 {
            return if su == sv { Conic::Point } else { Conic::LinePair { slope: q / p } };
        }
        // normalize to a right-hand side of +1
        let (su, sv) = if k < 0.0 { (-su, -sv) } else { (su, sv) };
        match (su > 0.0, sv > 0.0) {
            (true, true) => Conic::Ellipse { p, q },
            (false, false) => Conic::Empty,
            (true, false) => Conic::Hyperbola {
                p,
                q,
                opens_along_u: true,
            },
            (false, true) => Conic::Hyperbola {
                p,
                q,
                opens_along_u: false,
            },
        }
    }

    /// Cut of z/c = x²/a² + σy y²/b²
    fn paraboloid_cut(&self, plane: CutPlane, sigma_y: f64) -> Conic {
        match plane {
            CutPlane::X0 => Conic::Parabola {
                k: sigma_y * self.c / (self.b * self.b),
            },
            CutPlane::Y0 => Conic::Parabola {
                k: self.c / (self.a * self.a),
            },
            CutPlane::Z0 => {
                if sigma_y > 0.0 {
                    Conic::Point
                } else {
                    Conic::LinePair { slope: self.b / self.a }
                }
            }
        }
    }
}

impl Conic {
    /// Returns a short description
    pub fn name(&self) -> &'static str {
        match self {
            Conic::Ellipse { .. } => "ellipse",
            Conic::Hyperbola { .. } => "hyperbola",
            Conic::Parabola { .. } => "parabola",
            Conic::LinePair { .. } => "pair of lines",
            Conic::Point => "point",
            Conic::Empty => "empty",
        }
    }

    /// Samples the conic as polylines of (u, v) points with |u|, |v| ≲ extent
    pub fn sample(&self, n: usize, extent: f64) -> Result<Vec<Vec<[f64; 2]>>, StrError> {
        check_extent(extent)?;
        let polylines = match *self {
            Conic::Ellipse { p, q } => {
                vec![linspace(0.0, 2.0 * PI, n).iter().map(|t| [p * t.cos(), q * t.sin()]).collect()]
            }
            Conic::Hyperbola { p, q, opens_along_u } => {
                let tmax = if opens_along_u { f64::asinh(extent / q) } else { f64::asinh(extent / p) };
                let t = linspace(-tmax, tmax, n);
                [1.0, -1.0]
                    .iter()
                    .map(|&branch| {
                        t.iter()
                            .map(|t| {
                                if opens_along_u {
                                    [branch * p * t.cosh(), q * t.sinh()]
                                } else {
                                    [p * t.sinh(), branch * q * t.cosh()]
                                }
                            })
                            .collect()
                    })
                    .collect()
            }
            Conic::Parabola { k } => {
                let umax = f64::min(extent, f64::sqrt(extent / f64::abs(k)));
                vec![linspace(-umax, umax, n).iter().map(|&u| [u, k * u * u]).collect()]
            }
            Conic::LinePair { slope } => {
                let umax = f64::min(extent, extent / slope);
                [1.0, -1.0]
                    .iter()
                    .map(|&sign| vec![[-umax, -sign * slope * umax], [umax, sign * slope * umax]])
                    .collect()
            }
            Conic::Point => vec![vec![[0.0, 0.0]]],
            Conic::Empty => Vec::new(),
        };
        Ok(polylines)
    }
}

fn check_extent(extent: f64) -> Result<(), StrError> {
    if !(extent > 0.0 && extent.is_finite()) {
        return Err("The extent must be positive and finite");
    }
    Ok(())
}

/// Maps in-plane coordinates (u, v) back to 3-D
pub fn embed(plane: CutPlane, u: f64, v: f64) -> [f64; 3] {
    match plane {
        CutPlane::X0 => [0.0, u, v],
        CutPlane::Y0 => [u, 0.0, v],
        CutPlane::Z0 => [u, v, 0.0],
    }
}

fn mesh<F>(s: &[f64], t: &[f64], point: F) -> SurfaceMesh
where
    F: Fn(f64, f64) -> [f64; 3],
{
    let mut x = vec![vec![0.0; t.len()]; s.len()];
    let mut y = vec![vec![0.0; t.len()]; s.len()];
    let mut z = vec![vec![0.0; t.len()]; s.len()];
    for (i, &si) in s.iter().enumerate() {
        for (j, &tj) in t.iter().enumerate() {
            let [px, py, pz] = point(si, tj);
            x[i][j] = px;
            y[i][j] = py;
            z[i][j] = pz;
        }
    }
    SurfaceMesh { x, y, z }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use russell_lab::approx_eq;

    fn quadric(kind: QuadricKind) -> Quadric {
        Quadric::new(kind, HashMap::from([("a", 2.0), ("b", 1.5), ("c", 0.5)])).unwrap()
    }

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Quadric::new(QuadricKind::Ellipsoid, HashMap::from([("a", 1.0), ("b", 1.0)])).err(),
            Some("Parameter 'c' not found")
        );
        assert_eq!(
            Quadric::new(QuadricKind::Ellipsoid, HashMap::from([("a", 1.0), ("b", 0.0), ("c", 1.0)])).err(),
            Some("Parameters 'a', 'b' and 'c' must be positive and finite")
        );
    }

    #[test]
    fn cut_classifies_conics() {
        assert_eq!(
            quadric(QuadricKind::Ellipsoid).cut(CutPlane::Z0),
            Conic::Ellipse { p: 2.0, q: 1.5 }
        );
        assert_eq!(
            quadric(QuadricKind::HyperboloidOneSheet).cut(CutPlane::X0),
            Conic::Hyperbola {
                p: 1.5,
                q: 0.5,
                opens_along_u: true
            }
        );
        assert_eq!(quadric(QuadricKind::HyperboloidTwoSheets).cut(CutPlane::Z0), Conic::Empty);
        assert_eq!(
            quadric(QuadricKind::HyperboloidTwoSheets).cut(CutPlane::Y0),
            Conic::Hyperbola {
                p: 2.0,
                q: 0.5,
                opens_along_u: false
            }
        );
        assert_eq!(quadric(QuadricKind::EllipticCone).cut(CutPlane::Z0), Conic::Point);
        assert_eq!(
            quadric(QuadricKind::EllipticCone).cut(CutPlane::Y0),
            Conic::LinePair { slope: 0.25 }
        );
        assert_eq!(
            quadric(QuadricKind::HyperbolicParaboloid).cut(CutPlane::Z0),
            Conic::LinePair { slope: 0.75 }
        );
        assert_eq!(
            quadric(QuadricKind::EllipticParaboloid).cut(CutPlane::X0),
            Conic::Parabola { k: 0.5 / 2.25 }
        );
        assert_eq!(
            quadric(QuadricKind::HyperbolicParaboloid).cut(CutPlane::X0),
            Conic::Parabola { k: -0.5 / 2.25 }
        );
    }

    #[test]
    fn cut_samples_lie_on_the_surface() {
        for kind in QuadricKind::ALL {
            let surface = quadric(kind);
            for plane in CutPlane::ALL {
                for polyline in surface.cut(plane).sample(21, 3.0).unwrap() {
                    for [u, v] in polyline {
                        let [x, y, z] = embed(plane, u, v);
                        approx_eq(surface.implicit(x, y, z), 0.0, 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn surface_samples_lie_on_the_surface() {
        for kind in QuadricKind::ALL {
            let surface = quadric(kind);
            let patches = surface.surface(11, 2.0).unwrap();
            let expected = if kind == QuadricKind::HyperboloidTwoSheets { 2 } else { 1 };
            assert_eq!(patches.len(), expected);
            for patch in &patches {
                assert_eq!(patch.x.len(), 11);
                for i in 0..11 {
                    for j in 0..11 {
                        let r = surface.implicit(patch.x[i][j], patch.y[i][j], patch.z[i][j]);
                        approx_eq(r, 0.0, 1e-10);
                    }
                }
            }
        }
    }

    #[test]
    fn sample_counts_work() {
        assert_eq!(Conic::Ellipse { p: 1.0, q: 1.0 }.sample(10, 1.0).unwrap()[0].len(), 10);
        assert_eq!(Conic::LinePair { slope: 1.0 }.sample(10, 1.0).unwrap().len(), 2);
        assert_eq!(Conic::Point.sample(10, 1.0).unwrap(), vec![vec![[0.0, 0.0]]]);
        assert!(Conic::Empty.sample(10, 1.0).unwrap().is_empty());
        assert_eq!(Conic::Empty.name(), "empty");
    }

    #[test]
    fn extent_is_checked() {
        let surface = quadric(QuadricKind::HyperboloidTwoSheets);
        for extent in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                surface.surface(11, extent).err(),
                Some("The extent must be positive and finite")
            );
            assert!(surface.cut(CutPlane::X0).sample(11, extent).is_err());
        }

        // the two-sheet hyperboloid reaches |z| = 2c even for a small extent
        let c = surface.c;
        let patches = surface.surface(11, 0.5).unwrap();
        let zmax = patches[0].z.iter().flatten().fold(0.0, |acc: f64, z| acc.max(z.abs()));
        approx_eq(zmax, 2.0 * c, 1e-12);
    }
}
