//! Builds plotpy figures for the demonstrations
//!
//! Nothing is written to disk here; call `Plot::save` on the returned figure.
//! Trajectory points that are not finite are skipped.

use crate::{
    Conic, CutPlane, NewtonRaphson, Objective1d, Objective2d, ObjectiveTrait, Quadric, Result, RiemannSum, Solution,
    embed,
};
use plotpy::{Contour, Curve, Plot, Surface, Text, generate3d, linspace};

const CURVE_POINTS: usize = 201;
const GRID_POINTS: usize = 61;
const SURFACE_POINTS: usize = 41;
const CUT_POINTS: usize = 201;
const TANGENT_HALF_WIDTH: f64 = 1.0;

/// Draws f(x) with the gradient-descent iterates as labelled red markers
pub fn gradient_descent_1d(objective: &Objective1d, solution: &Solution<f64>, range: (f64, f64)) -> Result<Plot> {
    let (xx, yy) = objective.sample(range.0, range.1, CURVE_POINTS)?;
    let mut curve = Curve::new();
    curve.set_label(objective.label).draw(&xx, &yy);

    let mut plot = Plot::new();
    plot.add(&curve);
    add_iterates(&mut plot, objective, solution, "", true);
    plot.set_title(&format!("Gradient descent on {}", objective.label))
        .grid_labels_legend("x", "f(x)");
    Ok(plot)
}

/// Draws filled contours of f(x, y) with the descent path on top
pub fn gradient_descent_2d_contour(objective: &Objective2d, solution: &Solution<[f64; 2]>, range: [f64; 4]) -> Plot {
    let (x, y, z) = generate3d(range[0], range[1], range[2], range[3], GRID_POINTS, GRID_POINTS, |x, y| {
        objective.value(&[x, y])
    });
    let mut contour = Contour::new();
    contour.set_colormap_name("viridis").draw(&x, &y, &z);

    let (xs, ys): (Vec<f64>, Vec<f64>) = solution.trajectory.finite_points().iter().map(|(_, p)| (p[0], p[1])).unzip();
    let mut path = Curve::new();
    path.set_label("iterates")
        .set_line_color("red")
        .set_marker_style("o")
        .set_marker_color("red")
        .draw(&xs, &ys);

    let mut plot = Plot::new();
    plot.add(&contour)
        .add(&path)
        .set_title(&format!("Gradient descent on {}", objective.label))
        .grid_labels_legend("x", "y");
    plot
}

/// Draws the surface z = f(x, y) with the descent path lifted onto it
pub fn gradient_descent_2d_surface(objective: &Objective2d, solution: &Solution<[f64; 2]>, range: [f64; 4]) -> Plot {
    let (x, y, z) = generate3d(
        range[0],
        range[1],
        range[2],
        range[3],
        SURFACE_POINTS,
        SURFACE_POINTS,
        |x, y| objective.value(&[x, y]),
    );
    let mut surface = Surface::new();
    surface.set_colormap_name("viridis").draw(&x, &y, &z);

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for (_, p) in solution.trajectory.finite_points() {
        let value = objective.value(&p);
        if value.is_finite() {
            xs.push(p[0]);
            ys.push(p[1]);
            zs.push(value);
        }
    }
    let mut path = Curve::new();
    path.set_line_color("red").set_marker_style("o").set_marker_color("red");
    path.draw_3d(&xs, &ys, &zs);

    let mut plot = Plot::new();
    plot.add(&surface)
        .add(&path)
        .set_title(&format!("Gradient descent on {}", objective.label));
    plot
}

/// Draws f(x) and the rectangles of a Riemann sum
pub fn riemann(objective: &Objective1d, sum: &RiemannSum) -> Result<Plot> {
    let (lower, upper) = if sum.a <= sum.b { (sum.a, sum.b) } else { (sum.b, sum.a) };
    let (xx, yy) = objective.sample(lower, upper, CURVE_POINTS)?;
    let mut curve = Curve::new();
    curve.set_label(objective.label).draw(&xx, &yy);

    let mut rectangles = Curve::new();
    rectangles.set_line_color("#1f77b4");
    for (x_left, x_right, height) in sum.rectangles() {
        rectangles.draw(
            &vec![x_left, x_left, x_right, x_right, x_left],
            &vec![0.0, height, height, 0.0, 0.0],
        );
    }

    let mut samples = Curve::new();
    samples
        .set_label(&format!("{} samples", sum.rule))
        .set_line_style("None")
        .set_marker_style("o")
        .set_marker_color("red")
        .draw(&sum.samples, &sum.heights);

    let mut plot = Plot::new();
    plot.add(&curve)
        .add(&rectangles)
        .add(&samples)
        .set_title(&format!(
            "{} Riemann sum with n = {}: {:.6}",
            sum.rule, sum.n, sum.total
        ))
        .grid_labels_legend("x", "f(x)");
    Ok(plot)
}

/// Draws f(x), the x axis, the tangent line at each iterate but the last, and the iterates
///
/// Points where f is undefined leave gaps in the curve.
pub fn newton_raphson<F>(solver: &NewtonRaphson<F>, solution: &Solution<f64>, range: (f64, f64)) -> Plot
where
    F: ObjectiveTrait<f64>,
{
    let function = solver.function();
    let xx = linspace(range.0, range.1, CURVE_POINTS);
    let yy: Vec<f64> = xx.iter().map(|x| function.value(x).unwrap_or(f64::NAN)).collect();
    let mut curve = Curve::new();
    curve.set_label("f(x)").draw(&xx, &yy);

    let mut axis = Curve::new();
    axis.set_line_color("black").set_line_width(1.0);
    axis.draw(&vec![range.0, range.1], &vec![0.0, 0.0]);

    // the last iterate gets no tangent
    let steps = solution.iterations();
    let mut tangents = Curve::new();
    tangents.set_line_color("gray").set_line_style("--");
    for (_, x) in solution.trajectory.finite_points().into_iter().filter(|(i, _)| *i < steps) {
        if let Ok((start, end)) = solver.tangent_at(x, TANGENT_HALF_WIDTH) {
            tangents.draw(&vec![start[0], end[0]], &vec![start[1], end[1]]);
        }
    }

    let mut plot = Plot::new();
    plot.add(&curve).add(&axis).add(&tangents);
    add_iterates(&mut plot, function, solution, "x", false);
    plot.set_title(&format!("Newton-Raphson iterations on {}", function.name()))
        .grid_labels_legend("x", "f(x)");
    plot
}

/// Draws the quadric surface with the cut curve drawn on it
pub fn quadric_surface(quadric: &Quadric, plane: CutPlane, extent: f64) -> Result<Plot> {
    let mut plot = Plot::new();
    for mesh in quadric.surface(SURFACE_POINTS, extent)? {
        let mut surface = Surface::new();
        surface.set_colormap_name("coolwarm").draw(&mesh.x, &mesh.y, &mesh.z);
        plot.add(&surface);
    }
    let mut cut = Curve::new();
    cut.set_line_color("black").set_line_width(2.0);
    for polyline in quadric.cut(plane).sample(CUT_POINTS, extent)? {
        let points: Vec<[f64; 3]> = polyline.iter().map(|&[u, v]| embed(plane, u, v)).collect();
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        let zs: Vec<f64> = points.iter().map(|p| p[2]).collect();
        cut.draw_3d(&xs, &ys, &zs);
    }
    plot.add(&cut).set_title(&quadric.equation());
    Ok(plot)
}

/// Draws the planar cut of the quadric in the in-plane coordinates
pub fn quadric_cut(quadric: &Quadric, plane: CutPlane, extent: f64) -> Result<Plot> {
    let conic = quadric.cut(plane);
    let mut curve = Curve::new();
    curve.set_line_color("black").set_line_width(2.0);
    if conic == Conic::Point {
        curve.set_marker_style("o");
    }
    for polyline in conic.sample(CUT_POINTS, extent)? {
        let us: Vec<f64> = polyline.iter().map(|p| p[0]).collect();
        let vs: Vec<f64> = polyline.iter().map(|p| p[1]).collect();
        curve.draw(&us, &vs);
    }
    let (u, v) = plane.axes();
    let mut plot = Plot::new();
    plot.add(&curve)
        .set_title(&format!("{}: {}", plane, conic.name()))
        .set_equal_axes(true)
        .grid_and_labels(u, v);
    Ok(plot)
}

fn add_iterates<F>(plot: &mut Plot, objective: F, solution: &Solution<f64>, prefix: &str, connect: bool)
where
    F: ObjectiveTrait<f64>,
{
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut labels = Text::new();
    for (i, x) in solution.trajectory.finite_points() {
        if let Ok(y) = objective.value(&x) {
            if y.is_finite() {
                xs.push(x);
                ys.push(y);
                labels.draw(x, y, &format!("{}{}", prefix, i));
            }
        }
    }
    let mut markers = Curve::new();
    markers.set_label("iterates").set_line_color("red").set_marker_style("o").set_marker_color("red");
    if !connect {
        markers.set_line_style("None");
    }
    markers.draw(&xs, &ys);
    plot.add(&markers).add(&labels);
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GradientDescent, QuadricKind, RiemannRule, SymbolicFunction, objective_1d, objective_2d, riemann_sum};
    use std::collections::HashMap;

    #[test]
    fn descent_plots_work() {
        let objective = objective_1d("x^2").unwrap();
        let solution = GradientDescent::new(objective, 1e200, 3).unwrap().minimize(5.0);
        // 5, -1e201, inf, NaN
        assert!(!solution.last().unwrap().is_finite());
        assert!(gradient_descent_1d(objective, &solution, objective.plot_range).is_ok());

        let objective = objective_2d("himmelblau").unwrap();
        let solution = GradientDescent::new(objective, 0.01, 20).unwrap().minimize([0.0, 0.0]);
        gradient_descent_2d_contour(objective, &solution, objective.plot_range);
        gradient_descent_2d_surface(objective, &solution, objective.plot_range);
    }

    #[test]
    fn riemann_plot_works() {
        let objective = objective_1d("sqrt(x)").unwrap();
        let sum = riemann_sum(0.0, 4.0, 8, RiemannRule::Right, |x| objective.value(x)).unwrap();
        assert!(riemann(objective, &sum).is_ok());
    }

    #[test]
    fn newton_plot_works() {
        let function = SymbolicFunction::parse("ln(x) - 1").unwrap();
        let solver = NewtonRaphson::new(function, 5);
        let solution = solver.solve(2.0);
        newton_raphson(&solver, &solution, (-1.0, 5.0));
    }

    #[test]
    fn quadric_plots_work() {
        let params = HashMap::from([("a", 1.0), ("b", 2.0), ("c", 1.0)]);
        for kind in QuadricKind::ALL {
            let quadric = Quadric::new(kind, params.clone()).unwrap();
            for plane in CutPlane::ALL {
                assert!(quadric_surface(&quadric, plane, 2.0).is_ok());
                assert!(quadric_cut(&quadric, plane, 2.0).is_ok());
            }
        }
        let quadric = Quadric::new(QuadricKind::EllipticCone, params).unwrap();
        assert!(quadric_surface(&quadric, CutPlane::Z0, f64::NAN).is_err());
        assert!(quadric_cut(&quadric, CutPlane::Z0, -1.0).is_err());
    }
}
