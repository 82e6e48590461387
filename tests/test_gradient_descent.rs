use numdemo::{GradientDescent, OBJECTIVES_1D, OBJECTIVES_2D, Termination, objective_1d, objective_2d, render};
use russell_lab::approx_eq;

const SAVE_FIGURE: bool = false;

#[test]
fn test_trajectory_length() {
    for max_iterations in [0, 1, 10, 50] {
        // functions of one variable, starting inside the domain
        for objective in &OBJECTIVES_1D {
            let x0 = objective.plot_range.1 - 0.5;
            let solution = GradientDescent::new(objective, 0.01, max_iterations).unwrap().minimize(x0);
            assert_eq!(solution.termination, Termination::Completed, "{}", objective.key);
            assert_eq!(solution.trajectory.len(), max_iterations + 1);
            assert_eq!(solution.trajectory.first(), Some(&x0));
        }

        // functions of two variables
        for objective in &OBJECTIVES_2D {
            let solution = GradientDescent::new(objective, 0.001, max_iterations).unwrap().minimize([0.5, 0.5]);
            assert_eq!(solution.trajectory.len(), max_iterations + 1);
        }
    }
}

#[test]
fn test_quadratic_regimes() {
    // x_{i+1} = (1 - 2η) x_i
    let objective = objective_1d("x^2").unwrap();
    let x0 = 5.0;

    // 0 < η < 1: |x| decreases monotonically
    for step_size in [0.05, 0.1, 0.3, 0.7, 0.95] {
        let solution = GradientDescent::new(objective, step_size, 20).unwrap().minimize(x0);
        let xx = solution.trajectory.points();
        for i in 1..xx.len() {
            assert!(f64::abs(xx[i]) < f64::abs(xx[i - 1]));
        }
    }

    // η = 1: x flips sign with constant magnitude
    let solution = GradientDescent::new(objective, 1.0, 10).unwrap().minimize(x0);
    let xx = solution.trajectory.points();
    for i in 1..xx.len() {
        assert_eq!(xx[i], -xx[i - 1]);
        assert_eq!(f64::abs(xx[i]), x0);
    }

    // η > 1: |x| increases strictly
    for step_size in [1.01, 1.5, 3.0] {
        let solution = GradientDescent::new(objective, step_size, 20).unwrap().minimize(x0);
        let xx = solution.trajectory.points();
        for i in 1..xx.len() {
            assert!(f64::abs(xx[i]) > f64::abs(xx[i - 1]));
        }
    }
}

#[test]
fn test_overflow_is_recorded() {
    // the iterates grow past f64::MAX and then become NaN; the run keeps its length
    let objective = objective_1d("x^2").unwrap();
    let solution = GradientDescent::new(objective, 1e200, 5).unwrap().minimize(5.0);
    assert_eq!(solution.termination, Termination::Completed);
    assert_eq!(solution.trajectory.len(), 6);
    assert_eq!(solution.trajectory.finite_points().len(), 2);
}

#[test]
fn test_descent_2d() {
    // elongated bowl: y converges faster than x with η = 0.04
    let objective = objective_2d("x^2+10y^2").unwrap();
    let solution = GradientDescent::new(objective, 0.04, 30).unwrap().minimize([4.0, 4.0]);
    let last = solution.last().unwrap();
    approx_eq(last[0], 4.0 * f64::powi(0.92, 30), 1e-12);
    approx_eq(last[1], 4.0 * f64::powi(0.2, 30), 1e-12);

    if SAVE_FIGURE {
        render::gradient_descent_2d_contour(objective, &solution, objective.plot_range)
            .save("/tmp/numdemo/test_descent_2d_contour.svg")
            .unwrap();
        render::gradient_descent_2d_surface(objective, &solution, objective.plot_range)
            .save("/tmp/numdemo/test_descent_2d_surface.svg")
            .unwrap();
    }
}

#[test]
fn test_descent_1d_table() {
    let objective = objective_1d("x^2").unwrap();
    let solution = GradientDescent::new(objective, 0.1, 2).unwrap().minimize(5.0);
    assert_eq!(
        solution.table(&objective),
        "Iteration 0: x = 5.0000, f(x) = 25.0000\n\
         Iteration 1: x = 4.0000, f(x) = 16.0000\n\
         Iteration 2: x = 3.2000, f(x) = 10.2400\n"
    );

    if SAVE_FIGURE {
        render::gradient_descent_1d(objective, &solution, objective.plot_range)
            .unwrap()
            .save("/tmp/numdemo/test_descent_1d.svg")
            .unwrap();
    }
}
