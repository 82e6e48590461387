//! numdemo CLI

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use numdemo::render;
use numdemo::{
    Advance, CutPlane, DerivativeGuard, Expression, GradientDescent, NewtonRaphson, OBJECTIVES_1D, OBJECTIVES_2D,
    ObjectiveTrait, Quadric, QuadricKind, RiemannRule, SessionState, Solution, StepSession, SymbolicFunction,
    format_point, objective_1d, objective_2d, riemann_sum,
};
use plotpy::Plot;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "numdemo")]
#[command(about = "Demonstrations of introductory numerical methods")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Contour,
    Surface,
}

#[derive(Subcommand)]
enum Commands {
    /// Gradient descent on a function of one variable
    Descent {
        /// Registry key of the objective (see `numdemo list`)
        #[arg(long, default_value = "x^2")]
        objective: String,

        /// Start point
        #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
        x0: f64,

        /// Learning rate
        #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
        learning_rate: f64,

        /// Number of iterations (0 to 50)
        #[arg(long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(0..=50))]
        iterations: usize,

        /// Save the figure (e.g. descent.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Gradient descent on a function of two variables
    Descent2d {
        /// Registry key of the objective (see `numdemo list`)
        #[arg(long, default_value = "x^2+y^2")]
        objective: String,

        /// Start point, x coordinate
        #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
        x0: f64,

        /// Start point, y coordinate
        #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
        y0: f64,

        /// Learning rate
        #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
        learning_rate: f64,

        /// Number of iterations (0 to 50)
        #[arg(long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(0..=50))]
        iterations: usize,

        /// Figure type
        #[arg(long, value_enum, default_value_t = View::Contour)]
        view: View,

        /// Save the figure (e.g. descent2d.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Riemann-sum approximation of a definite integral
    Riemann {
        /// Registry key of the integrand (see `numdemo list`)
        #[arg(long, default_value = "x^2")]
        objective: String,

        /// Lower bound
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        a: f64,

        /// Upper bound
        #[arg(short, long, default_value_t = 5.0, allow_negative_numbers = true)]
        b: f64,

        /// Number of sub-intervals
        #[arg(short, long, default_value_t = 10)]
        n: usize,

        /// Sample placement: left, right or midpoint
        #[arg(long, default_value = "left")]
        rule: RiemannRule,

        /// Save the figure (e.g. riemann.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Newton-Raphson root finding on a typed function f(x)
    Newton {
        /// Function of x, e.g. "x**3 - 2*x - 5"
        #[arg(long, default_value = "x**3 - 2*x - 5", allow_hyphen_values = true)]
        function: String,

        /// Initial guess
        #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
        x0: f64,

        /// Number of iterations (1 to 10)
        #[arg(long, default_value_t = 5, value_parser = RangedU64ValueParser::<usize>::new().range(1..=10))]
        iterations: usize,

        /// Treat |f'(x)| <= tolerance as a zero derivative
        #[arg(long)]
        tolerance: Option<f64>,

        /// Use a finite-difference derivative instead of the symbolic one
        #[arg(long)]
        numerical: bool,

        /// Save the figure (e.g. newton.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Quadric surface and its cut by a coordinate plane
    Quadric {
        /// ellipsoid, hyperboloid1, hyperboloid2, cone, elliptic-paraboloid or hyperbolic-paraboloid
        #[arg(long, default_value = "ellipsoid")]
        kind: QuadricKind,

        /// Semi-axis along x
        #[arg(short, long, default_value_t = 1.0)]
        a: f64,

        /// Semi-axis along y
        #[arg(short, long, default_value_t = 1.0)]
        b: f64,

        /// Semi-axis along z
        #[arg(short, long, default_value_t = 1.0)]
        c: f64,

        /// Cut plane: x=0, y=0 or z=0
        #[arg(long, default_value = "z=0")]
        cut: CutPlane,

        /// Bound for unbounded surfaces
        #[arg(long, default_value_t = 2.0)]
        extent: f64,

        /// Save the surface figure (e.g. quadric.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the cut figure (e.g. quadric_cut.svg)
        #[arg(long)]
        cut_output: Option<PathBuf>,
    },

    /// Step-by-step gradient descent on a function of two variables (commands from stdin)
    Step {
        /// Registry key of the objective (see `numdemo list`)
        #[arg(long, default_value = "x^2+y^2")]
        objective: String,

        /// Start point, x coordinate
        #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
        x0: f64,

        /// Start point, y coordinate
        #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
        y0: f64,

        /// Learning rate
        #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
        learning_rate: f64,

        /// Maximum number of steps (0 to 50)
        #[arg(long, default_value_t = 20, value_parser = RangedU64ValueParser::<usize>::new().range(0..=50))]
        iterations: usize,

        /// Save the final contour figure (e.g. step.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the registered objectives and quadric kinds
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Descent { objective, x0, learning_rate, iterations, output } => {
            cmd_descent(&objective, x0, learning_rate, iterations, output.as_ref())
        }
        Commands::Descent2d { objective, x0, y0, learning_rate, iterations, view, output } => {
            cmd_descent_2d(&objective, [x0, y0], learning_rate, iterations, view, output.as_ref())
        }
        Commands::Riemann { objective, a, b, n, rule, output } => {
            cmd_riemann(&objective, a, b, n, rule, output.as_ref())
        }
        Commands::Newton { function, x0, iterations, tolerance, numerical, output } => {
            cmd_newton(&function, x0, iterations, tolerance, numerical, output.as_ref())
        }
        Commands::Quadric { kind, a, b, c, cut, extent, output, cut_output } => {
            cmd_quadric(kind, [a, b, c], cut, extent, output.as_ref(), cut_output.as_ref())
        }
        Commands::Step { objective, x0, y0, learning_rate, iterations, output } => {
            cmd_step(&objective, [x0, y0], learning_rate, iterations, output.as_ref())
        }
        Commands::List => cmd_list(),
    }
}

fn cmd_descent(key: &str, x0: f64, learning_rate: f64, iterations: usize, output: Option<&PathBuf>) -> Result<()> {
    let objective = objective_1d(key)?;
    let solver = GradientDescent::new(objective, learning_rate, iterations)?;
    let solution = solver.minimize(x0);
    print_solution(&solution, &objective);
    if let Some(path) = output {
        let plot = render::gradient_descent_1d(objective, &solution, objective.plot_range)?;
        save(&plot, path)?;
    }
    Ok(())
}

fn cmd_descent_2d(
    key: &str,
    start: [f64; 2],
    learning_rate: f64,
    iterations: usize,
    view: View,
    output: Option<&PathBuf>,
) -> Result<()> {
    let objective = objective_2d(key)?;
    let solver = GradientDescent::new(objective, learning_rate, iterations)?;
    let solution = solver.minimize(start);
    print_solution(&solution, &objective);
    if let Some(path) = output {
        let plot = match view {
            View::Contour => render::gradient_descent_2d_contour(objective, &solution, objective.plot_range),
            View::Surface => render::gradient_descent_2d_surface(objective, &solution, objective.plot_range),
        };
        save(&plot, path)?;
    }
    Ok(())
}

fn cmd_riemann(key: &str, a: f64, b: f64, n: usize, rule: RiemannRule, output: Option<&PathBuf>) -> Result<()> {
    let objective = objective_1d(key)?;
    let sum = riemann_sum(a, b, n, rule, |x| objective.value(x))?;
    for (i, (x, y)) in sum.samples.iter().zip(&sum.heights).enumerate() {
        println!("Sample {}: x = {:.4}, f(x) = {:.4}", i, x, y);
    }
    println!("{} Riemann sum with n = {}: {:.6}", rule, n, sum.total);
    match objective.integral(a, b) {
        Ok(exact) => println!("Exact integral: {:.6} (error {:.3e})", exact, sum.total - exact),
        Err(error) => tracing::warn!("exact integral unavailable: {}", error),
    }
    if let Some(path) = output {
        let plot = render::riemann(objective, &sum)?;
        save(&plot, path)?;
    }
    Ok(())
}

fn cmd_newton(
    text: &str,
    x0: f64,
    iterations: usize,
    tolerance: Option<f64>,
    numerical: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let guard = match tolerance {
        Some(tolerance) => DerivativeGuard::Tolerance(tolerance),
        None => DerivativeGuard::ExactZero,
    };
    if numerical {
        let function = Expression::parse(text)?;
        println!("f(x) = {}", function);
        run_newton(NewtonRaphson::new(function, iterations), guard, x0, output)
    } else {
        let function = SymbolicFunction::parse(text)?;
        println!("f(x) = {}", function.function());
        println!("f'(x) = {}", function.derivative());
        run_newton(NewtonRaphson::new(function, iterations), guard, x0, output)
    }
}

fn run_newton<F>(mut solver: NewtonRaphson<F>, guard: DerivativeGuard, x0: f64, output: Option<&PathBuf>) -> Result<()>
where
    F: ObjectiveTrait<f64>,
{
    solver.set_guard(guard)?;
    let solution = solver.solve(x0);
    for (i, x) in solution.trajectory.points().iter().enumerate() {
        println!("x{} = {}", i, x);
    }
    if let Some(notice) = solution.notice() {
        eprintln!("{}", notice);
    }
    if let Some(path) = output {
        let plot = render::newton_raphson(&solver, &solution, (x0 - 5.0, x0 + 5.0));
        save(&plot, path)?;
    }
    Ok(())
}

fn cmd_quadric(
    kind: QuadricKind,
    [a, b, c]: [f64; 3],
    plane: CutPlane,
    extent: f64,
    output: Option<&PathBuf>,
    cut_output: Option<&PathBuf>,
) -> Result<()> {
    let quadric = Quadric::new(kind, HashMap::from([("a", a), ("b", b), ("c", c)])).map_err(numdemo::Error::from)?;
    println!("{}: {}", kind, quadric.equation());
    println!("cut by {}: {:?}", plane, quadric.cut(plane));
    if let Some(path) = output {
        save(&render::quadric_surface(&quadric, plane, extent)?, path)?;
    }
    if let Some(path) = cut_output {
        save(&render::quadric_cut(&quadric, plane, extent)?, path)?;
    }
    Ok(())
}

fn cmd_step(key: &str, start: [f64; 2], learning_rate: f64, iterations: usize, output: Option<&PathBuf>) -> Result<()> {
    let objective = objective_2d(key)?;
    let solver = GradientDescent::new(objective, learning_rate, iterations)?;
    let mut start = start;
    let mut session = StepSession::new(solver, start)?;
    println!("commands: n/next, p/play, r/reset, s x y/start x y, q/quit");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["q" | "quit"] => break,
            ["n" | "next"] => report(session.advance(start)),
            ["p" | "play"] => report(session.play(start)),
            ["r" | "reset"] => {
                session.reset();
                println!("session reset");
            }
            ["s" | "start", x, y] => match (x.parse::<f64>(), y.parse::<f64>()) {
                (Ok(x), Ok(y)) => match session.observe([x, y]) {
                    Ok(reset) => {
                        start = [x, y];
                        if reset {
                            println!("start moved to {}; session reset", format_point(&start));
                        }
                    }
                    Err(error) => eprintln!("{}", error),
                },
                _ => eprintln!("invalid start point: {} {}", x, y),
            },
            _ => {
                eprintln!("unknown command: {}", line.trim());
                continue;
            }
        }
        print!("{}", session.solution().table(&objective));
        if session.state() == SessionState::Done {
            println!("done after {} steps", session.step_count());
        }
    }

    if let Some(path) = output {
        let plot = render::gradient_descent_2d_contour(objective, &session.solution(), objective.plot_range);
        save(&plot, path)?;
    }
    Ok(())
}

fn cmd_list() -> Result<()> {
    println!("functions of one variable:");
    for objective in &OBJECTIVES_1D {
        println!("  {:<16} {}", objective.key, objective.label);
    }
    println!("functions of two variables:");
    for objective in &OBJECTIVES_2D {
        println!("  {:<16} {}", objective.key, objective.label);
    }
    println!("quadric surfaces:");
    for kind in QuadricKind::ALL {
        println!("  {}", kind);
    }
    Ok(())
}

fn report(advance: Advance) {
    match advance {
        Advance::Stepped(k) => println!("step {}", k),
        Advance::Reset => println!("start changed; session reset"),
        Advance::Exhausted => println!("no more steps"),
        Advance::Halted(error) => eprintln!("stopped: {}", error),
        Advance::Rejected(error) => eprintln!("{}", error),
    }
}

fn print_solution<P, O>(solution: &Solution<P>, objective: &O)
where
    P: numdemo::Point,
    O: ObjectiveTrait<P>,
{
    print!("{}", solution.table(objective));
    if let Some(notice) = solution.notice() {
        eprintln!("{}", notice);
    }
}

fn save(plot: &Plot, path: &Path) -> Result<()> {
    plot.save(path).map_err(numdemo::Error::from)?;
    tracing::info!("figure saved to {}", path.display());
    Ok(())
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
