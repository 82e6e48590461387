use crate::{Error, ObjectiveTrait, Point, StopRule, format_point};
use std::fmt::Write;

/// Ordered, append-only sequence of points visited by a solver
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory<P> {
    points: Vec<P>,
}

impl<P: Point> Trajectory<P> {
    /// Allocates an empty trajectory
    pub fn new() -> Self {
        Trajectory { points: Vec::new() }
    }

    /// Allocates a trajectory holding only the start point
    pub fn starting_at(start: P) -> Self {
        Trajectory { points: vec![start] }
    }

    /// Appends a point
    pub fn push(&mut self, p: P) {
        self.points.push(p);
    }

    /// Removes all points (session reset)
    pub(crate) fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&P> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&P> {
        self.points.last()
    }

    /// Returns one coordinate of every point (0 = x, 1 = y)
    ///
    /// Returns None if the points have no such axis.
    pub fn coordinates(&self, axis: usize) -> Option<Vec<f64>> {
        self.points.iter().map(|p| p.coords().get(axis).copied()).collect()
    }

    /// Returns the points with all coordinates finite, with their indices
    pub fn finite_points(&self) -> Vec<(usize, P)> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(i, p)| (i, *p))
            .collect()
    }
}

impl<P: Point> Default for Trajectory<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reason why a solver stopped appending points
#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    /// All max_iterations steps were performed
    Completed,
    /// A step failed at the given iteration; no further points were appended
    Halted { iteration: usize, error: Error },
}

/// Results of a solver run
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<P> {
    pub trajectory: Trajectory<P>,
    pub termination: Termination,
    pub stop_rule: StopRule,
}

impl<P: Point> Solution<P> {
    /// Returns the last visited point
    pub fn last(&self) -> Option<&P> {
        self.trajectory.last()
    }

    /// Returns the number of performed steps
    pub fn iterations(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }

    /// Returns a user-facing notice if the run halted early
    pub fn notice(&self) -> Option<String> {
        match &self.termination {
            Termination::Completed => None,
            Termination::Halted { iteration, error } => Some(format!("iteration {}: {}", iteration, error)),
        }
    }

    /// Formats the table of iterates `Iteration i: x = …, f(x) = …`
    pub fn table<O: ObjectiveTrait<P>>(&self, objective: &O) -> String {
        let mut buffer = String::new();
        for (i, p) in self.trajectory.points().iter().enumerate() {
            let _ = write!(buffer, "Iteration {}: x = {}", i, format_point(p));
            match objective.value(p) {
                Ok(v) => {
                    let _ = writeln!(buffer, ", f(x) = {:.4}", v);
                }
                Err(e) => {
                    let _ = writeln!(buffer, ", f(x) undefined ({})", e);
                }
            }
        }
        buffer
    }
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective_1d;

    #[test]
    fn trajectory_works() {
        let mut trajectory = Trajectory::starting_at([1.0, 2.0]);
        trajectory.push([f64::NAN, 0.0]);
        trajectory.push([3.0, 4.0]);
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.coordinates(1), Some(vec![2.0, 0.0, 4.0]));
        assert_eq!(trajectory.coordinates(2), None);
        assert_eq!(trajectory.finite_points(), vec![(0, [1.0, 2.0]), (2, [3.0, 4.0])]);
        trajectory.clear();
        assert!(trajectory.is_empty());
    }

    #[test]
    fn table_and_notice_work() {
        let mut trajectory = Trajectory::starting_at(2.0);
        trajectory.push(1.0);
        let solution = Solution {
            trajectory,
            termination: Termination::Halted {
                iteration: 1,
                error: Error::ZeroDerivative { x: 1.0 },
            },
            stop_rule: StopRule::ZeroDerivativeGuard,
        };
        let objective = objective_1d("x^2").unwrap();
        assert_eq!(
            solution.table(&objective),
            "Iteration 0: x = 2.0000, f(x) = 4.0000\nIteration 1: x = 1.0000, f(x) = 1.0000\n"
        );
        assert_eq!(
            solution.notice().unwrap(),
            "iteration 1: zero derivative at x = 1; method stopped"
        );
        assert_eq!(solution.iterations(), 1);
    }

    #[test]
    fn coordinates_of_missing_axis_is_none() {
        let trajectory = Trajectory::starting_at(2.0);
        assert_eq!(trajectory.coordinates(0), Some(vec![2.0]));
        assert_eq!(trajectory.coordinates(1), None);
    }
}
