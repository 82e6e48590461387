use crate::{Point, Result, Solution, StopRule, Termination, Trajectory, format_point};

/// One step of an iterative method: p_{i+1} = step(p_i)
pub trait StepRule<P: Point> {
    /// Returns a short name used in messages
    fn name(&self) -> &'static str;

    /// Calculates the next point
    fn step(&self, p: &P) -> Result<P>;

    /// Returns the maximum number of steps
    fn max_iterations(&self) -> usize;

    /// Returns the condition that ends the iteration
    fn stop_rule(&self) -> StopRule;
}

/// Runs a step rule from the start point until max_iterations or the first failed step
///
/// The trajectory always begins with the start point. A failed step is not fatal:
/// the run is reported as halted and keeps the points visited so far.
pub fn run<P: Point, R: StepRule<P> + ?Sized>(rule: &R, start: P) -> Solution<P> {
    let mut trajectory = Trajectory::starting_at(start);
    let mut termination = Termination::Completed;
    let mut current = start;
    let mut warned = !start.is_finite();
    for k in 0..rule.max_iterations() {
        match rule.step(&current) {
            Ok(next) => {
                if !warned && !next.is_finite() {
                    log::warn!("{}: iterate {} is not finite ({})", rule.name(), k + 1, format_point(&next));
                    warned = true;
                }
                trajectory.push(next);
                current = next;
            }
            Err(error) => {
                log::warn!("{}: stopped at iteration {}: {}", rule.name(), k, error);
                termination = Termination::Halted { iteration: k, error };
                break;
            }
        }
    }
    Solution {
        trajectory,
        termination,
        stop_rule: rule.stop_rule(),
    }
}
