use crate::{Error, Point, Result, Solution, StepRule, Termination, Trajectory, format_point};

/// State of a step-wise session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No point recorded yet
    Empty,
    /// k steps recorded (trajectory has k + 1 points)
    Accumulating(usize),
    /// No further steps will be recorded
    Done,
}

/// Outcome of an advance action
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    /// One more point was appended; holds the new step count
    Stepped(usize),
    /// The start point changed; the trajectory was cleared and the advance dropped
    Reset,
    /// The session is done; nothing was appended
    Exhausted,
    /// The step failed; the session is now done
    Halted(Error),
    /// The start point is not finite; the session is unchanged
    Rejected(Error),
}

/// Records a trajectory one step per advance action
///
/// Transitions:
///
/// ```text
/// Empty            --advance--> Accumulating(1)   (start and first step appended)
/// Accumulating(k)  --advance--> Accumulating(k+1) or Done when k+1 = max_iterations
/// Done             --advance--> Done              (refused)
/// any              --start changed / reset--> Empty
/// ```
///
/// A changed start point takes priority over an advance requested in the same call.
pub struct StepSession<P: Point, R: StepRule<P>> {
    rule: R,
    trajectory: Trajectory<P>,
    step_count: usize,
    last_seen_start: P,
    state: SessionState,
    halted: Option<Error>,
}

impl<P: Point, R: StepRule<P>> StepSession<P, R> {
    /// Allocates a new session in the Empty state
    pub fn new(rule: R, start: P) -> Result<Self> {
        check_start(&start)?;
        Ok(StepSession {
            rule,
            trajectory: Trajectory::new(),
            step_count: 0,
            last_seen_start: start,
            state: SessionState::Empty,
            halted: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn trajectory(&self) -> &Trajectory<P> {
        &self.trajectory
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn last_seen_start(&self) -> &P {
        &self.last_seen_start
    }

    /// Records the current start point; resets the session if it changed
    ///
    /// Returns true if the session was reset. A start point that is not finite
    /// is an error and leaves the session unchanged.
    pub fn observe(&mut self, start: P) -> Result<bool> {
        check_start(&start)?;
        if start == self.last_seen_start {
            return Ok(false);
        }
        log::debug!(
            "start changed from {} to {}; session reset",
            format_point(&self.last_seen_start),
            format_point(&start)
        );
        self.last_seen_start = start;
        self.reset();
        Ok(true)
    }

    /// Clears the trajectory (explicit reset action)
    pub fn reset(&mut self) {
        self.trajectory.clear();
        self.step_count = 0;
        self.state = SessionState::Empty;
        self.halted = None;
    }

    /// Appends one step to the trajectory
    pub fn advance(&mut self, start: P) -> Advance {
        match self.observe(start) {
            Ok(true) => return Advance::Reset,
            Ok(false) => (),
            Err(error) => return Advance::Rejected(error),
        }
        let max_iterations = self.rule.max_iterations();
        match self.state {
            SessionState::Done => Advance::Exhausted,
            SessionState::Empty => {
                self.trajectory.push(self.last_seen_start);
                if max_iterations == 0 {
                    self.state = SessionState::Done;
                    return Advance::Exhausted;
                }
                self.apply_step()
            }
            SessionState::Accumulating(_) => self.apply_step(),
        }
    }

    /// Advances until the session is done (the "play" action)
    pub fn play(&mut self, start: P) -> Advance {
        let mut last = self.advance(start);
        while let Advance::Stepped(_) = last {
            last = self.advance(start);
        }
        last
    }

    /// Returns the steps recorded so far as a solution
    pub fn solution(&self) -> Solution<P> {
        let termination = match &self.halted {
            Some(error) => Termination::Halted {
                iteration: self.step_count,
                error: error.clone(),
            },
            None => Termination::Completed,
        };
        Solution {
            trajectory: self.trajectory.clone(),
            termination,
            stop_rule: self.rule.stop_rule(),
        }
    }

    fn apply_step(&mut self) -> Advance {
        let current = match self.trajectory.last() {
            Some(p) => *p,
            None => self.last_seen_start,
        };
        match self.rule.step(&current) {
            Ok(next) => {
                self.trajectory.push(next);
                self.step_count += 1;
                self.state = if self.step_count >= self.rule.max_iterations() {
                    SessionState::Done
                } else {
                    SessionState::Accumulating(self.step_count)
                };
                log::debug!("{}: step {} -> {}", self.rule.name(), self.step_count, format_point(&next));
                Advance::Stepped(self.step_count)
            }
            Err(error) => {
                log::warn!("{}: stopped at step {}: {}", self.rule.name(), self.step_count, error);
                self.state = SessionState::Done;
                self.halted = Some(error.clone());
                Advance::Halted(error)
            }
        }
    }
}

fn check_start<P: Point>(start: &P) -> Result<()> {
    if !start.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "start point must be finite, got {}",
            format_point(start)
        )));
    }
    Ok(())
}

// tests /////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GradientDescent, NewtonRaphson, objective_1d, objective_2d};

    #[test]
    fn advance_works() {
        let rule = GradientDescent::new(objective_2d("x^2+y^2").unwrap(), 0.25, 3).unwrap();
        let mut session = StepSession::new(rule, [4.0, -2.0]).unwrap();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.advance([4.0, -2.0]), Advance::Stepped(1));
        assert_eq!(session.state(), SessionState::Accumulating(1));
        assert_eq!(session.trajectory().points(), &[[4.0, -2.0], [2.0, -1.0]]);
        assert_eq!(session.advance([4.0, -2.0]), Advance::Stepped(2));
        assert_eq!(session.advance([4.0, -2.0]), Advance::Stepped(3));
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.advance([4.0, -2.0]), Advance::Exhausted);
        assert_eq!(session.trajectory().len(), 4);
        assert_eq!(session.solution().termination, Termination::Completed);
    }

    #[test]
    fn changed_start_takes_priority() {
        let rule = GradientDescent::new(objective_2d("x^2+y^2").unwrap(), 0.1, 10).unwrap();
        let mut session = StepSession::new(rule, [1.0, 1.0]).unwrap();
        session.advance([1.0, 1.0]);
        session.advance([1.0, 1.0]);
        assert_eq!(session.trajectory().len(), 3);
        assert_eq!(session.advance([1.0, 2.0]), Advance::Reset);
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.trajectory().len(), 0);
        assert_eq!(session.step_count(), 0);
        assert_eq!(session.advance([1.0, 2.0]), Advance::Stepped(1));
        assert_eq!(session.trajectory().first(), Some(&[1.0, 2.0]));
    }

    #[test]
    fn reset_and_zero_iterations_work() {
        let rule = GradientDescent::new(objective_1d("x^2").unwrap(), 0.1, 0).unwrap();
        let mut session = StepSession::new(rule, 1.0).unwrap();
        assert_eq!(session.advance(1.0), Advance::Exhausted);
        assert_eq!(session.trajectory().points(), &[1.0]);
        assert_eq!(session.state(), SessionState::Done);
        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.trajectory().is_empty());
    }

    #[test]
    fn halted_step_ends_the_session() {
        let rule = NewtonRaphson::new(objective_1d("x^2").unwrap(), 5);
        let mut session = StepSession::new(rule, 0.0).unwrap();
        assert_eq!(session.advance(0.0), Advance::Halted(Error::ZeroDerivative { x: 0.0 }));
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.trajectory().points(), &[0.0]);
        assert_eq!(session.advance(0.0), Advance::Exhausted);
        assert!(session.solution().notice().is_some());
    }

    #[test]
    fn play_works() {
        let rule = GradientDescent::new(objective_1d("x^2").unwrap(), 0.1, 7).unwrap();
        let mut session = StepSession::new(rule, 5.0).unwrap();
        assert_eq!(session.play(5.0), Advance::Exhausted);
        assert_eq!(session.trajectory().len(), 8);
        assert_eq!(session.step_count(), 7);
    }

    #[test]
    fn non_finite_start_is_rejected() {
        let rule = GradientDescent::new(objective_2d("x^2+y^2").unwrap(), 0.1, 10).unwrap();
        assert!(StepSession::new(rule.clone(), [f64::NAN, 0.0]).is_err());

        let mut session = StepSession::new(rule, [1.0, 1.0]).unwrap();
        session.advance([1.0, 1.0]);
        assert!(matches!(session.advance([f64::NAN, 0.0]), Advance::Rejected(Error::InvalidParameter(_))));
        assert!(session.observe([0.0, f64::INFINITY]).is_err());
        assert_eq!(session.last_seen_start(), &[1.0, 1.0]);
        assert_eq!(session.trajectory().len(), 2);
        assert_eq!(session.advance([1.0, 1.0]), Advance::Stepped(2));
    }
}
