use numdemo::{
    Advance, GradientDescent, SessionState, StepSession, Termination, objective_1d, objective_2d, render,
};
use russell_lab::approx_eq;

const SAVE_FIGURE: bool = false;

#[test]
fn test_session_length_after_k_advances() {
    let objective = objective_2d("himmelblau").unwrap();
    let rule = GradientDescent::new(objective, 0.01, 50).unwrap();
    let start = [-1.0, 1.0];
    let mut session = StepSession::new(rule, start).unwrap();
    for k in 1..=12 {
        assert_eq!(session.advance(start), Advance::Stepped(k));
        assert_eq!(session.trajectory().len(), k + 1);
        assert_eq!(session.state(), SessionState::Accumulating(k));
    }

    // a new start point clears everything, regardless of k
    assert_eq!(session.advance([0.0, 0.0]), Advance::Reset);
    assert_eq!(session.trajectory().len(), 0);
    assert_eq!(session.last_seen_start(), &[0.0, 0.0]);
    assert_eq!(session.advance([0.0, 0.0]), Advance::Stepped(1));
    assert_eq!(session.trajectory().len(), 2);

    if SAVE_FIGURE {
        render::gradient_descent_2d_contour(objective, &session.solution(), objective.plot_range)
            .save("/tmp/numdemo/test_session.svg")
            .unwrap();
    }
}

#[test]
fn test_session_matches_full_run() {
    // stepping through the session gives the same points as an all-at-once run
    let objective = objective_1d("sin(x)+0.1x^2").unwrap();
    let rule = GradientDescent::new(objective, 0.2, 15).unwrap();
    let full = rule.minimize(3.0);
    let mut session = StepSession::new(rule, 3.0).unwrap();
    assert_eq!(session.play(3.0), Advance::Exhausted);
    assert_eq!(session.state(), SessionState::Done);
    assert_eq!(session.trajectory().len(), 16);
    assert_eq!(session.rule().step_size(), 0.2);
    let solution = session.solution();
    assert_eq!(solution.termination, Termination::Completed);
    for (a, b) in solution.trajectory.points().iter().zip(full.trajectory.points()) {
        approx_eq(*a, *b, 1e-15);
    }
}

#[test]
fn test_session_done_refuses_advances() {
    let rule = GradientDescent::new(objective_1d("cos(x)").unwrap(), 0.5, 2).unwrap();
    let mut session = StepSession::new(rule, 1.0).unwrap();
    session.advance(1.0);
    session.advance(1.0);
    assert_eq!(session.state(), SessionState::Done);
    assert_eq!(session.advance(1.0), Advance::Exhausted);
    assert_eq!(session.trajectory().len(), 3);

    // observing the same start does nothing; a different one resets
    assert!(!session.observe(1.0).unwrap());
    assert_eq!(session.trajectory().len(), 3);
    assert!(session.observe(2.0).unwrap());
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.step_count(), 0);

    // a start point that is not finite is refused and the session keeps its start
    assert!(matches!(session.advance(f64::NAN), Advance::Rejected(_)));
    assert_eq!(session.last_seen_start(), &2.0);
    assert_eq!(session.advance(2.0), Advance::Stepped(1));
}
