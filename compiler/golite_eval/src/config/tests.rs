use super::*;
use golite_value::EvalErrorKind;

#[test]
fn default_is_unlimited() {
    let mut state = ModeState::new(&EvalConfig::default());
    for _ in 0..10_000 {
        assert!(state.check_budget().is_ok());
    }
    assert_eq!(state.steps(), 10_000);
}

#[test]
fn budget_allows_exactly_the_limit() {
    let mut state = ModeState::new(&EvalConfig::new().max_steps(3));
    assert!(state.check_budget().is_ok());
    assert!(state.check_budget().is_ok());
    assert!(state.check_budget().is_ok());
    assert_eq!(
        state.check_budget().map_err(|e| e.kind),
        Err(EvalErrorKind::StepBudgetExceeded { limit: 3 })
    );
}

#[test]
fn builder_round_trip() {
    let config = EvalConfig::new().max_steps(5);
    assert_eq!(config.step_limit(), Some(5));
    assert_eq!(config.unlimited().step_limit(), None);
}
