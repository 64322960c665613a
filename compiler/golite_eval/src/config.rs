//! Evaluation settings and the per-run step budget.

use golite_value::{step_budget_exceeded, EvalError};

/// Settings for one evaluation.
///
/// ```text
/// let config = EvalConfig::default().max_steps(10_000);
/// env.eval_with("for { }", &config)  // StepBudgetExceeded
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalConfig {
    max_steps: Option<u64>,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort once more than `steps` statements and expressions have been
    /// dispatched.
    #[must_use]
    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Remove the step limit.
    #[must_use]
    pub fn unlimited(mut self) -> Self {
        self.max_steps = None;
        self
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.max_steps
    }
}

/// Mutable per-run state derived from an `EvalConfig`.
pub(crate) struct ModeState {
    steps: u64,
    budget: Option<u64>,
}

impl ModeState {
    pub(crate) fn new(config: &EvalConfig) -> Self {
        ModeState {
            steps: 0,
            budget: config.max_steps,
        }
    }

    /// Count one dispatch; fails once the budget is exhausted.
    #[inline]
    pub(crate) fn check_budget(&mut self) -> Result<(), EvalError> {
        self.steps = self.steps.saturating_add(1);
        match self.budget {
            Some(limit) if self.steps > limit => {
                tracing::debug!(limit, "step budget exhausted");
                Err(step_budget_exceeded(limit))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests;
