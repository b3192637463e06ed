// talaria_core/src/errors.rs

use thiserror::Error;

/// Fatal precondition violations, raised synchronously before any search
/// work begins. Everything that can go wrong *during* a search (no path,
/// timeout) is an ordinary planning outcome, reported as data through
/// `FootstepPlanningResult` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FootstepPlannerError {
    #[error("no start stance has been set")]
    StartNotSet,

    #[error("no goal has been set")]
    GoalNotSet,

    #[error("unsupported goal type `{goal_type}`; only a pose between the feet is supported")]
    UnsupportedGoalType { goal_type: &'static str },
}
