// talaria_core/src/planning/plan.rs

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

use crate::types::RobotSide;

/// How a planning call ended. No-path and timeout are ordinary outcomes,
/// not errors: the caller decides whether to retry with a larger timeout,
/// a higher heuristic weight or a coarser expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootstepPlanningResult {
    /// A path was found with an admissible heuristic (weight <= 1.0).
    OptimalSolution,
    /// A path was found with an inflated heuristic (weight > 1.0).
    SubOptimalSolution,
    /// The time budget ran out before the goal was reached.
    TimedOutBeforeSolution,
    /// The reachable part of the state space was exhausted.
    NoPathExists,
}

impl FootstepPlanningResult {
    /// Whether a plan worth executing exists for this result.
    pub fn valid_for_execution(self) -> bool {
        matches!(
            self,
            FootstepPlanningResult::OptimalSolution | FootstepPlanningResult::SubOptimalSolution
        )
    }
}

/// One entry of a footstep plan: which foot to swing and the full 3D pose
/// its sole should end up in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedFootstep {
    pub side: RobotSide,
    pub sole_pose: Isometry3<f64>,
}

/// The ordered output of a successful search: steps in the order they are
/// to be taken. Immutable once handed to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootstepPlan {
    steps: Vec<PlannedFootstep>,
}

impl FootstepPlan {
    pub(crate) fn push(&mut self, step: PlannedFootstep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlannedFootstep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[PlannedFootstep] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedFootstep> {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_classification() {
        assert!(FootstepPlanningResult::OptimalSolution.valid_for_execution());
        assert!(FootstepPlanningResult::SubOptimalSolution.valid_for_execution());
        assert!(!FootstepPlanningResult::TimedOutBeforeSolution.valid_for_execution());
        assert!(!FootstepPlanningResult::NoPathExists.valid_for_execution());
    }

    #[test]
    fn plan_preserves_insertion_order() {
        let mut plan = FootstepPlan::default();
        plan.push(PlannedFootstep {
            side: RobotSide::Right,
            sole_pose: Isometry3::translation(0.2, -0.125, 0.0),
        });
        plan.push(PlannedFootstep {
            side: RobotSide::Left,
            sole_pose: Isometry3::translation(0.4, 0.125, 0.0),
        });

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.get(0).unwrap().side, RobotSide::Right);
        assert_eq!(plan.get(1).unwrap().side, RobotSide::Left);
    }
}
