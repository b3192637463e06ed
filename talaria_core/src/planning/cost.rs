// talaria_core/src/planning/cost.rs

use crate::graph::FootstepNode;
use crate::parameters::FootstepPlannerParameters;
use crate::planning::FootstepCost;

/// The default per-edge cost: planar distance, a weighted yaw change, and
/// a fixed per-step penalty. The penalty biases the search toward fewer,
/// longer steps over many short shuffles.
#[derive(Debug, Clone)]
pub struct DistanceAndYawBasedCost {
    yaw_weight: f64,
    cost_per_step: f64,
}

impl DistanceAndYawBasedCost {
    pub fn new(parameters: &FootstepPlannerParameters) -> Self {
        Self {
            yaw_weight: parameters.yaw_weight,
            cost_per_step: parameters.cost_per_step,
        }
    }
}

impl FootstepCost for DistanceAndYawBasedCost {
    fn compute(&self, from: &FootstepNode, to: &FootstepNode) -> f64 {
        from.euclidean_distance(to) + self.yaw_weight * from.yaw_distance(to) + self.cost_per_step
    }
}
