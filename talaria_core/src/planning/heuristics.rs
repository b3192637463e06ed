// talaria_core/src/planning/heuristics.rs

use crate::graph::FootstepNode;
use crate::parameters::FootstepPlannerParameters;
use crate::planning::CostToGoHeuristics;

/// The default cost-to-go estimate: straight-line distance to the goal
/// node plus a weighted heading difference, inflated by the configured
/// weight.
///
/// Every path from a node to the goal covers at least the straight-line
/// distance and at least the net heading change, and every edge cost is at
/// least that step's share of both (same yaw weight, plus a nonnegative
/// per-step penalty). So with `weight <= 1.0` this never overestimates.
#[derive(Debug, Clone)]
pub struct DistanceAndYawBasedHeuristics {
    weight: f64,
    yaw_weight: f64,
}

impl DistanceAndYawBasedHeuristics {
    pub fn new(parameters: &FootstepPlannerParameters) -> Self {
        Self {
            weight: parameters.heuristic_weight,
            yaw_weight: parameters.yaw_weight,
        }
    }

    pub fn with_weight(parameters: &FootstepPlannerParameters, weight: f64) -> Self {
        Self {
            weight,
            yaw_weight: parameters.yaw_weight,
        }
    }
}

impl CostToGoHeuristics for DistanceAndYawBasedHeuristics {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn compute(&self, node: &FootstepNode, goal: &FootstepNode) -> f64 {
        self.weight * (node.euclidean_distance(goal) + self.yaw_weight * node.yaw_distance(goal))
    }
}
