// talaria_core/src/planning/expansion.rs

use crate::graph::FootstepNode;
use crate::parameters::FootstepPlannerParameters;
use crate::planning::FootstepNodeExpansion;

/// Successor generator sampling a fixed (forward, lateral, yaw) offset
/// lattice from the planner parameters.
///
/// Offsets are expressed in the stance foot's frame with the lateral axis
/// mirrored per side, then rotated into the world. Candidates are emitted
/// in a fixed nested order (forward, then lateral, then yaw), which keeps
/// the whole search deterministic.
#[derive(Debug, Clone)]
pub struct ParameterBasedNodeExpansion {
    forward_offsets: Vec<f64>,
    lateral_offsets: Vec<f64>,
    yaw_offsets: Vec<f64>,
}

impl ParameterBasedNodeExpansion {
    pub fn new(parameters: &FootstepPlannerParameters) -> Self {
        Self {
            forward_offsets: sample_stride(
                parameters.min_step_length,
                parameters.max_step_length,
                parameters.step_length_stride,
            ),
            lateral_offsets: sample_stride(
                parameters.min_step_width,
                parameters.max_step_width,
                parameters.step_width_stride,
            ),
            yaw_offsets: sample_stride(
                parameters.min_step_yaw,
                parameters.max_step_yaw,
                parameters.step_yaw_stride,
            ),
        }
    }

    /// Number of candidates produced for every expanded node.
    pub fn branching_factor(&self) -> usize {
        self.forward_offsets.len() * self.lateral_offsets.len() * self.yaw_offsets.len()
    }
}

/// Inclusive sampling of `[min, max]` at `stride` spacing.
fn sample_stride(min: f64, max: f64, stride: f64) -> Vec<f64> {
    debug_assert!(stride > 0.0, "stride must be positive");
    debug_assert!(max >= min, "empty sampling interval");
    let count = ((max - min) / stride).round() as usize;
    (0..=count).map(|i| min + i as f64 * stride).collect()
}

impl FootstepNodeExpansion for ParameterBasedNodeExpansion {
    fn expand_node(&self, node: &FootstepNode) -> Vec<FootstepNode> {
        let swing_side = node.side().opposite();
        let sign = swing_side.y_sign();
        let (sin, cos) = node.yaw().sin_cos();

        let mut candidates =
            Vec::with_capacity(self.branching_factor());
        for &forward in &self.forward_offsets {
            for &lateral in &self.lateral_offsets {
                // Offset in the stance frame; the lateral axis points
                // toward the swing side.
                let offset_y = sign * lateral;
                let dx = cos * forward - sin * offset_y;
                let dy = sin * forward + cos * offset_y;
                for &yaw in &self.yaw_offsets {
                    candidates.push(FootstepNode::new(
                        node.x() + dx,
                        node.y() + dy,
                        node.yaw() + sign * yaw,
                        swing_side,
                    ));
                }
            }
        }
        candidates
    }
}
