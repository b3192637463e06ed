// talaria_core/src/parameters.rs

use serde::{Deserialize, Serialize};

use crate::terrain::ConvexPolygon2D;
use crate::types::SideDependent;

/// Tuning parameters for the footstep planner.
///
/// The library only defines the typed struct; loading it from a TOML/JSON
/// scenario file is the job of whatever harness embeds the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootstepPlannerParameters {
    /// Nominal lateral distance between the two feet (meters). The goal
    /// "pose between feet" is expanded into one goal node per side, each
    /// offset laterally by half this width.
    pub ideal_footstep_width: f64,

    /// Most negative forward step offset, i.e. how far the swing foot may
    /// land *behind* the stance foot (meters).
    pub min_step_length: f64,

    /// Largest forward step offset (meters).
    pub max_step_length: f64,

    /// Spacing between sampled forward offsets in the expansion (meters).
    pub step_length_stride: f64,

    /// Smallest lateral separation between the feet (meters). Steps
    /// narrower than this are rejected: that covers both leg crossover and
    /// stepping onto the stance foot.
    pub min_step_width: f64,

    /// Largest lateral separation between the feet (meters).
    pub max_step_width: f64,

    /// Spacing between sampled lateral offsets in the expansion (meters).
    pub step_width_stride: f64,

    /// Maximum center-to-center planar distance between consecutive foot
    /// placements (meters).
    pub max_step_reach: f64,

    /// Most negative (inward) yaw change per step (radians).
    pub min_step_yaw: f64,

    /// Largest (outward) yaw change per step (radians).
    pub max_step_yaw: f64,

    /// Spacing between sampled yaw offsets in the expansion (radians).
    pub step_yaw_stride: f64,

    /// Maximum height change between consecutive snapped foot placements
    /// (meters).
    pub max_step_z: f64,

    /// Steepest surface the robot can stand on, measured as the angle
    /// between the surface normal and vertical (radians).
    pub max_surface_incline: f64,

    /// Weight of the yaw-change term in the step cost and the heuristics.
    pub yaw_weight: f64,

    /// Fixed cost added to every step, biasing the search toward fewer,
    /// longer steps.
    pub cost_per_step: f64,

    /// Weight applied to the cost-to-go heuristics. Values <= 1.0 keep the
    /// heuristics admissible and the first solution optimal; values > 1.0
    /// expand fewer nodes but only guarantee a sub-optimal solution. The
    /// reported `FootstepPlanningResult` reflects this directly.
    pub heuristic_weight: f64,

    /// Wall-clock budget for a single `plan()` call (seconds).
    pub timeout: f64,

    /// Foot sole length (meters), used for the default foot polygons.
    pub foot_length: f64,

    /// Foot sole width (meters), used for the default foot polygons.
    pub foot_width: f64,
}

impl Default for FootstepPlannerParameters {
    fn default() -> Self {
        Self {
            ideal_footstep_width: 0.25,
            min_step_length: -0.10,
            max_step_length: 0.30,
            step_length_stride: 0.10,
            min_step_width: 0.15,
            max_step_width: 0.35,
            step_width_stride: 0.05,
            max_step_reach: 0.45,
            min_step_yaw: -0.30,
            max_step_yaw: 0.30,
            step_yaw_stride: 0.30,
            max_step_z: 0.25,
            max_surface_incline: std::f64::consts::FRAC_PI_4,
            yaw_weight: 0.20,
            cost_per_step: 0.15,
            heuristic_weight: 1.0,
            timeout: 5.0,
            foot_length: 0.20,
            foot_width: 0.10,
        }
    }
}

impl FootstepPlannerParameters {
    /// Rectangular foot polygons for both sides, built from `foot_length`
    /// and `foot_width`, centered on the sole frame origin.
    pub fn default_foot_polygons(&self) -> SideDependent<ConvexPolygon2D> {
        SideDependent::from_fn(|_| ConvexPolygon2D::rectangle(self.foot_length, self.foot_width))
    }
}
