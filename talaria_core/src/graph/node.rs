// talaria_core/src/graph/node.rs

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::types::RobotSide;

/// Planar grid cell size the footstep positions are snapped to (meters).
pub const XY_RESOLUTION: f64 = 0.05;

/// Angular cell size the footstep yaw is snapped to (radians).
pub const YAW_RESOLUTION: f64 = std::f64::consts::TAU / 72.0;

/// Wraps an angle to the half-open interval [-pi, pi).
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// One discretized robot-foot state: planar position, heading and which
/// foot is planted. Immutable after construction.
///
/// Construction snaps the continuous inputs onto a fixed grid; equality and
/// hashing are defined over the resulting integer cell indices and the
/// side, never over raw floats. The search keeps hash-based closed sets and
/// cost maps, so every coordinate inside one grid cell must name the same
/// node or the search would duplicate states endlessly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FootstepNode {
    x: f64,
    y: f64,
    yaw: f64,
    x_index: i32,
    y_index: i32,
    yaw_index: i32,
    side: RobotSide,
}

impl FootstepNode {
    pub fn new(x: f64, y: f64, yaw: f64, side: RobotSide) -> Self {
        let x_index = (x / XY_RESOLUTION).round() as i32;
        let y_index = (y / XY_RESOLUTION).round() as i32;
        let yaw_index = (wrap_angle(yaw) / YAW_RESOLUTION).round() as i32;
        Self {
            x: x_index as f64 * XY_RESOLUTION,
            y: y_index as f64 * XY_RESOLUTION,
            yaw: wrap_angle(yaw_index as f64 * YAW_RESOLUTION),
            x_index,
            y_index,
            yaw_index,
            side,
        }
    }

    /// Grid-snapped world x (meters).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Grid-snapped world y (meters).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Grid-snapped heading (radians, in [-pi, pi)).
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn side(&self) -> RobotSide {
        self.side
    }

    pub fn x_index(&self) -> i32 {
        self.x_index
    }

    pub fn y_index(&self) -> i32 {
        self.y_index
    }

    pub fn yaw_index(&self) -> i32 {
        self.yaw_index
    }

    /// Planar center-to-center distance to another node (meters).
    pub fn euclidean_distance(&self, other: &FootstepNode) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Absolute heading difference to another node, compared on the circle
    /// (radians, in [0, pi]).
    pub fn yaw_distance(&self, other: &FootstepNode) -> f64 {
        wrap_angle(other.yaw - self.yaw).abs()
    }
}

impl PartialEq for FootstepNode {
    fn eq(&self, other: &Self) -> bool {
        self.x_index == other.x_index
            && self.y_index == other.y_index
            && self.yaw_index == other.yaw_index
            && self.side == other.side
    }
}

impl Eq for FootstepNode {}

impl Hash for FootstepNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x_index.hash(state);
        self.y_index.hash(state);
        self.yaw_index.hash(state);
        self.side.hash(state);
    }
}
