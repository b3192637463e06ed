// talaria_core/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

// --- Stance Side ---

/// Which of the two feet a footstep or a piece of per-foot data refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotSide {
    Left,
    Right,
}

impl RobotSide {
    /// Both sides, in a fixed order. Iterating this instead of a collection
    /// keeps everything that is keyed by side deterministic.
    pub const BOTH: [RobotSide; 2] = [RobotSide::Left, RobotSide::Right];

    pub const fn opposite(self) -> RobotSide {
        match self {
            RobotSide::Left => RobotSide::Right,
            RobotSide::Right => RobotSide::Left,
        }
    }

    /// Sign of the lateral (y) axis for this side: +1 for left, -1 for right.
    /// Used to mirror step offsets and yaw limits between the two feet.
    pub const fn y_sign(self) -> f64 {
        match self {
            RobotSide::Left => 1.0,
            RobotSide::Right => -1.0,
        }
    }
}

impl fmt::Display for RobotSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotSide::Left => write!(f, "left"),
            RobotSide::Right => write!(f, "right"),
        }
    }
}

// --- Side-Keyed Storage ---

/// A fixed-size container holding exactly one value per robot side.
///
/// The planner keeps its dual goal nodes and the foot polygons in one of
/// these rather than in a dynamic map: there are always exactly two feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideDependent<T> {
    left: T,
    right: T,
}

impl<T> SideDependent<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Builds both entries from a closure over the side.
    pub fn from_fn(mut f: impl FnMut(RobotSide) -> T) -> Self {
        Self {
            left: f(RobotSide::Left),
            right: f(RobotSide::Right),
        }
    }

    pub fn get(&self, side: RobotSide) -> &T {
        match side {
            RobotSide::Left => &self.left,
            RobotSide::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: RobotSide) -> &mut T {
        match side {
            RobotSide::Left => &mut self.left,
            RobotSide::Right => &mut self.right,
        }
    }
}

impl<T> Index<RobotSide> for SideDependent<T> {
    type Output = T;

    fn index(&self, side: RobotSide) -> &T {
        self.get(side)
    }
}

impl<T> IndexMut<RobotSide> for SideDependent<T> {
    fn index_mut(&mut self, side: RobotSide) -> &mut T {
        self.get_mut(side)
    }
}
