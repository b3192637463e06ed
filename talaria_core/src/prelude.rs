// talaria_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::planning::{
    CostToGoHeuristics, FootstepCost, FootstepNodeChecker, FootstepNodeExpansion, PlannerListener,
};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::errors::FootstepPlannerError;
pub use crate::graph::{FootstepGraph, FootstepNode};
pub use crate::parameters::FootstepPlannerParameters;
pub use crate::planning::{FootstepPlan, FootstepPlannerGoal, FootstepPlanningResult, PlannedFootstep};
pub use crate::terrain::{ConvexPolygon2D, PlanarRegion, PlanarRegionsList};
pub use crate::types::{RobotSide, SideDependent};

// --- The Planner and the Default Strategies ---
pub use crate::planning::{
    AStarFootstepPlanner, AlwaysValidNodeChecker, DistanceAndYawBasedCost,
    DistanceAndYawBasedHeuristics, NoOpPlannerListener, ParameterBasedNodeExpansion,
    SnapBasedNodeChecker,
};
