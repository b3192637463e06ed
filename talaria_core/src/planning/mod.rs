// talaria_core/src/planning/mod.rs

use dyn_clone::DynClone;
use std::fmt::Debug;

use crate::graph::FootstepNode;
use crate::terrain::PlanarRegionsList;
use crate::types::SideDependent;

// --- The Strategy Traits ("Contracts") ---
// The planner is assembled from four pluggable pieces: a validity gate, a
// successor generator, a per-edge cost and a cost-to-go estimate. Concrete
// strategies are injected at construction; the search loop only ever talks
// to these contracts.

/// Decides whether a candidate footstep is allowed, using only the
/// candidate, its immediate predecessor and the terrain model it was given.
///
/// Implementations may keep internal memoization (the terrain-aware checker
/// caches snap results per grid cell), which is why validity queries take
/// `&mut self`.
pub trait FootstepNodeChecker: Send + Sync {
    /// Replaces the terrain model. Passing `None` clears it. Any internal
    /// cache derived from the previous terrain must be dropped here.
    fn set_planar_regions(&mut self, regions: Option<PlanarRegionsList>);

    /// Hands the checker the per-side foot sole outlines. The default does
    /// nothing; terrain-aware implementations use them for foot-on-foot
    /// collision checks.
    fn set_foot_polygons(&mut self, polygons: Option<SideDependent<crate::terrain::ConvexPolygon2D>>) {
        let _ = polygons;
    }

    /// Whether `node` is a valid placement when stepping from `previous`.
    /// `previous` is `None` only for the start stance.
    fn is_node_valid(&mut self, node: &FootstepNode, previous: Option<&FootstepNode>) -> bool;
}

/// Produces the finite set of next-step candidates reachable from a node.
///
/// Candidates are always for the side opposite `node.side()` (the planted
/// foot stays, the other one swings). Implementations must respect the
/// kinematic step bounds so the branching factor stays small, and must NOT
/// consult terrain: validity is the checker's job.
///
/// The result is an ordered, duplicate-free `Vec` rather than a hash set:
/// repeated plans have to expand the frontier in identical order for the
/// planner to be deterministic.
pub trait FootstepNodeExpansion: Send + Sync {
    fn expand_node(&self, node: &FootstepNode) -> Vec<FootstepNode>;
}

/// Cost of traversing one edge of the footstep graph. Must be nonnegative
/// and defined for every pair the expansion can produce.
pub trait FootstepCost: DynClone + Debug + Send + Sync {
    fn compute(&self, from: &FootstepNode, to: &FootstepNode) -> f64;
}

dyn_clone::clone_trait_object!(FootstepCost);

/// Estimate of the remaining cost from a node to the goal, already scaled
/// by the configured weight.
///
/// Weighted-A* semantics: with `weight() <= 1.0` the estimate must stay
/// admissible with respect to the step cost, making the first solution
/// popped optimal; larger weights explore fewer nodes but only guarantee a
/// sub-optimal solution. The planner reports this distinction through
/// `FootstepPlanningResult`.
pub trait CostToGoHeuristics: DynClone + Debug + Send + Sync {
    /// The heuristic inflation factor.
    fn weight(&self) -> f64;

    fn compute(&self, node: &FootstepNode, goal: &FootstepNode) -> f64;
}

dyn_clone::clone_trait_object!(CostToGoHeuristics);

// --- Implementation sub-modules ---
mod checker;
mod cost;
mod expansion;
mod heuristics;
mod listener;
mod plan;
mod planner;

// --- Re-export the public types for a clean API ---
pub use checker::{AlwaysValidNodeChecker, SnapBasedNodeChecker};
pub use cost::DistanceAndYawBasedCost;
pub use expansion::ParameterBasedNodeExpansion;
pub use heuristics::DistanceAndYawBasedHeuristics;
pub use listener::{NoOpPlannerListener, PlannerListener};
pub use plan::{FootstepPlan, FootstepPlanningResult, PlannedFootstep};
pub use planner::{AStarFootstepPlanner, FootstepPlannerGoal};
