// talaria_core/src/planning/planner.rs

use log::{debug, info, warn};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;

use crate::errors::FootstepPlannerError;
use crate::graph::{FootstepGraph, FootstepNode};
use crate::parameters::FootstepPlannerParameters;
use crate::planning::{
    CostToGoHeuristics, DistanceAndYawBasedCost, DistanceAndYawBasedHeuristics, FootstepCost,
    FootstepNodeChecker, FootstepNodeExpansion, FootstepPlan, FootstepPlanningResult,
    ParameterBasedNodeExpansion, PlannedFootstep, PlannerListener, SnapBasedNodeChecker,
};
use crate::terrain::{snap_point_to_regions, snapped_sole_pose, ConvexPolygon2D, PlanarRegionsList};
use crate::types::{RobotSide, SideDependent};

/// The planning request's goal. Only `PoseBetweenFeet` is supported by the
/// A* planner; anything else is a configuration error, rejected before the
/// search starts.
#[derive(Debug, Clone, PartialEq)]
pub enum FootstepPlannerGoal {
    /// A pose for the midpoint between the two feet in the final stance.
    PoseBetweenFeet { pose: Isometry3<f64> },
    /// A pose for one specific foot. Kept for callers that target a single
    /// placement; not supported by this planner.
    SingleFootstep {
        pose: Isometry3<f64>,
        side: RobotSide,
    },
}

impl FootstepPlannerGoal {
    pub fn type_name(&self) -> &'static str {
        match self {
            FootstepPlannerGoal::PoseBetweenFeet { .. } => "pose between feet",
            FootstepPlannerGoal::SingleFootstep { .. } => "single footstep",
        }
    }
}

// --- Open-List Entry ---

/// Frontier entry ordered by total estimated cost `f = g + weight * h`.
/// The heap is a max-heap, so the comparison is reversed.
#[derive(Debug, Clone)]
struct NodeComparator {
    node: FootstepNode,
    f_score: f64,
}

impl NodeComparator {
    fn new(node: FootstepNode, f_score: f64) -> Self {
        Self { node, f_score }
    }
}

impl Eq for NodeComparator {}

impl PartialEq for NodeComparator {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl Ord for NodeComparator {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for NodeComparator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// --- The Planner ---

/// Weighted A* search over the implicit footstep graph.
///
/// The planner is assembled from the four strategy objects at construction
/// and drives them from a single synchronous `plan()` call: no I/O, no
/// internal threads, the only suspension point is the timeout check. All
/// mutable search state (graph, open list, closed set) is private to the
/// instance and reinitialized on every call, so distinct instances may
/// plan in parallel over a shared, read-only terrain model.
pub struct AStarFootstepPlanner {
    parameters: FootstepPlannerParameters,

    checker: Box<dyn FootstepNodeChecker>,
    expansion: Box<dyn FootstepNodeExpansion>,
    step_cost: Box<dyn FootstepCost>,
    heuristics: Box<dyn CostToGoHeuristics>,
    listener: Option<Box<dyn PlannerListener>>,

    start_node: Option<FootstepNode>,
    goal: Option<FootstepPlannerGoal>,
    planar_regions: Option<PlanarRegionsList>,
    foot_polygons: Option<SideDependent<ConvexPolygon2D>>,
    timeout: f64,

    graph: FootstepGraph,
    goal_nodes: Option<SideDependent<FootstepNode>>,
    end_node: Option<FootstepNode>,
}

impl AStarFootstepPlanner {
    /// A planner with the default strategies: terrain-snap checking,
    /// parameter-based expansion, distance-and-yaw cost and heuristics.
    pub fn new(parameters: FootstepPlannerParameters) -> Self {
        let checker = Box::new(SnapBasedNodeChecker::new(parameters.clone()));
        let expansion = Box::new(ParameterBasedNodeExpansion::new(&parameters));
        let step_cost = Box::new(DistanceAndYawBasedCost::new(&parameters));
        let heuristics = Box::new(DistanceAndYawBasedHeuristics::new(&parameters));
        Self::with_strategies(parameters, checker, expansion, step_cost, heuristics)
    }

    /// A planner with caller-supplied strategies.
    pub fn with_strategies(
        parameters: FootstepPlannerParameters,
        checker: Box<dyn FootstepNodeChecker>,
        expansion: Box<dyn FootstepNodeExpansion>,
        step_cost: Box<dyn FootstepCost>,
        heuristics: Box<dyn CostToGoHeuristics>,
    ) -> Self {
        let timeout = parameters.timeout;
        Self {
            parameters,
            checker,
            expansion,
            step_cost,
            heuristics,
            listener: None,
            start_node: None,
            goal: None,
            planar_regions: None,
            foot_polygons: None,
            timeout,
            graph: FootstepGraph::new(),
            goal_nodes: None,
            end_node: None,
        }
    }

    /// Sets the starting stance: the sole pose of the planted foot and
    /// which foot it is.
    pub fn set_start(&mut self, pose: &Isometry3<f64>, side: RobotSide) {
        let (_, _, yaw) = pose.rotation.euler_angles();
        self.start_node = Some(FootstepNode::new(
            pose.translation.vector.x,
            pose.translation.vector.y,
            yaw,
            side,
        ));
    }

    pub fn set_goal(&mut self, goal: FootstepPlannerGoal) {
        self.goal = Some(goal);
    }

    /// Replaces the terrain model for this planner and its checker. The
    /// model is treated as immutable for the duration of a `plan()` call.
    pub fn set_planar_regions(&mut self, regions: Option<PlanarRegionsList>) {
        self.checker.set_planar_regions(regions.clone());
        self.planar_regions = regions;
    }

    /// Per-side foot sole outlines, used by the checker for foot-on-foot
    /// collision and by plan synthesis as the gate for terrain snapping.
    pub fn set_foot_polygons(&mut self, polygons: Option<SideDependent<ConvexPolygon2D>>) {
        self.checker.set_foot_polygons(polygons.clone());
        self.foot_polygons = polygons;
    }

    /// Overrides the wall-clock budget from the parameters (seconds).
    pub fn set_timeout(&mut self, timeout: f64) {
        self.timeout = timeout;
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn PlannerListener>>) {
        self.listener = listener;
    }

    /// Runs the search to completion on the calling thread.
    ///
    /// `Err` is reserved for precondition violations; every way a healthy
    /// search can end, including timeout and no-path, comes back as an
    /// `Ok(FootstepPlanningResult)`.
    pub fn plan(&mut self) -> Result<FootstepPlanningResult, FootstepPlannerError> {
        let start_node = self.start_node.ok_or(FootstepPlannerError::StartNotSet)?;
        let goal = self.goal.as_ref().ok_or(FootstepPlannerError::GoalNotSet)?;
        let goal_pose = match goal {
            FootstepPlannerGoal::PoseBetweenFeet { pose } => *pose,
            other => {
                return Err(FootstepPlannerError::UnsupportedGoalType {
                    goal_type: other.type_name(),
                })
            }
        };

        let goal_nodes = goal_nodes_from_pose(&goal_pose, self.parameters.ideal_footstep_width);
        debug!(
            "planning from ({:.2}, {:.2}, {}) toward ({:.2}, {:.2})",
            start_node.x(),
            start_node.y(),
            start_node.side(),
            goal_pose.translation.vector.x,
            goal_pose.translation.vector.y,
        );

        self.end_node = None;
        self.graph.initialize(start_node);

        let mut open_list = BinaryHeap::new();
        let mut closed_set: HashSet<FootstepNode> = HashSet::new();
        let f_start = self
            .heuristics
            .compute(&start_node, goal_nodes.get(start_node.side()));
        open_list.push(NodeComparator::new(start_node, f_start));

        let start_time = Instant::now();
        loop {
            if start_time.elapsed().as_secs_f64() > self.timeout {
                warn!(
                    "footstep planning timed out after {:.3} s ({} nodes expanded)",
                    start_time.elapsed().as_secs_f64(),
                    closed_set.len()
                );
                break;
            }
            let Some(entry) = open_list.pop() else {
                break;
            };

            // Lazy deletion: every relaxation pushes a fresh entry, so
            // stale duplicates are discarded here instead of keeping a
            // decrease-key heap.
            let node = entry.node;
            if !closed_set.insert(node) {
                continue;
            }
            if let Some(listener) = self.listener.as_mut() {
                listener.node_expanded(&node);
            }

            if node == *goal_nodes.get(node.side()) {
                // One goal foot reached; close the stance by attaching the
                // other side's goal node with a zero-cost edge.
                let other_goal = *goal_nodes.get(node.side().opposite());
                self.graph.set_edge(node, other_goal, 0.0);
                self.end_node = Some(other_goal);
                debug!("goal reached after {} expansions", closed_set.len());
                break;
            }

            for candidate in self.expansion.expand_node(&node) {
                if !self.checker.is_node_valid(&candidate, Some(&node)) {
                    continue;
                }
                let edge_cost = self.step_cost.compute(&node, &candidate);
                // A non-improving relaxation leaves a better queue entry
                // for the candidate in place already, so only re-queue on
                // improvement.
                if !self.graph.check_and_set_edge(node, candidate, edge_cost) {
                    continue;
                }
                if let Some(g) = self.graph.cost_from_start(&candidate) {
                    let f = g
                        + self
                            .heuristics
                            .compute(&candidate, goal_nodes.get(candidate.side()));
                    open_list.push(NodeComparator::new(candidate, f));
                }
            }
        }

        let result = if self.end_node.is_some() {
            if self.heuristics.weight() <= 1.0 {
                FootstepPlanningResult::OptimalSolution
            } else {
                FootstepPlanningResult::SubOptimalSolution
            }
        } else if open_list.is_empty() {
            FootstepPlanningResult::NoPathExists
        } else {
            FootstepPlanningResult::TimedOutBeforeSolution
        };

        self.goal_nodes = Some(goal_nodes);
        if let Some(end_node) = self.end_node {
            if let Some(path) = self.graph.path_from_start(&end_node) {
                if let Some(listener) = self.listener.as_mut() {
                    listener.plan_found(&path);
                }
            }
        }
        info!(
            "footstep planning finished: {:?} ({} nodes expanded)",
            result,
            closed_set.len()
        );
        Ok(result)
    }

    /// The plan found by the last `plan()` call, with every footstep
    /// turned into a full 3D sole pose. `None` unless that call reported a
    /// solution.
    pub fn get_plan(&self) -> Option<FootstepPlan> {
        let end_node = self.end_node?;
        let path = self.graph.path_from_start(&end_node)?;

        let mut plan = FootstepPlan::default();
        // The first entry is the start stance, which the robot is already
        // standing on.
        for node in path.iter().skip(1) {
            plan.push(PlannedFootstep {
                side: node.side(),
                sole_pose: self.sole_pose(node),
            });
        }
        Some(plan)
    }

    /// Accumulated edge cost of the found path, if any.
    pub fn path_cost(&self) -> Option<f64> {
        self.graph.cost_from_start(&self.end_node?)
    }

    /// The per-side goal nodes built by the last `plan()` call. Mostly
    /// useful for visualization.
    pub fn goal_nodes(&self) -> Option<&SideDependent<FootstepNode>> {
        self.goal_nodes.as_ref()
    }

    pub fn parameters(&self) -> &FootstepPlannerParameters {
        &self.parameters
    }

    /// Full 3D pose for one footstep: snapped onto the terrain when both a
    /// terrain model and foot geometry are available, the flat planar pose
    /// otherwise.
    fn sole_pose(&self, node: &FootstepNode) -> Isometry3<f64> {
        if let (Some(regions), Some(_polygons)) = (&self.planar_regions, &self.foot_polygons) {
            if let Some(snap) = snap_point_to_regions(node.x(), node.y(), regions) {
                return snapped_sole_pose(node.x(), node.y(), node.yaw(), &snap);
            }
        }
        Isometry3::from_parts(
            Translation3::new(node.x(), node.y(), 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), node.yaw()),
        )
    }
}

/// Expands the "pose between feet" goal into one goal node per side, each
/// offset laterally by half the stance width along the goal frame's
/// y-axis.
fn goal_nodes_from_pose(
    pose: &Isometry3<f64>,
    ideal_footstep_width: f64,
) -> SideDependent<FootstepNode> {
    let (_, _, yaw) = pose.rotation.euler_angles();
    let (sin, cos) = yaw.sin_cos();
    let half_width = 0.5 * ideal_footstep_width;
    SideDependent::from_fn(|side| {
        let offset = side.y_sign() * half_width;
        FootstepNode::new(
            pose.translation.vector.x - sin * offset,
            pose.translation.vector.y + cos * offset,
            yaw,
            side,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::AlwaysValidNodeChecker;
    use crate::terrain::{ConvexPolygon2D, PlanarRegion};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn planar_pose(x: f64, y: f64, yaw: f64) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::new(x, y, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
        )
    }

    fn rect_region(half_x: f64, half_y: f64, x: f64, y: f64, z: f64) -> PlanarRegion {
        let polygon = ConvexPolygon2D::new(vec![
            Point2::new(half_x, half_y),
            Point2::new(-half_x, half_y),
            Point2::new(-half_x, -half_y),
            Point2::new(half_x, -half_y),
        ]);
        PlanarRegion::new(
            polygon,
            Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity()),
        )
    }

    /// Collapses the yaw sampling so the scenario searches stay small.
    fn walking_straight_parameters() -> FootstepPlannerParameters {
        FootstepPlannerParameters {
            min_step_yaw: 0.0,
            max_step_yaw: 0.0,
            step_yaw_stride: 0.1,
            ..Default::default()
        }
    }

    fn goal_at(x: f64, y: f64) -> FootstepPlannerGoal {
        FootstepPlannerGoal::PoseBetweenFeet {
            pose: planar_pose(x, y, 0.0),
        }
    }

    #[test]
    fn missing_start_is_a_fatal_precondition() {
        let mut planner = AStarFootstepPlanner::new(FootstepPlannerParameters::default());
        planner.set_goal(goal_at(1.0, 0.0));
        assert_eq!(planner.plan(), Err(FootstepPlannerError::StartNotSet));
    }

    #[test]
    fn missing_goal_is_a_fatal_precondition() {
        let mut planner = AStarFootstepPlanner::new(FootstepPlannerParameters::default());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        assert_eq!(planner.plan(), Err(FootstepPlannerError::GoalNotSet));
    }

    #[test]
    fn single_footstep_goals_are_rejected() {
        let mut planner = AStarFootstepPlanner::new(FootstepPlannerParameters::default());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(FootstepPlannerGoal::SingleFootstep {
            pose: planar_pose(1.0, 0.0, 0.0),
            side: RobotSide::Left,
        });
        assert_eq!(
            planner.plan(),
            Err(FootstepPlannerError::UnsupportedGoalType {
                goal_type: "single footstep"
            })
        );
    }

    #[test]
    fn goal_nodes_straddle_the_goal_pose() {
        let nodes = goal_nodes_from_pose(&planar_pose(2.0, 0.0, 0.0), 0.25);
        let left = nodes.get(RobotSide::Left);
        let right = nodes.get(RobotSide::Right);
        assert!(left.y() > 0.0);
        assert!(right.y() < 0.0);
        assert_relative_eq!(left.y(), -right.y(), epsilon = 1e-12);
        assert_relative_eq!(left.x(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_ground_straight_line_is_optimal() {
        // Default parameters (heuristic weight 1.0), no terrain model: the
        // checker runs in flat-ground kinematic mode.
        let params = FootstepPlannerParameters::default();
        let mut planner = AStarFootstepPlanner::new(params.clone());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(2.0, 0.0));

        let result = planner.plan().unwrap();
        assert_eq!(result, FootstepPlanningResult::OptimalSolution);

        let plan = planner.get_plan().unwrap();
        assert!(!plan.is_empty());

        // The first swing is with the foot opposite the start stance, and
        // sides alternate from there.
        assert_eq!(plan.get(0).unwrap().side, RobotSide::Right);
        for i in 1..plan.len() {
            assert_eq!(
                plan.get(i).unwrap().side,
                plan.get(i - 1).unwrap().side.opposite()
            );
        }

        // Every step stays within the kinematic reach, start included.
        let mut previous = (0.0, 0.0);
        for step in plan.iter() {
            let t = &step.sole_pose.translation.vector;
            let reach = ((t.x - previous.0).powi(2) + (t.y - previous.1).powi(2)).sqrt();
            assert!(reach <= params.max_step_reach + 1e-9);
            previous = (t.x, t.y);
        }

        // The final pair straddles the goal along its lateral offsets.
        let last = &plan.get(plan.len() - 1).unwrap().sole_pose.translation.vector;
        let second_last = &plan.get(plan.len() - 2).unwrap().sole_pose.translation.vector;
        assert_relative_eq!(last.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(second_last.x, 2.0, epsilon = 1e-9);
        assert!(last.y * second_last.y < 0.0);
    }

    #[test]
    fn zero_timeout_times_out_before_any_solution() {
        let mut planner = AStarFootstepPlanner::new(walking_straight_parameters());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(1.0, 0.0));
        planner.set_timeout(0.0);

        let result = planner.plan().unwrap();
        assert_eq!(result, FootstepPlanningResult::TimedOutBeforeSolution);
        assert!(planner.get_plan().is_none());
        assert!(planner.path_cost().is_none());
    }

    #[test]
    fn repeated_plans_are_identical() {
        let mut planner = AStarFootstepPlanner::new(walking_straight_parameters());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(1.0, 0.0));

        assert!(planner.plan().unwrap().valid_for_execution());
        let first = planner.get_plan().unwrap();

        assert!(planner.plan().unwrap().valid_for_execution());
        let second = planner.get_plan().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn islands_beyond_reach_have_no_path() {
        let mut planner = AStarFootstepPlanner::new(walking_straight_parameters());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(2.0, 0.0));
        planner.set_planar_regions(Some(PlanarRegionsList::new(vec![
            rect_region(0.4, 0.4, 0.0, 0.0, 0.0),
            rect_region(0.4, 0.4, 2.0, 0.0, 0.0),
        ])));

        let result = planner.plan().unwrap();
        assert_eq!(result, FootstepPlanningResult::NoPathExists);
        assert!(planner.get_plan().is_none());
    }

    #[test]
    fn goal_far_outside_the_terrain_has_no_path() {
        let mut planner = AStarFootstepPlanner::new(walking_straight_parameters());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(50.0, 0.0));
        planner.set_planar_regions(Some(PlanarRegionsList::new(vec![rect_region(
            0.3, 0.3, 0.0, 0.0, 0.0,
        )])));

        let result = planner.plan().unwrap();
        assert_eq!(result, FootstepPlanningResult::NoPathExists);
        assert!(planner.get_plan().is_none());
    }

    #[test]
    fn inflating_the_heuristic_trades_optimality_for_speed() {
        let run = |weight: f64| {
            let params = FootstepPlannerParameters {
                heuristic_weight: weight,
                ..walking_straight_parameters()
            };
            let mut planner = AStarFootstepPlanner::new(params);
            planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
            planner.set_goal(goal_at(1.0, 0.0));
            let result = planner.plan().unwrap();
            (result, planner.path_cost().unwrap())
        };

        let (optimal_result, optimal_cost) = run(1.0);
        let (inflated_result, inflated_cost) = run(2.0);

        assert_eq!(optimal_result, FootstepPlanningResult::OptimalSolution);
        assert_eq!(inflated_result, FootstepPlanningResult::SubOptimalSolution);
        assert!(optimal_cost <= inflated_cost + 1e-9);
    }

    #[test]
    fn plans_are_snapped_onto_the_terrain() {
        let params = walking_straight_parameters();
        let mut planner = AStarFootstepPlanner::new(params.clone());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(0.6, 0.0));
        planner.set_planar_regions(Some(PlanarRegionsList::new(vec![rect_region(
            2.0, 1.0, 0.5, 0.0, 0.3,
        )])));
        planner.set_foot_polygons(Some(params.default_foot_polygons()));

        let result = planner.plan().unwrap();
        assert!(result.valid_for_execution());

        let plan = planner.get_plan().unwrap();
        assert!(!plan.is_empty());
        for step in plan.iter() {
            assert_relative_eq!(step.sole_pose.translation.vector.z, 0.3, epsilon = 1e-9);
        }
    }

    #[test]
    fn listener_observes_expansions_and_the_final_path() {
        use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
        use std::sync::Arc;

        #[derive(Default)]
        struct Recorder {
            expanded: Arc<AtomicUsize>,
            path_len: Arc<AtomicUsize>,
        }

        impl PlannerListener for Recorder {
            fn node_expanded(&mut self, _node: &FootstepNode) {
                self.expanded.fetch_add(1, AtomicOrdering::Relaxed);
            }

            fn plan_found(&mut self, path: &[FootstepNode]) {
                self.path_len.store(path.len(), AtomicOrdering::Relaxed);
            }
        }

        let expanded = Arc::new(AtomicUsize::new(0));
        let path_len = Arc::new(AtomicUsize::new(0));

        let mut planner = AStarFootstepPlanner::new(walking_straight_parameters());
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(0.6, 0.0));
        planner.set_listener(Some(Box::new(Recorder {
            expanded: expanded.clone(),
            path_len: path_len.clone(),
        })));

        assert!(planner.plan().unwrap().valid_for_execution());
        let plan = planner.get_plan().unwrap();

        assert!(expanded.load(AtomicOrdering::Relaxed) > 0);
        // The listener sees the whole path, start stance included.
        assert_eq!(path_len.load(AtomicOrdering::Relaxed), plan.len() + 1);
    }

    #[test]
    fn custom_strategies_can_be_injected() {
        let params = walking_straight_parameters();
        let mut planner = AStarFootstepPlanner::with_strategies(
            params.clone(),
            Box::new(AlwaysValidNodeChecker),
            Box::new(ParameterBasedNodeExpansion::new(&params)),
            Box::new(DistanceAndYawBasedCost::new(&params)),
            Box::new(DistanceAndYawBasedHeuristics::with_weight(&params, 1.0)),
        );
        planner.set_start(&planar_pose(0.0, 0.0, 0.0), RobotSide::Left);
        planner.set_goal(goal_at(0.6, 0.0));

        assert_eq!(
            planner.plan().unwrap(),
            FootstepPlanningResult::OptimalSolution
        );
    }
}
