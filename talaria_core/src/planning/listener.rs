// talaria_core/src/planning/listener.rs

use crate::graph::FootstepNode;

/// Side-effect-only observer of the search, for visualization and
/// debugging. Implementations must never influence the search outcome.
///
/// The planner calls `node_expanded` every time a node is taken off the
/// frontier and `plan_found` once with the final path on success.
pub trait PlannerListener: Send {
    fn node_expanded(&mut self, node: &FootstepNode) {
        let _ = node;
    }

    fn plan_found(&mut self, path: &[FootstepNode]) {
        let _ = path;
    }
}

/// A listener that ignores everything. Used when nobody is watching.
#[derive(Default, Debug, Clone)]
pub struct NoOpPlannerListener;

impl PlannerListener for NoOpPlannerListener {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RobotSide;

    struct CountingListener {
        expanded: usize,
    }

    impl PlannerListener for CountingListener {
        fn node_expanded(&mut self, _node: &FootstepNode) {
            self.expanded += 1;
        }
    }

    #[test]
    fn default_methods_are_no_ops() {
        let mut listener = NoOpPlannerListener;
        let node = FootstepNode::new(0.0, 0.0, 0.0, RobotSide::Left);
        listener.node_expanded(&node);
        listener.plan_found(&[node]);
    }

    #[test]
    fn overridden_methods_observe() {
        let mut listener = CountingListener { expanded: 0 };
        let node = FootstepNode::new(0.0, 0.0, 0.0, RobotSide::Left);
        listener.node_expanded(&node);
        listener.node_expanded(&node);
        assert_eq!(listener.expanded, 2);
    }
}
