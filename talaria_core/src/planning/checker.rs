// talaria_core/src/planning/checker.rs

use log::trace;
use std::collections::HashMap;

use crate::graph::{wrap_angle, FootstepNode};
use crate::parameters::FootstepPlannerParameters;
use crate::planning::FootstepNodeChecker;
use crate::terrain::{snap_point_to_regions, ConvexPolygon2D, FootstepNodeSnapData, PlanarRegionsList};
use crate::types::SideDependent;

/// A checker that accepts every candidate. Used when the terrain is known
/// to be flat and obstacle-free, or in tests that exercise the search loop
/// in isolation.
#[derive(Default, Debug, Clone)]
pub struct AlwaysValidNodeChecker;

impl FootstepNodeChecker for AlwaysValidNodeChecker {
    fn set_planar_regions(&mut self, _regions: Option<PlanarRegionsList>) {
        // No-op: this checker never looks at terrain.
    }

    fn is_node_valid(&mut self, _node: &FootstepNode, _previous: Option<&FootstepNode>) -> bool {
        true
    }
}

/// The terrain-aware validity gate: enforces the kinematic step envelope
/// against the predecessor and requires a supporting planar region under
/// the candidate foot.
///
/// Snap results are memoized per planar grid cell. Many different parents
/// propose the same discretized footprint during a search, so everything
/// after the first query for a cell is a hash lookup. The cache lives for
/// as long as the terrain model it was computed from: replacing the model
/// drops it.
pub struct SnapBasedNodeChecker {
    parameters: FootstepPlannerParameters,
    planar_regions: Option<PlanarRegionsList>,
    foot_polygons: Option<SideDependent<ConvexPolygon2D>>,
    snap_cache: HashMap<(i32, i32), Option<FootstepNodeSnapData>>,
}

impl SnapBasedNodeChecker {
    pub fn new(parameters: FootstepPlannerParameters) -> Self {
        Self {
            parameters,
            planar_regions: None,
            foot_polygons: None,
            snap_cache: HashMap::new(),
        }
    }

    /// Snap result for the cell under `node`, computed once per cell.
    fn snap(&mut self, node: &FootstepNode) -> Option<FootstepNodeSnapData> {
        // Destructure so the cache borrow and the regions borrow are
        // disjoint.
        let Self {
            planar_regions,
            snap_cache,
            ..
        } = self;
        let regions = planar_regions.as_ref()?;
        *snap_cache
            .entry((node.x_index(), node.y_index()))
            .or_insert_with(|| snap_point_to_regions(node.x(), node.y(), regions))
    }

    /// The kinematic step envelope, evaluated in the stance foot's frame.
    fn is_step_kinematically_valid(&self, node: &FootstepNode, previous: &FootstepNode) -> bool {
        let params = &self.parameters;

        let dx = node.x() - previous.x();
        let dy = node.y() - previous.y();
        let reach = (dx * dx + dy * dy).sqrt();
        if reach > params.max_step_reach {
            return false;
        }

        // Rotate the world-frame offset into the stance frame, mirroring
        // the lateral axis so `lateral > 0` always means "outward".
        let (sin, cos) = previous.yaw().sin_cos();
        let forward = cos * dx + sin * dy;
        let lateral = (-sin * dx + cos * dy) * node.side().y_sign();

        if forward < params.min_step_length || forward > params.max_step_length {
            return false;
        }
        if lateral < params.min_step_width || lateral > params.max_step_width {
            // Too narrow covers crossover and stepping onto the stance
            // foot; too wide is out of reach for the hips.
            return false;
        }

        let yaw_change = wrap_angle(node.yaw() - previous.yaw()) * node.side().y_sign();
        if yaw_change < params.min_step_yaw || yaw_change > params.max_step_yaw {
            return false;
        }

        if let Some(polygons) = &self.foot_polygons {
            let candidate = polygons[node.side()].transformed(node.x(), node.y(), node.yaw());
            let stance =
                polygons[previous.side()].transformed(previous.x(), previous.y(), previous.yaw());
            if candidate.intersects(&stance) {
                return false;
            }
        }

        true
    }
}

impl FootstepNodeChecker for SnapBasedNodeChecker {
    fn set_planar_regions(&mut self, regions: Option<PlanarRegionsList>) {
        self.planar_regions = regions;
        self.snap_cache.clear();
    }

    fn set_foot_polygons(&mut self, polygons: Option<SideDependent<ConvexPolygon2D>>) {
        self.foot_polygons = polygons;
    }

    fn is_node_valid(&mut self, node: &FootstepNode, previous: Option<&FootstepNode>) -> bool {
        if let Some(previous) = previous {
            debug_assert_eq!(
                node.side(),
                previous.side().opposite(),
                "consecutive footsteps must alternate sides"
            );
            if !self.is_step_kinematically_valid(node, previous) {
                return false;
            }
        }

        // Without a terrain model the checker degrades to the kinematic
        // envelope alone (flat-ground mode).
        if self.planar_regions.is_none() {
            return true;
        }

        let Some(snap) = self.snap(node) else {
            trace!(
                "rejecting ({}, {}): no supporting region",
                node.x_index(),
                node.y_index()
            );
            return false;
        };

        let max_incline_cos = self.parameters.max_surface_incline.cos();
        if snap.surface_normal.z < max_incline_cos {
            trace!(
                "rejecting ({}, {}): surface too steep",
                node.x_index(),
                node.y_index()
            );
            return false;
        }

        if let Some(previous) = previous {
            // The predecessor was validated before it was expanded, so its
            // snap is already cached.
            if let Some(previous_snap) = self.snap(previous) {
                let dz = (snap.surface_height - previous_snap.surface_height).abs();
                if dz > self.parameters.max_step_z {
                    return false;
                }
            }
        }

        true
    }
}
