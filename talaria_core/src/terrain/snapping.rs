// talaria_core/src/terrain/snapping.rs

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::terrain::PlanarRegionsList;

// --- Footprint Snap ---
// Converts an abstract 2D footstep cell into the 3D surface it would rest
// on: pick the best supporting region under the foot center, then lift and
// tilt the flat pose onto that region's plane.

/// Result of projecting a footstep location onto the terrain model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootstepNodeSnapData {
    /// Index of the supporting region in the `PlanarRegionsList`.
    pub region_index: usize,
    /// World z of the supporting surface under the foot center.
    pub surface_height: f64,
    /// Upward-pointing world-frame normal of the supporting surface.
    pub surface_normal: Vector3<f64>,
}

/// Finds the supporting region for a foot centered at `(x, y)`.
///
/// Among the regions whose outline contains the vertical line through the
/// foot center, the HIGHEST surface wins: when surfaces overlap (a step on
/// top of a ramp, rubble on the floor), the foot rests on whatever is on
/// top. Returns `None` when nothing lies under the foot at all.
pub fn snap_point_to_regions(
    x: f64,
    y: f64,
    regions: &PlanarRegionsList,
) -> Option<FootstepNodeSnapData> {
    let mut best: Option<FootstepNodeSnapData> = None;
    for (region_index, region) in regions.regions().iter().enumerate() {
        let Some(surface_height) = region.height_at(x, y) else {
            continue;
        };
        let candidate = FootstepNodeSnapData {
            region_index,
            surface_height,
            surface_normal: region.normal(),
        };
        match &best {
            Some(current) if current.surface_height >= surface_height => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Composes the flat planar footstep pose `(x, y, yaw)` with a snap result:
/// the sole is translated up to the surface and tilted onto the surface
/// plane, keeping its heading.
pub fn snapped_sole_pose(x: f64, y: f64, yaw: f64, snap: &FootstepNodeSnapData) -> Isometry3<f64> {
    let yaw_rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw);
    // Minimal rotation taking world-up onto the surface normal. The normal
    // is guaranteed upward, so the two vectors are never opposed.
    let tilt = UnitQuaternion::rotation_between(&Vector3::z(), &snap.surface_normal)
        .unwrap_or_else(UnitQuaternion::identity);
    Isometry3::from_parts(
        Translation3::new(x, y, snap.surface_height),
        tilt * yaw_rotation,
    )
}
