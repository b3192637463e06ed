// talaria_core/src/terrain/mod.rs

use nalgebra::{Isometry3, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

// --- Terrain Data Structures ---
// The terrain model consumed by the planner: a list of standable planar
// surfaces, each a convex 2D polygon with a rigid placement in the world.
// It is produced by an external perception pipeline and read-only here.

/// A convex polygon in a local 2D frame, vertices in counter-clockwise
/// order. Used both for terrain region outlines and for foot footprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon2D {
    vertices: Vec<Point2<f64>>,
}

impl ConvexPolygon2D {
    /// Vertices must be in counter-clockwise order and describe a convex
    /// shape; both are the caller's responsibility.
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        debug_assert!(vertices.len() >= 3, "a polygon needs at least 3 vertices");
        Self { vertices }
    }

    /// An axis-aligned rectangle centered on the origin. The conventional
    /// foot footprint: `length` along x, `width` along y.
    pub fn rectangle(length: f64, width: f64) -> Self {
        let half_l = 0.5 * length;
        let half_w = 0.5 * width;
        Self::new(vec![
            Point2::new(half_l, half_w),
            Point2::new(-half_l, half_w),
            Point2::new(-half_l, -half_w),
            Point2::new(half_l, -half_w),
        ])
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn centroid(&self) -> Point2<f64> {
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
        Point2::new(sx / n, sy / n)
    }

    /// Half-plane test against every edge. Points on the boundary count as
    /// inside (within a small tolerance).
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        const EPS: f64 = 1e-9;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x);
            if cross < -EPS {
                return false;
            }
        }
        true
    }

    /// The polygon rotated by `yaw` and translated by `(x, y)`.
    pub fn transformed(&self, x: f64, y: f64, yaw: f64) -> ConvexPolygon2D {
        let (sin, cos) = yaw.sin_cos();
        let vertices = self
            .vertices
            .iter()
            .map(|v| Point2::new(x + cos * v.x - sin * v.y, y + sin * v.x + cos * v.y))
            .collect();
        ConvexPolygon2D { vertices }
    }

    /// Convex-convex overlap via the separating-axis test.
    pub fn intersects(&self, other: &ConvexPolygon2D) -> bool {
        !self.has_separating_edge(other) && !other.has_separating_edge(self)
    }

    fn has_separating_edge(&self, other: &ConvexPolygon2D) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            // Outward normal of a CCW edge.
            let normal = (b.y - a.y, -(b.x - a.x));
            let all_outside = other
                .vertices
                .iter()
                .all(|v| normal.0 * (v.x - a.x) + normal.1 * (v.y - a.y) > 0.0);
            if all_outside {
                return true;
            }
        }
        false
    }
}

/// A single standable surface: a convex outline in the region's local
/// xy-plane plus the rigid transform placing that plane in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarRegion {
    polygon: ConvexPolygon2D,
    transform_to_world: Isometry3<f64>,
}

impl PlanarRegion {
    pub fn new(polygon: ConvexPolygon2D, transform_to_world: Isometry3<f64>) -> Self {
        Self {
            polygon,
            transform_to_world,
        }
    }

    pub fn polygon(&self) -> &ConvexPolygon2D {
        &self.polygon
    }

    pub fn transform_to_world(&self) -> &Isometry3<f64> {
        &self.transform_to_world
    }

    /// World-frame normal of the region plane, flipped to point upward so
    /// that incline checks and snap orientations are well-defined.
    pub fn normal(&self) -> Vector3<f64> {
        let normal = self.transform_to_world.rotation * Vector3::z();
        if normal.z < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// World z of the region plane on the vertical line through `(x, y)`,
    /// or `None` when the line misses the region outline or the plane is
    /// too close to vertical for a height to mean anything.
    pub fn height_at(&self, x: f64, y: f64) -> Option<f64> {
        const MIN_NORMAL_Z: f64 = 1e-6;
        let normal = self.normal();
        if normal.z < MIN_NORMAL_Z {
            return None;
        }

        // Plane equation solved for z on the vertical line.
        let p0 = self.transform_to_world.translation.vector;
        let z = p0.z + (normal.x * (p0.x - x) + normal.y * (p0.y - y)) / normal.z;

        let local = self
            .transform_to_world
            .inverse_transform_point(&Point3::new(x, y, z));
        if self.polygon.contains(&Point2::new(local.x, local.y)) {
            Some(z)
        } else {
            None
        }
    }
}

/// The terrain model handed to the planner: an ordered list of planar
/// regions. Order matters only for determinism of iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarRegionsList {
    regions: Vec<PlanarRegion>,
}

impl PlanarRegionsList {
    pub fn new(regions: Vec<PlanarRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[PlanarRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

pub mod snapping;

pub use snapping::{snap_point_to_regions, snapped_sole_pose, FootstepNodeSnapData};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion};

    fn square(half: f64) -> ConvexPolygon2D {
        ConvexPolygon2D::new(vec![
            Point2::new(half, half),
            Point2::new(-half, half),
            Point2::new(-half, -half),
            Point2::new(half, -half),
        ])
    }

    #[test]
    fn polygon_contains_interior_and_boundary() {
        let polygon = square(1.0);
        assert!(polygon.contains(&Point2::new(0.0, 0.0)));
        assert!(polygon.contains(&Point2::new(1.0, 0.0)));
        assert!(!polygon.contains(&Point2::new(1.1, 0.0)));
        assert!(!polygon.contains(&Point2::new(0.0, -1.5)));
    }

    #[test]
    fn rectangle_has_expected_extent() {
        let foot = ConvexPolygon2D::rectangle(0.2, 0.1);
        assert!(foot.contains(&Point2::new(0.09, 0.04)));
        assert!(!foot.contains(&Point2::new(0.11, 0.0)));
        assert_relative_eq!(foot.centroid().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(foot.centroid().y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn polygons_overlap_and_separate() {
        let a = square(0.5);
        let b = square(0.5).transformed(0.6, 0.0, 0.0);
        let c = square(0.5).transformed(1.5, 0.0, 0.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));

        // Rotation can separate two boxes that would overlap axis-aligned.
        let d = square(0.5).transformed(0.95, 0.95, std::f64::consts::FRAC_PI_4);
        assert!(!a.intersects(&d));
    }

    #[test]
    fn flat_region_height() {
        let region = PlanarRegion::new(
            square(1.0),
            Isometry3::from_parts(Translation3::new(0.0, 0.0, 0.3), UnitQuaternion::identity()),
        );
        assert_relative_eq!(region.height_at(0.5, -0.5).unwrap(), 0.3, epsilon = 1e-12);
        assert!(region.height_at(2.0, 0.0).is_none());
    }

    #[test]
    fn sloped_region_height_follows_the_plane() {
        // Plane rotated 30 degrees about y: z drops as x grows.
        let pitch = 30f64.to_radians();
        let rotation = UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), pitch);
        let region = PlanarRegion::new(
            square(1.0),
            Isometry3::from_parts(Translation3::new(0.0, 0.0, 1.0), rotation),
        );

        let normal = region.normal();
        assert_relative_eq!(normal.z, pitch.cos(), epsilon = 1e-12);

        let z = region.height_at(0.2, 0.0).unwrap();
        assert_relative_eq!(z, 1.0 - 0.2 * pitch.tan(), epsilon = 1e-12);
    }

    #[test]
    fn vertical_region_has_no_height() {
        let rotation =
            UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
        let region = PlanarRegion::new(
            square(1.0),
            Isometry3::from_parts(Translation3::new(0.0, 0.0, 0.0), rotation),
        );
        assert!(region.height_at(0.0, 0.0).is_none());
    }
}
