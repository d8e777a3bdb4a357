//! Global constants for vb-core

/// Outward offset of the sketch plane from the anchor voxel face.
/// Keeps ray intersections from landing inside the anchor voxel itself.
pub const PLANE_OFFSET: f64 = 0.008;

/// Minimum |dot(ray direction, face normal)| for a ray/plane intersection.
/// Below this the ray is treated as parallel to the plane.
pub const RAY_EPSILON: f64 = 1.0e-6;
