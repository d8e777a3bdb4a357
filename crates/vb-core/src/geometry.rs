//! Plane Coordinate Transforms
//!
//! A sketch lives on an axis-aligned plane anchored to one face of a voxel
//! cell. This module is the single home for all six-way face handling:
//! local (u, v) <-> world mappings, integer lattice projections, ray/plane
//! intersection, and the backface test consumed by presentation code.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::constants::{PLANE_OFFSET, RAY_EPSILON};

/// One of the six axis-aligned faces of a voxel cell.
///
/// North/South are the -Z/+Z faces, East/West are +X/-X, Up/Down are +Y/-Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Face {
    /// Outward grid normal of this face
    pub fn normal(&self) -> IVec3 {
        match self {
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::Down => IVec3::new(0, -1, 0),
        }
    }

    /// Persistable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Face::North => "north",
            Face::South => "south",
            Face::East => "east",
            Face::West => "west",
            Face::Up => "up",
            Face::Down => "down",
        }
    }

    /// Parse a face from its persisted name (case-insensitive)
    pub fn parse(name: &str) -> Option<Face> {
        Face::all()
            .iter()
            .copied()
            .find(|face| face.as_str().eq_ignore_ascii_case(name))
    }

    /// All six faces
    pub fn all() -> &'static [Face] {
        &[
            Face::North,
            Face::South,
            Face::East,
            Face::West,
            Face::Up,
            Face::Down,
        ]
    }
}

/// Anchor of a sketch plane: a voxel cell plus the face the plane sits on.
///
/// Immutable once set on a session; replacing it resets dependent geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneOrigin {
    /// Anchor voxel cell
    pub cell: IVec3,
    /// Face the sketch plane is attached to
    pub face: Face,
}

impl PlaneOrigin {
    pub fn new(cell: IVec3, face: Face) -> Self {
        Self { cell, face }
    }
}

/// Continuous 2D coordinate on the sketch plane, relative to the origin cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchPoint {
    pub u: f64,
    pub v: f64,
}

impl SketchPoint {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// A straight segment between two sketch points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    pub start: SketchPoint,
    pub end: SketchPoint,
}

impl SketchLine {
    pub fn new(start: SketchPoint, end: SketchPoint) -> Self {
        Self { start, end }
    }

    /// True if this line joins the same two points, in either direction
    pub fn connects(&self, a: SketchPoint, b: SketchPoint) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }
}

/// Integer 2D lattice coordinate on the sketch plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneCell {
    pub u: i32,
    pub v: i32,
}

impl PlaneCell {
    pub fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }

    /// The four 4-connected neighbors
    pub fn neighbors(&self) -> [PlaneCell; 4] {
        [
            PlaneCell::new(self.u + 1, self.v),
            PlaneCell::new(self.u - 1, self.v),
            PlaneCell::new(self.u, self.v + 1),
            PlaneCell::new(self.u, self.v - 1),
        ]
    }
}

/// Axis-aligned bounding volume over voxel cells, max-exclusive
/// (`max` is one past the largest cell on every axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl VoxelBounds {
    /// Bounding volume of a set of cells.
    /// An empty input yields a zero-volume bounds at the grid origin.
    pub fn from_cells(cells: &[IVec3]) -> Self {
        if cells.is_empty() {
            return Self {
                min: IVec3::ZERO,
                max: IVec3::ZERO,
            };
        }

        let mut min = IVec3::MAX;
        let mut max = IVec3::MIN;
        for &cell in cells {
            min = min.min(cell);
            max = max.max(cell);
        }

        Self {
            min,
            max: max + IVec3::ONE,
        }
    }

    /// Extent per axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min
    }
}

/// Map a local plane coordinate to a continuous world position.
///
/// The horizontal local axis (u) walks the grid axis orthogonal to the face
/// normal that is not world-vertical; for Up/Down both local axes are
/// horizontal (u along X, v along Z).
pub fn plane_to_world(point: SketchPoint, origin: PlaneOrigin) -> DVec3 {
    let c = origin.cell.as_dvec3();
    match origin.face {
        Face::North => DVec3::new(c.x + point.u, c.y + point.v, c.z),
        Face::South => DVec3::new(c.x + point.u, c.y + point.v, c.z + 1.0),
        Face::East => DVec3::new(c.x + 1.0, c.y + point.v, c.z + point.u),
        Face::West => DVec3::new(c.x, c.y + point.v, c.z + point.u),
        Face::Up => DVec3::new(c.x + point.u, c.y + 1.0, c.z + point.v),
        Face::Down => DVec3::new(c.x + point.u, c.y, c.z + point.v),
    }
}

/// Project a continuous world position onto the plane's local coordinates
pub fn world_to_plane(position: DVec3, origin: PlaneOrigin) -> SketchPoint {
    let c = origin.cell.as_dvec3();
    match origin.face {
        Face::North | Face::South => SketchPoint::new(position.x - c.x, position.y - c.y),
        Face::East | Face::West => SketchPoint::new(position.z - c.z, position.y - c.y),
        Face::Up | Face::Down => SketchPoint::new(position.x - c.x, position.z - c.z),
    }
}

/// Discretize a continuous world position to its voxel cell (floor per axis)
pub fn floor_to_cell(position: DVec3) -> IVec3 {
    position.floor().as_ivec3()
}

/// Project a voxel cell onto the plane's integer lattice
pub fn world_cell_to_plane_cell(cell: IVec3, origin: PlaneOrigin) -> PlaneCell {
    let c = origin.cell;
    match origin.face {
        Face::North | Face::South => PlaneCell::new(cell.x - c.x, cell.y - c.y),
        Face::East | Face::West => PlaneCell::new(cell.z - c.z, cell.y - c.y),
        Face::Up | Face::Down => PlaneCell::new(cell.x - c.x, cell.z - c.z),
    }
}

/// Inverse of [`world_cell_to_plane_cell`]: the voxel cell a plane lattice
/// coordinate lands on
pub fn plane_cell_to_world_cell(cell: PlaneCell, origin: PlaneOrigin) -> IVec3 {
    let c = origin.cell;
    match origin.face {
        Face::North => IVec3::new(c.x + cell.u, c.y + cell.v, c.z),
        Face::South => IVec3::new(c.x + cell.u, c.y + cell.v, c.z + 1),
        Face::East => IVec3::new(c.x + 1, c.y + cell.v, c.z + cell.u),
        Face::West => IVec3::new(c.x, c.y + cell.v, c.z + cell.u),
        Face::Up => IVec3::new(c.x + cell.u, c.y + 1, c.z + cell.v),
        Face::Down => IVec3::new(c.x + cell.u, c.y, c.z + cell.v),
    }
}

/// Intersect a ray with the infinite plane containing the origin's face.
///
/// The plane sits [`PLANE_OFFSET`] outward from the voxel face. Returns
/// `None` when the ray is parallel to the plane or the plane lies behind
/// the ray origin; both are expected outcomes, not errors.
pub fn intersect_ray_with_plane(
    ray_origin: DVec3,
    ray_direction: DVec3,
    origin: PlaneOrigin,
) -> Option<DVec3> {
    let normal = origin.face.normal().as_dvec3();
    let denom = ray_direction.dot(normal);
    if denom.abs() < RAY_EPSILON {
        return None;
    }

    let t = (plane_anchor(origin) - ray_origin).dot(normal) / denom;
    if t <= 0.0 {
        return None;
    }

    Some(ray_origin + ray_direction * t)
}

/// True when the viewer is on the back side of the sketch plane.
///
/// Presentation code skips drawing sketch geometry for backfacing planes.
pub fn is_backface(origin: PlaneOrigin, viewer: DVec3) -> bool {
    let c = origin.cell.as_dvec3();
    let on_face = match origin.face {
        Face::North | Face::West | Face::Down => c,
        Face::South => DVec3::new(c.x, c.y, c.z + 1.0),
        Face::East => DVec3::new(c.x + 1.0, c.y, c.z),
        Face::Up => DVec3::new(c.x, c.y + 1.0, c.z),
    };

    (viewer - on_face).dot(origin.face.normal().as_dvec3()) <= 0.0
}

/// A point on the offset sketch plane, per face
fn plane_anchor(origin: PlaneOrigin) -> DVec3 {
    let c = origin.cell.as_dvec3();
    match origin.face {
        Face::North => DVec3::new(c.x, c.y, c.z - PLANE_OFFSET),
        Face::South => DVec3::new(c.x, c.y, c.z + 1.0 + PLANE_OFFSET),
        Face::East => DVec3::new(c.x + 1.0 + PLANE_OFFSET, c.y, c.z),
        Face::West => DVec3::new(c.x - PLANE_OFFSET, c.y, c.z),
        Face::Up => DVec3::new(c.x, c.y + 1.0 + PLANE_OFFSET, c.z),
        Face::Down => DVec3::new(c.x, c.y - PLANE_OFFSET, c.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_name_round_trip() {
        for &face in Face::all() {
            assert_eq!(Face::parse(face.as_str()), Some(face));
            assert_eq!(Face::parse(&face.as_str().to_uppercase()), Some(face));
        }
    }

    #[test]
    fn test_face_parse_invalid() {
        assert_eq!(Face::parse("sideways"), None);
        assert_eq!(Face::parse(""), None);
    }

    #[test]
    fn test_to_world_at_local_origin() {
        let cell = IVec3::new(2, 3, 4);
        let zero = SketchPoint::new(0.0, 0.0);

        let cases = [
            (Face::North, DVec3::new(2.0, 3.0, 4.0)),
            (Face::South, DVec3::new(2.0, 3.0, 5.0)),
            (Face::East, DVec3::new(3.0, 3.0, 4.0)),
            (Face::West, DVec3::new(2.0, 3.0, 4.0)),
            (Face::Up, DVec3::new(2.0, 4.0, 4.0)),
            (Face::Down, DVec3::new(2.0, 3.0, 4.0)),
        ];
        for (face, expected) in cases {
            let world = plane_to_world(zero, PlaneOrigin::new(cell, face));
            assert_eq!(world, expected, "face {face:?}");
        }
    }

    #[test]
    fn test_plane_world_round_trip_at_cell_granularity() {
        let cell = IVec3::new(-3, 7, 12);
        let samples = [
            SketchPoint::new(0.0, 0.0),
            SketchPoint::new(1.5, 2.25),
            SketchPoint::new(-2.75, 0.5),
            SketchPoint::new(4.0, -3.0),
        ];

        for &face in Face::all() {
            let origin = PlaneOrigin::new(cell, face);
            for p in samples {
                let world_cell = floor_to_cell(plane_to_world(p, origin));
                let lattice = world_cell_to_plane_cell(world_cell, origin);
                let expected = PlaneCell::new(p.u.floor() as i32, p.v.floor() as i32);
                assert_eq!(lattice, expected, "face {face:?} point {p:?}");
            }
        }
    }

    #[test]
    fn test_plane_cell_inverse_projection() {
        let origin = PlaneOrigin::new(IVec3::new(1, 2, 3), Face::East);
        let world = plane_cell_to_world_cell(PlaneCell::new(4, -1), origin);
        assert_eq!(world, IVec3::new(2, 1, 7));
        assert_eq!(world_cell_to_plane_cell(world, origin), PlaneCell::new(4, -1));
    }

    #[test]
    fn test_floor_to_cell_negative_coords() {
        assert_eq!(
            floor_to_cell(DVec3::new(-0.5, 1.999, -2.0)),
            IVec3::new(-1, 1, -2)
        );
    }

    #[test]
    fn test_ray_hits_offset_plane() {
        let origin = PlaneOrigin::new(IVec3::ZERO, Face::Up);
        let hit = intersect_ray_with_plane(
            DVec3::new(0.5, 5.0, 0.5),
            DVec3::new(0.0, -1.0, 0.0),
            origin,
        )
        .unwrap();

        assert!((hit.y - (1.0 + PLANE_OFFSET)).abs() < 1.0e-9);
        let local = world_to_plane(hit, origin);
        assert!((local.u - 0.5).abs() < 1.0e-9);
        assert!((local.v - 0.5).abs() < 1.0e-9);
    }

    #[test]
    fn test_ray_parallel_returns_none() {
        let origin = PlaneOrigin::new(IVec3::ZERO, Face::Up);
        let hit = intersect_ray_with_plane(
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            origin,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_plane_behind_origin_returns_none() {
        // Looking straight up from above the Up plane: t would be negative.
        let origin = PlaneOrigin::new(IVec3::ZERO, Face::Up);
        let hit = intersect_ray_with_plane(
            DVec3::new(0.5, 5.0, 0.5),
            DVec3::new(0.0, 1.0, 0.0),
            origin,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_backface_test() {
        let origin = PlaneOrigin::new(IVec3::ZERO, Face::Up);
        assert!(!is_backface(origin, DVec3::new(0.5, 3.0, 0.5)));
        assert!(is_backface(origin, DVec3::new(0.5, -3.0, 0.5)));

        let origin = PlaneOrigin::new(IVec3::ZERO, Face::North);
        assert!(!is_backface(origin, DVec3::new(0.5, 0.5, -3.0)));
        assert!(is_backface(origin, DVec3::new(0.5, 0.5, 3.0)));
    }

    #[test]
    fn test_line_connects_either_direction() {
        let a = SketchPoint::new(0.0, 0.0);
        let b = SketchPoint::new(2.0, 3.0);
        let line = SketchLine::new(a, b);
        assert!(line.connects(a, b));
        assert!(line.connects(b, a));
        assert!(!line.connects(a, SketchPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_voxel_bounds_from_cells() {
        let cells = [
            IVec3::new(1, 2, 3),
            IVec3::new(-1, 5, 3),
            IVec3::new(0, 2, 8),
        ];
        let bounds = VoxelBounds::from_cells(&cells);
        assert_eq!(bounds.min, IVec3::new(-1, 2, 3));
        assert_eq!(bounds.max, IVec3::new(2, 6, 9));
        assert_eq!(bounds.size(), IVec3::new(3, 4, 6));

        let empty = VoxelBounds::from_cells(&[]);
        assert_eq!(empty.size(), IVec3::ZERO);
    }
}
