//! Region Detector
//!
//! Finds enclosed 2D areas bounded by the voxelized sketch lines. Line
//! cells project onto the plane lattice as walls; a flood fill seeded from
//! the outer border of the walls' bounding frame marks everything reachable
//! from outside, and each remaining pocket of open cells becomes a region.

use std::collections::{HashSet, VecDeque};

use glam::IVec3;
use tracing::trace;

use crate::geometry::{
    plane_cell_to_world_cell, world_cell_to_plane_cell, PlaneCell, PlaneOrigin, VoxelBounds,
};
use crate::session::{GeometryCache, Session};

/// A maximal connected pocket of plane cells enclosed by wall cells
#[derive(Debug, Clone)]
pub struct Region {
    /// Member cells on the plane lattice
    pub plane_cells: HashSet<PlaneCell>,
    /// The same cells projected back onto the voxel grid
    pub world_blocks: Vec<IVec3>,
    /// Bounding volume of the world blocks, max-exclusive
    pub bounds: VoxelBounds,
}

/// Flood-fill frame: the wall bounding rectangle expanded by one cell
struct Frame {
    min_u: i32,
    max_u: i32,
    min_v: i32,
    max_v: i32,
}

impl Frame {
    fn contains(&self, cell: PlaneCell) -> bool {
        cell.u >= self.min_u && cell.u <= self.max_u && cell.v >= self.min_v && cell.v <= self.max_v
    }
}

/// Enumerate all enclosed regions of the session's sketch.
///
/// Returns an empty list when there is no origin or no line geometry.
/// Regions are ephemeral; each call recomputes them from the cached line
/// voxelizations.
pub fn detect_regions(session: &Session) -> Vec<Region> {
    detect_regions_in(&session.geometry_blocks())
}

/// Region detection over one consistent cache snapshot.
///
/// The snapshot carries the origin it was voxelized against, so walls and
/// inverse projections can never disagree with it.
pub fn detect_regions_in(cache: &GeometryCache) -> Vec<Region> {
    let Some(origin) = cache.origin else {
        return Vec::new();
    };

    let mut walls: HashSet<PlaneCell> = HashSet::new();
    let mut min_u = i32::MAX;
    let mut max_u = i32::MIN;
    let mut min_v = i32::MAX;
    let mut max_v = i32::MIN;

    for line in &cache.line_blocks {
        for &block in &line.blocks {
            let cell = world_cell_to_plane_cell(block, origin);
            min_u = min_u.min(cell.u);
            max_u = max_u.max(cell.u);
            min_v = min_v.min(cell.v);
            max_v = max_v.max(cell.v);
            walls.insert(cell);
        }
    }

    if walls.is_empty() {
        return Vec::new();
    }

    let frame = Frame {
        min_u: min_u - 1,
        max_u: max_u + 1,
        min_v: min_v - 1,
        max_v: max_v + 1,
    };

    // Everything reachable from the frame border without crossing a wall is
    // outside; only unreachable pockets count as regions.
    let mut visited: HashSet<PlaneCell> = HashSet::new();
    let mut queue: VecDeque<PlaneCell> = VecDeque::new();
    for u in frame.min_u..=frame.max_u {
        enqueue_if_open(&mut queue, &mut visited, &walls, PlaneCell::new(u, frame.min_v));
        enqueue_if_open(&mut queue, &mut visited, &walls, PlaneCell::new(u, frame.max_v));
    }
    for v in frame.min_v..=frame.max_v {
        enqueue_if_open(&mut queue, &mut visited, &walls, PlaneCell::new(frame.min_u, v));
        enqueue_if_open(&mut queue, &mut visited, &walls, PlaneCell::new(frame.max_u, v));
    }

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if !frame.contains(next) || walls.contains(&next) || visited.contains(&next) {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    let mut regions = Vec::new();
    for u in (frame.min_u + 1)..frame.max_u {
        for v in (frame.min_v + 1)..frame.max_v {
            let cell = PlaneCell::new(u, v);
            if walls.contains(&cell) || visited.contains(&cell) {
                continue;
            }
            regions.push(flood_region(cell, &walls, &mut visited, origin, &frame));
        }
    }

    trace!(
        "Detected {} enclosed regions from {} wall cells",
        regions.len(),
        walls.len()
    );
    regions
}

/// The region containing `target_cell`, if any.
///
/// The target is projected onto the plane lattice; a wall cell or a cell in
/// the outside flood belongs to no region. Regions are disjoint, so at most
/// one can match.
pub fn find_region_containing(session: &Session, target_cell: IVec3) -> Option<Region> {
    let cache = session.geometry_blocks();
    let origin = cache.origin?;
    let target = world_cell_to_plane_cell(target_cell, origin);
    detect_regions_in(&cache)
        .into_iter()
        .find(|region| region.plane_cells.contains(&target))
}

fn enqueue_if_open(
    queue: &mut VecDeque<PlaneCell>,
    visited: &mut HashSet<PlaneCell>,
    walls: &HashSet<PlaneCell>,
    cell: PlaneCell,
) {
    if !walls.contains(&cell) && visited.insert(cell) {
        queue.push_back(cell);
    }
}

fn flood_region(
    start: PlaneCell,
    walls: &HashSet<PlaneCell>,
    visited: &mut HashSet<PlaneCell>,
    origin: PlaneOrigin,
    frame: &Frame,
) -> Region {
    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited.insert(start);

    let mut plane_cells = HashSet::new();
    let mut world_blocks = Vec::new();

    while let Some(current) = queue.pop_front() {
        plane_cells.insert(current);
        world_blocks.push(plane_cell_to_world_cell(current, origin));

        for next in current.neighbors() {
            if !frame.contains(next) || walls.contains(&next) || visited.contains(&next) {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    let bounds = VoxelBounds::from_cells(&world_blocks);
    Region {
        plane_cells,
        world_blocks,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Face, SketchLine, SketchPoint};

    fn point(u: f64, v: f64) -> SketchPoint {
        SketchPoint::new(u, v)
    }

    /// Four lines tracing a closed square of wall cells from lattice
    /// (0, 0) to (side-1, side-1)
    fn add_square(session: &Session, side: f64) {
        let far = side - 0.5;
        let corners = [
            (point(0.5, 0.5), point(far, 0.5)),
            (point(far, 0.5), point(far, far)),
            (point(far, far), point(0.5, far)),
            (point(0.5, far), point(0.5, 0.5)),
        ];
        for (start, end) in corners {
            session.add_line(SketchLine::new(start, end));
        }
    }

    fn session_on(face: Face) -> Session {
        let session = Session::new();
        session.start(PlaneOrigin::new(IVec3::ZERO, face));
        session
    }

    #[test]
    fn test_no_lines_no_regions() {
        let session = session_on(Face::North);
        assert!(detect_regions(&session).is_empty());
    }

    #[test]
    fn test_no_origin_no_regions() {
        let session = Session::new();
        assert!(detect_regions(&session).is_empty());
        assert!(find_region_containing(&session, IVec3::ZERO).is_none());
    }

    #[test]
    fn test_closed_square_yields_single_interior_region() {
        let session = session_on(Face::North);
        add_square(&session, 5.0);

        let regions = detect_regions(&session);
        assert_eq!(regions.len(), 1);
        // 5x5 wall ring with 1-thick walls encloses a 3x3 interior.
        assert_eq!(regions[0].plane_cells.len(), 9);
        assert_eq!(regions[0].world_blocks.len(), 9);
        for u in 1..=3 {
            for v in 1..=3 {
                assert!(regions[0].plane_cells.contains(&PlaneCell::new(u, v)));
            }
        }
    }

    #[test]
    fn test_target_lookup_inside_and_outside() {
        let session = session_on(Face::North);
        add_square(&session, 5.0);

        let inside = find_region_containing(&session, IVec3::new(2, 2, 0));
        assert!(inside.is_some());
        assert_eq!(inside.unwrap().plane_cells.len(), 9);

        assert!(find_region_containing(&session, IVec3::new(10, 10, 0)).is_none());
        // A wall cell belongs to no region.
        assert!(find_region_containing(&session, IVec3::new(0, 2, 0)).is_none());
    }

    #[test]
    fn test_open_lines_flood_to_outside() {
        let session = session_on(Face::North);
        // Three sides of a square; the gap leaks the interior to outside.
        session.add_line(SketchLine::new(point(0.5, 0.5), point(4.5, 0.5)));
        session.add_line(SketchLine::new(point(4.5, 0.5), point(4.5, 4.5)));
        session.add_line(SketchLine::new(point(0.5, 4.5), point(0.5, 0.5)));

        assert!(detect_regions(&session).is_empty());
    }

    #[test]
    fn test_nested_squares_yield_ring_and_core() {
        let session = session_on(Face::North);
        add_square(&session, 9.0);
        // Inner square from lattice (2,2) to (6,6).
        let corners = [
            (point(2.5, 2.5), point(6.5, 2.5)),
            (point(6.5, 2.5), point(6.5, 6.5)),
            (point(6.5, 6.5), point(2.5, 6.5)),
            (point(2.5, 6.5), point(2.5, 2.5)),
        ];
        for (start, end) in corners {
            session.add_line(SketchLine::new(start, end));
        }

        let regions = detect_regions(&session);
        assert_eq!(regions.len(), 2);
        let mut sizes: Vec<usize> = regions.iter().map(|r| r.plane_cells.len()).collect();
        sizes.sort_unstable();
        // Core is 3x3; the ring is the 7x7 interior minus the 5x5 inner square.
        assert_eq!(sizes, vec![9, 24]);
    }

    #[test]
    fn test_region_world_blocks_on_up_face() {
        let session = Session::new();
        session.start(PlaneOrigin::new(IVec3::new(10, 20, 30), Face::Up));
        add_square(&session, 5.0);

        let region = find_region_containing(&session, IVec3::new(12, 21, 32)).unwrap();
        // Up-face cells sit one above the anchor cell's y.
        for block in &region.world_blocks {
            assert_eq!(block.y, 21);
        }
        assert_eq!(region.bounds.min, IVec3::new(11, 21, 31));
        assert_eq!(region.bounds.max, IVec3::new(14, 22, 34));
    }

    #[test]
    fn test_region_bounds_span_voxels() {
        let session = session_on(Face::North);
        add_square(&session, 5.0);

        let region = detect_regions(&session).remove(0);
        assert_eq!(region.bounds.min, IVec3::new(1, 1, 0));
        assert_eq!(region.bounds.max, IVec3::new(4, 4, 1));
    }
}
