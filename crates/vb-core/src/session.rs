//! Per-user sketch session and derived geometry cache
//!
//! A [`Session`] owns the authoritative vector geometry of one user's
//! sketch: the plane origin, points, lines, the pending line start of the
//! two-click line tool, and an opaque sketch id for persistence
//! round-tripping. Derived voxelizations live in a version-stamped
//! [`GeometryCache`] that is rebuilt whole and swapped in under the
//! session's lock; readers never observe a torn mix of old and new state.

use std::sync::Arc;

use glam::IVec3;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::geometry::{
    floor_to_cell, plane_to_world, PlaneOrigin, SketchLine, SketchPoint, VoxelBounds,
};
use crate::raster::{rasterize_segment, segment_bounds};

/// Voxelization of one sketch line: its grid cells plus their bounding volume
#[derive(Debug, Clone)]
pub struct LineBlocks {
    pub blocks: Vec<IVec3>,
    pub bounds: VoxelBounds,
}

/// Derived voxel sets for a session's geometry.
///
/// Valid only while `version` and `origin` match the session's current
/// state; stale caches are replaced wholesale on the next read.
#[derive(Debug, Clone)]
pub struct GeometryCache {
    /// Geometry version the cache was built from
    pub version: u64,
    /// Origin snapshot the cache was built against
    pub origin: Option<PlaneOrigin>,
    /// One grid cell per sketch point, in insertion order
    pub point_blocks: Vec<IVec3>,
    /// Rasterized cells and bounds per line, in insertion order
    pub line_blocks: Vec<LineBlocks>,
}

/// Outcome of placing a point with the sketch tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClickOutcome {
    /// The point was added
    Added,
    /// The target cell already holds a point; nothing changed
    Occupied,
    /// No plane origin is set; the click was skipped
    NoOrigin,
}

/// Outcome of a click with the two-click line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClickOutcome {
    /// First click: the pending line start is now armed
    StartArmed,
    /// Second click landed in the pending start's cell; ignored
    SameCell,
    /// Second click committed a new line and cleared the pending start
    Committed,
    /// The line already exists; the pending start was cleared
    Duplicate,
    /// No plane origin is set; the click was skipped
    NoOrigin,
}

#[derive(Debug, Default)]
struct SessionState {
    origin: Option<PlaneOrigin>,
    points: Vec<SketchPoint>,
    lines: Vec<SketchLine>,
    pending_line_start: Option<SketchPoint>,
    sketch_id: Option<Uuid>,
    version: u64,
    cache: Option<Arc<GeometryCache>>,
}

impl SessionState {
    /// Record a mutation; invalidates any cache built before it
    fn touch(&mut self) {
        self.version += 1;
    }

    /// Existing point whose voxelization lands in `cell`
    fn point_at_cell(&self, cell: IVec3) -> Option<SketchPoint> {
        let origin = self.origin?;
        self.points
            .iter()
            .copied()
            .find(|p| floor_to_cell(plane_to_world(*p, origin)) == cell)
    }

    fn has_line_between(&self, a: SketchPoint, b: SketchPoint) -> bool {
        self.lines.iter().any(|line| line.connects(a, b))
    }

    /// Return the cache if still valid, else rebuild and swap it in
    fn geometry_blocks(&mut self) -> Arc<GeometryCache> {
        if let Some(cache) = &self.cache {
            if cache.version == self.version && cache.origin == self.origin {
                return cache.clone();
            }
        }

        let mut point_blocks = Vec::new();
        let mut line_blocks = Vec::new();
        if let Some(origin) = self.origin {
            point_blocks = self
                .points
                .iter()
                .map(|p| floor_to_cell(plane_to_world(*p, origin)))
                .collect();

            line_blocks = self
                .lines
                .iter()
                .map(|line| {
                    let start = floor_to_cell(plane_to_world(line.start, origin));
                    let end = floor_to_cell(plane_to_world(line.end, origin));
                    let blocks = rasterize_segment(start, end);
                    let bounds = segment_bounds(&blocks);
                    LineBlocks { blocks, bounds }
                })
                .collect();
        }

        debug!(
            "Rebuilt geometry cache: {} point blocks, {} lines (version {})",
            point_blocks.len(),
            line_blocks.len(),
            self.version
        );

        let cache = Arc::new(GeometryCache {
            version: self.version,
            origin: self.origin,
            point_blocks,
            line_blocks,
        });
        self.cache = Some(cache.clone());
        cache
    }
}

/// Authoritative per-user sketch state, safe to share across threads.
///
/// All operations serialize through one lock scoped to this session, so an
/// input handler and a render/query step on different threads can
/// interleave freely.
#[derive(Debug, Default)]
pub struct Session {
    inner: Mutex<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ============== Mutators ==============

    /// Begin a sketch on `origin`, clearing points, lines, and the pending
    /// line start
    pub fn start(&self, origin: PlaneOrigin) {
        let mut state = self.inner.lock();
        state.origin = Some(origin);
        state.points.clear();
        state.lines.clear();
        state.pending_line_start = None;
        state.touch();
    }

    /// Reset to the initial empty state (no origin, no sketch id)
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.origin = None;
        state.points.clear();
        state.lines.clear();
        state.pending_line_start = None;
        state.sketch_id = None;
        state.touch();
    }

    pub fn add_point(&self, point: SketchPoint) {
        let mut state = self.inner.lock();
        state.points.push(point);
        state.touch();
    }

    pub fn add_line(&self, line: SketchLine) {
        let mut state = self.inner.lock();
        state.lines.push(line);
        state.touch();
    }

    pub fn set_pending_line_start(&self, point: Option<SketchPoint>) {
        let mut state = self.inner.lock();
        state.pending_line_start = point;
        state.touch();
    }

    pub fn set_sketch_id(&self, id: Option<Uuid>) {
        let mut state = self.inner.lock();
        state.sketch_id = id;
        state.touch();
    }

    /// The sketch id, generating and storing one first if absent
    pub fn ensure_sketch_id(&self) -> Uuid {
        let mut state = self.inner.lock();
        match state.sketch_id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                state.sketch_id = Some(id);
                state.touch();
                id
            }
        }
    }

    // ============== Readers ==============

    pub fn origin(&self) -> Option<PlaneOrigin> {
        self.inner.lock().origin
    }

    pub fn points(&self) -> Vec<SketchPoint> {
        self.inner.lock().points.clone()
    }

    pub fn lines(&self) -> Vec<SketchLine> {
        self.inner.lock().lines.clone()
    }

    pub fn pending_line_start(&self) -> Option<SketchPoint> {
        self.inner.lock().pending_line_start
    }

    pub fn sketch_id(&self) -> Option<Uuid> {
        self.inner.lock().sketch_id
    }

    /// Current geometry version (bumped by every mutation)
    pub fn version(&self) -> u64 {
        self.inner.lock().version
    }

    // ============== Derived geometry ==============

    /// The voxelized geometry, recomputing it first if stale.
    ///
    /// Recomputation happens at most once between mutations; repeated reads
    /// return the same cache.
    pub fn geometry_blocks(&self) -> Arc<GeometryCache> {
        self.inner.lock().geometry_blocks()
    }

    /// Grid cells of all sketch points
    pub fn cached_point_blocks(&self) -> Vec<IVec3> {
        self.geometry_blocks().point_blocks.clone()
    }

    /// Rasterized cells and bounds of all sketch lines
    pub fn cached_line_blocks(&self) -> Vec<LineBlocks> {
        self.geometry_blocks().line_blocks.clone()
    }

    // ============== Sketch-tool transitions ==============

    /// Existing point whose voxelization lands in `cell`
    pub fn find_point_at_cell(&self, cell: IVec3) -> Option<SketchPoint> {
        self.inner.lock().point_at_cell(cell)
    }

    /// True if a line already joins `a` and `b`, in either direction
    pub fn has_line_between(&self, a: SketchPoint, b: SketchPoint) -> bool {
        self.inner.lock().has_line_between(a, b)
    }

    /// Place a point, refusing a second point in an occupied cell
    pub fn apply_point_click(&self, point: SketchPoint) -> PointClickOutcome {
        let mut state = self.inner.lock();
        let Some(origin) = state.origin else {
            return PointClickOutcome::NoOrigin;
        };

        let cell = floor_to_cell(plane_to_world(point, origin));
        if state.point_at_cell(cell).is_some() {
            return PointClickOutcome::Occupied;
        }

        state.points.push(point);
        state.touch();
        PointClickOutcome::Added
    }

    /// One click of the two-click line tool.
    ///
    /// The clicked cell's existing point is reused if there is one,
    /// otherwise the click becomes a new point. The first click arms the
    /// pending line start; the second commits a line unless it targets the
    /// pending cell itself or duplicates an existing line.
    pub fn apply_line_click(&self, point: SketchPoint) -> LineClickOutcome {
        let mut state = self.inner.lock();
        let Some(origin) = state.origin else {
            return LineClickOutcome::NoOrigin;
        };

        let cell = floor_to_cell(plane_to_world(point, origin));
        let mut point_added = false;
        let selected = match state.point_at_cell(cell) {
            Some(existing) => existing,
            None => {
                state.points.push(point);
                point_added = true;
                point
            }
        };

        let Some(pending) = state.pending_line_start else {
            state.pending_line_start = Some(selected);
            state.touch();
            return LineClickOutcome::StartArmed;
        };

        if floor_to_cell(plane_to_world(pending, origin)) == cell {
            // Reachable with a point added only when the pending start has
            // no backing point in its cell (e.g. after a partial load).
            if point_added {
                state.touch();
            }
            return LineClickOutcome::SameCell;
        }

        let duplicate = state.has_line_between(pending, selected);
        if !duplicate {
            state.lines.push(SketchLine::new(pending, selected));
        }
        state.pending_line_start = None;
        state.touch();

        if duplicate {
            LineClickOutcome::Duplicate
        } else {
            LineClickOutcome::Committed
        }
    }
}
