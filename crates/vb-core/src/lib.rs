//! Plane-Geometry and Region-Detection Engine
//!
//! This crate is the core of a voxel blueprint editor: users sketch 2D
//! shapes on an axis-aligned plane anchored to a face of a voxel cell.
//! It provides:
//! - Coordinate transforms between the 2D sketch plane and the 3D grid,
//!   plus ray/plane intersection for projecting a view ray
//! - 3D digital-line rasterization of sketch lines into grid cells
//! - Per-user sessions with version-stamped caches of derived voxel sets
//! - Flood-fill detection of enclosed regions bounded by line voxels
//! - A serde data layer for round-tripping sketches through a host blob
//!
//! Rendering, input wiring, and the host's persistence transport are
//! external consumers of these APIs.

pub mod constants;
pub mod data;
pub mod geometry;
pub mod raster;
pub mod region;
pub mod registry;
pub mod session;

// Re-exports for convenience
pub use data::{LineData, OriginData, PointData, SketchData, SketchDataError};
pub use geometry::{
    floor_to_cell, intersect_ray_with_plane, is_backface, plane_cell_to_world_cell,
    plane_to_world, world_cell_to_plane_cell, world_to_plane, Face, PlaneCell, PlaneOrigin,
    SketchLine, SketchPoint, VoxelBounds,
};
pub use raster::{rasterize_segment, segment_bounds};
pub use region::{detect_regions, detect_regions_in, find_region_containing, Region};
pub use registry::SessionRegistry;
pub use session::{GeometryCache, LineBlocks, LineClickOutcome, PointClickOutcome, Session};
