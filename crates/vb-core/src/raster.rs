//! Voxel Line Rasterizer
//!
//! Turns two grid cells into the connected run of cells approximating the
//! straight segment between them (3D digital line, generalized Bresenham).

use glam::IVec3;

use crate::geometry::VoxelBounds;

/// Rasterize the segment from `start` to `end` into grid cells.
///
/// The dominant axis is the one with the greatest absolute delta; the two
/// remaining axes carry error terms and step by one whenever their
/// accumulated error turns non-negative. The result always begins with
/// `start`, ends with `end`, and holds exactly
/// `max(|dx|, |dy|, |dz|) + 1` cells.
pub fn rasterize_segment(start: IVec3, end: IVec3) -> Vec<IVec3> {
    let delta = (end - start).abs();
    let step = (end - start).signum();

    let mut cells = Vec::with_capacity(delta.max_element() as usize + 1);
    let mut cursor = start;
    cells.push(cursor);

    if delta.x >= delta.y && delta.x >= delta.z {
        let mut err_y = 2 * delta.y - delta.x;
        let mut err_z = 2 * delta.z - delta.x;
        for _ in 0..delta.x {
            cursor.x += step.x;
            if err_y >= 0 {
                cursor.y += step.y;
                err_y -= 2 * delta.x;
            }
            if err_z >= 0 {
                cursor.z += step.z;
                err_z -= 2 * delta.x;
            }
            err_y += 2 * delta.y;
            err_z += 2 * delta.z;
            cells.push(cursor);
        }
    } else if delta.y >= delta.x && delta.y >= delta.z {
        let mut err_x = 2 * delta.x - delta.y;
        let mut err_z = 2 * delta.z - delta.y;
        for _ in 0..delta.y {
            cursor.y += step.y;
            if err_x >= 0 {
                cursor.x += step.x;
                err_x -= 2 * delta.y;
            }
            if err_z >= 0 {
                cursor.z += step.z;
                err_z -= 2 * delta.y;
            }
            err_x += 2 * delta.x;
            err_z += 2 * delta.z;
            cells.push(cursor);
        }
    } else {
        let mut err_x = 2 * delta.x - delta.z;
        let mut err_y = 2 * delta.y - delta.z;
        for _ in 0..delta.z {
            cursor.z += step.z;
            if err_x >= 0 {
                cursor.x += step.x;
                err_x -= 2 * delta.z;
            }
            if err_y >= 0 {
                cursor.y += step.y;
                err_y -= 2 * delta.z;
            }
            err_x += 2 * delta.x;
            err_y += 2 * delta.y;
            cells.push(cursor);
        }
    }

    cells
}

/// Bounding volume of a rasterized run
pub fn segment_bounds(cells: &[IVec3]) -> VoxelBounds {
    VoxelBounds::from_cells(cells)
}
