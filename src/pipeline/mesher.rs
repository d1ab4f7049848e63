//! # Mesher
//!
//! Converts a dense voxel grid into a face-culled triangle mesh: one quad
//! for every solid voxel face that touches a non-solid neighbor or the chunk
//! boundary.
//!
//! The algorithm is a single pass over the grid with no global state, so
//! workers mesh their chunks in parallel without coordination.

use cgmath::{Point3, Vector2, Vector3};

use crate::voxels::chunk::grid::VoxelGrid;
use crate::voxels::chunk::mesh::ChunkMesh;

/// How voxel faces on the chunk boundary are treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Boundary faces are exposed and emit quads. The default: chunks mesh
    /// independently, at the cost of hidden faces between adjacent chunks.
    #[default]
    Exposed,
    /// Boundary faces assume a solid neighbor beyond the edge and are
    /// culled. A fully solid chunk meshes to nothing under this policy.
    Solid,
}

/// Per-direction neighbor offsets: right, left, top, bottom, front, back.
const NEIGHBOURS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Face normals, matching `NEIGHBOURS` order.
const NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// Quad corner offsets per direction, ordered so the fixed index pattern
/// winds every face the same way when viewed from outside the voxel.
const NEIGHBOUR_FACES: [[[i32; 3]; 4]; 6] = [
    // right
    [[1, 1, 1], [1, 1, 0], [1, 0, 1], [1, 0, 0]],
    // left
    [[0, 1, 0], [0, 1, 1], [0, 0, 0], [0, 0, 1]],
    // top
    [[0, 1, 0], [1, 1, 0], [0, 1, 1], [1, 1, 1]],
    // bottom
    [[1, 0, 0], [0, 0, 0], [1, 0, 1], [0, 0, 1]],
    // front
    [[0, 1, 1], [1, 1, 1], [0, 0, 1], [1, 0, 1]],
    // back
    [[1, 1, 0], [0, 1, 0], [1, 0, 0], [0, 0, 0]],
];

/// Texture coordinates of the four quad corners.
const FACE_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Builds the face-culled mesh for one chunk.
///
/// `origin` is the chunk's world-space origin; it is recorded on the mesh
/// while vertex positions stay chunk-local, scaled by the grid's block size.
pub fn generate_mesh(
    voxels: &VoxelGrid,
    origin: Point3<f64>,
    boundary: BoundaryPolicy,
) -> ChunkMesh {
    let layout = voxels.layout();
    let width = layout.width() as i32;
    let block_size = layout.block_size() as f32;

    let mut mesh = ChunkMesh::new(Point3::new(
        origin.x as f32,
        origin.y as f32,
        origin.z as f32,
    ));
    let mut index: u32 = 0;

    for z in 0..layout.width() {
        for y in 0..layout.width() {
            for x in 0..layout.width() {
                let position = Point3::new(x, y, z);
                if !voxels.is_solid(position) {
                    continue;
                }

                for direction in 0..NEIGHBOURS.len() {
                    let offset = NEIGHBOURS[direction];
                    let neighbour = [
                        x as i32 + offset[0],
                        y as i32 + offset[1],
                        z as i32 + offset[2],
                    ];

                    let outside = neighbour.iter().any(|&c| c < 0 || c >= width);
                    let exposed = if outside {
                        boundary == BoundaryPolicy::Exposed
                    } else {
                        !voxels.is_solid(Point3::new(
                            neighbour[0] as usize,
                            neighbour[1] as usize,
                            neighbour[2] as usize,
                        ))
                    };
                    if !exposed {
                        continue;
                    }

                    for (corner, tex) in NEIGHBOUR_FACES[direction]
                        .iter()
                        .zip(FACE_TEX_COORDS.iter())
                    {
                        mesh.positions.push(Point3::new(
                            (x as i32 + corner[0]) as f32 * block_size,
                            (y as i32 + corner[1]) as f32 * block_size,
                            (z as i32 + corner[2]) as f32 * block_size,
                        ));
                        let n = NORMALS[direction];
                        mesh.normals.push(Vector3::new(n[0], n[1], n[2]));
                        mesh.tex_coords.push(Vector2::new(tex[0], tex[1]));
                    }

                    mesh.indices.extend_from_slice(&[
                        index,
                        index + 1,
                        index + 2,
                        index + 1,
                        index + 3,
                        index + 2,
                    ]);
                    index += 4;
                }
            }
        }
    }

    mesh
}
