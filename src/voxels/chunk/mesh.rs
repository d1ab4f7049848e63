//! Mesh data produced for one chunk.

use cgmath::{Point3, Vector2, Vector3};

/// Face-culled triangle mesh for one chunk, in chunk-local coordinates.
///
/// This is the payload of the render hand-off: the consumer uploads the
/// buffers to the GPU and positions the result at `world_position`.
/// Positions are relative to the chunk origin and already scaled by the
/// layout's block size.
pub struct ChunkMesh {
    /// World-space position of the chunk origin the mesh is relative to.
    pub world_position: Point3<f32>,
    /// Vertex positions, four per emitted quad.
    pub positions: Vec<Point3<f32>>,
    /// Per-vertex face normals.
    pub normals: Vec<Vector3<f32>>,
    /// Per-vertex texture coordinates.
    pub tex_coords: Vec<Vector2<f32>>,
    /// Triangle indices, six per emitted quad, consistently wound.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates an empty mesh anchored at `world_position`.
    pub fn new(world_position: Point3<f32>) -> Self {
        Self {
            world_position,
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
