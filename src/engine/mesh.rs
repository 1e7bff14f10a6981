// Tile meshes and GPU vertex layouts.
//
//   PolyMesh (quads, CCW from outside) → triangulate_flat() → RenderMesh → GPU
//
// Both meshes live in a unit cell [0,1]×[0,1] on XZ so an instance offset of
// (x, 0, z) places them on tile (x, z).

use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and normal.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
}

impl GpuVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

// ============================================================================
// INSTANCE DATA (per-tile)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub offset: [f32; 3],
    _padding: f32,  // Align to 16 bytes
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(offset: Vec3, color: [f32; 3]) -> Self {
        Self {
            offset: offset.to_array(),
            _padding: 0.0,
            color: [color[0], color[1], color[2], 1.0],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Offset (location 2)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color (location 3)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// ============================================================================
// POLY MESH
// ============================================================================

/// Polygon mesh before triangulation. Faces are CCW when viewed from outside.
pub struct PolyMesh {
    pub positions: Vec<Vec3>,
    pub faces:     Vec<Vec<usize>>,
}

impl PolyMesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces:     Vec::new(),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        let idx = self.positions.len();
        self.positions.push(pos);
        idx
    }

    /// Add a face by vertex indices (CCW order).
    pub fn add_face(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3, "Face must have at least 3 vertices");
        self.faces.push(indices);
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// GPU-ready triangulated mesh.
/// Upload vertex_bytes() to a VERTEX buffer, index_bytes() to an INDEX buffer.
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    /// Cast vertex slice to raw bytes for wgpu buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Cast index slice to raw bytes for wgpu buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize  { self.indices.len() }
}

/// Triangulate with one normal per face, so block edges stay sharp.
///
/// Each face gets its own copies of its corner vertices, then is
/// fan-triangulated from its first corner.
pub fn triangulate_flat(poly: &PolyMesh) -> RenderMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for face in &poly.faces {
        let a = poly.positions[face[0]];
        let b = poly.positions[face[1]];
        let c = poly.positions[face[2]];
        let normal = (b - a).cross(c - a).normalize_or_zero().to_array();

        let base = vertices.len() as u32;
        for &i in face {
            vertices.push(GpuVertex { position: poly.positions[i].to_array(), normal });
        }
        for i in 1..(face.len() as u32 - 1) {
            indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    RenderMesh { vertices, indices }
}

// ============================================================================
// TILE SHAPES
// ============================================================================

/// Flat floor quad at Y=0, shrunk by `inset` on every side so neighbouring
/// tiles leave a visible seam.
pub fn tile_quad(inset: f32) -> PolyMesh {
    let (lo, hi) = (inset, 1.0 - inset);
    let mut poly = PolyMesh::new();
    let a = poly.add_vertex(Vec3::new(lo, 0.0, lo));
    let b = poly.add_vertex(Vec3::new(lo, 0.0, hi));
    let c = poly.add_vertex(Vec3::new(hi, 0.0, hi));
    let d = poly.add_vertex(Vec3::new(hi, 0.0, lo));
    poly.add_face(vec![a, b, c, d]);
    poly
}

/// Wall block standing on the tile, `height` tall.
pub fn tile_block(inset: f32, height: f32) -> PolyMesh {
    let (lo, hi) = (inset, 1.0 - inset);
    let mut poly = PolyMesh::new();
    // corner index = x | y << 1 | z << 2
    for i in 0..8 {
        let x = if i & 1 != 0 { hi } else { lo };
        let y = if i & 2 != 0 { height } else { 0.0 };
        let z = if i & 4 != 0 { hi } else { lo };
        poly.add_vertex(Vec3::new(x, y, z));
    }
    poly.add_face(vec![2, 6, 7, 3]); // +Y
    poly.add_face(vec![0, 1, 5, 4]); // -Y
    poly.add_face(vec![1, 3, 7, 5]); // +X
    poly.add_face(vec![0, 4, 6, 2]); // -X
    poly.add_face(vec![4, 5, 7, 6]); // +Z
    poly.add_face(vec![0, 2, 3, 1]); // -Z
    poly
}
