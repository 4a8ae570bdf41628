//! Cube mesh: eight colored corners and a 36-index triangle list.

use bytemuck::{Pod, Zeroable};

/// One cube corner as laid out in the vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Buffer layout with `position` and `color` at the given shader locations.
    pub fn layout(
        position_location: u32,
        color_location: u32,
    ) -> ([wgpu::VertexAttribute; 2], wgpu::BufferAddress) {
        let attributes = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: std::mem::offset_of!(Vertex, position) as wgpu::BufferAddress,
                shader_location: position_location,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: std::mem::offset_of!(Vertex, color) as wgpu::BufferAddress,
                shader_location: color_location,
            },
        ];
        (attributes, std::mem::size_of::<Vertex>() as wgpu::BufferAddress)
    }
}

/// Corners of the cube centered at the origin with edge length 2.
pub const CUBE_VERTICES: [Vertex; 8] = [
    Vertex::new([1.0, 1.0, 1.0], [0.0, 1.0, 1.0, 1.0]),
    Vertex::new([-1.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0]),
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 0.0, 0.0, 1.0]),
    Vertex::new([1.0, -1.0, 1.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 1.0, 0.0, 1.0]),
    Vertex::new([1.0, 1.0, -1.0], [1.0, 1.0, 1.0, 1.0]),
    Vertex::new([-1.0, 1.0, -1.0], [1.0, 0.0, 1.0, 1.0]),
    Vertex::new([-1.0, -1.0, -1.0], [1.0, 0.0, 0.0, 1.0]),
];

/// Two counter-clockwise (seen from outside) triangles per face.
///
/// Face order: +z, +x, +y, -x, -y, -z.
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // +z
    0, 3, 4, 0, 4, 5, // +x
    0, 5, 6, 0, 6, 1, // +y
    1, 6, 7, 1, 7, 2, // -x
    7, 4, 3, 7, 3, 2, // -y
    4, 7, 6, 4, 6, 5, // -z
];

/// Static mesh handed to the renderer for a one-time upload.
#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    pub vertices: &'static [Vertex],
    pub indices: &'static [u32],
}

impl Mesh {
    /// Number of indices drawn by one indexed draw call.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Triangles as vertex triples, in index-buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// The closed, colored cube mesh.
pub fn colored_cube() -> Mesh {
    Mesh {
        vertices: &CUBE_VERTICES,
        indices: &CUBE_INDICES,
    }
}
