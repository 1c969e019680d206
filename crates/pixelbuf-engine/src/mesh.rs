//! Full-window quad.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Quad vertex: clip-space position and texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // tex_coords
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Corners of the quad, counter-clockwise from bottom-left.
///
/// Texture row 0 maps to the bottom edge; the vertex shader's `flip_y`
/// uniform turns the image upright when a host sends rows top-down.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coords: [0.0, 0.0] },
    QuadVertex { position: [-1.0,  1.0, 0.0], tex_coords: [0.0, 1.0] },
    QuadVertex { position: [ 1.0,  1.0, 0.0], tex_coords: [1.0, 1.0] },
    QuadVertex { position: [ 1.0, -1.0, 0.0], tex_coords: [1.0, 0.0] },
];

/// Two triangles sharing the 0-2 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// GPU copy of the quad, uploaded once at construction.
pub struct QuadMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl QuadMesh {
    pub const INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;

    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pixelbuf quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pixelbuf quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    /// Binds vertex slot 0 and the index buffer.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Binds and draws both triangles.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.bind(pass);
        pass.draw_indexed(0..Self::INDEX_COUNT, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_five_floats() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 5 * std::mem::size_of::<f32>());
        assert_eq!(QuadVertex::layout().attributes[1].offset, 12);
    }

    #[test]
    fn indices_reference_every_corner() {
        for v in 0..QUAD_VERTICES.len() as u32 {
            assert!(QUAD_INDICES.contains(&v));
        }
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn quad_covers_clip_space() {
        let xs = QUAD_VERTICES.map(|v| v.position[0]);
        let ys = QUAD_VERTICES.map(|v| v.position[1]);
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);
    }

    #[test]
    fn tex_coords_follow_position() {
        for v in QUAD_VERTICES {
            assert_eq!(v.tex_coords[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.tex_coords[1], (v.position[1] + 1.0) / 2.0);
        }
    }
}
