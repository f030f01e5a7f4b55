use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use gl::types::{GLint, GLsizei, GLsizeiptr, GLuint};

/// Vertex format: a position in normalized device coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3], // x, y, z
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    /// Number of `f32` components in the position attribute.
    pub const POSITION_COMPONENTS: GLint = 3;

    /// Byte distance between consecutive vertices in a buffer.
    pub const STRIDE: GLsizei = size_of::<Vertex>() as GLsizei;
}

/// The triangle: bottom-left, bottom-right, top. NDC origin is the window centre.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.5, 0.0),
    Vertex::new(0.5, -0.5, 0.0),
    Vertex::new(0.0, 0.5, 0.0),
];

/// Vertex data uploaded to the GPU: a VAO describing attribute 0 and the VBO behind it.
///
/// Requires a current GL context to create, draw and drop.
#[derive(Debug)]
pub struct GLMesh {
    pub vao: GLuint,
    pub vbo: GLuint,
    pub vertex_count: usize,
}

impl GLMesh {
    /// Copies `vertices` into a new `GL_STATIC_DRAW` buffer and records the layout in a VAO.
    pub fn upload(vertices: &[Vertex]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);

        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(
                0,
                Vertex::POSITION_COMPONENTS,
                gl::FLOAT,
                gl::FALSE,
                Vertex::STRIDE,
                std::ptr::null(),
            );
            gl::EnableVertexAttribArray(0);

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        log::debug!("uploaded {} vertices ({} bytes) to vbo {}", vertices.len(), bytes.len(), vbo);

        Self {
            vao,
            vbo,
            vertex_count: vertices.len(),
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count as GLsizei);
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for GLMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_three_tightly_packed_floats() {
        assert_eq!(size_of::<Vertex>(), 3 * size_of::<f32>());
        assert_eq!(Vertex::STRIDE, 12);
        assert_eq!(Vertex::POSITION_COMPONENTS, 3);
    }

    #[test]
    fn triangle_is_nine_floats() {
        let floats: &[f32] = bytemuck::cast_slice(&TRIANGLE);
        assert_eq!(
            floats,
            &[-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0]
        );
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE).len(), 36);
    }

    #[test]
    fn triangle_lies_inside_ndc() {
        for v in TRIANGLE {
            assert!(v.position.iter().all(|c| (-1.0..=1.0).contains(c)));
        }
    }
}
