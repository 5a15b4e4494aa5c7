// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `facet-glow`.
//
// `facet-glow` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `facet-glow` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `facet-glow`. If not, see <https://www.gnu.org/licenses/>.

//! A backend for `facet` that uses the [`glow`] crate.
//!
//! [`GlowContext`] wraps anything implementing [`glow::HasContext`] and
//! implements [`facet::GpuContext`] on top of it. Construction enforces the
//! device capability gate: OpenGL ES 3.2 on embedded implementations, OpenGL
//! 3.3 on desktop ones.
//!
//! [`glow`]: https://crates.io/crates/glow

use facet::{BoundAttribute, DrawMode, DrawRange, Error, GpuContext, StageKind, Vertex};

use glow::HasContext;

use std::fmt;

/// A wrapper around a `glow` vertex buffer bundle.
///
/// Owns the VBO, the EBO and the VAO that records their attribute bindings.
pub struct GlVertexBuffer<H: HasContext + ?Sized> {
    vbo: H::Buffer,
    ebo: H::Buffer,
    vao: H::VertexArray,
}

impl<H: HasContext + ?Sized> Clone for GlVertexBuffer<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: HasContext + ?Sized> Copy for GlVertexBuffer<H> {}

impl<H: HasContext + ?Sized> fmt::Debug for GlVertexBuffer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlVertexBuffer").finish_non_exhaustive()
    }
}

/// An error from the underlying GL context.
#[derive(Debug)]
pub struct GlError(String);

impl From<String> for GlError {
    fn from(s: String) -> Self {
        GlError(s)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gl error: {}", self.0)
    }
}

impl std::error::Error for GlError {}

/// A wrapper around a `glow` context, checked for the required API level.
pub struct GlowContext<H: HasContext + ?Sized> {
    /// The `#version` header matching the context's dialect.
    shader_header: &'static str,

    /// The underlying context.
    context: H,
}

impl<H: HasContext> GlowContext<H> {
    /// Wrap `context`, enforcing the device capability gate.
    ///
    /// Embedded (ES) implementations must expose at least version 3.2;
    /// desktop implementations at least 3.3. Anything lower yields
    /// [`Error::Unsupported`], which hosts are expected to report to the user
    /// before carrying on with rendering disabled.
    ///
    /// # Safety
    ///
    /// The context must be current while calling `new`, and must be current
    /// whenever the returned value is used.
    pub unsafe fn new(context: H) -> Result<Self, Error> {
        let version = context.version();

        let has_supported_version = if version.is_embedded {
            version.major > 3 || (version.major == 3 && version.minor >= 2)
        } else {
            version.major > 3 || (version.major == 3 && version.minor >= 3)
        };
        if !has_supported_version {
            return Err(Error::Unsupported(format!(
                "OpenGL ES 3.2 (or OpenGL 3.3) is required, but the device reports {}.{}{}",
                version.major,
                version.minor,
                if version.is_embedded { " es" } else { "" },
            )));
        }

        let shader_header = if version.is_embedded {
            "#version 320 es"
        } else {
            "#version 330 core"
        };

        tracing::debug!(
            major = version.major,
            minor = version.minor,
            embedded = version.is_embedded,
            "gl context accepted"
        );

        Ok(Self {
            shader_header,
            context,
        })
    }

    /// Get a reference to the underlying [`glow`] context.
    pub fn context(&self) -> &H {
        &self.context
    }
}

impl<H: HasContext + ?Sized> GpuContext for GlowContext<H> {
    type ShaderStage = H::Shader;
    type Program = H::Program;
    type VertexBuffer = GlVertexBuffer<H>;
    type UniformLocation = H::UniformLocation;
    type Error = GlError;

    fn shader_header(&self) -> &'static str {
        self.shader_header
    }

    fn create_stage(&self, kind: StageKind) -> Result<Self::ShaderStage, Self::Error> {
        let shader_type = match kind {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe { self.context.create_shader(shader_type).gl_err() }
    }

    fn stage_source(&self, stage: Self::ShaderStage, source: &str) {
        unsafe {
            self.context.shader_source(stage, source);
        }
    }

    fn compile_stage(&self, stage: Self::ShaderStage) {
        unsafe {
            self.context.compile_shader(stage);
        }
    }

    fn stage_compile_status(&self, stage: Self::ShaderStage) -> bool {
        unsafe { self.context.get_shader_compile_status(stage) }
    }

    fn stage_info_log(&self, stage: Self::ShaderStage) -> String {
        unsafe { self.context.get_shader_info_log(stage) }
    }

    fn delete_stage(&self, stage: Self::ShaderStage) {
        unsafe {
            self.context.delete_shader(stage);
        }
    }

    fn create_program(&self) -> Result<Self::Program, Self::Error> {
        unsafe { self.context.create_program().gl_err() }
    }

    fn attach_stage(&self, program: Self::Program, stage: Self::ShaderStage) {
        unsafe {
            self.context.attach_shader(program, stage);
        }
    }

    fn detach_stage(&self, program: Self::Program, stage: Self::ShaderStage) {
        unsafe {
            self.context.detach_shader(program, stage);
        }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe {
            self.context.link_program(program);
        }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.context.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.context.get_program_info_log(program) }
    }

    fn validate_program(&self, _program: Self::Program) -> Option<Result<(), String>> {
        // `glow` exposes no glValidateProgram binding, so there is no driver
        // validator to run here.
        None
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            self.context.delete_program(program);
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            self.context.use_program(program);
        }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.context.get_uniform_location(program, name) }
    }

    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.context.get_attrib_location(program, name) }
    }

    fn set_uniform_mat4(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        unsafe {
            self.context
                .uniform_matrix_4_f32_slice(Some(location), false, matrix);
        }
    }

    fn create_vertex_buffer(
        &self,
        attributes: &[BoundAttribute],
        stride: i32,
    ) -> Result<Self::VertexBuffer, Self::Error> {
        unsafe {
            let vbo = self.context.create_buffer().gl_err()?;
            let ebo = self.context.create_buffer().gl_err()?;
            let vao = self.context.create_vertex_array().gl_err()?;

            // Record the bindings in the VAO.
            self.context.bind_vertex_array(Some(vao));
            let _guard = CallOnDrop(|| {
                self.context.bind_vertex_array(None);
            });
            self.context.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.context
                .bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));

            for attribute in attributes {
                self.context.enable_vertex_attrib_array(attribute.location);
                self.context.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.size,
                    glow::FLOAT,
                    false,
                    stride,
                    attribute.offset,
                );
            }

            gl_error(&self.context);

            Ok(GlVertexBuffer { vbo, ebo, vao })
        }
    }

    fn write_vertices(&self, buffer: Self::VertexBuffer, vertices: &[Vertex], indices: &[u32]) {
        unsafe {
            self.context.bind_vertex_array(Some(buffer.vao));
            let _guard = CallOnDrop(|| {
                self.context.bind_vertex_array(None);
            });

            // The ARRAY_BUFFER binding is not VAO state, so bind explicitly.
            self.context.bind_buffer(glow::ARRAY_BUFFER, Some(buffer.vbo));
            self.context.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            if !indices.is_empty() {
                self.context.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(indices),
                    glow::STATIC_DRAW,
                );
            }

            gl_error(&self.context);
        }
    }

    fn delete_vertex_buffer(&self, buffer: Self::VertexBuffer) {
        unsafe {
            self.context.delete_buffer(buffer.vbo);
            self.context.delete_buffer(buffer.ebo);
            self.context.delete_vertex_array(buffer.vao);
        }
    }

    fn clear(&self, color: [f32; 4], depth: bool) {
        unsafe {
            self.context
                .clear_color(color[0], color[1], color[2], color[3]);

            let mut mask = glow::COLOR_BUFFER_BIT;
            if depth {
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            self.context.clear(mask);
        }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            self.context.viewport(x, y, width, height);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.context.enable(glow::DEPTH_TEST);
            } else {
                self.context.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn draw(&self, buffer: Self::VertexBuffer, mode: DrawMode, range: DrawRange) {
        let mode = match mode {
            DrawMode::Triangles => glow::TRIANGLES,
            DrawMode::TriangleStrip => glow::TRIANGLE_STRIP,
            DrawMode::Lines => glow::LINES,
        };

        unsafe {
            self.context.bind_vertex_array(Some(buffer.vao));
            let _guard = CallOnDrop(|| {
                self.context.bind_vertex_array(None);
            });

            match range {
                DrawRange::Arrays { first, count } => {
                    self.context.draw_arrays(mode, first, count);
                }
                DrawRange::Elements { count } => {
                    self.context
                        .draw_elements(mode, count, glow::UNSIGNED_INT, 0);
                }
            }

            gl_error(&self.context);
        }
    }
}

fn gl_error(h: &(impl HasContext + ?Sized)) {
    let err = unsafe { h.get_error() };

    if err != glow::NO_ERROR {
        let error_str = match err {
            glow::INVALID_ENUM => "GL_INVALID_ENUM",
            glow::INVALID_VALUE => "GL_INVALID_VALUE",
            glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
            glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            glow::CONTEXT_LOST => "GL_CONTEXT_LOST",
            _ => "Unknown GL error",
        };

        tracing::error!("GL error: {}", error_str)
    }
}

trait ResultExt<T, E> {
    fn gl_err(self) -> Result<T, GlError>;
}

impl<T, E: Into<GlError>> ResultExt<T, E> for Result<T, E> {
    fn gl_err(self) -> Result<T, GlError> {
        self.map_err(Into::into)
    }
}

struct CallOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}
