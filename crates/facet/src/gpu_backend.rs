// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `facet`.
//
// `facet` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `facet` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `facet`. If not, see <https://www.gnu.org/licenses/>.

//! Defines the GPU backend for facet.

use std::error::Error;
use std::fmt;
use std::mem;

/// The two programmable stages a program is linked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// The vertex stage.
    Vertex,

    /// The fragment stage.
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        })
    }
}

/// Primitive assembly mode for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Separate triangles, three vertices each.
    Triangles,

    /// A triangle strip.
    TriangleStrip,

    /// Separate line segments, two vertices each.
    Lines,
}

/// What a draw call consumes from the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRange {
    /// Unindexed: consume `count` vertices starting at `first`.
    Arrays {
        /// Index of the first vertex.
        first: i32,

        /// Number of vertices to draw.
        count: i32,
    },

    /// Indexed: consume `count` `u32` indices from the element buffer.
    Elements {
        /// Number of indices to draw.
        count: i32,
    },
}

/// The vertex type used by every pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// The position of the vertex, in model space.
    pub position: [f32; 3],

    /// The color of the vertex, in four linear channels.
    pub color: [f32; 4],
}

impl Vertex {
    /// A vertex at `position` with `color`.
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// The named attribute layout of this vertex type.
    ///
    /// Attribute locations are never hardcoded; the names here are resolved
    /// against the linked program when the vertex buffer is created.
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: mem::size_of::<Vertex>() as i32,
            attributes: vec![
                VertexAttribute {
                    name: "aPosition",
                    size: 3,
                    offset: bytemuck::offset_of!(Vertex, position) as i32,
                },
                VertexAttribute {
                    name: "aColor",
                    size: 4,
                    offset: bytemuck::offset_of!(Vertex, color) as i32,
                },
            ],
        }
    }
}

/// One named vertex attribute within [`Vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The attribute's name in the shader source.
    pub name: &'static str,

    /// Number of `f32` components.
    pub size: i32,

    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

/// How [`Vertex`] data is laid out in the vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes from one vertex to the next.
    pub stride: i32,

    /// The attributes, in declaration order.
    pub attributes: Vec<VertexAttribute>,
}

/// A vertex attribute whose shader location has been resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAttribute {
    /// The location the linker assigned to the attribute.
    pub location: u32,

    /// Number of `f32` components.
    pub size: i32,

    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

/// The backend for the renderer.
///
/// Operations sit at the granularity of the underlying shader-compiler API,
/// so the program build sequence in [`crate::program`] stays backend
/// independent. Handles are plain `Copy` values, as they are in the APIs this
/// abstracts; ownership lives in the typed wrappers one level up.
///
/// All methods take `&self`: the backing context is owned by a single render
/// thread and the callbacks that use it are invoked strictly sequentially, so
/// interior mutability is the backend's business.
pub trait GpuContext {
    /// A shader stage handle.
    type ShaderStage: Copy;

    /// A linked program handle.
    type Program: Copy;

    /// A vertex/index buffer bundle, including its attribute bindings.
    type VertexBuffer: Copy;

    /// An opaque uniform location.
    type UniformLocation: Clone;

    /// The error type associated with this GPU context.
    type Error: Error + 'static;

    /// The `#version` line shader sources must start with on this backend.
    fn shader_header(&self) -> &'static str;

    /// Allocate a shader stage of the given kind.
    fn create_stage(&self, kind: StageKind) -> Result<Self::ShaderStage, Self::Error>;

    /// Submit source text to a stage.
    fn stage_source(&self, stage: Self::ShaderStage, source: &str);

    /// Invoke compilation of a stage.
    fn compile_stage(&self, stage: Self::ShaderStage);

    /// Whether the last compilation of `stage` succeeded.
    fn stage_compile_status(&self, stage: Self::ShaderStage) -> bool;

    /// The compiler's diagnostic log for `stage`.
    fn stage_info_log(&self, stage: Self::ShaderStage) -> String;

    /// Release a stage.
    fn delete_stage(&self, stage: Self::ShaderStage);

    /// Allocate a program object.
    fn create_program(&self) -> Result<Self::Program, Self::Error>;

    /// Attach a compiled stage to a program.
    fn attach_stage(&self, program: Self::Program, stage: Self::ShaderStage);

    /// Detach a stage from a program.
    fn detach_stage(&self, program: Self::Program, stage: Self::ShaderStage);

    /// Invoke linking.
    fn link_program(&self, program: Self::Program);

    /// Whether the last link of `program` succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;

    /// The linker's diagnostic log for `program`.
    fn program_info_log(&self, program: Self::Program) -> String;

    /// Run the driver's program validator against the current pipeline state.
    ///
    /// Returns `None` when the backend exposes no validator entry point,
    /// `Some(Ok(()))` when validation passed, and `Some(Err(log))` with the
    /// validator's diagnostic log when it failed. Validation is a diagnostic
    /// aid only and never gates use of the program.
    fn validate_program(&self, program: Self::Program) -> Option<Result<(), String>>;

    /// Release a program.
    fn delete_program(&self, program: Self::Program);

    /// Make `program` current, or unbind with `None`.
    fn use_program(&self, program: Option<Self::Program>);

    /// Look up an active uniform by name.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    /// Look up an active vertex attribute by name.
    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    /// Upload a column-major 4x4 matrix to a uniform of the current program.
    fn set_uniform_mat4(&self, location: &Self::UniformLocation, matrix: &[f32; 16]);

    /// Create a vertex/index buffer bundle with the given attribute bindings.
    fn create_vertex_buffer(
        &self,
        attributes: &[BoundAttribute],
        stride: i32,
    ) -> Result<Self::VertexBuffer, Self::Error>;

    /// Upload vertex and index data.
    ///
    /// `indices` may be empty for unindexed geometry.
    fn write_vertices(&self, buffer: Self::VertexBuffer, vertices: &[Vertex], indices: &[u32]);

    /// Release a vertex buffer bundle.
    fn delete_vertex_buffer(&self, buffer: Self::VertexBuffer);

    /// Clear the color buffer with `color`, and the depth buffer too when
    /// `depth` is set.
    fn clear(&self, color: [f32; 4], depth: bool);

    /// Set the viewport rectangle.
    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Enable or disable depth testing.
    fn set_depth_test(&self, enabled: bool);

    /// Issue a draw call over `buffer`.
    fn draw(&self, buffer: Self::VertexBuffer, mode: DrawMode, range: DrawRange);
}

impl<C: GpuContext + ?Sized> GpuContext for &C {
    type ShaderStage = C::ShaderStage;
    type Program = C::Program;
    type VertexBuffer = C::VertexBuffer;
    type UniformLocation = C::UniformLocation;
    type Error = C::Error;

    fn shader_header(&self) -> &'static str {
        (**self).shader_header()
    }

    fn create_stage(&self, kind: StageKind) -> Result<Self::ShaderStage, Self::Error> {
        (**self).create_stage(kind)
    }

    fn stage_source(&self, stage: Self::ShaderStage, source: &str) {
        (**self).stage_source(stage, source)
    }

    fn compile_stage(&self, stage: Self::ShaderStage) {
        (**self).compile_stage(stage)
    }

    fn stage_compile_status(&self, stage: Self::ShaderStage) -> bool {
        (**self).stage_compile_status(stage)
    }

    fn stage_info_log(&self, stage: Self::ShaderStage) -> String {
        (**self).stage_info_log(stage)
    }

    fn delete_stage(&self, stage: Self::ShaderStage) {
        (**self).delete_stage(stage)
    }

    fn create_program(&self) -> Result<Self::Program, Self::Error> {
        (**self).create_program()
    }

    fn attach_stage(&self, program: Self::Program, stage: Self::ShaderStage) {
        (**self).attach_stage(program, stage)
    }

    fn detach_stage(&self, program: Self::Program, stage: Self::ShaderStage) {
        (**self).detach_stage(program, stage)
    }

    fn link_program(&self, program: Self::Program) {
        (**self).link_program(program)
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        (**self).program_link_status(program)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        (**self).program_info_log(program)
    }

    fn validate_program(&self, program: Self::Program) -> Option<Result<(), String>> {
        (**self).validate_program(program)
    }

    fn delete_program(&self, program: Self::Program) {
        (**self).delete_program(program)
    }

    fn use_program(&self, program: Option<Self::Program>) {
        (**self).use_program(program)
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        (**self).uniform_location(program, name)
    }

    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        (**self).attribute_location(program, name)
    }

    fn set_uniform_mat4(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        (**self).set_uniform_mat4(location, matrix)
    }

    fn create_vertex_buffer(
        &self,
        attributes: &[BoundAttribute],
        stride: i32,
    ) -> Result<Self::VertexBuffer, Self::Error> {
        (**self).create_vertex_buffer(attributes, stride)
    }

    fn write_vertices(&self, buffer: Self::VertexBuffer, vertices: &[Vertex], indices: &[u32]) {
        (**self).write_vertices(buffer, vertices, indices)
    }

    fn delete_vertex_buffer(&self, buffer: Self::VertexBuffer) {
        (**self).delete_vertex_buffer(buffer)
    }

    fn clear(&self, color: [f32; 4], depth: bool) {
        (**self).clear(color, depth)
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        (**self).set_viewport(x, y, width, height)
    }

    fn set_depth_test(&self, enabled: bool) {
        (**self).set_depth_test(enabled)
    }

    fn draw(&self, buffer: Self::VertexBuffer, mode: DrawMode, range: DrawRange) {
        (**self).draw(buffer, mode, range)
    }
}

#[cfg(test)]
#[path = "gpu_backend_tests.rs"]
mod tests;
