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

//! The parameterized render pipeline.
//!
//! A [`PipelineSpec`] names a shader pair, the uniforms the program must
//! expose and the draw configuration; [`Pipeline`] turns one spec into a
//! linked program with its binding tables resolved. Uniform and attribute
//! locations are looked up by name exactly once, right after linking --
//! numeric locations never appear in calling code.

use crate::error::Error;
use crate::geometry::Geometry;
use crate::gpu_backend::{BoundAttribute, DrawMode, DrawRange, GpuContext, Vertex};
use crate::program::ProgramBuilder;
use crate::resources;
use crate::sources::SourceProvider;

use glam::Mat4;

use core::fmt;

/// Uniform receiving the projection matrix, recomputed on resize.
pub const UNIFORM_PROJECTION: &str = "uProjection";

/// Uniform receiving the per-frame model transform.
pub const UNIFORM_MODEL: &str = "uModel";

/// Static description of one render pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    /// Source id of the vertex stage.
    pub vertex_shader: &'static str,

    /// Source id of the fragment stage.
    pub fragment_shader: &'static str,

    /// Uniform names the program must expose.
    pub uniforms: &'static [&'static str],

    /// Primitive assembly mode.
    pub draw_mode: DrawMode,

    /// Whether drawing runs with depth testing.
    pub depth_test: bool,
}

/// Uniform name -> location table, resolved once after linking.
pub struct UniformBindings<C: GpuContext + ?Sized> {
    entries: Box<[(&'static str, C::UniformLocation)]>,
}

impl<C: GpuContext + ?Sized> UniformBindings<C> {
    fn resolve(
        context: &C,
        program: C::Program,
        names: &'static [&'static str],
    ) -> Result<Self, Error> {
        let entries = names
            .iter()
            .map(|&name| {
                context
                    .uniform_location(program, name)
                    .map(|location| (name, location))
                    .ok_or(Error::MissingUniform(name))
            })
            .collect::<Result<Box<[_]>, _>>()?;

        Ok(Self { entries })
    }

    fn get(&self, name: &str) -> Option<&C::UniformLocation> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, location)| location)
    }
}

impl<C: GpuContext + ?Sized> fmt::Debug for UniformBindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformBindings").finish_non_exhaustive()
    }
}

/// A linked program plus the GPU-resident geometry it draws.
pub struct Pipeline<C: GpuContext + ?Sized> {
    program: resources::Program<C>,
    bindings: UniformBindings<C>,
    buffer: resources::VertexBuffer<C>,
    draw_mode: DrawMode,
    depth_test: bool,
    range: DrawRange,
}

impl<C: GpuContext + ?Sized> fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("program", &self.program)
            .field("bindings", &self.bindings)
            .field("buffer", &self.buffer)
            .field("draw_mode", &self.draw_mode)
            .field("depth_test", &self.depth_test)
            .field("range", &self.range)
            .finish()
    }
}

impl<C: GpuContext + ?Sized> Pipeline<C> {
    /// Build the program, resolve its bindings and upload `geometry`.
    pub fn new(
        context: &C,
        provider: &impl SourceProvider,
        spec: &PipelineSpec,
        geometry: &Geometry,
        builder: ProgramBuilder,
    ) -> Result<Self, Error> {
        let vertex_source = provider.load(spec.vertex_shader)?;
        let fragment_source = provider.load(spec.fragment_shader)?;

        let raw = builder.build(context, &vertex_source, &fragment_source)?;
        let program = resources::Program::from_raw(raw);

        let bindings = match UniformBindings::resolve(context, raw, spec.uniforms) {
            Ok(bindings) => bindings,
            Err(err) => {
                program.destroy(context);
                return Err(err);
            }
        };

        let layout = Vertex::layout();
        let mut attributes = Vec::with_capacity(layout.attributes.len());
        for attribute in &layout.attributes {
            match context.attribute_location(raw, attribute.name) {
                Some(location) => attributes.push(BoundAttribute {
                    location,
                    size: attribute.size,
                    offset: attribute.offset,
                }),
                None => {
                    program.destroy(context);
                    return Err(Error::MissingAttribute(attribute.name));
                }
            }
        }

        let buffer = match resources::VertexBuffer::new(context, &attributes, layout.stride) {
            Ok(buffer) => buffer,
            Err(err) => {
                program.destroy(context);
                return Err(Error::backend(err));
            }
        };
        buffer.upload(context, geometry.vertices, geometry.index_data());

        tracing::debug!(
            vertices = geometry.vertices.len(),
            indices = geometry.index_data().len(),
            "pipeline built"
        );

        Ok(Self {
            program,
            bindings,
            buffer,
            draw_mode: spec.draw_mode,
            depth_test: spec.depth_test,
            range: geometry.draw_range(),
        })
    }

    /// Make the program current and apply its fixed-function state.
    pub fn bind(&self, context: &C) {
        context.use_program(Some(self.program.resource()));
        context.set_depth_test(self.depth_test);
    }

    /// Whether `name` was resolved at link time.
    pub fn has_uniform(&self, name: &str) -> bool {
        self.bindings.get(name).is_some()
    }

    /// Upload `matrix` to the uniform resolved for `name`.
    pub fn set_mat4(&self, context: &C, name: &'static str, matrix: &Mat4) -> Result<(), Error> {
        let location = self.bindings.get(name).ok_or(Error::MissingUniform(name))?;
        context.set_uniform_mat4(location, &matrix.to_cols_array());
        Ok(())
    }

    /// Issue the draw call for the uploaded geometry.
    pub fn draw(&self, context: &C) {
        context.draw(self.buffer.resource(), self.draw_mode, self.range);
    }

    /// Release the GPU objects through a still-live context.
    pub fn destroy(self, context: &C) {
        self.buffer.destroy(context);
        self.program.destroy(context);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
