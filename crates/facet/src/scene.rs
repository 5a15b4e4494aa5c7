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

//! The unified scene renderer and the surface lifecycle contract.
//!
//! Each tutorial stage is a [`SceneConfig`] value rather than its own
//! renderer type: clearing the screen, the orthographic triangle and the
//! spinning octahedron differ only in data. One [`Scene`] drives any of them.

use crate::error::Error;
use crate::geometry::{self, Geometry};
use crate::gpu_backend::{DrawMode, GpuContext};
use crate::pipeline::{Pipeline, PipelineSpec, UNIFORM_MODEL, UNIFORM_PROJECTION};
use crate::program::ProgramBuilder;
use crate::projection::Projection;
use crate::sources::{ids, EmbeddedCatalog, SourceProvider};

use glam::{Mat4, Vec3};

/// The lifecycle contract the host windowing layer drives.
///
/// All three callbacks arrive on the host's dedicated render thread, strictly
/// sequentially, with a current graphics context. When the host destroys and
/// recreates the context (backgrounding, device loss) it calls
/// [`surface_created`](Self::surface_created) again and every GPU object is
/// rebuilt; the renderer never detects context loss on its own.
pub trait SurfaceRenderer<C: GpuContext + ?Sized> {
    /// The surface and context exist; build programs and upload geometry.
    fn surface_created(&mut self, context: &C) -> Result<(), Error>;

    /// The surface was (re)sized; recompute the viewport and projection.
    ///
    /// Called at least once after creation, and again on every orientation
    /// change or resize.
    fn surface_changed(&mut self, context: &C, width: u32, height: u32) -> Result<(), Error>;

    /// Render one frame; `elapsed` is seconds since the scene started
    /// animating.
    fn draw_frame(&mut self, context: &C, elapsed: f32) -> Result<(), Error>;
}

/// Time-driven model transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Identity model matrix every frame.
    Static,

    /// Translate, then rotate around each axis at a fixed rate.
    Spin {
        /// Rotation rate around x/y/z, in radians per second.
        rate: Vec3,

        /// Fixed translation applied after the rotation.
        translation: Vec3,
    },
}

impl Animation {
    /// The model matrix after `elapsed` seconds.
    pub fn model_matrix(&self, elapsed: f32) -> Mat4 {
        match *self {
            Animation::Static => Mat4::IDENTITY,
            Animation::Spin { rate, translation } => {
                Mat4::from_translation(translation)
                    * Mat4::from_rotation_y(rate.y * elapsed)
                    * Mat4::from_rotation_x(rate.x * elapsed)
                    * Mat4::from_rotation_z(rate.z * elapsed)
            }
        }
    }
}

/// The drawable part of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Shader pair, uniforms and draw configuration.
    pub pipeline: PipelineSpec,

    /// What to upload and draw.
    pub geometry: Geometry,

    /// Projection recomputed on every resize.
    pub projection: Projection,

    /// Model transform recomputed on every frame.
    pub animation: Animation,
}

/// One tutorial stage, as data.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Short display name.
    pub name: &'static str,

    /// Color the surface is cleared to each frame.
    pub clear_color: [f32; 4],

    /// The object to draw, or `None` to only clear.
    pub object: Option<SceneObject>,
}

impl SceneConfig {
    /// Stage 1: clear the screen and nothing else.
    pub fn clear() -> Self {
        Self {
            name: "clear",
            clear_color: [1.0, 0.5, 0.5, 1.0],
            object: None,
        }
    }

    /// Stage 2: a colored triangle under an aspect-corrected orthographic
    /// projection.
    pub fn triangle() -> Self {
        Self {
            name: "triangle",
            clear_color: [0.0, 0.0, 0.0, 1.0],
            object: Some(SceneObject {
                pipeline: PipelineSpec {
                    vertex_shader: ids::TRIANGLE_VERTEX,
                    fragment_shader: ids::TRIANGLE_FRAGMENT,
                    uniforms: &[UNIFORM_PROJECTION],
                    draw_mode: DrawMode::Triangles,
                    depth_test: false,
                },
                geometry: geometry::triangle(),
                projection: Projection::AspectOrtho,
                animation: Animation::Static,
            }),
        }
    }

    /// Stage 3: an indexed octahedron, spinning under a perspective
    /// projection with depth testing.
    pub fn octahedron() -> Self {
        Self {
            name: "octahedron",
            clear_color: [0.05, 0.05, 0.08, 1.0],
            object: Some(SceneObject {
                pipeline: PipelineSpec {
                    vertex_shader: ids::OCTAHEDRON_VERTEX,
                    fragment_shader: ids::OCTAHEDRON_FRAGMENT,
                    uniforms: &[UNIFORM_PROJECTION, UNIFORM_MODEL],
                    draw_mode: DrawMode::Triangles,
                    depth_test: true,
                },
                geometry: geometry::octahedron(),
                projection: Projection::Perspective {
                    fov_y: std::f32::consts::FRAC_PI_4,
                    z_near: 1.0,
                    z_far: 10.0,
                },
                animation: Animation::Spin {
                    rate: Vec3::new(0.4, 0.9, 0.0),
                    translation: Vec3::new(0.0, 0.0, -3.0),
                },
            }),
        }
    }
}

/// Drives one [`SceneConfig`] through the surface lifecycle.
pub struct Scene<C: GpuContext + ?Sized, P: SourceProvider = EmbeddedCatalog> {
    config: SceneConfig,
    provider: P,
    builder: ProgramBuilder,
    pipeline: Option<Pipeline<C>>,
    created: bool,
}

impl<C: GpuContext + ?Sized> Scene<C> {
    /// A scene over the embedded shader catalog.
    pub fn new(config: SceneConfig) -> Self {
        Self::with_provider(config, EmbeddedCatalog)
    }
}

impl<C: GpuContext + ?Sized, P: SourceProvider> Scene<C, P> {
    /// A scene loading shader text from `provider`.
    pub fn with_provider(config: SceneConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            builder: ProgramBuilder::new(),
            pipeline: None,
            created: false,
        }
    }

    /// Override the program builder, e.g. to force the diagnostics flag.
    pub fn with_builder(mut self, builder: ProgramBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// The configuration this scene renders.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

impl<C: GpuContext + ?Sized, P: SourceProvider> SurfaceRenderer<C> for Scene<C, P> {
    fn surface_created(&mut self, context: &C) -> Result<(), Error> {
        // Handles from a lost context died with it; forget, don't release.
        self.pipeline = None;
        self.created = false;

        tracing::debug!(scene = self.config.name, "building scene");

        if let Some(object) = &self.config.object {
            let pipeline = Pipeline::new(
                context,
                &self.provider,
                &object.pipeline,
                &object.geometry,
                self.builder,
            )?;
            pipeline.bind(context);
            self.pipeline = Some(pipeline);
        }

        self.created = true;
        Ok(())
    }

    fn surface_changed(&mut self, context: &C, width: u32, height: u32) -> Result<(), Error> {
        if !self.created {
            return Err(Error::NotReady);
        }

        context.set_viewport(0, 0, width as i32, height as i32);

        if let (Some(object), Some(pipeline)) = (&self.config.object, &self.pipeline) {
            let projection = object.projection.matrix(width, height);
            pipeline.bind(context);
            pipeline.set_mat4(context, UNIFORM_PROJECTION, &projection)?;
        }

        Ok(())
    }

    fn draw_frame(&mut self, context: &C, elapsed: f32) -> Result<(), Error> {
        if !self.created {
            return Err(Error::NotReady);
        }

        let depth = self
            .config
            .object
            .as_ref()
            .map_or(false, |object| object.pipeline.depth_test);
        context.clear(self.config.clear_color, depth);

        if let (Some(object), Some(pipeline)) = (&self.config.object, &self.pipeline) {
            pipeline.bind(context);
            if pipeline.has_uniform(UNIFORM_MODEL) {
                let model = object.animation.model_matrix(elapsed);
                pipeline.set_mat4(context, UNIFORM_MODEL, &model)?;
            }
            pipeline.draw(context);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
