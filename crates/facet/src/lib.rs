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

//! The classic first steps of OpenGL ES rendering, as one parameterized renderer.
//!
//! `facet` reproduces the usual tutorial progression -- clear the screen, draw a
//! colored triangle out of a vertex buffer, spin an indexed octahedron under a
//! perspective projection -- without the usual pile of near-identical renderer
//! classes. Each step is a [`SceneConfig`]: a clear color plus an optional shader
//! pair, geometry, projection and animation. One [`Scene`] drives any of them
//! through the host's surface lifecycle ([`SurfaceRenderer`]).
//!
//! Every GPU touch goes through the [`GpuContext`] trait, at the granularity of
//! the underlying shader-compiler API. That keeps the interesting part -- the
//! compile/link/validate sequence in [`program`] -- backend-independent and
//! testable without a GPU. The `facet-glow` crate implements the trait on top of
//! [`glow`].
//!
//! [`glow`]: https://crates.io/crates/glow

pub mod error;
pub mod geometry;
pub mod gpu_backend;
pub mod pipeline;
pub mod program;
pub mod projection;
pub mod scene;
pub mod sources;

mod resources;

#[cfg(test)]
pub(crate) mod mock_context;

pub use error::Error;
pub use gpu_backend::{
    BoundAttribute, DrawMode, DrawRange, GpuContext, StageKind, Vertex, VertexAttribute,
    VertexLayout,
};
pub use pipeline::{Pipeline, PipelineSpec, UNIFORM_MODEL, UNIFORM_PROJECTION};
pub use program::ProgramBuilder;
pub use projection::Projection;
pub use scene::{Animation, Scene, SceneConfig, SceneObject, SurfaceRenderer};
pub use sources::{DirectorySource, EmbeddedCatalog, SourceProvider};
