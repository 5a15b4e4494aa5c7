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

//! Shader source loading.
//!
//! Sources are addressed by id and carry no `#version` line; the backend
//! supplies that header at compile time, so one source serves both the
//! embedded and the desktop dialect.

use crate::error::Error;

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Supplies shader source text for a named resource.
pub trait SourceProvider {
    /// Load the full source text for `id`.
    fn load(&self, id: &str) -> Result<Cow<'static, str>, Error>;
}

/// Source ids understood by the [`EmbeddedCatalog`].
pub mod ids {
    /// Vertex stage of the triangle pipeline.
    pub const TRIANGLE_VERTEX: &str = "triangle.v";

    /// Fragment stage of the triangle pipeline.
    pub const TRIANGLE_FRAGMENT: &str = "triangle.f";

    /// Vertex stage of the octahedron pipeline.
    pub const OCTAHEDRON_VERTEX: &str = "octahedron.v";

    /// Fragment stage of the octahedron pipeline.
    pub const OCTAHEDRON_FRAGMENT: &str = "octahedron.f";
}

const CATALOG: &[(&str, &str)] = &[
    (ids::TRIANGLE_VERTEX, include_str!("shaders/triangle.v.glsl")),
    (ids::TRIANGLE_FRAGMENT, include_str!("shaders/triangle.f.glsl")),
    (
        ids::OCTAHEDRON_VERTEX,
        include_str!("shaders/octahedron.v.glsl"),
    ),
    (
        ids::OCTAHEDRON_FRAGMENT,
        include_str!("shaders/octahedron.f.glsl"),
    ),
];

/// The shader sources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl SourceProvider for EmbeddedCatalog {
    fn load(&self, id: &str) -> Result<Cow<'static, str>, Error> {
        CATALOG
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, text)| Cow::Borrowed(*text))
            .ok_or_else(|| Error::UnknownSource(id.to_owned()))
    }
}

/// Loads `<root>/<id>.glsl` from disk on every request.
///
/// Useful while iterating on shader text; the embedded catalog is the normal
/// path.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// A provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for DirectorySource {
    fn load(&self, id: &str) -> Result<Cow<'static, str>, Error> {
        let path = self.root.join(format!("{id}.glsl"));
        let text = fs::read_to_string(path)?;
        Ok(Cow::Owned(text))
    }
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
