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

//! Vertex and index data for the tutorial shapes.

use crate::gpu_backend::{DrawRange, Vertex};

/// Geometry uploaded once at surface creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// The vertices.
    pub vertices: &'static [Vertex],

    /// Indices into `vertices`, or `None` for unindexed drawing.
    pub indices: Option<&'static [u32]>,
}

impl Geometry {
    pub(crate) fn index_data(&self) -> &'static [u32] {
        self.indices.unwrap_or(&[])
    }

    /// The draw range covering the whole shape.
    pub fn draw_range(&self) -> DrawRange {
        match self.indices {
            Some(indices) => DrawRange::Elements {
                count: indices.len() as i32,
            },
            None => DrawRange::Arrays {
                first: 0,
                count: self.vertices.len() as i32,
            },
        }
    }
}

/// The colored triangle, one color per corner.
pub fn triangle() -> Geometry {
    Geometry {
        vertices: &TRIANGLE_VERTICES,
        indices: None,
    }
}

static TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new([0.0, 0.5, 0.0], [1.0, 0.5, 0.5, 1.0]),
    Vertex::new([-0.5, -0.5, 0.0], [0.5, 1.0, 0.5, 1.0]),
    Vertex::new([0.5, -0.5, 0.0], [0.5, 0.5, 1.0, 1.0]),
];

/// A unit octahedron: one vertex on each semi-axis, eight faces, indexed with
/// counter-clockwise outward winding.
pub fn octahedron() -> Geometry {
    Geometry {
        vertices: &OCTAHEDRON_VERTICES,
        indices: Some(&OCTAHEDRON_INDICES),
    }
}

static OCTAHEDRON_VERTICES: [Vertex; 6] = [
    Vertex::new([0.0, 1.0, 0.0], [1.0, 0.5, 0.5, 1.0]),
    Vertex::new([1.0, 0.0, 0.0], [0.5, 1.0, 0.5, 1.0]),
    Vertex::new([0.0, 0.0, 1.0], [0.5, 0.5, 1.0, 1.0]),
    Vertex::new([-1.0, 0.0, 0.0], [1.0, 1.0, 0.5, 1.0]),
    Vertex::new([0.0, 0.0, -1.0], [0.5, 1.0, 1.0, 1.0]),
    Vertex::new([0.0, -1.0, 0.0], [1.0, 0.5, 1.0, 1.0]),
];

// Four faces around the top vertex, four around the bottom.
static OCTAHEDRON_INDICES: [u32; 24] = [
    0, 2, 1, //
    0, 3, 2, //
    0, 4, 3, //
    0, 1, 4, //
    5, 1, 2, //
    5, 2, 3, //
    5, 3, 4, //
    5, 4, 1, //
];

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
