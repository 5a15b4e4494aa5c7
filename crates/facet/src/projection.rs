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

//! Projection matrices for the surface lifecycle.
//!
//! Both projections share one convention: the aspect ratio is always the
//! longer window dimension over the shorter one, and the correction is
//! applied to whichever axis is longer. A resize that swaps orientation
//! therefore moves the correction between the x and y axes.

use glam::{Mat4, Vec4};

/// How a scene projects camera space onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Orthographic: the shorter window axis spans `[-1, 1]` and the longer
    /// axis is extended to `[-aspect, aspect]`, with near/far at `-1`/`1`.
    AspectOrtho,

    /// Perspective: the shorter axis keeps the full field of view and the
    /// longer axis is compressed by the aspect ratio.
    Perspective {
        /// Vertical field of view in radians (of the shorter axis).
        fov_y: f32,

        /// Near clip distance, positive.
        z_near: f32,

        /// Far clip distance, positive.
        z_far: f32,
    },
}

/// Aspect ratio as the longer window dimension over the shorter one.
///
/// Always `>= 1`; square surfaces yield exactly `1`.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width > height {
        width as f32 / height as f32
    } else {
        height as f32 / width as f32
    }
}

impl Projection {
    /// The projection matrix for a surface of `width` x `height`, in GL clip
    /// conventions (depth mapped to `[-1, 1]`).
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = aspect_ratio(width, height);
        let landscape = width > height;

        match *self {
            Projection::AspectOrtho => {
                if landscape {
                    Mat4::orthographic_rh_gl(-aspect, aspect, -1.0, 1.0, -1.0, 1.0)
                } else {
                    Mat4::orthographic_rh_gl(-1.0, 1.0, -aspect, aspect, -1.0, 1.0)
                }
            }
            Projection::Perspective {
                fov_y,
                z_near,
                z_far,
            } => perspective(fov_y, aspect, landscape, z_near, z_far),
        }
    }
}

// Equivalent to `Mat4::perspective_rh_gl` in landscape; in portrait the
// aspect divisor moves to the y axis so the full field of view stays on the
// shorter dimension.
fn perspective(fov_y: f32, aspect: f32, landscape: bool, z_near: f32, z_far: f32) -> Mat4 {
    let focal = 1.0 / (fov_y * 0.5).tan();
    let (sx, sy) = if landscape {
        (focal / aspect, focal)
    } else {
        (focal, focal / aspect)
    };

    Mat4::from_cols(
        Vec4::new(sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (z_far + z_near) / (z_near - z_far), -1.0),
        Vec4::new(0.0, 0.0, 2.0 * z_far * z_near / (z_near - z_far), 0.0),
    )
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
