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

//! Defines useful resource wrappers.
//!
//! The raw backend handles are `Copy`; these wrappers give them ownership.
//! Release goes through the context (`destroy`), never through `Drop`: after
//! a host-driven context loss the handles are already dead and must simply be
//! forgotten.

use crate::gpu_backend::{BoundAttribute, GpuContext, Vertex};

use std::fmt;

macro_rules! define_resource_wrappers {
    ($($name:ident($res:ident)),* $(,)?) => {
        $(
            pub(crate) struct $name<C: GpuContext + ?Sized> {
                resource: C::$res,
            }

            impl<C: GpuContext + ?Sized> fmt::Debug for $name<C> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name))
                        .finish_non_exhaustive()
                }
            }

            impl<C: GpuContext + ?Sized> $name<C> {
                pub(crate) fn from_raw(resource: C::$res) -> Self {
                    Self { resource }
                }

                pub(crate) fn resource(&self) -> C::$res {
                    self.resource
                }
            }
        )*
    };
}

define_resource_wrappers! {
    Program(Program),
    VertexBuffer(VertexBuffer),
}

impl<C: GpuContext + ?Sized> Program<C> {
    pub(crate) fn destroy(self, context: &C) {
        context.delete_program(self.resource);
    }
}

impl<C: GpuContext + ?Sized> VertexBuffer<C> {
    pub(crate) fn new(
        context: &C,
        attributes: &[BoundAttribute],
        stride: i32,
    ) -> Result<Self, C::Error> {
        let resource = context.create_vertex_buffer(attributes, stride)?;
        Ok(Self::from_raw(resource))
    }

    pub(crate) fn upload(&self, context: &C, vertices: &[Vertex], indices: &[u32]) {
        context.write_vertices(self.resource, vertices, indices);
    }

    pub(crate) fn destroy(self, context: &C) {
        context.delete_vertex_buffer(self.resource);
    }
}
