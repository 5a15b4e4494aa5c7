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

//! Shader program construction.
//!
//! Compiles a vertex/fragment source pair into a linked program. The stage
//! objects are scoped acquisitions: they are detached and released once a link
//! has been attempted, whether or not it succeeded, so a failed build never
//! leaks compiler-side resources.

use crate::error::Error;
use crate::gpu_backend::{GpuContext, StageKind};

use std::mem;

/// Builds and optionally validates shader programs for a [`GpuContext`].
#[derive(Debug, Clone, Copy)]
pub struct ProgramBuilder {
    diagnostics: bool,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    /// A builder with diagnostics following the build profile: on in debug
    /// builds, off in release builds.
    pub fn new() -> Self {
        Self {
            diagnostics: cfg!(debug_assertions),
        }
    }

    /// Enable or disable the post-link validation pass.
    ///
    /// Validation failures are logged, never returned; disabling this only
    /// silences the diagnostic.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Compile `vertex_source` and `fragment_source` and link them into a
    /// program.
    ///
    /// Sources must not carry a `#version` line; the backend's
    /// [`shader_header`](GpuContext::shader_header) is prepended here. On a
    /// compile failure the error carries the compiler's log for the failing
    /// stage; on a link failure, the linker's log. There is no fallback
    /// shader: a failed build leaves nothing allocated and nothing to draw
    /// with.
    pub fn build<C: GpuContext + ?Sized>(
        &self,
        context: &C,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<C::Program, Error> {
        let vertex = compile_stage(context, StageKind::Vertex, vertex_source)?;
        let release_vertex = CallOnDrop(|| context.delete_stage(vertex));

        let fragment = compile_stage(context, StageKind::Fragment, fragment_source)?;
        let release_fragment = CallOnDrop(|| context.delete_stage(fragment));

        let program = context.create_program().map_err(Error::backend)?;
        let delete_program = CallOnDrop(|| context.delete_program(program));

        context.attach_stage(program, vertex);
        context.attach_stage(program, fragment);
        context.link_program(program);

        // Stages are no longer needed once a link has been attempted.
        context.detach_stage(program, vertex);
        context.detach_stage(program, fragment);
        drop(release_vertex);
        drop(release_fragment);

        if !context.program_link_status(program) {
            let log = context.program_info_log(program);
            return Err(Error::Link { log });
        }

        mem::forget(delete_program);

        if self.diagnostics {
            validate(context, program);
        }

        Ok(program)
    }
}

fn compile_stage<C: GpuContext + ?Sized>(
    context: &C,
    kind: StageKind,
    source: &str,
) -> Result<C::ShaderStage, Error> {
    let stage = context.create_stage(kind).map_err(Error::backend)?;
    let release = CallOnDrop(|| context.delete_stage(stage));

    let source = format!("{}\n{}", context.shader_header(), source);
    context.stage_source(stage, &source);
    context.compile_stage(stage);

    if !context.stage_compile_status(stage) {
        let log = context.stage_info_log(stage);
        return Err(Error::Compile { stage: kind, log });
    }

    mem::forget(release);
    Ok(stage)
}

/// Ask the driver to validate `program` against the currently configured
/// pipeline state. A diagnostic aid only: failures are logged and the program
/// stays usable.
fn validate<C: GpuContext + ?Sized>(context: &C, program: C::Program) {
    match context.validate_program(program) {
        Some(Ok(())) => tracing::debug!("program validation passed"),
        Some(Err(log)) => tracing::warn!("program validation failed: {log}"),
        None => tracing::debug!("backend exposes no program validator"),
    }
}

struct CallOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
