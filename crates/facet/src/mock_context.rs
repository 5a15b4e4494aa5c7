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

//! Mock GPU context for unit tests (no GPU required).
//!
//! Records every operation in call order, tracks which handles are live, and
//! lets tests inject compile, link and validation failures with canned
//! diagnostic logs.

use crate::gpu_backend::{BoundAttribute, DrawMode, DrawRange, GpuContext, StageKind, Vertex};

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

/// Everything the mock has been asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    CreateStage(u32, StageKind),
    CompileStage(u32),
    DeleteStage(u32),
    CreateProgram(u32),
    AttachStage(u32, u32),
    DetachStage(u32, u32),
    LinkProgram(u32),
    ValidateProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    SetUniformMat4(String, [f32; 16]),
    CreateVertexBuffer(u32),
    WriteVertices {
        buffer: u32,
        vertices: usize,
        indices: usize,
    },
    DeleteVertexBuffer(u32),
    Clear([f32; 4], bool),
    SetViewport(i32, i32, i32, i32),
    SetDepthTest(bool),
    Draw(u32, DrawMode, DrawRange),
}

/// Failure injection knobs.
#[derive(Debug, Default)]
pub(crate) struct MockConfig {
    /// Fail compilation of the given stage kind with this log.
    pub fail_compile: Option<(StageKind, String)>,

    /// Fail linking with this log.
    pub fail_link: Option<String>,

    /// Validator outcome; `None` models a backend with no validator.
    pub validation: Option<Result<(), String>>,

    /// Uniform names that resolve to no location.
    pub missing_uniforms: Vec<&'static str>,

    /// Attribute names that resolve to no location.
    pub missing_attributes: Vec<&'static str>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    ops: Vec<Op>,
    sources: Vec<(u32, String)>,
    stage_kinds: Vec<(u32, StageKind)>,
    live_stages: HashSet<u32>,
    live_programs: HashSet<u32>,
    live_buffers: HashSet<u32>,
}

#[derive(Debug)]
pub(crate) struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock error: {}", self.0)
    }
}

impl std::error::Error for MockError {}

pub(crate) struct MockContext {
    config: MockConfig,
    state: RefCell<State>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            state: RefCell::new(State::default()),
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn live_stages(&self) -> usize {
        self.state.borrow().live_stages.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().live_programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().live_buffers.len()
    }

    /// The last source submitted to `stage`.
    pub fn source_of(&self, stage: u32) -> Option<String> {
        self.state
            .borrow()
            .sources
            .iter()
            .rev()
            .find(|(id, _)| *id == stage)
            .map(|(_, source)| source.clone())
    }

    fn alloc(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }

    fn record(&self, op: Op) {
        self.state.borrow_mut().ops.push(op);
    }

    fn kind_of(&self, stage: u32) -> Option<StageKind> {
        self.state
            .borrow()
            .stage_kinds
            .iter()
            .find(|(id, _)| *id == stage)
            .map(|(_, kind)| *kind)
    }
}

impl GpuContext for MockContext {
    type ShaderStage = u32;
    type Program = u32;
    type VertexBuffer = u32;
    type UniformLocation = String;
    type Error = MockError;

    fn shader_header(&self) -> &'static str {
        "#version 320 es"
    }

    fn create_stage(&self, kind: StageKind) -> Result<u32, MockError> {
        let id = self.alloc();
        {
            let mut state = self.state.borrow_mut();
            state.live_stages.insert(id);
            state.stage_kinds.push((id, kind));
        }
        self.record(Op::CreateStage(id, kind));
        Ok(id)
    }

    fn stage_source(&self, stage: u32, source: &str) {
        self.state
            .borrow_mut()
            .sources
            .push((stage, source.to_owned()));
    }

    fn compile_stage(&self, stage: u32) {
        self.record(Op::CompileStage(stage));
    }

    fn stage_compile_status(&self, stage: u32) -> bool {
        match &self.config.fail_compile {
            Some((kind, _)) => self.kind_of(stage) != Some(*kind),
            None => true,
        }
    }

    fn stage_info_log(&self, _stage: u32) -> String {
        self.config
            .fail_compile
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_stage(&self, stage: u32) {
        self.state.borrow_mut().live_stages.remove(&stage);
        self.record(Op::DeleteStage(stage));
    }

    fn create_program(&self) -> Result<u32, MockError> {
        let id = self.alloc();
        self.state.borrow_mut().live_programs.insert(id);
        self.record(Op::CreateProgram(id));
        Ok(id)
    }

    fn attach_stage(&self, program: u32, stage: u32) {
        self.record(Op::AttachStage(program, stage));
    }

    fn detach_stage(&self, program: u32, stage: u32) {
        self.record(Op::DetachStage(program, stage));
    }

    fn link_program(&self, program: u32) {
        self.record(Op::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        self.config.fail_link.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.config.fail_link.clone().unwrap_or_default()
    }

    fn validate_program(&self, program: u32) -> Option<Result<(), String>> {
        self.record(Op::ValidateProgram(program));
        self.config.validation.clone()
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().live_programs.remove(&program);
        self.record(Op::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Op::UseProgram(program));
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        if self.config.missing_uniforms.contains(&name) {
            None
        } else {
            Some(name.to_owned())
        }
    }

    fn attribute_location(&self, _program: u32, name: &str) -> Option<u32> {
        if self.config.missing_attributes.contains(&name) {
            None
        } else {
            Some(name.len() as u32)
        }
    }

    fn set_uniform_mat4(&self, location: &String, matrix: &[f32; 16]) {
        self.record(Op::SetUniformMat4(location.clone(), *matrix));
    }

    fn create_vertex_buffer(
        &self,
        _attributes: &[BoundAttribute],
        _stride: i32,
    ) -> Result<u32, MockError> {
        let id = self.alloc();
        self.state.borrow_mut().live_buffers.insert(id);
        self.record(Op::CreateVertexBuffer(id));
        Ok(id)
    }

    fn write_vertices(&self, buffer: u32, vertices: &[Vertex], indices: &[u32]) {
        self.record(Op::WriteVertices {
            buffer,
            vertices: vertices.len(),
            indices: indices.len(),
        });
    }

    fn delete_vertex_buffer(&self, buffer: u32) {
        self.state.borrow_mut().live_buffers.remove(&buffer);
        self.record(Op::DeleteVertexBuffer(buffer));
    }

    fn clear(&self, color: [f32; 4], depth: bool) {
        self.record(Op::Clear(color, depth));
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Op::SetViewport(x, y, width, height));
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Op::SetDepthTest(enabled));
    }

    fn draw(&self, buffer: u32, mode: DrawMode, range: DrawRange) {
        self.record(Op::Draw(buffer, mode, range));
    }
}

#[cfg(test)]
#[path = "mock_context_tests.rs"]
mod tests;
