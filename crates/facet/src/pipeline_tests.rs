use super::*;
use crate::error::Error;
use crate::geometry;
use crate::mock_context::{MockConfig, MockContext, Op};
use crate::sources::{ids, EmbeddedCatalog};

use glam::Vec3;

fn quiet_builder() -> ProgramBuilder {
    ProgramBuilder::new().diagnostics(false)
}

fn triangle_spec() -> PipelineSpec {
    PipelineSpec {
        vertex_shader: ids::TRIANGLE_VERTEX,
        fragment_shader: ids::TRIANGLE_FRAGMENT,
        uniforms: &[UNIFORM_PROJECTION],
        draw_mode: DrawMode::Triangles,
        depth_test: false,
    }
}

fn octahedron_spec() -> PipelineSpec {
    PipelineSpec {
        vertex_shader: ids::OCTAHEDRON_VERTEX,
        fragment_shader: ids::OCTAHEDRON_FRAGMENT,
        uniforms: &[UNIFORM_PROJECTION, UNIFORM_MODEL],
        draw_mode: DrawMode::Triangles,
        depth_test: true,
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_builds_the_program_and_uploads_the_geometry() {
    let context = MockContext::new();
    let geometry = geometry::triangle();
    let pipeline = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &triangle_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap();

    assert!(pipeline.has_uniform(UNIFORM_PROJECTION));
    assert!(!pipeline.has_uniform(UNIFORM_MODEL));
    assert_eq!(context.live_programs(), 1);
    assert_eq!(context.live_buffers(), 1);
    assert!(context.ops().iter().any(|op| matches!(
        op,
        Op::WriteVertices {
            vertices: 3,
            indices: 0,
            ..
        }
    )));
}

#[test]
fn missing_uniform_fails_and_releases_the_program() {
    let context = MockContext::with_config(MockConfig {
        missing_uniforms: vec![UNIFORM_PROJECTION],
        ..Default::default()
    });
    let geometry = geometry::triangle();

    let err = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &triangle_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::MissingUniform(name) if name == UNIFORM_PROJECTION));
    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_buffers(), 0);
}

#[test]
fn missing_attribute_fails_and_releases_the_program() {
    let context = MockContext::with_config(MockConfig {
        missing_attributes: vec!["aColor"],
        ..Default::default()
    });
    let geometry = geometry::triangle();

    let err = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &triangle_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::MissingAttribute("aColor")));
    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_buffers(), 0);
}

#[test]
fn unknown_shader_id_fails_before_touching_the_backend() {
    let context = MockContext::new();
    let geometry = geometry::triangle();
    let spec = PipelineSpec {
        vertex_shader: "missing.v",
        ..triangle_spec()
    };

    let err = Pipeline::new(&context, &EmbeddedCatalog, &spec, &geometry, quiet_builder())
        .unwrap_err();

    assert!(matches!(err, Error::UnknownSource(_)));
    assert!(context.ops().is_empty());
}

// ============================================================================
// Draw path
// ============================================================================

#[test]
fn draw_uses_the_configured_mode_and_range() {
    let context = MockContext::new();
    let geometry = geometry::octahedron();
    let pipeline = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &octahedron_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap();

    pipeline.bind(&context);
    pipeline.draw(&context);

    let ops = context.ops();
    assert!(ops.contains(&Op::SetDepthTest(true)));
    assert!(ops.iter().any(|op| matches!(
        op,
        Op::Draw(_, DrawMode::Triangles, DrawRange::Elements { count: 24 })
    )));
}

#[test]
fn set_mat4_uploads_column_major() {
    let context = MockContext::new();
    let geometry = geometry::triangle();
    let pipeline = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &triangle_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap();

    let matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    pipeline
        .set_mat4(&context, UNIFORM_PROJECTION, &matrix)
        .unwrap();

    let ops = context.ops();
    let uploaded = ops
        .iter()
        .find_map(|op| match op {
            Op::SetUniformMat4(name, m) if name == UNIFORM_PROJECTION => Some(*m),
            _ => None,
        })
        .unwrap();
    assert_eq!(uploaded, matrix.to_cols_array());
    // Column-major: the translation sits in the last column.
    assert_eq!(&uploaded[12..15], &[1.0, 2.0, 3.0]);
}

#[test]
fn destroy_releases_the_buffer_and_the_program() {
    let context = MockContext::new();
    let geometry = geometry::triangle();
    let pipeline = Pipeline::new(
        &context,
        &EmbeddedCatalog,
        &triangle_spec(),
        &geometry,
        quiet_builder(),
    )
    .unwrap();

    pipeline.destroy(&context);

    assert_eq!(context.live_programs(), 0);
    assert_eq!(context.live_buffers(), 0);
}
