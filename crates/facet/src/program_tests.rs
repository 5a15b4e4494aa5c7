use super::*;
use crate::error::Error;
use crate::mock_context::{MockConfig, MockContext, Op};

const VS: &str = "void main() { gl_Position = vec4(0.0); }";
const FS: &str = "out vec4 fragColor; void main() { fragColor = vec4(1.0); }";

fn op_index(ops: &[Op], op: &Op) -> usize {
    ops.iter()
        .position(|recorded| recorded == op)
        .unwrap_or_else(|| panic!("{op:?} was never recorded"))
}

// ============================================================================
// Success path
// ============================================================================

#[test]
fn build_returns_a_program_and_releases_both_stages() {
    let context = MockContext::new();
    let program = ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, VS, FS)
        .unwrap();

    assert_eq!(context.live_programs(), 1);
    assert_eq!(context.live_stages(), 0);

    // Each stage is linked first, then detached, then deleted.
    let ops = context.ops();
    let link = op_index(&ops, &Op::LinkProgram(program));
    for stage in [1, 2] {
        let detach = op_index(&ops, &Op::DetachStage(program, stage));
        let delete = op_index(&ops, &Op::DeleteStage(stage));
        assert!(link < detach);
        assert!(detach < delete);
    }
}

#[test]
fn released_stages_are_never_touched_again() {
    let context = MockContext::new();
    ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, VS, FS)
        .unwrap();

    let ops = context.ops();
    for stage in [1u32, 2] {
        let deleted = op_index(&ops, &Op::DeleteStage(stage));
        let touched_after = ops[deleted + 1..].iter().any(|op| {
            matches!(
                op,
                Op::CompileStage(s)
                | Op::AttachStage(_, s)
                | Op::DetachStage(_, s)
                | Op::DeleteStage(s) if *s == stage
            )
        });
        assert!(!touched_after, "stage {stage} was reused after release");
    }
}

#[test]
fn stage_sources_carry_the_backend_header() {
    let context = MockContext::new();
    ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, VS, FS)
        .unwrap();

    let vertex_source = context.source_of(1).unwrap();
    assert!(vertex_source.starts_with("#version 320 es\n"));
    assert!(vertex_source.ends_with(VS));
}

// ============================================================================
// Compile and link failures
// ============================================================================

#[test]
fn fragment_compile_failure_reports_the_log_and_releases_the_vertex_stage() {
    let context = MockContext::with_config(MockConfig {
        fail_compile: Some((StageKind::Fragment, "0:3: 'oops' : syntax error".into())),
        ..Default::default()
    });

    let err = ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, VS, "oops")
        .unwrap_err();

    match err {
        Error::Compile { stage, log } => {
            assert_eq!(stage, StageKind::Fragment);
            assert!(log.contains("syntax error"));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }

    assert_eq!(context.live_stages(), 0);
    assert_eq!(context.live_programs(), 0);
}

#[test]
fn vertex_compile_failure_is_reported_for_the_vertex_stage() {
    let context = MockContext::with_config(MockConfig {
        fail_compile: Some((StageKind::Vertex, "0:1: undeclared identifier".into())),
        ..Default::default()
    });

    let err = ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, "oops", FS)
        .unwrap_err();

    assert!(matches!(err, Error::Compile { stage: StageKind::Vertex, .. }));
    assert_eq!(context.live_stages(), 0);
}

#[test]
fn link_failure_reports_the_log_and_releases_everything() {
    let context = MockContext::with_config(MockConfig {
        fail_link: Some("varying vColor is never written".into()),
        ..Default::default()
    });

    let err = ProgramBuilder::new()
        .diagnostics(false)
        .build(&context, VS, FS)
        .unwrap_err();

    match err {
        Error::Link { log } => assert!(log.contains("vColor")),
        other => panic!("expected a link error, got {other:?}"),
    }

    // The stages were still detached before release, and the failed program
    // did not survive.
    let ops = context.ops();
    assert!(ops.contains(&Op::DetachStage(3, 1)));
    assert!(ops.contains(&Op::DetachStage(3, 2)));
    assert_eq!(context.live_stages(), 0);
    assert_eq!(context.live_programs(), 0);
}

// ============================================================================
// Validation diagnostics
// ============================================================================

#[test]
fn validation_runs_only_when_diagnostics_are_enabled() {
    let context = MockContext::with_config(MockConfig {
        validation: Some(Ok(())),
        ..Default::default()
    });
    let program = ProgramBuilder::new()
        .diagnostics(true)
        .build(&context, VS, FS)
        .unwrap();
    assert!(context.ops().contains(&Op::ValidateProgram(program)));

    let silent = MockContext::with_config(MockConfig {
        validation: Some(Ok(())),
        ..Default::default()
    });
    ProgramBuilder::new()
        .diagnostics(false)
        .build(&silent, VS, FS)
        .unwrap();
    assert!(!silent
        .ops()
        .iter()
        .any(|op| matches!(op, Op::ValidateProgram(_))));
}

#[test]
fn validation_failure_does_not_fail_the_build() {
    let context = MockContext::with_config(MockConfig {
        validation: Some(Err("no vertex array object is bound".into())),
        ..Default::default()
    });

    let program = ProgramBuilder::new()
        .diagnostics(true)
        .build(&context, VS, FS);

    assert!(program.is_ok());
    assert_eq!(context.live_programs(), 1);
}

#[test]
fn backends_without_a_validator_still_build() {
    // `validation: None` models a backend with no validator entry point.
    let context = MockContext::new();
    let program = ProgramBuilder::new().diagnostics(true).build(&context, VS, FS);
    assert!(program.is_ok());
}
