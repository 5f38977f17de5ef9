//! Tests for the full conversion: lowering, rendering and the dump entry points.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use tracesmith::ast::{DomainObject, Program, Statement};
use tracesmith::codegen::{render, write_program};
use tracesmith::compiler::{Compiler, locust};
use tracesmith::error::{ContractError, ConversionError, RenderError};
use tracesmith::prelude::dumps;
use tracesmith::session::HttpMethod;

#[test]
fn test_weighted_listing_compiles_to_locustfile() {
    let compilation = Compiler::builder(weighted_listing())
        .build()
        .expect("builtin plugins resolve")
        .compile()
        .expect("Failed to compile");
    assert!(compilation.skipped.is_empty());

    let task_a = request(HttpMethod::Get, "https://example.com/a", 0).task_name();
    let task_b = request(HttpMethod::Get, "https://example.com/b", 0).task_name();
    let call = |url: &str| {
        format!(
            "self.client.get(url='{url}', name='{url}', timeout=30, allow_redirects=False)"
        )
    };
    let expected = [
        format!(
            "# File automatically generated by tracesmith v{}.",
            env!("CARGO_PKG_VERSION")
        ),
        String::new(),
        "from locust import HttpUser, SequentialTaskSet, TaskSet, between, task".to_string(),
        String::new(),
        "class root(TaskSet):".to_string(),
        "    @task(1)".to_string(),
        "    class s1(SequentialTaskSet):".to_string(),
        "        @task".to_string(),
        format!("        def {}(self):", task_a),
        format!("            response = {}", call("https://example.com/a")),
        "    @task(3)".to_string(),
        "    class s2(SequentialTaskSet):".to_string(),
        "        @task".to_string(),
        format!("        def {}(self):", task_b),
        format!("            response = {}", call("https://example.com/b")),
        String::new(),
        "class UserForroot(HttpUser):".to_string(),
        "    tasks = [root]".to_string(),
        "    weight = 1".to_string(),
        "    wait_time = between(0, 10)".to_string(),
    ]
    .join("\n");

    assert_eq!(render_text(compilation.program), expected);
}

#[test]
fn test_compilation_is_deterministic() {
    let compile = || {
        Compiler::builder(weighted_listing())
            .with_plugin("dummy")
            .build()
            .unwrap()
            .compile()
            .unwrap()
            .program
    };
    assert_eq!(render_text(compile()), render_text(compile()));
}

#[test]
fn test_dumps_converts_har_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_har(
        dir.path(),
        "browse.har",
        &["https://example.com/", "https://example.com/items"],
    );

    let text = dumps(&[&path], &["dummy"], true).expect("conversion succeeds");
    assert!(text.contains("'accept': '*/*'"), "{}", text);
    assert!(!text.to_lowercase().contains("cookie"), "{}", text);
    assert!(!text.contains(":authority"), "{}", text);
    assert_eq!(text.matches("response = self.client.get(").count(), 2);
    assert!(!text.ends_with('\n'));
}

#[test]
fn test_unknown_plugin_is_a_contract_error_even_with_unreadable_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.har");
    match dumps(&[&missing], &["nope"], true).unwrap_err() {
        ConversionError::Contract(ContractError::UnknownPlugin(name)) => assert_eq!(name, "nope"),
        other => panic!("Expected UnknownPlugin, got {:?}", other),
    }
}

#[test]
fn test_without_default_plugins_headers_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_har(dir.path(), "browse.har", &["https://example.com/"]);
    let no_plugins: [&str; 0] = [];

    let text = dumps(&[&path], &no_plugins, false).unwrap();
    assert!(text.contains("'Cookie': 'session=1'"), "{}", text);
    assert!(text.contains("':authority': 'example.com'"), "{}", text);
}

#[test]
fn test_no_inputs_give_header_and_imports_only() {
    let no_paths: [&str; 0] = [];
    let no_plugins: [&str; 0] = [];
    let text = dumps(&no_paths, &no_plugins, true).unwrap();
    assert_eq!(
        text,
        format!(
            "# File automatically generated by tracesmith v{}.\n\n\
             from locust import HttpUser, SequentialTaskSet, TaskSet, between, task",
            env!("CARGO_PKG_VERSION")
        )
    );
}

fn unrenderable_program() -> Program {
    let mut program = Program::new();
    program.push(locust::header());
    let bad = program.placeholder(
        DomainObject::Data(serde_json::json!({"not": "a request"})),
        locust::request_to_expr,
        "bad",
    );
    program.push(Statement::assign("response", bad));
    program
}

#[test]
fn test_line_stream_stops_at_the_first_error() {
    let mut lines = unrenderable_program().into_lines();
    assert!(lines.next().unwrap().is_ok());
    assert!(matches!(
        lines.next(),
        Some(Err(RenderError::WrongObjectKind { found: "data value", .. }))
    ));
    assert!(lines.next().is_none());
    assert!(render(unrenderable_program()).is_err());
}

#[test]
fn test_nothing_is_written_when_rendering_fails() {
    let mut out = Vec::new();
    let err = write_program(&mut out, unrenderable_program()).unwrap_err();
    assert!(matches!(err, ConversionError::Render(_)));
    assert!(out.is_empty());
}

#[test]
fn test_written_program_matches_rendered_lines() {
    let compilation = Compiler::builder(weighted_listing())
        .build()
        .unwrap()
        .compile()
        .unwrap();
    let mut out = Vec::new();
    write_program(&mut out, compilation.program.clone()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), render_text(compilation.program));
}
