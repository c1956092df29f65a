//! End-to-end pipeline tests: a temp project on disk, checked with an
//! injected oracle so no TypeScript installation is needed.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tempfile::TempDir;

use rescheck::core::context::{CheckOptions, check_bindings_with};
use rescheck::core::translate::TypeDescriptor;
use rescheck::diagnostics::Level;
use rescheck::oracle::{AssignabilityOracle, OracleOutcome, OracleRequest};

/// Oracle stub: fixed outcome per declared name, assignable otherwise.
/// Captures every request it sees.
struct StubOracle {
    outcomes: Vec<(&'static str, OracleOutcome)>,
    seen: Mutex<Vec<OracleRequest>>,
}

impl StubOracle {
    fn new(outcomes: Vec<(&'static str, OracleOutcome)>) -> Self {
        Self {
            outcomes,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn assignable() -> Self {
        Self::new(Vec::new())
    }

    fn seen(&self) -> Vec<OracleRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl AssignabilityOracle for StubOracle {
    fn check(&self, requests: &[OracleRequest]) -> Result<Vec<OracleOutcome>> {
        self.seen.lock().unwrap().extend(requests.iter().cloned());
        Ok(requests
            .iter()
            .map(|request| {
                self.outcomes
                    .iter()
                    .find(|(name, _)| *name == request.name)
                    .map(|(_, outcome)| outcome.clone())
                    .unwrap_or(OracleOutcome::Assignable)
            })
            .collect())
    }
}

fn project(files: &[(&str, &str)]) -> Result<TempDir> {
    let dir = TempDir::new()?;
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
    }
    Ok(dir)
}

fn options(dir: &Path) -> CheckOptions {
    CheckOptions {
        dir: Some(dir.to_path_buf()),
        verbose: false,
    }
}

#[test]
fn clean_project_round_trip() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Api.res",
            "@module(\"ts-lib\") @scope(\"Utils\") external add: (int, int) => int = \"add\"\n\
             @val external now: unit => float = \"now\"\n",
        ),
    ])?;

    let oracle = StubOracle::assignable();
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.externals, 2);
    assert_eq!(result.summary.errors, 0);
    assert_eq!(result.summary.warnings, 0);
    assert!(result.diagnostics.is_empty());

    let seen = oracle.seen();
    assert_eq!(seen.len(), 2);

    let add = &seen[0];
    assert_eq!(add.name, "add");
    assert_eq!(add.query.module.as_deref(), Some("ts-lib"));
    assert_eq!(add.query.scope, vec!["Utils"]);
    assert_eq!(add.query.path, "add");
    assert!(matches!(add.expected, TypeDescriptor::Function { ref params, .. } if params.len() == 2));

    let now = &seen[1];
    assert_eq!(now.name, "now");
    assert_eq!(now.query.module, None);
    assert!(now.query.scope.is_empty());

    Ok(())
}

#[test]
fn mismatch_becomes_an_error_diagnostic() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Api.res",
            "external parse: string => int = \"parseInt\"\n",
        ),
    ])?;

    let oracle = StubOracle::new(vec![(
        "parse",
        OracleOutcome::NotAssignable {
            detail: "Type 'string' is not assignable to type 'number'.".to_string(),
        },
    )]);
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.externals, 1);
    assert_eq!(result.summary.errors, 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.level, Level::Error);
    assert_eq!(diag.code.as_deref(), Some("type-mismatch"));
    assert!(diag.message.contains("Type mismatch for parse"));
    assert!(diag.file.ends_with("Api.res"));
    assert_eq!(diag.line, 1);
    assert_eq!(diag.column, 1);

    Ok(())
}

#[test]
fn unresolved_binding_becomes_an_error_diagnostic() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        ("src/Api.res", "external gone: int = \"gone\"\n"),
    ])?;

    let oracle = StubOracle::new(vec![(
        "gone",
        OracleOutcome::Unresolved {
            reason: "Property 'gone' does not exist on type 'typeof globalThis'.".to_string(),
        },
    )]);
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.errors, 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code.as_deref(), Some("binding-unresolved"));
    assert!(diag.message.contains("Cannot resolve binding for gone"));

    Ok(())
}

#[test]
fn one_declarations_error_does_not_stop_the_others() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Api.res",
            "external bad: int = \"bad\"\nexternal good: int = \"good\"\n",
        ),
    ])?;

    let oracle = StubOracle::new(vec![(
        "bad",
        OracleOutcome::NotAssignable {
            detail: "no".to_string(),
        },
    )]);
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.externals, 2);
    assert_eq!(result.summary.errors, 1);
    assert_eq!(oracle.seen().len(), 2);

    Ok(())
}

#[test]
fn signature_file_shadows_implementation() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        ("src/Api.res", "external fromImpl: int = \"fromImpl\"\n"),
        ("src/Api.resi", "external fromSig: int = \"fromSig\"\n"),
    ])?;

    let oracle = StubOracle::assignable();
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.externals, 1);
    let seen = oracle.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].name, "fromSig");

    Ok(())
}

#[test]
fn rename_attribute_redirects_the_binding_path() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Api.res",
            "@module(\"fs\") @as(\"readFileSync\") external readFile: string => string = \"ignored\"\n",
        ),
    ])?;

    let oracle = StubOracle::assignable();
    check_bindings_with(&options(dir.path()), &oracle)?;

    let seen = oracle.seen();
    assert_eq!(seen[0].query.path, "readFileSync");
    assert_eq!(seen[0].query.module.as_deref(), Some("fs"));

    Ok(())
}

#[test]
fn translation_warnings_do_not_block_the_oracle() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Api.res",
            "@val external render: Dom.element => unit = \"render\"\n",
        ),
    ])?;

    let oracle = StubOracle::assignable();
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.warnings, 1);
    assert_eq!(result.summary.errors, 0);
    assert_eq!(result.diagnostics[0].code.as_deref(), Some("unresolved-type"));

    // The declaration still reaches the oracle, with the unresolved piece
    // degraded to an opaque type.
    let seen = oracle.seen();
    assert_eq!(seen.len(), 1);
    assert!(matches!(
        seen[0].expected,
        TypeDescriptor::Function { .. }
    ));

    Ok(())
}

#[test]
fn absent_source_directory_contributes_nothing() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src", "vendor"] }"#),
        ("src/Api.res", "external f: int = \"f\"\n"),
    ])?;

    let oracle = StubOracle::assignable();
    let result = check_bindings_with(&options(dir.path()), &oracle)?;

    assert_eq!(result.summary.externals, 1);
    assert_eq!(result.summary.errors, 0);

    Ok(())
}

#[test]
fn declarations_arrive_in_file_then_textual_order() -> Result<()> {
    let dir = project(&[
        ("rescript.json", r#"{ "sources": ["src"] }"#),
        (
            "src/Alpha.res",
            "external a1: int = \"a1\"\nexternal a2: int = \"a2\"\n",
        ),
        ("src/Beta.res", "external b1: int = \"b1\"\n"),
    ])?;

    let oracle = StubOracle::assignable();
    check_bindings_with(&options(dir.path()), &oracle)?;

    let names: Vec<String> = oracle.seen().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["a1", "a2", "b1"]);

    Ok(())
}
