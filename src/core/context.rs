//! The check pipeline: discovery, scanning, translation, oracle, diagnostics.

use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;

use crate::config::{CONFIG_FILE_NAME, RescriptConfig, find_rescript_config};
use crate::core::files::collect_external_decls;
use crate::core::translate::{Translation, translate};
use crate::diagnostics::{CheckResult, Diagnostic, compare};
use crate::oracle::{
    AssignabilityOracle, BindingQuery, OracleOutcome, OracleRequest, TscOracle,
};

/// Options for one check run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Directory to start config discovery from; defaults to the current
    /// directory.
    pub dir: Option<PathBuf>,
    pub verbose: bool,
}

/// Check a project using the TypeScript compiler as the oracle.
pub fn check_bindings(options: &CheckOptions) -> Result<CheckResult> {
    run(options, None)
}

/// Check a project with a caller-provided oracle.
pub fn check_bindings_with(
    options: &CheckOptions,
    oracle: &dyn AssignabilityOracle,
) -> Result<CheckResult> {
    run(options, Some(oracle))
}

fn run(options: &CheckOptions, oracle: Option<&dyn AssignabilityOracle>) -> Result<CheckResult> {
    let start_dir = options.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let Some(config) = find_rescript_config(&start_dir)? else {
        // Not an internal error: report it the same way binding problems are
        // reported so machine consumers see one shape.
        let diagnostic = Diagnostic::error(
            format!("{CONFIG_FILE_NAME} not found in this directory tree."),
            start_dir.to_string_lossy(),
            1,
            1,
        )
        .with_code("config-missing");
        return Ok(CheckResult::summarize(0, vec![diagnostic]));
    };

    if options.verbose {
        eprintln!(
            "Note: project root {} ({} source directories)",
            config.root_dir.display(),
            config.source_dirs.len()
        );
    }

    let default_oracle;
    let oracle: &dyn AssignabilityOracle = match oracle {
        Some(oracle) => oracle,
        None => {
            default_oracle = TscOracle::new(&config.root_dir);
            &default_oracle
        }
    };

    run_with(&config, options, oracle)
}

fn run_with(
    config: &RescriptConfig,
    options: &CheckOptions,
    oracle: &dyn AssignabilityOracle,
) -> Result<CheckResult> {
    let collected = collect_external_decls(&config.source_dirs);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for (path, error) in &collected.read_errors {
        diagnostics.push(
            Diagnostic::error(
                format!("Failed to read file: {error}"),
                path.to_string_lossy(),
                1,
                1,
            )
            .with_code("read-error"),
        );
    }

    if options.verbose {
        eprintln!(
            "Note: scanned {} module files, found {} externals",
            collected.files_scanned,
            collected.decls.len()
        );
    }

    let externals = collected.decls;
    let translations: Vec<Translation> = externals
        .par_iter()
        .map(|decl| translate(&decl.res_type))
        .collect();

    let mut requests = Vec::with_capacity(externals.len());
    for (decl, translation) in externals.iter().zip(&translations) {
        for warning in &translation.warnings {
            diagnostics.push(
                Diagnostic::warning(
                    format!("Type of {}: {warning}", decl.name),
                    &decl.file,
                    decl.line,
                    decl.column,
                )
                .with_code("unresolved-type"),
            );
        }
        requests.push(OracleRequest {
            name: decl.name.clone(),
            expected: translation.descriptor.clone(),
            query: BindingQuery::for_decl(decl),
            file: decl.file.clone(),
            line: decl.line,
            column: decl.column,
        });
    }

    match oracle.check(&requests) {
        Ok(outcomes) => {
            for (request, outcome) in requests.iter().zip(outcomes) {
                match outcome {
                    OracleOutcome::Assignable => {}
                    OracleOutcome::NotAssignable { detail } => {
                        diagnostics.push(
                            Diagnostic::error(
                                format!("Type mismatch for {}: {detail}", request.name),
                                &request.file,
                                request.line,
                                request.column,
                            )
                            .with_code("type-mismatch"),
                        );
                    }
                    OracleOutcome::Unresolved { reason } => {
                        diagnostics.push(
                            Diagnostic::error(
                                format!("Cannot resolve binding for {}: {reason}", request.name),
                                &request.file,
                                request.line,
                                request.column,
                            )
                            .with_code("binding-unresolved"),
                        );
                    }
                }
            }
        }
        Err(error) => {
            // One declaration's error never stops the others, but an oracle
            // that cannot run at all is a single project-level diagnostic.
            diagnostics.push(
                Diagnostic::error(
                    format!("Assignability check did not run: {error:#}"),
                    config.config_path.to_string_lossy(),
                    1,
                    1,
                )
                .with_code("oracle-error"),
            );
        }
    }

    diagnostics.sort_by(compare);
    Ok(CheckResult::summarize(externals.len(), diagnostics))
}
