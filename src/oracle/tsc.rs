//! `tsc`-backed assignability oracle.
//!
//! Writes the synthetic module into the project root, runs the project's own
//! TypeScript compiler over it, and maps the compiler's diagnostics back to
//! per-request verdicts through the program's line map.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use super::{
    AssignabilityOracle, LineRole, OracleOutcome, OracleRequest, SYNTHETIC_FILE_NAME,
    SyntheticProgram,
};

pub struct TscOracle {
    root_dir: PathBuf,
}

impl TscOracle {
    pub fn new(root_dir: &Path) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
        }
    }

    fn tsc_binary(&self) -> PathBuf {
        let local = self.root_dir.join("node_modules/.bin/tsc");
        if local.is_file() {
            local
        } else {
            PathBuf::from("tsc")
        }
    }
}

/// Removes the synthetic file when the check is done, error paths included.
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

impl AssignabilityOracle for TscOracle {
    fn check(&self, requests: &[OracleRequest]) -> Result<Vec<OracleOutcome>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let program = SyntheticProgram::build(requests);
        let synthetic_path = self.root_dir.join(SYNTHETIC_FILE_NAME);
        fs::write(&synthetic_path, &program.source)
            .with_context(|| format!("Failed to write {}", synthetic_path.display()))?;
        let _cleanup = RemoveOnDrop(synthetic_path);

        let output = Command::new(self.tsc_binary())
            .arg(SYNTHETIC_FILE_NAME)
            .args([
                "--noEmit",
                "--pretty",
                "false",
                "--strict",
                "--skipLibCheck",
                "--target",
                "es2022",
                "--module",
                "nodenext",
                "--moduleResolution",
                "nodenext",
            ])
            .current_dir(&self.root_dir)
            .output()
            .context("Failed to run tsc; is TypeScript installed?")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(interpret_diagnostics(requests, &program, &stdout))
    }
}

fn interpret_diagnostics(
    requests: &[OracleRequest],
    program: &SyntheticProgram,
    stdout: &str,
) -> Vec<OracleOutcome> {
    let mut outcomes = vec![OracleOutcome::Assignable; requests.len()];

    for parsed in stdout.lines().filter_map(parse_tsc_line) {
        if !parsed.file.ends_with(SYNTHETIC_FILE_NAME) {
            continue;
        }
        if let Some(module) = program.import_module_for_line(parsed.line) {
            // A failed import poisons every request that goes through it.
            for (index, request) in requests.iter().enumerate() {
                if request.query.module.as_deref() == Some(module) {
                    outcomes[index] = OracleOutcome::Unresolved {
                        reason: parsed.message.clone(),
                    };
                }
            }
            continue;
        }
        match program.role_for_line(parsed.line) {
            Some(LineRole::Actual(index)) => {
                outcomes[index] = OracleOutcome::Unresolved {
                    reason: parsed.message.clone(),
                };
            }
            Some(LineRole::Check(index)) => {
                // Resolution failures take precedence over assignability.
                if !matches!(outcomes[index], OracleOutcome::Unresolved { .. }) {
                    outcomes[index] = OracleOutcome::NotAssignable {
                        detail: parsed.message.clone(),
                    };
                }
            }
            None => {}
        }
    }

    outcomes
}

struct TscLine {
    file: String,
    line: usize,
    message: String,
}

/// `path/file.ts(12,5): error TS2322: Type 'X' is not assignable to type 'Y'.`
fn parse_tsc_line(line: &str) -> Option<TscLine> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<file>.+?)\((?P<line>\d+),(?P<col>\d+)\): error TS\d+: (?P<message>.+)$")
            .expect("tsc diagnostic pattern")
    });
    let caps = pattern.captures(line)?;
    Some(TscLine {
        file: caps["file"].to_string(),
        line: caps["line"].parse().ok()?,
        message: caps["message"].to_string(),
    })
}
