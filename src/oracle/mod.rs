//! Assignability oracle boundary.
//!
//! The core never decides assignability itself. It prepares one
//! [`OracleRequest`] per external declaration - the expected structural type
//! plus enough binding-resolution metadata for the oracle to find the actual
//! runtime-side type - and interprets the oracle's verdicts.

mod synthetic;
mod tsc;

pub use synthetic::{LineRole, SYNTHETIC_FILE_NAME, SyntheticProgram, ts_type_text};
pub use tsc::TscOracle;

use anyhow::Result;

use crate::core::externals::ExternalDecl;
use crate::core::translate::TypeDescriptor;

/// Where to look for the runtime-side value an external binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingQuery {
    /// Final identifier or dotted path. An `@as` rename takes precedence
    /// over the raw binding target.
    pub path: String,
    /// `@module` attribute: which import the lookup starts from. Absent
    /// means the global namespace.
    pub module: Option<String>,
    /// `@scope` chain applied between the root and the path.
    pub scope: Vec<String>,
}

impl BindingQuery {
    pub fn for_decl(decl: &ExternalDecl) -> Self {
        let path = decl
            .attributes
            .r#as
            .clone()
            .unwrap_or_else(|| decl.binding.clone());
        Self {
            path,
            module: decl.attributes.module.clone(),
            scope: decl.attributes.scope.clone(),
        }
    }
}

/// One declaration's worth of oracle input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    /// Declared name, used in diagnostic messages.
    pub name: String,
    pub expected: TypeDescriptor,
    pub query: BindingQuery,
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// Per-request verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleOutcome {
    Assignable,
    /// The actual type was found but does not fit the expected shape.
    NotAssignable { detail: String },
    /// The binding path could not be resolved at all.
    Unresolved { reason: String },
}

pub trait AssignabilityOracle {
    /// Check every request, returning one outcome per request in order.
    /// `Err` means the oracle itself could not run; per-declaration
    /// resolution failures are [`OracleOutcome::Unresolved`] instead.
    fn check(&self, requests: &[OracleRequest]) -> Result<Vec<OracleOutcome>>;
}
