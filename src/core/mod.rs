//! Core analysis: declaration scanning, type translation, and the check
//! pipeline that feeds the assignability oracle.

pub mod context;
pub mod externals;
pub mod files;
pub mod lexer;
pub(crate) mod text;
pub mod translate;

pub use context::{CheckOptions, check_bindings, check_bindings_with};
pub use externals::{ExternalAttributes, ExternalDecl, scan_externals};
pub use translate::{Primitive, RecordField, Translation, TypeDescriptor, translate};
