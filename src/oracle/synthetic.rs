//! Rendering oracle requests into one synthetic TypeScript module.
//!
//! Per request the module contains an `__expected_N` alias for the translated
//! type, an `__actual_N` value typed via `typeof` over the binding's
//! property-access chain, and a `__check_N` assignment whose well-formedness
//! is the assignability verdict. A line map records what an error on each
//! line means.

use std::collections::HashMap;

use crate::core::translate::TypeDescriptor;

use super::OracleRequest;

/// File name the synthetic module is written under. It lives in the project
/// root so the project's own `node_modules` resolves the imports.
pub const SYNTHETIC_FILE_NAME: &str = ".rescheck.synthetic.ts";

/// What an error on a mapped line means for its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// The binding's actual type could not be resolved.
    Actual(usize),
    /// The actual type resolved but is not assignable to the expected type.
    Check(usize),
}

#[derive(Debug)]
pub struct SyntheticProgram {
    pub source: String,
    roles: HashMap<usize, LineRole>,
    import_lines: HashMap<usize, String>,
}

impl SyntheticProgram {
    pub fn build(requests: &[OracleRequest]) -> Self {
        let mut lines: Vec<String> = Vec::new();
        let mut roles = HashMap::new();
        let mut import_lines = HashMap::new();

        lines.push("// Generated by rescheck; safe to delete.".to_string());

        // One star import per distinct module, in first-use order.
        let mut modules: Vec<&str> = Vec::new();
        for request in requests {
            if let Some(module) = request.query.module.as_deref() {
                if !modules.contains(&module) {
                    modules.push(module);
                }
            }
        }
        let mut module_locals: HashMap<&str, String> = HashMap::new();
        for (index, module) in modules.iter().copied().enumerate() {
            let local = format!("__mod{index}");
            lines.push(format!("import * as {local} from {};", json_string(module)));
            import_lines.insert(lines.len(), module.to_string());
            module_locals.insert(module, local);
        }

        lines.push("declare const __global: typeof globalThis;".to_string());

        for (index, request) in requests.iter().enumerate() {
            lines.push(format!(
                "type __expected_{index} = {};",
                ts_type_text(&request.expected)
            ));
            let access = actual_access(request, &module_locals);
            lines.push(format!("declare const __actual_{index}: typeof {access};"));
            roles.insert(lines.len(), LineRole::Actual(index));
            lines.push(format!(
                "const __check_{index}: __expected_{index} = __actual_{index};"
            ));
            roles.insert(lines.len(), LineRole::Check(index));
        }

        let mut source = lines.join("\n");
        source.push('\n');

        Self {
            source,
            roles,
            import_lines,
        }
    }

    /// Role of a 1-based line of the rendered module, if it is mapped.
    pub fn role_for_line(&self, line: usize) -> Option<LineRole> {
        self.roles.get(&line).copied()
    }

    /// Module name whose import statement sits on `line`, if any.
    pub fn import_module_for_line(&self, line: usize) -> Option<&str> {
        self.import_lines.get(&line).map(String::as_str)
    }
}

/// Property-access chain for the actual type: module local (or the global
/// root), then the scope chain, then the dotted binding path. Parts that are
/// not identifier-safe use bracket access.
fn actual_access(request: &OracleRequest, module_locals: &HashMap<&str, String>) -> String {
    let root = request
        .query
        .module
        .as_deref()
        .and_then(|module| module_locals.get(module).cloned())
        .unwrap_or_else(|| "__global".to_string());

    let mut access = root;
    let parts = request
        .query
        .scope
        .iter()
        .map(String::as_str)
        .chain(request.query.path.split('.'));
    for part in parts {
        if is_ts_ident(part) {
            access.push('.');
            access.push_str(part);
        } else {
            access.push('[');
            access.push_str(&json_string(part));
            access.push(']');
        }
    }
    access
}

fn is_ts_ident(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Render a descriptor as TypeScript type text.
pub fn ts_type_text(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Primitive(primitive) => primitive.to_string(),
        TypeDescriptor::Function { params, result } => {
            let params: Vec<String> = params
                .iter()
                .enumerate()
                .map(|(i, param)| format!("arg{i}: {}", ts_type_text(param)))
                .collect();
            format!("({}) => {}", params.join(", "), ts_type_text(result))
        }
        TypeDescriptor::Tuple(elements) => {
            let elements: Vec<String> = elements.iter().map(ts_type_text).collect();
            format!("[{}]", elements.join(", "))
        }
        TypeDescriptor::Record(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let fields: Vec<String> = fields
                .iter()
                .map(|field| {
                    let name = if is_ts_ident(&field.name) {
                        field.name.clone()
                    } else {
                        json_string(&field.name)
                    };
                    format!("{name}: {}", ts_type_text(&field.ty))
                })
                .collect();
            format!("{{ {} }}", fields.join("; "))
        }
        TypeDescriptor::Generic { name, args } => {
            let arg = args
                .first()
                .map(ts_type_text)
                .unwrap_or_else(|| "unknown".to_string());
            match name.as_str() {
                "Array" => format!("Array<{arg}>"),
                "Nullable" => format!("({arg} | undefined)"),
                "NullOrUndefined" => format!("({arg} | null | undefined)"),
                "Promise" => format!("Promise<{arg}>"),
                other => {
                    let args: Vec<String> = args.iter().map(ts_type_text).collect();
                    format!("{other}<{}>", args.join(", "))
                }
            }
        }
        TypeDescriptor::Unknown { .. } => "unknown".to_string(),
    }
}
