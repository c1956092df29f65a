//! Translation of ReScript type text into structural type descriptors.
//!
//! Translation is total: every input string - including garbage and
//! unterminated delimiters - produces exactly one descriptor. Constructs the
//! translator cannot resolve degrade to [`TypeDescriptor::Unknown`] and
//! append a human-readable warning instead of failing.

use std::fmt;

use crate::core::text::{
    find_top_level, find_top_level_arrow, is_paren_balanced, split_top_level, unquote,
};

/// Builtin ReScript primitives and the runtime-side names they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `int` and `float` both erase to the runtime's one number type.
    Number,
    String,
    Boolean,
    /// `unit`.
    Void,
    BigInt,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Number => write!(f, "number"),
            Primitive::String => write!(f, "string"),
            Primitive::Boolean => write!(f, "boolean"),
            Primitive::Void => write!(f, "void"),
            Primitive::BigInt => write!(f, "bigint"),
        }
    }
}

/// One named record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// Structural descriptor of a translated type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Function {
        params: Vec<TypeDescriptor>,
        result: Box<TypeDescriptor>,
    },
    Tuple(Vec<TypeDescriptor>),
    /// Ordered fields, declaration order preserved.
    Record(Vec<RecordField>),
    /// A resolved generic application. `name` is one of the wrapper names the
    /// translator knows how to resolve: `Array`, `Nullable`, `NullOrUndefined`
    /// or `Promise`; unresolved generic names collapse to `Unknown` instead.
    Generic {
        name: String,
        args: Vec<TypeDescriptor>,
    },
    Unknown {
        reason: String,
    },
}

impl TypeDescriptor {
    fn unknown(reason: impl Into<String>) -> Self {
        TypeDescriptor::Unknown {
            reason: reason.into(),
        }
    }
}

/// Descriptor plus the warnings produced while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub descriptor: TypeDescriptor,
    pub warnings: Vec<String>,
}

/// Translate one type expression. Never fails; see the module docs.
pub fn translate(type_text: &str) -> Translation {
    let mut warnings = Vec::new();
    let descriptor = parse_type(type_text.trim(), &mut warnings);
    Translation {
        descriptor,
        warnings,
    }
}

fn parse_type(input: &str, warnings: &mut Vec<String>) -> TypeDescriptor {
    let trimmed = strip_grouping_parens(input.trim());
    if let Some(arrow) = find_top_level_arrow(trimmed) {
        let params = parse_params(&trimmed[..arrow], warnings);
        let result = parse_type(&trimmed[arrow + 2..], warnings);
        return TypeDescriptor::Function {
            params,
            result: Box::new(result),
        };
    }
    parse_primary(trimmed, warnings)
}

/// The parameter side of an arrow: strip one argument-list paren pair, then
/// one leading uncurried marker, then split on top-level commas. A single
/// non-comma parameter becomes one positional argument.
fn parse_params(input: &str, warnings: &mut Vec<String>) -> Vec<TypeDescriptor> {
    let stripped = strip_arg_parens(input.trim());
    let stripped = match stripped.strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => stripped,
    };
    let parts = split_top_level(stripped, ',');
    if parts.len() <= 1 {
        return vec![parse_type(stripped, warnings)];
    }
    parts
        .into_iter()
        .map(|part| parse_type(part, warnings))
        .collect()
}

fn parse_primary(input: &str, warnings: &mut Vec<String>) -> TypeDescriptor {
    if let Some(elements) = tuple_elements(input) {
        return TypeDescriptor::Tuple(
            elements
                .into_iter()
                .map(|element| parse_type(element, warnings))
                .collect(),
        );
    }
    if input.starts_with('{') && input.ends_with('}') {
        return parse_record(input, warnings);
    }
    if let Some((callee, args)) = split_type_application(input) {
        return resolve_type_application(callee, args, warnings);
    }
    if input.starts_with('\'') {
        return unknown(format!("type variable {input}"), warnings);
    }
    if let Some(primitive) = builtin_primitive(input) {
        return TypeDescriptor::Primitive(primitive);
    }
    if input.contains('.') || is_bare_ident(input) {
        return unknown(format!("unresolved type {input}"), warnings);
    }
    unknown(format!("unsupported type {input}"), warnings)
}

fn unknown(reason: String, warnings: &mut Vec<String>) -> TypeDescriptor {
    warnings.push(format!("{reason} treated as unknown"));
    TypeDescriptor::Unknown { reason }
}

fn builtin_primitive(input: &str) -> Option<Primitive> {
    match input {
        "int" | "float" => Some(Primitive::Number),
        "string" => Some(Primitive::String),
        "bool" => Some(Primitive::Boolean),
        "unit" => Some(Primitive::Void),
        "bigint" => Some(Primitive::BigInt),
        _ => None,
    }
}

fn is_bare_ident(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Strip outer parentheses that are only grouping: the remainder must be
/// paren-balanced and contain no top-level comma, so a tuple's parentheses
/// survive to the classifier. Loops so `((int))` degrades like `(int)`.
fn strip_grouping_parens(input: &str) -> &str {
    let mut current = input.trim();
    while current.starts_with('(') && current.ends_with(')') {
        let inner = &current[1..current.len() - 1];
        if !is_paren_balanced(inner) || split_top_level(inner, ',').len() > 1 {
            break;
        }
        current = inner.trim();
    }
    current
}

/// Strip one argument-list paren pair, comma-agnostic: `(int, string)` as an
/// arrow's parameter side means two parameters, not a tuple.
fn strip_arg_parens(input: &str) -> &str {
    if input.starts_with('(') && input.ends_with(')') {
        let inner = &input[1..input.len() - 1];
        if is_paren_balanced(inner) {
            return inner.trim();
        }
    }
    input
}

fn tuple_elements(input: &str) -> Option<Vec<&str>> {
    if !(input.starts_with('(') && input.ends_with(')')) {
        return None;
    }
    let inner = &input[1..input.len() - 1];
    let parts = split_top_level(inner, ',');
    (parts.len() > 1).then_some(parts)
}

fn parse_record(input: &str, warnings: &mut Vec<String>) -> TypeDescriptor {
    let inner = input[1..input.len() - 1].trim();
    if inner.is_empty() {
        return TypeDescriptor::Record(Vec::new());
    }
    let mut fields = Vec::new();
    for part in split_top_level(inner, ',') {
        if part.is_empty() {
            continue;
        }
        let cleaned = strip_mutable(part);
        let Some(colon) = cleaned.find(':') else {
            warnings.push(format!("unsupported record field {cleaned}"));
            continue;
        };
        let name = unquote(cleaned[..colon].trim()).to_string();
        let ty = parse_type(cleaned[colon + 1..].trim(), warnings);
        fields.push(RecordField { name, ty });
    }
    TypeDescriptor::Record(fields)
}

fn strip_mutable(field: &str) -> &str {
    match field.strip_prefix("mutable") {
        Some(rest) if rest.starts_with(|c: char| c.is_whitespace()) => rest.trim_start(),
        _ => field,
    }
}

fn split_type_application(input: &str) -> Option<(&str, Vec<&str>)> {
    let angle = find_top_level(input, '<')?;
    if !input.ends_with('>') {
        return None;
    }
    let callee = input[..angle].trim();
    let args_raw = &input[angle + 1..input.len() - 1];
    Some((callee, split_top_level(args_raw, ',')))
}

fn resolve_type_application(
    callee: &str,
    args: Vec<&str>,
    warnings: &mut Vec<String>,
) -> TypeDescriptor {
    let translated: Vec<TypeDescriptor> = args
        .into_iter()
        .map(|arg| parse_type(arg, warnings))
        .collect();
    match callee {
        "array" | "list" => wrap("Array", translated),
        "option" => wrap("Nullable", translated),
        "promise" | "Promise" | "Js.Promise.t" => wrap("Promise", translated),
        "Js.Nullable.t" => wrap("NullOrUndefined", translated),
        _ => unknown(format!("unresolved type {callee}"), warnings),
    }
}

fn wrap(name: &str, mut args: Vec<TypeDescriptor>) -> TypeDescriptor {
    let arg = if args.is_empty() {
        TypeDescriptor::unknown("missing type argument")
    } else {
        args.remove(0)
    };
    TypeDescriptor::Generic {
        name: name.to_string(),
        args: vec![arg],
    }
}
