//! External declaration scanning.
//!
//! Second stage of the scanner: walks the token stream produced by
//! [`crate::core::lexer`] and extracts every well-formed
//! `@attr… external name: type = binding` declaration, in textual order.
//!
//! Scanning is a pure function of the source text: the same input always
//! yields the same declarations, and distinct files can be scanned
//! concurrently without coordination.

use crate::core::lexer::{Token, TokenKind, tokenize};
use crate::core::text::{Nesting, split_top_level, unquote};

/// Annotations accumulated ahead of a declaration.
///
/// The pending set attaches only to the declaration that immediately follows
/// it, with nothing but whitespace, comments and further attributes in
/// between. Any other token - including a failed `external` match - resets
/// the set, so attributes can never leak onto a later declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalAttributes {
    pub module: Option<String>,
    pub scope: Vec<String>,
    pub val: bool,
    pub send: bool,
    pub r#new: bool,
    pub get: bool,
    pub set: bool,
    pub r#as: Option<String>,
}

impl ExternalAttributes {
    /// Apply one `@name(args…)` annotation, returning the rebuilt set.
    /// Unrecognized attribute names parse fine and leave the set unchanged.
    fn apply(mut self, name: &str, args: Option<Vec<String>>) -> Self {
        match name {
            "module" => {
                if let Some(first) = args.as_ref().and_then(|args| args.first()) {
                    self.module = Some(unquote(first).to_string());
                }
            }
            "scope" => {
                if let Some(args) = args {
                    self.scope = args.iter().map(|arg| unquote(arg).to_string()).collect();
                }
            }
            "val" => self.val = true,
            "send" => self.send = true,
            "new" => self.r#new = true,
            "get" => self.get = true,
            "set" => self.set = true,
            "as" => {
                if let Some(first) = args.as_ref().and_then(|args| args.first()) {
                    self.r#as = Some(unquote(first).to_string());
                }
            }
            _ => {}
        }
        self
    }
}

/// One discovered `external` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDecl {
    /// Declared identifier. Unique only within its own declaration; the
    /// scanner does not deduplicate across files.
    pub name: String,
    /// Runtime-side identifier or quoted path the declaration binds to.
    pub binding: String,
    /// Raw type text between `:` and `=`, untranslated.
    pub res_type: String,
    pub attributes: ExternalAttributes,
    pub file: String,
    /// 1-based position of the `external` keyword.
    pub line: usize,
    pub column: usize,
}

struct AttributeMatch {
    name: String,
    args: Option<Vec<String>>,
    next: usize,
}

struct ExternalMatch {
    name: String,
    binding: String,
    res_type: String,
    next: usize,
}

/// Extract every external declaration from `source`, in textual order.
pub fn scan_externals(source: &str, file_path: &str) -> Vec<ExternalDecl> {
    let tokens = tokenize(source);
    let mut decls = Vec::new();
    let mut pending = ExternalAttributes::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        match token.kind {
            TokenKind::At => {
                if let Some(attr) = read_attribute(source, &tokens, i) {
                    pending = pending.apply(&attr.name, attr.args);
                    i = attr.next;
                } else {
                    pending = ExternalAttributes::default();
                    i += 1;
                }
            }
            TokenKind::Ident if token.text(source) == "external" => {
                match read_external(source, &tokens, i) {
                    Ok(matched) => {
                        decls.push(ExternalDecl {
                            name: matched.name,
                            binding: matched.binding,
                            res_type: matched.res_type,
                            attributes: std::mem::take(&mut pending),
                            file: file_path.to_string(),
                            line: token.line,
                            column: token.column,
                        });
                        i = matched.next;
                    }
                    Err(resume) => {
                        pending = ExternalAttributes::default();
                        i = resume;
                    }
                }
            }
            _ => {
                pending = ExternalAttributes::default();
                i += 1;
            }
        }
    }

    decls
}

/// `@` + identifier + optional balanced `( … )` argument list. Arguments are
/// split on top-level commas only; nested delimiters and string literals
/// inside an argument never split it.
fn read_attribute(source: &str, tokens: &[Token], at: usize) -> Option<AttributeMatch> {
    let name_token = tokens.get(at + 1)?;
    if name_token.kind != TokenKind::Ident {
        return None;
    }
    let name = name_token.text(source).to_string();
    let mut next = at + 2;
    let mut args = None;

    if matches!(
        tokens.get(next).map(|t| t.kind),
        Some(TokenKind::Punct('('))
    ) {
        let open = tokens[next];
        let close = find_matching_paren(tokens, next)?;
        let inner = &source[open.end..tokens[close].start];
        args = Some(
            split_top_level(inner, ',')
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
        next = close + 1;
    }

    Some(AttributeMatch { name, args, next })
}

fn find_matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct(')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// The five-step declaration match: name, `:`, type text, `=`, binding.
///
/// On failure returns the token index to resume scanning from - everything
/// after the last step that succeeded, so an aborted match never swallows
/// text that could start another declaration.
fn read_external(source: &str, tokens: &[Token], keyword: usize) -> Result<ExternalMatch, usize> {
    let name_at = keyword + 1;
    let name = match tokens.get(name_at) {
        Some(t) if t.kind == TokenKind::Ident => t.text(source).to_string(),
        _ => return Err(name_at),
    };

    let colon_at = name_at + 1;
    if !matches!(
        tokens.get(colon_at).map(|t| t.kind),
        Some(TokenKind::Punct(':'))
    ) {
        return Err(colon_at);
    }

    // Type text: everything up to the first `=` at zero nesting depth.
    // String literals and `=>` arrows are single tokens, so neither can end
    // the capture or disturb the depth count.
    let type_at = colon_at + 1;
    let mut nesting = Nesting::default();
    let mut eq_at = None;
    for (idx, token) in tokens.iter().enumerate().skip(type_at) {
        if let TokenKind::Punct(ch) = token.kind {
            if ch == '=' && nesting.is_top_level() {
                eq_at = Some(idx);
                break;
            }
            nesting.update(ch);
        }
    }
    let Some(eq_at) = eq_at else {
        return Err(type_at);
    };
    let res_type = if eq_at == type_at {
        String::new()
    } else {
        source[tokens[type_at].start..tokens[eq_at].start]
            .trim()
            .to_string()
    };

    let binding_at = eq_at + 1;
    let binding = match tokens.get(binding_at) {
        Some(t) if t.kind == TokenKind::StringLit => unquote(t.text(source)).to_string(),
        Some(t) if t.kind == TokenKind::Ident => t.text(source).to_string(),
        _ => return Err(binding_at),
    };

    Ok(ExternalMatch {
        name,
        binding,
        res_type,
        next: binding_at + 1,
    })
}
