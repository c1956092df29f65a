//! Tokenizer for ReScript source text.
//!
//! First stage of the declaration scanner: one pass over the raw source that
//! skips whitespace and comments and produces a flat token stream with byte
//! spans and 1-based positions. String and character literals become single
//! tokens here and are never re-inspected downstream, and `=>` is one token
//! so the parser cannot confuse an arrow with a bare `=`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `@` introducing an attribute annotation.
    At,
    /// Identifier or keyword: `[A-Za-z_][A-Za-z0-9_']*`.
    Ident,
    /// String or character literal, quotes included. Unterminated literals
    /// extend to the end of the input.
    StringLit,
    /// The `=>` arrow.
    Arrow,
    /// Any other single character.
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the source text.
    pub start: usize,
    pub end: usize,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '\''
}

fn bump(line: &mut usize, column: &mut usize, ch: char) {
    if ch == '\n' {
        *line += 1;
        *column = 1;
    } else {
        *column += 1;
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1usize;
    let mut column = 1usize;

    let offset_at = |i: usize| chars.get(i).map(|&(o, _)| o).unwrap_or(source.len());

    while i < chars.len() {
        let (offset, ch) = chars[i];

        if matches!(ch, ' ' | '\t' | '\r' | '\n') {
            bump(&mut line, &mut column, ch);
            i += 1;
            continue;
        }

        // Line comment: skip to end of line; the newline itself is handled
        // by the next iteration.
        if ch == '/' && matches!(chars.get(i + 1), Some((_, '/'))) {
            while i < chars.len() && chars[i].1 != '\n' {
                bump(&mut line, &mut column, chars[i].1);
                i += 1;
            }
            continue;
        }

        // Block comment, non-nesting: skip to the first `*/` or to the end.
        if ch == '/' && matches!(chars.get(i + 1), Some((_, '*'))) {
            bump(&mut line, &mut column, '/');
            bump(&mut line, &mut column, '*');
            i += 2;
            while i < chars.len() {
                if chars[i].1 == '*' && matches!(chars.get(i + 1), Some((_, '/'))) {
                    bump(&mut line, &mut column, '*');
                    bump(&mut line, &mut column, '/');
                    i += 2;
                    break;
                }
                bump(&mut line, &mut column, chars[i].1);
                i += 1;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            let (start_line, start_column) = (line, column);
            let quote = ch;
            bump(&mut line, &mut column, ch);
            i += 1;
            while i < chars.len() {
                let c = chars[i].1;
                if c == '\\' {
                    bump(&mut line, &mut column, c);
                    i += 1;
                    if i < chars.len() {
                        bump(&mut line, &mut column, chars[i].1);
                        i += 1;
                    }
                    continue;
                }
                bump(&mut line, &mut column, c);
                i += 1;
                if c == quote {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::StringLit,
                start: offset,
                end: offset_at(i),
                line: start_line,
                column: start_column,
            });
            continue;
        }

        if ch == '@' {
            tokens.push(Token {
                kind: TokenKind::At,
                start: offset,
                end: offset + 1,
                line,
                column,
            });
            bump(&mut line, &mut column, ch);
            i += 1;
            continue;
        }

        if ch == '=' && matches!(chars.get(i + 1), Some((_, '>'))) {
            tokens.push(Token {
                kind: TokenKind::Arrow,
                start: offset,
                end: offset + 2,
                line,
                column,
            });
            bump(&mut line, &mut column, '=');
            bump(&mut line, &mut column, '>');
            i += 2;
            continue;
        }

        if is_ident_start(ch) {
            let (start_line, start_column) = (line, column);
            while i < chars.len() && is_ident_continue(chars[i].1) {
                bump(&mut line, &mut column, chars[i].1);
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                start: offset,
                end: offset_at(i),
                line: start_line,
                column: start_column,
            });
            continue;
        }

        tokens.push(Token {
            kind: TokenKind::Punct(ch),
            start: offset,
            end: offset + ch.len_utf8(),
            line,
            column,
        });
        bump(&mut line, &mut column, ch);
        i += 1;
    }

    tokens
}
