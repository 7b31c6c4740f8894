//! WebIDL tokenizer.
//!
//! Splits IDL text into identifiers, literals and punctuation, skipping
//! whitespace and comments. Every token records its 1-based position so
//! parse errors can point at the offending line.

use crate::error::IdlError;

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword (`interface`, `DOMString`, `_escaped`)
    Ident(String),
    /// Integer or decimal literal, kept as written
    Number(String),
    /// String literal without its quotes
    Str(String),
    /// `...`
    Ellipsis,
    /// Any other single punctuation character
    Punct(char),
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind and text
    pub kind: TokenKind,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

/// Tokenizes WebIDL source text.
///
/// # Errors
///
/// Returns `IdlError::Syntax` on an unterminated string or block comment.
pub fn tokenize(source: &str) -> Result<Vec<Token>, IdlError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    while i < chars.len() {
        let c = chars[i];
        let (start_line, start_column) = (line, column);

        // Whitespace
        if c.is_whitespace() {
            advance(c, &mut line, &mut column);
            i += 1;
            continue;
        }

        // Line comment
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                advance(chars[i], &mut line, &mut column);
                i += 1;
            }
            continue;
        }

        // Block comment
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            column += 2;
            loop {
                match chars.get(i) {
                    None => {
                        return Err(syntax(start_line, start_column, "unterminated comment"));
                    }
                    Some('*') if chars.get(i + 1) == Some(&'/') => {
                        i += 2;
                        column += 2;
                        break;
                    }
                    Some(&other) => {
                        advance(other, &mut line, &mut column);
                        i += 1;
                    }
                }
            }
            continue;
        }

        // String literal
        if c == '"' {
            let mut text = String::new();
            i += 1;
            column += 1;
            loop {
                match chars.get(i) {
                    None => {
                        return Err(syntax(start_line, start_column, "unterminated string"));
                    }
                    Some('"') => {
                        i += 1;
                        column += 1;
                        break;
                    }
                    Some(&other) => {
                        text.push(other);
                        advance(other, &mut line, &mut column);
                        i += 1;
                    }
                }
            }
            tokens.push(Token {
                kind: TokenKind::Str(text),
                line: start_line,
                column: start_column,
            });
            continue;
        }

        // Ellipsis
        if c == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            tokens.push(Token {
                kind: TokenKind::Ellipsis,
                line: start_line,
                column: start_column,
            });
            i += 3;
            column += 3;
            continue;
        }

        // Number, optionally negative
        let negative_number = c == '-' && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if c.is_ascii_digit() || negative_number {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '-')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            column += i - start;
            tokens.push(Token {
                kind: TokenKind::Number(text),
                line: start_line,
                column: start_column,
            });
            continue;
        }

        // Identifier; `-Infinity` is lexed as one identifier
        let negative_infinity = c == '-' && chars.get(i + 1) == Some(&'I');
        if c.is_ascii_alphabetic() || c == '_' || negative_infinity {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '-')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            column += i - start;
            tokens.push(Token {
                kind: TokenKind::Ident(text),
                line: start_line,
                column: start_column,
            });
            continue;
        }

        tokens.push(Token {
            kind: TokenKind::Punct(c),
            line: start_line,
            column: start_column,
        });
        advance(c, &mut line, &mut column);
        i += 1;
    }

    Ok(tokens)
}

fn advance(c: char, line: &mut usize, column: &mut usize) {
    if c == '\n' {
        *line += 1;
        *column = 1;
    } else {
        *column += 1;
    }
}

fn syntax(line: usize, column: usize, message: &str) -> IdlError {
    IdlError::Syntax {
        line,
        column,
        message: message.to_string(),
    }
}
