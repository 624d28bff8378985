//! Tokenizer for Valve's KeyValues text format as found in config.vdf.
//!
//! Only the subset Steam actually writes is supported: double-quoted strings
//! with backslash escaping, braces, and `//` line comments. Every token
//! records its byte offsets in the source text so the editor can splice
//! replacements without disturbing surrounding formatting.

use crate::vdf::errors::VdfError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Escape-decoded string value plus the raw [start, end) span,
    /// end is one past the closing quote.
    Str {
        value: String,
        start: usize,
        end: usize,
    },
    /// `{` at the given byte offset
    Open(usize),
    /// `}` at the given byte offset
    Close(usize),
}

impl Token {
    /// Byte offset where this token starts in the source text.
    pub fn start(&self) -> usize {
        match self {
            Token::Str { start, .. } => *start,
            Token::Open(offset) | Token::Close(offset) => *offset,
        }
    }
}

fn is_vdf_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Turn the full source text into a flat token stream.
pub fn tokenize(text: &str) -> Result<Vec<Token>, VdfError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if is_vdf_whitespace(ch) {
            continue;
        }
        if ch == '/' && matches!(chars.peek(), Some((_, '/'))) {
            // Line comment, discard through end of line
            for (_, c) in chars.by_ref() {
                if c == '\n' {
                    break;
                }
            }
            continue;
        }
        if ch == '{' {
            tokens.push(Token::Open(offset));
            continue;
        }
        if ch == '}' {
            tokens.push(Token::Close(offset));
            continue;
        }
        if ch == '"' {
            let start = offset;
            let mut value = String::new();
            let mut terminated = false;
            while let Some((pos, current)) = chars.next() {
                if current == '\\' {
                    // `\X` decodes to literal X; a trailing backslash falls
                    // through to the unterminated-string error below
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                        continue;
                    }
                    break;
                }
                if current == '"' {
                    tokens.push(Token::Str {
                        value,
                        start,
                        end: pos + 1,
                    });
                    terminated = true;
                    break;
                }
                value.push(current);
            }
            if !terminated {
                return Err(VdfError::UnterminatedString { offset: start });
            }
            continue;
        }
        return Err(VdfError::UnexpectedChar { found: ch, offset });
    }

    Ok(tokens)
}
