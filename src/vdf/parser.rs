//! Parser for the tokenized KeyValues stream.
//!
//! The tree it builds is an offset-annotated view over the immutable source
//! text: every entry keeps the byte spans of its key and value so the editor
//! can splice replacements in place. The tree never outlives one edit; each
//! edit re-parses the current file content.

use crate::vdf::errors::VdfError;
use crate::vdf::lexer::Token;

/// One key/value pair. For a nested object the value span runs from its
/// opening brace to its closing brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub key_start: usize,
    pub key_end: usize,
    pub value_start: usize,
    pub value_end: usize,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Object(Object),
}

impl Entry {
    /// The nested object value, if this entry has one.
    pub fn as_object(&self) -> Option<&Object> {
        match &self.value {
            Value::Object(object) => Some(object),
            Value::Str(_) => None,
        }
    }

    /// The scalar string value, if this entry has one.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Str(value) => Some(value),
            Value::Object(_) => None,
        }
    }
}

/// An ordered group of entries. The root object has no braces; nested
/// objects record both brace offsets, and the closing-brace offset is the
/// insertion point for appended children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object {
    pub brace_start: Option<usize>,
    pub brace_end: Option<usize>,
    pub entries: Vec<Entry>,
}

impl Object {
    /// Case-sensitive linear scan for the first entry with this key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// ASCII case-insensitive scan. Steam has been observed writing both
    /// `Valve` and `valve`; keep this as an explicit fallback lookup rather
    /// than parsing case-insensitively.
    pub fn get_ignore_ascii_case(&self, key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
    }
}

/// Parse the root-level entry sequence (no enclosing braces).
pub fn parse_root(tokens: &[Token]) -> Result<Object, VdfError> {
    let mut index = 0;
    let mut root = Object::default();
    while index < tokens.len() {
        root.entries.push(parse_entry(tokens, &mut index)?);
    }
    Ok(root)
}

fn parse_entry(tokens: &[Token], index: &mut usize) -> Result<Entry, VdfError> {
    let (key, key_start, key_end) = match &tokens[*index] {
        Token::Str { value, start, end } => (value.clone(), *start, *end),
        other => {
            return Err(VdfError::ExpectedKey {
                offset: other.start(),
            })
        }
    };
    *index += 1;

    match tokens.get(*index) {
        Some(Token::Str { value, start, end }) => {
            *index += 1;
            Ok(Entry {
                key,
                key_start,
                key_end,
                value_start: *start,
                value_end: *end,
                value: Value::Str(value.clone()),
            })
        }
        Some(Token::Open(brace_start)) => {
            let brace_start = *brace_start;
            *index += 1;
            let object = parse_object(tokens, index, brace_start)?;
            let brace_end = object
                .brace_end
                .ok_or(VdfError::UnclosedObject { offset: brace_start })?;
            Ok(Entry {
                key,
                key_start,
                key_end,
                value_start: brace_start,
                value_end: brace_end,
                value: Value::Object(object),
            })
        }
        Some(other) => Err(VdfError::ExpectedValue {
            key,
            offset: other.start(),
        }),
        None => Err(VdfError::ExpectedValue {
            key,
            offset: key_end,
        }),
    }
}

/// Parse entries up to the closing brace of an object opened at
/// `brace_start`. The closing brace terminates the object and belongs to no
/// entry; running out of tokens first means the brace was never closed.
fn parse_object(tokens: &[Token], index: &mut usize, brace_start: usize) -> Result<Object, VdfError> {
    let mut object = Object {
        brace_start: Some(brace_start),
        brace_end: None,
        entries: Vec::new(),
    };
    while let Some(token) = tokens.get(*index) {
        if let Token::Close(offset) = token {
            object.brace_end = Some(*offset);
            *index += 1;
            return Ok(object);
        }
        object.entries.push(parse_entry(tokens, index)?);
    }
    Err(VdfError::UnclosedObject { offset: brace_start })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdf::lexer::tokenize;

    fn parse(text: &str) -> Object {
        parse_root(&tokenize(text).unwrap()).unwrap()
    }

    #[test]
    fn parses_flat_root() {
        let root = parse("\"a\" \"1\"\n\"b\" \"2\"\n");
        assert_eq!(root.entries.len(), 2);
        assert_eq!(root.entries[0].key, "a");
        assert_eq!(root.entries[1].as_str(), Some("2"));
        assert!(root.brace_start.is_none());
    }

    #[test]
    fn parses_nested_object_with_brace_spans() {
        let text = "\"outer\"\n{\n\t\"inner\" \"x\"\n}\n";
        let root = parse(text);
        let outer = &root.entries[0];
        let object = outer.as_object().unwrap();
        assert_eq!(object.brace_start, Some(8));
        assert_eq!(object.brace_end, Some(text.rfind('}').unwrap()));
        assert_eq!(outer.value_start, 8);
        assert_eq!(outer.value_end, object.brace_end.unwrap());
        assert_eq!(object.entries[0].as_str(), Some("x"));
    }

    #[test]
    fn entry_spans_slice_source() {
        let text = "\"key\" \"value\"\n";
        let root = parse(text);
        let entry = &root.entries[0];
        assert_eq!(&text[entry.key_start..entry.key_end], "\"key\"");
        assert_eq!(&text[entry.value_start..entry.value_end], "\"value\"");
    }

    #[test]
    fn rejects_key_without_value() {
        let tokens = tokenize("\"dangling\"").unwrap();
        let err = parse_root(&tokens).unwrap_err();
        assert!(matches!(err, VdfError::ExpectedValue { .. }));
    }

    #[test]
    fn rejects_brace_where_key_expected() {
        let tokens = tokenize("{ \"a\" \"1\" }").unwrap();
        let err = parse_root(&tokens).unwrap_err();
        assert!(matches!(err, VdfError::ExpectedKey { offset: 0 }));
    }

    #[test]
    fn rejects_unclosed_object() {
        let tokens = tokenize("\"outer\"\n{\n\t\"a\" \"1\"\n").unwrap();
        let err = parse_root(&tokens).unwrap_err();
        assert!(matches!(err, VdfError::UnclosedObject { offset: 8 }));
    }

    #[test]
    fn case_insensitive_lookup() {
        let root = parse("\"Valve\"\n{\n}\n");
        assert!(root.get("valve").is_none());
        assert!(root.get_ignore_ascii_case("valve").is_some());
    }
}
