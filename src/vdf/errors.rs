use thiserror::Error;

#[derive(Error, Debug)]
pub enum VdfError {
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("expected a quoted key at byte {offset}")]
    ExpectedKey { offset: usize },

    #[error("key {key:?} at byte {offset} has no value")]
    ExpectedValue { key: String, offset: usize },

    #[error("unclosed object opened at byte {offset}")]
    UnclosedObject { offset: usize },

    #[error("section not found: {path}")]
    SectionNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("edit error: {0}")]
    Edit(#[from] crate::edit::EditError),
}
