use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortcutError {
    #[error("invalid shortcuts.vdf header")]
    InvalidHeader,

    #[error("malformed shortcuts.vdf entry at byte {offset}")]
    MalformedEntry { offset: usize },

    #[error("app name is required")]
    EmptyName,

    #[error("failed to generate a unique app ID after 100 attempts")]
    AppIdExhausted,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("edit error: {0}")]
    Edit(#[from] crate::edit::EditError),
}
