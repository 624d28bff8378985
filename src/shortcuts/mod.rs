//! Binary shortcuts.vdf: record codec and the append-only set editor.

pub mod codec;
pub mod errors;
pub mod set;

pub use codec::{decode, encode_record, serialize, ShortcutRecord};
pub use errors::ShortcutError;
pub use set::{add_shortcut, load_shortcuts, NewShortcut};
