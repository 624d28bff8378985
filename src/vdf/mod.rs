//! Valve KeyValues (VDF) text format: tokenizer, offset-annotated parser,
//! and the surgical CompatToolMapping editor.

pub mod editor;
pub mod errors;
pub mod lexer;
pub mod parser;

pub use editor::{escape_vdf, set_compat_tool, CompatEditor, CompatPlan};
pub use errors::VdfError;
pub use lexer::{tokenize, Token};
pub use parser::{parse_root, Entry, Object, Value};
