//! Steam Patcher: surgical editor for Steam's private configuration files
//!
//! Registers non-Steam application shortcuts in the binary shortcuts.vdf
//! and maps Proton/compatibility tools in the text config.vdf, without
//! disturbing any byte Steam wrote that the edit does not need to touch.
//!
//! # Architecture
//!
//! Two independent codec pipelines share only the error-reporting
//! convention. The binary side ([`shortcuts`]) decodes the tagged-field
//! shortcut records, appends a new one under a collision-free app ID, and
//! rewrites the whole file. The text side ([`vdf`]) tokenizes and parses
//! the brace-delimited KeyValues format into an offset-annotated tree over
//! the immutable source text, then compiles the requested change down to a
//! single verified byte-span [`Edit`].
//!
//! # Safety
//!
//! - Text edits verify expected before-text before applying
//! - Atomic file writes (tempfile + fsync + rename)
//! - Offsets are never reused across edits: every edit re-parses the file
//! - Idempotent operations
//!
//! # Known limitation
//!
//! No cross-process locking: a Steam client (or anything else) writing the
//! same files concurrently is a last-writer-wins race this crate does not
//! detect. Close Steam before patching.
//!
//! # Example
//!
//! ```no_run
//! use steam_patcher::shortcuts::{add_shortcut, NewShortcut};
//! use std::path::{Path, PathBuf};
//!
//! let shortcut = NewShortcut {
//!     name: "My Game".to_string(),
//!     exe: PathBuf::from("/usr/bin/my-game"),
//!     start_dir: None,
//!     launch_options: String::new(),
//! };
//!
//! match add_shortcut(Path::new("shortcuts.vdf"), &shortcut) {
//!     Ok(app_id) => println!("registered app ID {app_id}"),
//!     Err(e) => eprintln!("failed: {e}"),
//! }
//! ```

pub mod edit;
pub mod locate;
pub mod manifest;
pub mod shortcuts;
pub mod vdf;

// Re-exports
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use locate::{find_config_file, find_shortcuts_file, LocateError};
pub use manifest::{
    apply_manifest, load_from_path, load_from_str, AppResult, ApplicationError, Manifest,
    ManifestError, TargetFiles,
};
pub use shortcuts::{add_shortcut, load_shortcuts, NewShortcut, ShortcutError, ShortcutRecord};
pub use vdf::{set_compat_tool, CompatEditor, CompatPlan, VdfError};
