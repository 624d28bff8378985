//! Declarative TOML manifests: schema, loader, and batch applicator.

mod applicator;
mod loader;
mod schema;

pub use applicator::{apply_manifest, AppResult, ApplicationError, TargetFiles};
pub use loader::{load_from_path, load_from_str, ManifestError};
pub use schema::{AppDefinition, Manifest, Metadata, ValidationError, ValidationIssue};
