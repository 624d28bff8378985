use crate::manifest::schema::{Manifest, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ManifestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ManifestError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ManifestError::Toml { path: None, source } => ManifestError::Toml {
                path: Some(path),
                source,
            },
            ManifestError::Validation { path: None, source } => ManifestError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io { path, source } => {
                write!(f, "failed to read manifest from {}: {}", path.display(), source)
            }
            ManifestError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse manifest TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse manifest TOML: {}", source),
            },
            ManifestError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid manifest ({}): {}", path.display(), source),
                None => write!(f, "invalid manifest: {}", source),
            },
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io { source, .. } => Some(source),
            ManifestError::Toml { source, .. } => Some(source),
            ManifestError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = toml_edit::de::from_str(input)
        .map_err(|source| ManifestError::Toml { path: None, source })?;
    manifest
        .validate()
        .map_err(|source| ManifestError::Validation { path: None, source })?;
    Ok(manifest)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
