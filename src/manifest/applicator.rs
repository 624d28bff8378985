//! Apply a manifest: register each app as a shortcut and map its compat
//! tool when one is requested.

use crate::manifest::schema::{AppDefinition, Manifest};
use crate::shortcuts::{add_shortcut, NewShortcut, ShortcutError};
use crate::vdf::{set_compat_tool, VdfError};
use std::fmt;
use std::path::PathBuf;

/// Resolved file targets for one application run. The CLI fills this in
/// from explicit flags or discovery; the applicator never searches on its
/// own. `config` stays `None` when no app in the batch needs a compat tool.
#[derive(Debug, Clone)]
pub struct TargetFiles {
    pub shortcuts: PathBuf,
    pub config: Option<PathBuf>,
}

/// Result of applying one app definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "AppResult should be checked for success/failure"]
pub enum AppResult {
    /// Shortcut registered, no compat tool requested
    Registered { app_id: u32 },
    /// Shortcut registered and compat tool mapped
    RegisteredWithCompat { app_id: u32, tool: String },
}

impl fmt::Display for AppResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppResult::Registered { app_id } => write!(f, "registered with app ID {app_id}"),
            AppResult::RegisteredWithCompat { app_id, tool } => {
                write!(f, "registered with app ID {app_id}, compat tool {tool}")
            }
        }
    }
}

/// Errors during manifest application.
#[derive(Debug)]
pub enum ApplicationError {
    Shortcut(ShortcutError),
    Vdf(VdfError),
    /// An app requested a compat tool but no config.vdf was resolved
    NoConfigFile { app: String },
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::Shortcut(e) => write!(f, "shortcut error: {}", e),
            ApplicationError::Vdf(e) => write!(f, "config.vdf error: {}", e),
            ApplicationError::NoConfigFile { app } => {
                write!(f, "app '{app}' requests a compat tool but no config.vdf was found")
            }
        }
    }
}

impl std::error::Error for ApplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicationError::Shortcut(e) => Some(e),
            ApplicationError::Vdf(e) => Some(e),
            ApplicationError::NoConfigFile { .. } => None,
        }
    }
}

impl From<ShortcutError> for ApplicationError {
    fn from(e: ShortcutError) -> Self {
        ApplicationError::Shortcut(e)
    }
}

impl From<VdfError> for ApplicationError {
    fn from(e: VdfError) -> Self {
        ApplicationError::Vdf(e)
    }
}

/// Apply every app in the manifest, in order. A failed app does not stop
/// the rest of the batch; each result is reported per app name.
pub fn apply_manifest(
    manifest: &Manifest,
    targets: &TargetFiles,
) -> Vec<(String, Result<AppResult, ApplicationError>)> {
    manifest
        .apps
        .iter()
        .map(|app| (app.name.clone(), apply_app(app, targets)))
        .collect()
}

fn apply_app(
    app: &AppDefinition,
    targets: &TargetFiles,
) -> Result<AppResult, ApplicationError> {
    let shortcut = NewShortcut {
        name: app.name.clone(),
        exe: PathBuf::from(&app.exe),
        start_dir: app.start_dir.as_ref().map(PathBuf::from),
        launch_options: app.launch_options.clone().unwrap_or_default(),
    };
    let app_id = add_shortcut(&targets.shortcuts, &shortcut)?;

    if !app.wants_compat_tool() {
        return Ok(AppResult::Registered { app_id });
    }
    let tool = app.compat_tool.clone().unwrap_or_default();
    let config = targets
        .config
        .as_ref()
        .ok_or_else(|| ApplicationError::NoConfigFile {
            app: app.name.clone(),
        })?;
    set_compat_tool(config, app_id, &tool)?;
    Ok(AppResult::RegisteredWithCompat { app_id, tool })
}
