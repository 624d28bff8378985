use serde::Deserialize;
use std::fmt;

/// A declarative batch of apps to register with Steam.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Manifest {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub apps: Vec<AppDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppDefinition {
    pub name: String,
    pub exe: String,
    /// Defaults to the executable's parent directory.
    #[serde(default)]
    pub start_dir: Option<String>,
    #[serde(default)]
    pub launch_options: Option<String>,
    /// Compatibility tool to map the new shortcut to. Empty or absent skips
    /// the config.vdf edit entirely.
    #[serde(default)]
    pub compat_tool: Option<String>,
}

impl AppDefinition {
    pub fn wants_compat_tool(&self) -> bool {
        self.compat_tool.as_deref().is_some_and(|tool| !tool.is_empty())
    }
}

impl Manifest {
    /// Collect all schema problems before any filesystem work happens.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.apps.is_empty() {
            issues.push(ValidationIssue::EmptyAppList);
        }

        for app in &self.apps {
            if app.name.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    app: None,
                    field: "name",
                });
            }
            if app.exe.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    app: Some(app.name.clone()),
                    field: "exe",
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyAppList,
    MissingField {
        app: Option<String>,
        field: &'static str,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyAppList => write!(f, "manifest contains no apps"),
            ValidationIssue::MissingField { app, field } => match app {
                Some(name) => write!(f, "app '{name}' missing required field '{field}'"),
                None => write!(f, "app missing required field '{field}'"),
            },
        }
    }
}
