use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use steam_patcher::manifest::{apply_manifest, load_from_path, AppResult, TargetFiles};
use steam_patcher::shortcuts::{add_shortcut, load_shortcuts, NewShortcut};
use steam_patcher::vdf::{set_compat_tool, CompatEditor, CompatPlan};
use steam_patcher::{find_config_file, find_shortcuts_file, EditResult};

#[derive(Parser)]
#[command(name = "steam-patcher")]
#[command(about = "Register non-Steam shortcuts and compat tool mappings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register one application as a non-Steam shortcut
    Add {
        /// Display name of the shortcut
        #[arg(short, long)]
        name: String,

        /// Path to the executable
        #[arg(short, long)]
        exe: PathBuf,

        /// Working directory (defaults to the executable's directory)
        #[arg(short, long)]
        start_dir: Option<PathBuf>,

        /// Launch options passed to the executable
        #[arg(short, long, default_value = "")]
        launch_options: String,

        /// Map the new shortcut to this compatibility tool
        #[arg(long)]
        compat_tool: Option<String>,

        /// Explicit shortcuts.vdf path (auto-detected if not specified)
        #[arg(long)]
        shortcuts_file: Option<PathBuf>,

        /// Explicit config.vdf path (auto-detected if not specified)
        #[arg(long)]
        config_file: Option<PathBuf>,
    },

    /// Set the compatibility tool mapping for an app ID
    SetCompat {
        /// App ID of the shortcut
        app_id: u32,

        /// Compatibility tool name (e.g. proton_experimental)
        tool: String,

        /// Explicit config.vdf path (auto-detected if not specified)
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Show what would change without modifying the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of the change
        #[arg(short, long)]
        diff: bool,
    },

    /// List shortcuts in the current set
    List {
        /// Explicit shortcuts.vdf path (auto-detected if not specified)
        #[arg(long)]
        shortcuts_file: Option<PathBuf>,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a TOML manifest of apps
    Apply {
        /// Path to the manifest file
        manifest: PathBuf,

        /// Explicit shortcuts.vdf path (auto-detected if not specified)
        #[arg(long)]
        shortcuts_file: Option<PathBuf>,

        /// Explicit config.vdf path (auto-detected if not specified)
        #[arg(long)]
        config_file: Option<PathBuf>,
    },

    /// Print the discovered Steam file locations
    Locate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            name,
            exe,
            start_dir,
            launch_options,
            compat_tool,
            shortcuts_file,
            config_file,
        } => cmd_add(
            name,
            exe,
            start_dir,
            launch_options,
            compat_tool,
            shortcuts_file,
            config_file,
        ),

        Commands::SetCompat {
            app_id,
            tool,
            config_file,
            dry_run,
            diff,
        } => cmd_set_compat(app_id, tool, config_file, dry_run, diff),

        Commands::List {
            shortcuts_file,
            json,
        } => cmd_list(shortcuts_file, json),

        Commands::Apply {
            manifest,
            shortcuts_file,
            config_file,
        } => cmd_apply(manifest, shortcuts_file, config_file),

        Commands::Locate => cmd_locate(),
    }
}

/// Explicit flag beats auto-detection, always.
fn resolve_shortcuts_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => {
            let path = find_shortcuts_file()?;
            println!(
                "{}",
                format!("Auto-detected shortcuts file: {}", path.display()).dimmed()
            );
            Ok(path)
        }
    }
}

fn resolve_config_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => {
            let path = find_config_file()?;
            println!(
                "{}",
                format!("Auto-detected config file: {}", path.display()).dimmed()
            );
            Ok(path)
        }
    }
}

/// Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_add(
    name: String,
    exe: PathBuf,
    start_dir: Option<PathBuf>,
    launch_options: String,
    compat_tool: Option<String>,
    shortcuts_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<()> {
    let shortcuts_path = resolve_shortcuts_file(shortcuts_file)?;

    let shortcut = NewShortcut {
        name: name.clone(),
        exe,
        start_dir,
        launch_options,
    };
    let app_id = add_shortcut(&shortcuts_path, &shortcut)
        .with_context(|| format!("failed to add shortcut '{name}'"))?;

    println!(
        "{} Registered '{}' with app ID {}",
        "✓".green(),
        name,
        app_id
    );

    if let Some(tool) = compat_tool.filter(|tool| !tool.is_empty()) {
        let config_path = resolve_config_file(config_file)?;
        set_compat_tool(&config_path, app_id, &tool)
            .with_context(|| format!("failed to set compat tool for app ID {app_id}"))?;
        println!("{} Mapped app ID {} to {}", "✓".green(), app_id, tool);
    }

    Ok(())
}

fn cmd_set_compat(
    app_id: u32,
    tool: String,
    config_file: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let config_path = resolve_config_file(config_file)?;

    if dry_run || show_diff {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let editor = CompatEditor::from_path(&config_path, &content)?;
        match editor.plan_set_compat_tool(app_id, &tool)? {
            CompatPlan::NoOp(reason) => {
                println!("{} {}", "⊙".yellow(), reason);
                return Ok(());
            }
            CompatPlan::Edit(edit) => {
                if show_diff {
                    let modified = edit.preview(&content)?;
                    display_diff(&config_path, &content, &modified);
                }
                if dry_run {
                    println!(
                        "{} Would map app ID {} to {} in {}",
                        "✓".green(),
                        app_id,
                        tool,
                        config_path.display()
                    );
                    return Ok(());
                }
                let _ = edit.apply()?;
            }
        }
    } else {
        match set_compat_tool(&config_path, app_id, &tool)? {
            EditResult::Applied { .. } => {}
            EditResult::AlreadyApplied { .. } => {
                println!("{} Compat tool already set to {}", "⊙".yellow(), tool);
                return Ok(());
            }
        }
    }

    println!(
        "{} Mapped app ID {} to {} in {}",
        "✓".green(),
        app_id,
        tool,
        config_path.display()
    );
    Ok(())
}

fn cmd_list(shortcuts_file: Option<PathBuf>, json: bool) -> Result<()> {
    let shortcuts_path = resolve_shortcuts_file(shortcuts_file)?;
    let records = load_shortcuts(&shortcuts_path)
        .with_context(|| format!("failed to read {}", shortcuts_path.display()))?;

    if json {
        let entries: Vec<serde_json::Value> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::json!({
                    "index": index,
                    "app_id": record.app_id(),
                    "bytes": record.as_bytes().len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No shortcuts registered".yellow());
        return Ok(());
    }

    println!("{}", format!("{} shortcut(s):", records.len()).bold());
    for (index, record) in records.iter().enumerate() {
        match record.app_id() {
            Some(app_id) => println!("  {index}: app ID {app_id}"),
            None => println!("  {index}: {}", "no app ID field".dimmed()),
        }
    }
    Ok(())
}

fn cmd_apply(
    manifest_path: PathBuf,
    shortcuts_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<()> {
    let manifest = load_from_path(&manifest_path)?;

    let shortcuts = resolve_shortcuts_file(shortcuts_file)?;
    // Only resolve config.vdf when some app actually needs it
    let config = if manifest.apps.iter().any(|app| app.wants_compat_tool()) {
        match config_file {
            Some(path) => Some(path),
            None => find_config_file().ok(),
        }
    } else {
        config_file
    };

    if !manifest.meta.name.is_empty() {
        println!("Manifest: {}", manifest.meta.name);
    }
    println!("Shortcuts file: {}", shortcuts.display());
    if let Some(config) = &config {
        println!("Config file: {}", config.display());
    }
    println!();

    let targets = TargetFiles { shortcuts, config };
    let results = apply_manifest(&manifest, &targets);

    let mut registered = 0;
    let mut failed = 0;

    for (app_name, result) in results {
        match result {
            Ok(AppResult::Registered { app_id }) => {
                println!("{} {}: app ID {}", "✓".green(), app_name, app_id);
                registered += 1;
            }
            Ok(AppResult::RegisteredWithCompat { app_id, tool }) => {
                println!(
                    "{} {}: app ID {}, compat tool {}",
                    "✓".green(),
                    app_name,
                    app_id,
                    tool
                );
                registered += 1;
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), app_name, e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} registered", format!("{}", registered).green());
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_locate() -> Result<()> {
    match find_shortcuts_file() {
        Ok(path) => println!("shortcuts.vdf: {}", path.display()),
        Err(e) => eprintln!("{} {}", "✗".red(), e),
    }
    match find_config_file() {
        Ok(path) => println!("config.vdf:    {}", path.display()),
        Err(e) => eprintln!("{} {}", "✗".red(), e),
    }
    Ok(())
}
