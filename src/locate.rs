//! Locate Steam's shortcuts.vdf and config.vdf on disk.
//!
//! Discovery order: explicit paths from the caller always win; the
//! `STEAM_ROOT` environment variable overrides the per-platform search
//! roots; otherwise the usual installation directories are scanned.

use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Steam shortcuts.vdf not found (set STEAM_ROOT or pass --shortcuts-file)")]
    ShortcutsNotFound,

    #[error("Steam config.vdf not found (set STEAM_ROOT or pass --config-file)")]
    ConfigNotFound,
}

/// Candidate Steam installation roots for the current platform.
pub fn steam_search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(root) = env::var("STEAM_ROOT") {
        if !root.is_empty() {
            roots.push(PathBuf::from(root));
        }
    }

    #[cfg(windows)]
    {
        for var in ["PROGRAMFILES(X86)", "PROGRAMFILES"] {
            if let Ok(dir) = env::var(var) {
                if !dir.is_empty() {
                    roots.push(PathBuf::from(dir).join("Steam"));
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    if let Some(home) = home::home_dir() {
        roots.push(home.join("Library/Application Support/Steam"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    if let Some(home) = home::home_dir() {
        roots.push(home.join(".steam/steam"));
        roots.push(home.join(".local/share/Steam"));
        roots.push(home.join("snap/steam"));
        roots.push(home.join(".var/app/com.valvesoftware.Steam/.steam/steam"));
    }

    roots
}

/// Find the shortcuts.vdf for the first Steam user profile.
///
/// User directories under `userdata` are numeric; they are scanned in sorted
/// order and an existing `config/shortcuts.vdf` wins. When no profile has
/// one yet, the first candidate path is returned so the set editor can
/// create it (a missing file reads as an empty set).
pub fn find_shortcuts_file() -> Result<PathBuf, LocateError> {
    let mut fallback: Option<PathBuf> = None;

    for root in steam_search_roots() {
        let userdata = root.join("userdata");
        if !userdata.is_dir() {
            continue;
        }

        let mut users: Vec<PathBuf> = WalkDir::new(&userdata)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
            })
            .map(|entry| entry.into_path())
            .collect();
        users.sort();

        for user_dir in users {
            let candidate = user_dir.join("config").join("shortcuts.vdf");
            if candidate.exists() {
                return Ok(candidate);
            }
            if fallback.is_none() {
                fallback = Some(candidate);
            }
        }
    }

    fallback.ok_or(LocateError::ShortcutsNotFound)
}

/// Candidate config.vdf paths, deduplicated after resolving symlinks
/// (`~/.steam/root` and friends usually point at the same installation).
///
/// Windows yields no candidates: compat tool mappings are a Proton concern.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(root) = env::var("STEAM_ROOT") {
        if !root.is_empty() {
            candidates.push(PathBuf::from(root).join("config").join("config.vdf"));
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    if let Some(home) = home::home_dir() {
        let roots = [
            home.join(".local/share/Steam"),
            home.join(".steam/root"),
            home.join(".steam/steam"),
            home.join(".steam/debian-installation"),
        ];
        let mut unique_roots: Vec<PathBuf> = Vec::new();
        for root in roots {
            let resolved = fs::canonicalize(&root).unwrap_or(root);
            if !unique_roots.contains(&resolved) {
                unique_roots.push(resolved);
            }
        }
        for root in unique_roots {
            candidates.push(root.join("config").join("config.vdf"));
        }
        candidates.push(
            home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam/config/config.vdf"),
        );
        candidates.push(home.join("snap/steam/common/.steam/root/config/config.vdf"));
        candidates.push(home.join("steam/.steam/config/config.vdf"));
    }

    #[cfg(target_os = "macos")]
    if let Some(home) = home::home_dir() {
        candidates.push(home.join("Library/Application Support/Steam/config/config.vdf"));
    }

    candidates
}

/// Find an existing config.vdf. Unlike the shortcuts file, this one is only
/// ever edited, never created, so a candidate must already exist.
pub fn find_config_file() -> Result<PathBuf, LocateError> {
    config_candidates()
        .into_iter()
        .find(|candidate| candidate.exists())
        .ok_or(LocateError::ConfigNotFound)
}
