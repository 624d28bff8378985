//! Append-only editor for the shortcut set.
//!
//! Each call reads the whole file (a missing file is an empty set), appends
//! one freshly encoded record under a collision-free app ID, and writes the
//! re-serialized set back atomically.

use crate::edit::atomic_write;
use crate::shortcuts::codec::{decode, encode_record, serialize, ShortcutRecord};
use crate::shortcuts::errors::ShortcutError;
use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const APP_ID_MIN: u32 = 1_000_000_000;
const APP_ID_ATTEMPTS: u32 = 100;

/// Caller-supplied fields for a new shortcut.
#[derive(Debug, Clone)]
pub struct NewShortcut {
    pub name: String,
    pub exe: PathBuf,
    /// Defaults to the executable's parent directory.
    pub start_dir: Option<PathBuf>,
    pub launch_options: String,
}

/// Read and decode the current shortcut set. A missing file is an empty set.
pub fn load_shortcuts(path: &Path) -> Result<Vec<ShortcutRecord>, ShortcutError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(source) => {
            return Err(ShortcutError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    decode(&data)
}

/// Append one shortcut to the set at `path` and return its new app ID.
///
/// The name is validated before any I/O. Records whose app ID cannot be
/// extracted are ignored for uniqueness purposes.
pub fn add_shortcut(path: &Path, shortcut: &NewShortcut) -> Result<u32, ShortcutError> {
    if shortcut.name.is_empty() {
        return Err(ShortcutError::EmptyName);
    }

    let mut records = load_shortcuts(path)?;

    let existing: HashSet<u32> = records.iter().filter_map(ShortcutRecord::app_id).collect();
    let app_id = generate_unique_app_id(&existing, &mut rand::thread_rng())?;

    let exe = absolute_path(&shortcut.exe, path)?;
    let start_dir = match &shortcut.start_dir {
        Some(dir) => absolute_path(dir, path)?,
        None => exe.parent().map(Path::to_path_buf).unwrap_or_else(|| exe.clone()),
    };

    records.push(encode_record(
        app_id,
        &shortcut.name,
        &exe.to_string_lossy(),
        &start_dir.to_string_lossy(),
        &shortcut.launch_options,
    ));

    atomic_write(path, &serialize(&records))?;
    Ok(app_id)
}

fn absolute_path(input: &Path, context: &Path) -> Result<PathBuf, ShortcutError> {
    std::path::absolute(input).map_err(|source| ShortcutError::Io {
        path: context.to_path_buf(),
        source,
    })
}

/// Draw uniform random candidates in `[1_000_000_000, u32::MAX]` until one
/// is free. Collisions are astronomically unlikely, but 100 straight misses
/// is still a handled failure rather than a hang.
fn generate_unique_app_id(
    existing: &HashSet<u32>,
    rng: &mut impl Rng,
) -> Result<u32, ShortcutError> {
    for _ in 0..APP_ID_ATTEMPTS {
        let candidate = rng.gen_range(APP_ID_MIN..=u32::MAX);
        if !existing.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(ShortcutError::AppIdExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_shortcut(name: &str) -> NewShortcut {
        NewShortcut {
            name: name.to_string(),
            exe: PathBuf::from("/usr/bin/game"),
            start_dir: None,
            launch_options: String::new(),
        }
    }

    #[test]
    fn empty_name_is_rejected_before_io() {
        let err = add_shortcut(Path::new("/nonexistent/dir/shortcuts.vdf"), &new_shortcut(""))
            .unwrap_err();
        assert!(matches!(err, ShortcutError::EmptyName));
    }

    #[test]
    fn missing_file_reads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");
        assert!(load_shortcuts(&path).unwrap().is_empty());
    }

    #[test]
    fn add_to_absent_file_creates_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("shortcuts.vdf");

        let app_id = add_shortcut(&path, &new_shortcut("My Game")).unwrap();
        assert!(app_id >= APP_ID_MIN);

        let records = load_shortcuts(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].app_id(), Some(app_id));

        let bytes = records[0].as_bytes();
        let haystack = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        assert!(haystack(b"\x01AppName\x00My Game\x00"));
        assert!(haystack(b"\x01Exe\x00"));
        assert!(haystack(b"\x01StartDir\x00"));
    }

    #[test]
    fn two_adds_produce_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");

        let first = add_shortcut(&path, &new_shortcut("First")).unwrap();
        let second = add_shortcut(&path, &new_shortcut("Second")).unwrap();
        assert_ne!(first, second);

        let records = load_shortcuts(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].app_id(), Some(first));
        assert_eq!(records[1].app_id(), Some(second));
    }

    #[test]
    fn generated_id_avoids_existing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut taken = HashSet::new();
        // Pre-claim the first few draws from the same seed
        for _ in 0..5 {
            taken.insert(rng.gen_range(APP_ID_MIN..=u32::MAX));
        }
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_unique_app_id(&taken, &mut rng).unwrap();
        assert!(!taken.contains(&id));
        assert!(id >= APP_ID_MIN);
    }
}
