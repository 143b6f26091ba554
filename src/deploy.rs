use crate::dota::DotaPaths;
use crate::error::{Error, Result};
use std::path::Path;
use std::{fs, io};
use tracing::info;
use walkdir::WalkDir;

// Materializes the named cached mod into the game's active-mod directory.
// The active directory holds the files of at most one mod at a time, so the
// previous contents are removed before anything is copied in.
pub fn set_mod(paths: &DotaPaths, name: &str) -> Result<()> {
    let source = paths.cache_dir.join(name);
    if !source.is_dir() {
        return Err(Error::ModNotFound(name.to_string()));
    }

    clear_active(paths)?;
    copy_tree(&source, &paths.active_dir.join(name))?;
    info!(name, "activated mod");
    Ok(())
}

// Derived from the active directory's single top-level child; the cache is
// never consulted, so a manually emptied directory reads as "no active mod".
pub fn get_active_mod(paths: &DotaPaths) -> Option<String> {
    let entries = fs::read_dir(&paths.active_dir).ok()?;
    for entry in entries.flatten() {
        if entry.path().is_dir() {
            if let Ok(name) = entry.file_name().into_string() {
                return Some(name);
            }
        }
    }
    None
}

pub fn clear_active(paths: &DotaPaths) -> Result<()> {
    if !paths.active_dir.is_dir() {
        fs::create_dir_all(&paths.active_dir)?;
        return Ok(());
    }

    for entry in fs::read_dir(&paths.active_dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = match entry.path().strip_prefix(source) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
