use crate::dota::DotaPaths;
use crate::error::Result;
use std::fs;
use tracing::info;

// The cache is the inventory of record: every call re-reads the
// filesystem so external installer writes show up immediately.
pub fn mod_names(paths: &DotaPaths) -> Vec<String> {
    let entries = match fs::read_dir(&paths.cache_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    names
}

pub fn mod_names_as_string(paths: &DotaPaths) -> String {
    mod_names(paths).join(", ")
}

pub fn has_mod(paths: &DotaPaths, name: &str) -> bool {
    paths.cache_dir.join(name).is_dir()
}

pub fn has_addon_info(paths: &DotaPaths, name: &str) -> bool {
    paths.cache_dir.join(name).join("addoninfo.txt").is_file()
}

// Deleting an absent mod is a no-op; "already deleted" is success.
pub fn delete_mod(paths: &DotaPaths, name: &str) -> Result<()> {
    let folder = paths.cache_dir.join(name);
    if !folder.is_dir() {
        return Ok(());
    }
    fs::remove_dir_all(&folder)?;
    info!(name, "deleted cached mod");
    Ok(())
}

pub fn delete_mods(paths: &DotaPaths) -> Result<()> {
    for name in mod_names(paths) {
        fs::remove_dir_all(paths.cache_dir.join(&name))?;
    }
    info!("deleted all cached mods");
    Ok(())
}
