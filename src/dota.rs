use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const GAME_NAME: &str = "Dota 2";

// Folder the mod lives under, both in the cache root and inside dota/addons.
pub const MOD_DIR_NAME: &str = "d2moddin";

#[derive(Debug, Clone)]
pub struct DotaPaths {
    pub game_root: PathBuf,
    pub cache_dir: PathBuf,
    pub active_dir: PathBuf,
    pub gameinfo_path: PathBuf,
}

impl DotaPaths {
    pub fn from_root(game_root: impl Into<PathBuf>) -> Self {
        let game_root = game_root.into();
        let cache_dir = game_root.join(MOD_DIR_NAME);
        let dota_dir = game_root.join("dota");
        let active_dir = dota_dir.join("addons").join(MOD_DIR_NAME);
        let gameinfo_path = dota_dir.join("gameinfo.txt");
        Self {
            game_root,
            cache_dir,
            active_dir,
            gameinfo_path,
        }
    }
}

pub fn detect_paths(game_root_override: Option<&Path>) -> Result<DotaPaths> {
    let game_root = match game_root_override {
        Some(path) => path.to_path_buf(),
        None => find_game_root().context("locate Dota 2 game directory")?,
    };

    if !looks_like_game_root(&game_root) {
        bail!(
            "invalid game root: expected dota/gameinfo.txt under {}",
            game_root.display()
        );
    }

    Ok(DotaPaths::from_root(game_root))
}

fn find_game_root() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(home) = dirs_home() {
        candidates.push(home.join(".local/share/Steam"));
        candidates.push(home.join(".steam/steam"));
    }

    let mut libraries = Vec::new();
    for base in candidates {
        let vdf = base.join("steamapps/libraryfolders.vdf");
        if vdf.exists() {
            if let Ok(paths) = parse_steam_library_paths(&vdf) {
                libraries.extend(paths);
            }
        }
        libraries.push(base);
    }

    for lib in libraries {
        let candidate = lib.join("steamapps/common").join("dota 2 beta");
        if looks_like_game_root(&candidate) {
            return Some(candidate);
        }
    }

    None
}

fn parse_steam_library_paths(path: &Path) -> Result<Vec<PathBuf>> {
    let raw = fs::read_to_string(path).context("read libraryfolders.vdf")?;
    let mut paths = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if !line.contains("\"path\"") {
            continue;
        }

        let parts: Vec<&str> = line.split('"').collect();
        if parts.len() >= 4 {
            let path = parts[3].replace("\\\\", "\\");
            paths.push(PathBuf::from(path));
        }
    }

    Ok(paths)
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

pub fn looks_like_game_root(path: &Path) -> bool {
    path.join("dota").join("gameinfo.txt").is_file()
}
