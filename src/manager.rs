use crate::dota::DotaPaths;
use crate::error::Result;
use crate::{deploy, gameinfo, library};
use std::fs;
use tracing::info;

// Shared context for one game installation. Collaborators receive the
// manager by construction; every path derives from the injected `DotaPaths`.
#[derive(Debug)]
pub struct ModManager {
    paths: DotaPaths,
}

impl ModManager {
    pub fn new(paths: DotaPaths) -> Result<Self> {
        fs::create_dir_all(&paths.cache_dir)?;
        fs::create_dir_all(&paths.active_dir)?;
        info!(game_root = %paths.game_root.display(), "mod manager ready");
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &DotaPaths {
        &self.paths
    }

    pub fn mod_names(&self) -> Vec<String> {
        library::mod_names(&self.paths)
    }

    pub fn mod_names_as_string(&self) -> String {
        library::mod_names_as_string(&self.paths)
    }

    pub fn has_mod(&self, name: &str) -> bool {
        library::has_mod(&self.paths, name)
    }

    // A bundle without its addoninfo.txt marker is still being written by
    // the installer, or was left behind by an aborted download.
    pub fn has_addon_info(&self, name: &str) -> bool {
        library::has_addon_info(&self.paths, name)
    }

    pub fn set_mod(&mut self, name: &str) -> Result<()> {
        deploy::set_mod(&self.paths, name)
    }

    pub fn get_active_mod(&self) -> Option<String> {
        deploy::get_active_mod(&self.paths)
    }

    // Empties the active directory without touching the cache.
    pub fn deactivate(&mut self) -> Result<()> {
        deploy::clear_active(&self.paths)
    }

    // Deleting the active mod would leave a dangling activation, so the
    // active slot is physically emptied first.
    pub fn delete_mod(&mut self, name: &str) -> Result<()> {
        if self.get_active_mod().as_deref() == Some(name) {
            deploy::clear_active(&self.paths)?;
        }
        library::delete_mod(&self.paths, name)
    }

    pub fn delete_mods(&mut self) -> Result<()> {
        deploy::clear_active(&self.paths)?;
        library::delete_mods(&self.paths)
    }

    pub fn is_modded(&self) -> Result<bool> {
        gameinfo::is_modded(&self.paths.gameinfo_path)
    }

    pub fn mod_game_info(&mut self) -> Result<()> {
        gameinfo::mod_game_info(&self.paths.gameinfo_path)
    }

    pub fn unmod_game_info(&mut self) -> Result<()> {
        gameinfo::unmod_game_info(&self.paths.gameinfo_path)
    }
}
