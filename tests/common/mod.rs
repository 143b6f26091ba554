#![allow(dead_code)]

use d2moddin::dota::DotaPaths;
use d2moddin::manager::ModManager;
use std::fs;
use tempfile::TempDir;

pub const GAMEINFO_UNMODDED: &str = r#""GameInfo"
{
  game  "DOTA 2"
  gamelogo 1
  type multiplayer_only
  nomodels 1
  nohimodel 1
  nocrosshair 0
  GameData        "dota.fgd"
  SupportsDX8 0


  FileSystem
  {
    SteamAppId        816
    ToolsAppId        211

    SearchPaths
    {
      Game        |gameinfo_path|.
      Game        platform
    }
  }
}
"#;

pub const GAMEINFO_MODDED: &str = r#""GameInfo"
{
  game  "DOTA 2"
  gamelogo 1
  type multiplayer_only
  nomodels 1
  nohimodel 1
  nocrosshair 0
  GameData        "dota.fgd"
  SupportsDX8 0


  FileSystem
  {
    SteamAppId        816
    ToolsAppId        211

    SearchPaths
    {
      Game        |gameinfo_path|.
      Game        platform
      Game |gameinfo_path|addons\d2moddin
    }
  }
}
"#;

// Every test runs against a throwaway game root; all manager paths derive
// from it, so nothing touches a real installation.
pub fn manager() -> (TempDir, ModManager) {
    let temp = tempfile::tempdir().unwrap();
    let paths = DotaPaths::from_root(temp.path());
    let manager = ModManager::new(paths).unwrap();
    (temp, manager)
}

pub fn seed_mod(paths: &DotaPaths, name: &str) {
    let dir = paths.cache_dir.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("addoninfo.txt"), "").unwrap();
}

pub fn write_gameinfo(paths: &DotaPaths, content: &str) {
    fs::create_dir_all(paths.gameinfo_path.parent().unwrap()).unwrap();
    fs::write(&paths.gameinfo_path, content).unwrap();
}
