mod common;

use common::{manager, write_gameinfo, GAMEINFO_MODDED, GAMEINFO_UNMODDED};
use d2moddin::error::Error;
use std::fs;

#[test]
fn reports_modded_state() {
    let (_temp, manager) = manager();
    let paths = manager.paths().clone();

    write_gameinfo(&paths, GAMEINFO_UNMODDED);
    assert!(!manager.is_modded().unwrap());

    // The shipped-modded fixture uses different spacing than the patcher
    // writes; detection is token-based, not literal.
    write_gameinfo(&paths, GAMEINFO_MODDED);
    assert!(manager.is_modded().unwrap());
}

#[test]
fn patch_then_unpatch_restores_original_bytes() {
    let (_temp, mut manager) = manager();
    let paths = manager.paths().clone();
    write_gameinfo(&paths, GAMEINFO_UNMODDED);

    assert!(!manager.is_modded().unwrap());

    manager.mod_game_info().unwrap();
    assert!(manager.is_modded().unwrap());

    manager.unmod_game_info().unwrap();
    assert!(!manager.is_modded().unwrap());
    assert_eq!(
        fs::read_to_string(&paths.gameinfo_path).unwrap(),
        GAMEINFO_UNMODDED
    );
}

#[test]
fn patch_is_idempotent() {
    let (_temp, mut manager) = manager();
    let paths = manager.paths().clone();
    write_gameinfo(&paths, GAMEINFO_UNMODDED);

    manager.mod_game_info().unwrap();
    let once = fs::read_to_string(&paths.gameinfo_path).unwrap();

    manager.mod_game_info().unwrap();
    let twice = fs::read_to_string(&paths.gameinfo_path).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn unpatch_is_idempotent() {
    let (_temp, mut manager) = manager();
    let paths = manager.paths().clone();
    write_gameinfo(&paths, GAMEINFO_UNMODDED);

    manager.unmod_game_info().unwrap();
    assert_eq!(
        fs::read_to_string(&paths.gameinfo_path).unwrap(),
        GAMEINFO_UNMODDED
    );

    manager.mod_game_info().unwrap();
    manager.unmod_game_info().unwrap();
    manager.unmod_game_info().unwrap();
    assert_eq!(
        fs::read_to_string(&paths.gameinfo_path).unwrap(),
        GAMEINFO_UNMODDED
    );
}

#[test]
fn malformed_gameinfo_is_rejected() {
    let (_temp, mut manager) = manager();
    let paths = manager.paths().clone();
    write_gameinfo(&paths, "\"GameInfo\"\n{\n  FileSystem\n  {\n");

    assert!(matches!(manager.is_modded(), Err(Error::ConfigParse(_))));
    assert!(matches!(manager.mod_game_info(), Err(Error::ConfigParse(_))));

    // The file is left untouched after a failed patch.
    assert_eq!(
        fs::read_to_string(&paths.gameinfo_path).unwrap(),
        "\"GameInfo\"\n{\n  FileSystem\n  {\n"
    );
}

#[test]
fn gameinfo_without_search_paths_is_rejected() {
    let (_temp, manager) = manager();
    let paths = manager.paths().clone();
    write_gameinfo(&paths, "\"GameInfo\"\n{\n  FileSystem\n  {\n  }\n}\n");

    assert!(matches!(manager.is_modded(), Err(Error::ConfigParse(_))));
}
