use crate::{config::AppConfig, manager::ModManager};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

struct GlobalOptions {
    format: OutputFormat,
    game_root: Option<PathBuf>,
}

enum CliCommand {
    ModsList,
    ModsDelete(String),
    ModsClear,
    Activate(String),
    Deactivate,
    Active,
    GameInfoStatus,
    GameInfoPatch,
    GameInfoUnpatch,
    Paths,
    Help,
    Version,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (global, command) = parse_args(&args)?;
    match command {
        CliCommand::Help => {
            print_help();
            Ok(())
        }
        CliCommand::Version => {
            println!("d2moddin v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let config = AppConfig::load_or_create()?;
            let paths = config.resolve_paths(global.game_root.clone())?;
            let manager = ModManager::new(paths).context("initialize mod manager")?;
            run_command(manager, command, global.format)
        }
    }
}

fn parse_args(args: &[String]) -> Result<(GlobalOptions, CliCommand)> {
    let (global, tokens) = parse_global_options(args);

    let strs: Vec<&str> = tokens.iter().map(|token| token.as_str()).collect();
    let command = match strs.as_slice() {
        [] | ["--help"] | ["-h"] | ["help"] => CliCommand::Help,
        ["--version"] | ["-V"] | ["version"] => CliCommand::Version,
        ["mods"] | ["mods", "list"] => CliCommand::ModsList,
        ["mods", "delete", name] => CliCommand::ModsDelete(name.to_string()),
        ["mods", "clear"] => CliCommand::ModsClear,
        ["activate", name] => CliCommand::Activate(name.to_string()),
        ["deactivate"] => CliCommand::Deactivate,
        ["active"] => CliCommand::Active,
        ["gameinfo", "status"] => CliCommand::GameInfoStatus,
        ["gameinfo", "patch"] => CliCommand::GameInfoPatch,
        ["gameinfo", "unpatch"] => CliCommand::GameInfoUnpatch,
        ["paths"] => CliCommand::Paths,
        other => bail!("unknown command: {}", other.join(" ")),
    };

    Ok((global, command))
}

fn parse_global_options(args: &[String]) -> (GlobalOptions, Vec<String>) {
    let mut format = OutputFormat::Text;
    let mut game_root = None;
    let mut tokens = Vec::new();
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--format=") {
            if let Some(parsed) = OutputFormat::parse(value) {
                format = parsed;
            }
            continue;
        }
        if arg == "--format" {
            if let Some(value) = iter.next() {
                if let Some(parsed) = OutputFormat::parse(value) {
                    format = parsed;
                }
            }
            continue;
        }
        if let Some(value) = arg.strip_prefix("--game-root=") {
            game_root = Some(PathBuf::from(value));
            continue;
        }
        if arg == "--game-root" {
            if let Some(value) = iter.next() {
                game_root = Some(PathBuf::from(value));
            }
            continue;
        }
        tokens.push(arg.clone());
    }
    (GlobalOptions { format, game_root }, tokens)
}

#[derive(Serialize)]
struct ModsOutput {
    mods: Vec<String>,
    active: Option<String>,
}

#[derive(Serialize)]
struct GameInfoOutput {
    modded: bool,
}

#[derive(Serialize)]
struct PathsOutput {
    game_root: String,
    cache_dir: String,
    active_dir: String,
    gameinfo: String,
}

fn run_command(mut manager: ModManager, command: CliCommand, format: OutputFormat) -> Result<()> {
    match command {
        CliCommand::ModsList => {
            let output = ModsOutput {
                mods: manager.mod_names(),
                active: manager.get_active_mod(),
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if output.mods.is_empty() {
                println!("No cached mods");
            } else {
                for name in &output.mods {
                    let marker = if output.active.as_deref() == Some(name) {
                        " (active)"
                    } else if !manager.has_addon_info(name) {
                        " (incomplete)"
                    } else {
                        ""
                    };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }
        CliCommand::ModsDelete(name) => {
            manager.delete_mod(&name)?;
            println!("Deleted {name}");
            Ok(())
        }
        CliCommand::ModsClear => {
            manager.delete_mods()?;
            println!("Deleted all cached mods");
            Ok(())
        }
        CliCommand::Activate(name) => {
            manager.set_mod(&name)?;
            println!("Activated {name}");
            Ok(())
        }
        CliCommand::Deactivate => {
            manager.deactivate()?;
            println!("Cleared the active mod");
            Ok(())
        }
        CliCommand::Active => {
            match manager.get_active_mod() {
                Some(name) => println!("{name}"),
                None => println!("No active mod"),
            }
            Ok(())
        }
        CliCommand::GameInfoStatus => {
            let output = GameInfoOutput {
                modded: manager.is_modded()?,
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if output.modded {
                println!("gameinfo.txt is patched for modding");
            } else {
                println!("gameinfo.txt is unpatched");
            }
            Ok(())
        }
        CliCommand::GameInfoPatch => {
            manager.mod_game_info()?;
            println!("Patched gameinfo.txt");
            Ok(())
        }
        CliCommand::GameInfoUnpatch => {
            manager.unmod_game_info()?;
            println!("Unpatched gameinfo.txt");
            Ok(())
        }
        CliCommand::Paths => {
            let paths = manager.paths();
            let output = PathsOutput {
                game_root: paths.game_root.display().to_string(),
                cache_dir: paths.cache_dir.display().to_string(),
                active_dir: paths.active_dir.display().to_string(),
                gameinfo: paths.gameinfo_path.display().to_string(),
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("game root:  {}", output.game_root);
                println!("mod cache:  {}", output.cache_dir);
                println!("active mod: {}", output.active_dir);
                println!("gameinfo:   {}", output.gameinfo);
            }
            Ok(())
        }
        CliCommand::Help | CliCommand::Version => Ok(()),
    }
}

fn print_help() {
    println!("d2moddin - mod manager for {}", crate::dota::GAME_NAME);
    println!();
    println!("Usage: d2moddin [options] <command>");
    println!();
    println!("Commands:");
    println!("  mods list            List cached mods");
    println!("  mods delete <name>   Delete a cached mod");
    println!("  mods clear           Delete every cached mod");
    println!("  activate <name>      Make <name> the active mod");
    println!("  deactivate           Empty the active-mod directory");
    println!("  active               Show the active mod");
    println!("  gameinfo status      Show whether gameinfo.txt is patched");
    println!("  gameinfo patch       Insert the mod search path");
    println!("  gameinfo unpatch     Remove the mod search path");
    println!("  paths                Show resolved game paths");
    println!();
    println!("Options:");
    println!("  --format <text|json> Output format for list/status commands");
    println!("  --game-root <path>   Override the detected Dota 2 directory");
}
