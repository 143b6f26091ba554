use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::info;

// The exact directive the engine needs in order to search the active mod's
// asset path. Token spacing matches what the game ships with.
pub const SENTINEL_LINE: &str = "Game        |gameinfo_path|addons\\d2moddin";
const SENTINEL_PATH: &str = "|gameinfo_path|addons\\d2moddin";

const BLOCK_PATH: [&str; 3] = ["GameInfo", "FileSystem", "SearchPaths"];

pub fn is_modded(path: &Path) -> Result<bool> {
    let raw = fs::read_to_string(path)?;
    detect(&raw)
}

pub fn mod_game_info(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    if let Some(patched) = insert_sentinel(&raw)? {
        fs::write(path, patched)?;
        info!("enabled mod search path in gameinfo.txt");
    }
    Ok(())
}

pub fn unmod_game_info(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    if let Some(patched) = remove_sentinel(&raw)? {
        fs::write(path, patched)?;
        info!("removed mod search path from gameinfo.txt");
    }
    Ok(())
}

// Span of the SearchPaths block body: lines body_start..close sit strictly
// between the opening and closing braces.
struct SearchPathsSpan {
    body_start: usize,
    close: usize,
}

pub fn detect(text: &str) -> Result<bool> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let span = locate_search_paths(&lines)?;
    Ok(lines[span.body_start..span.close]
        .iter()
        .any(|line| is_sentinel_entry(line)))
}

pub fn insert_sentinel(text: &str) -> Result<Option<String>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let span = locate_search_paths(&lines)?;
    if lines[span.body_start..span.close]
        .iter()
        .any(|line| is_sentinel_entry(line))
    {
        return Ok(None);
    }

    // Line up with the existing Game entries; fall back to one level deeper
    // than the closing brace when the block is empty.
    let indent = lines[span.body_start..span.close]
        .iter()
        .rev()
        .find(|line| tokens(line).first().map(|tok| *tok == "Game").unwrap_or(false))
        .map(|line| leading_whitespace(line))
        .unwrap_or_else(|| format!("{}  ", leading_whitespace(lines[span.close])));
    let eol = if span.close > 0 && lines[span.close - 1].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let mut out = String::with_capacity(text.len() + indent.len() + SENTINEL_LINE.len() + 2);
    for (idx, line) in lines.iter().enumerate() {
        if idx == span.close {
            out.push_str(&indent);
            out.push_str(SENTINEL_LINE);
            out.push_str(eol);
        }
        out.push_str(line);
    }
    Ok(Some(out))
}

pub fn remove_sentinel(text: &str) -> Result<Option<String>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let span = locate_search_paths(&lines)?;

    let mut removed = false;
    let mut out = String::with_capacity(text.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx >= span.body_start && idx < span.close && is_sentinel_entry(line) {
            removed = true;
            continue;
        }
        out.push_str(line);
    }
    Ok(removed.then_some(out))
}

fn locate_search_paths(lines: &[&str]) -> Result<SearchPathsSpan> {
    let mut stack: Vec<String> = Vec::new();
    let mut pending: Option<String> = None;
    let mut found: Option<SearchPathsSpan> = None;
    let mut body_start = 0usize;

    for (idx, raw) in lines.iter().enumerate() {
        let toks = tokens(raw);
        if toks.is_empty() {
            continue;
        }

        if toks[0] == "{" {
            let name = pending.take().ok_or_else(|| {
                Error::ConfigParse(format!("unnamed block at line {}", idx + 1))
            })?;
            stack.push(name);
            if found.is_none() && path_matches(&stack) {
                body_start = idx + 1;
            }
            continue;
        }

        if toks[0] == "}" {
            if found.is_none() && path_matches(&stack) {
                found = Some(SearchPathsSpan {
                    body_start,
                    close: idx,
                });
            }
            if stack.pop().is_none() {
                return Err(Error::ConfigParse(format!(
                    "unbalanced closing brace at line {}",
                    idx + 1
                )));
            }
            pending = None;
            continue;
        }

        // `Name {` on one line.
        if toks.len() >= 2 && toks[toks.len() - 1] == "{" {
            stack.push(toks[0].to_string());
            if found.is_none() && path_matches(&stack) {
                body_start = idx + 1;
            }
            pending = None;
            continue;
        }

        if toks.len() == 1 {
            pending = Some(toks[0].to_string());
        } else {
            pending = None;
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::ConfigParse(format!("unclosed block: {open}")));
    }
    found.ok_or_else(|| {
        Error::ConfigParse("GameInfo.FileSystem.SearchPaths block not found".to_string())
    })
}

fn path_matches(stack: &[String]) -> bool {
    stack.len() == BLOCK_PATH.len()
        && stack
            .iter()
            .zip(BLOCK_PATH)
            .all(|(have, want)| have.eq_ignore_ascii_case(want))
}

fn is_sentinel_entry(line: &str) -> bool {
    let toks = tokens(line);
    toks.len() >= 2 && toks[0] == "Game" && toks[1] == SENTINEL_PATH
}

fn tokens(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
    let line = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    line.split_whitespace().map(unquote).collect()
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(token)
}

fn leading_whitespace(line: &str) -> String {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\"GameInfo\"\n{\n  FileSystem\n  {\n    SearchPaths\n    {\n      Game        |gameinfo_path|.\n      Game        platform\n    }\n  }\n}\n";

    #[test]
    fn locates_block_and_detects_unmodded() {
        assert!(!detect(MINIMAL).unwrap());
    }

    #[test]
    fn sentinel_in_comment_is_ignored() {
        let text = MINIMAL.replace(
            "      Game        platform\n",
            "      Game        platform\n      // Game |gameinfo_path|addons\\d2moddin\n",
        );
        assert!(!detect(&text).unwrap());
    }

    #[test]
    fn sentinel_outside_search_paths_is_ignored() {
        let text = MINIMAL.replace(
            "  FileSystem\n",
            "  Game        |gameinfo_path|addons\\d2moddin\n  FileSystem\n",
        );
        assert!(!detect(&text).unwrap());
    }

    #[test]
    fn same_line_brace_is_accepted() {
        let text = "GameInfo {\n  FileSystem {\n    SearchPaths {\n      Game  platform\n    }\n  }\n}\n";
        assert!(!detect(text).unwrap());
    }

    #[test]
    fn detection_is_whitespace_insensitive() {
        let text = MINIMAL.replace(
            "      Game        platform\n",
            "      Game        platform\n      Game |gameinfo_path|addons\\d2moddin\n",
        );
        assert!(detect(&text).unwrap());
    }

    #[test]
    fn unclosed_block_is_a_parse_error() {
        let text = "\"GameInfo\"\n{\n  FileSystem\n  {\n";
        assert!(matches!(detect(text), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn missing_search_paths_is_a_parse_error() {
        let text = "\"GameInfo\"\n{\n  FileSystem\n  {\n  }\n}\n";
        assert!(matches!(detect(text), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn insert_then_remove_restores_input() {
        let patched = insert_sentinel(MINIMAL).unwrap().unwrap();
        assert!(detect(&patched).unwrap());
        let restored = remove_sentinel(&patched).unwrap().unwrap();
        assert_eq!(restored, MINIMAL);
    }

    #[test]
    fn insert_is_idempotent() {
        let patched = insert_sentinel(MINIMAL).unwrap().unwrap();
        assert!(insert_sentinel(&patched).unwrap().is_none());
    }

    #[test]
    fn remove_on_unmodded_is_a_no_op() {
        assert!(remove_sentinel(MINIMAL).unwrap().is_none());
    }
}
