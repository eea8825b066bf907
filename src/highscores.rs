//! Persist one high score per game mode (XDG config or ~/.config/blocktui).

use crate::GameMode;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the high score files.
fn config_dir() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("blocktui")
}

fn score_path(dir: &Path, mode: GameMode) -> PathBuf {
    dir.join(format!("highscore-{}", mode.name()))
}

/// Best score for `mode`; 0 when missing or unreadable.
pub fn load_high_score(mode: GameMode) -> u32 {
    load_from(&config_dir(), mode)
}

/// Save the best score for `mode`. Creates the config directory if needed.
pub fn save_high_score(mode: GameMode, score: u32) -> Result<()> {
    save_to(&config_dir(), mode, score)
}

fn load_from(dir: &Path, mode: GameMode) -> u32 {
    fs::read_to_string(score_path(dir, mode))
        .ok()
        .and_then(|s| s.lines().next().and_then(|l| l.trim().parse().ok()))
        .unwrap_or(0)
}

fn save_to(dir: &Path, mode: GameMode, score: u32) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(score_path(dir, mode), format!("{score}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blocktui-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_zero() {
        let dir = scratch_dir("missing");
        assert_eq!(load_from(&dir, GameMode::Lines), 0);
    }

    #[test]
    fn test_save_then_load_per_mode() {
        let dir = scratch_dir("save");
        save_to(&dir, GameMode::SquaresLines, 123).unwrap();
        assert_eq!(load_from(&dir, GameMode::SquaresLines), 123);
        assert_eq!(load_from(&dir, GameMode::Lines), 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_garbage_is_zero() {
        let dir = scratch_dir("garbage");
        fs::create_dir_all(&dir).unwrap();
        fs::write(score_path(&dir, GameMode::FourColors), "lots\n").unwrap();
        assert_eq!(load_from(&dir, GameMode::FourColors), 0);
        let _ = fs::remove_dir_all(&dir);
    }
}
