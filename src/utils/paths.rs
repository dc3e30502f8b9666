//! Cross-Platform Path Utilities
//!
//! Resolves where the settings file lives (`<config dir>/quiz-funnel/`).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the quiz funnel config directory (e.g. ~/.config/quiz-funnel/)
pub fn quiz_funnel_dir() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("quiz-funnel"))
        .ok_or_else(|| AppError::config("Could not determine config directory"))
}

/// Get the default settings file path (<config dir>/quiz-funnel/settings.toml)
pub fn settings_path() -> AppResult<PathBuf> {
    Ok(quiz_funnel_dir()?.join("settings.toml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
