use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Get the maniana directory - checks for local .maniana first, then falls back to global ~/.maniana
pub fn get_maniana_dir() -> Result<PathBuf> {
    // Check for local .maniana directory
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_maniana(&current_dir) {
        return Ok(local_dir);
    }

    // Fall back to global ~/.maniana
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".maniana"))
}

/// Find local .maniana directory by walking up the directory tree
fn find_local_maniana(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let maniana_dir = current.join(".maniana");
        if maniana_dir.exists() && maniana_dir.is_dir() {
            return Some(maniana_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the maniana directory exists
pub fn ensure_maniana_dir() -> Result<PathBuf> {
    let dir = get_maniana_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Get path to the task data file
pub fn data_file() -> Result<PathBuf> {
    Ok(ensure_maniana_dir()?.join("maniana.json"))
}

/// Get path to the settings file
pub fn settings_file() -> Result<PathBuf> {
    Ok(ensure_maniana_dir()?.join("settings.json"))
}

/// Get path to the log directory
pub fn log_dir() -> Result<PathBuf> {
    Ok(ensure_maniana_dir()?.join("logs"))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    // Write content
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    // Sync to disk
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
