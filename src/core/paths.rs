use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Base config directory (~/.config/next-express/ on Unix, %APPDATA%\next-express on Windows)
pub fn next_express() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("next-express"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("next-express"))
    }
}

/// Defaults file path
pub fn defaults_json() -> Result<PathBuf> {
    Ok(next_express()?.join("next-express.json"))
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|e| {
        Error::validation_invalid_argument("path", e.to_string(), Some(raw.to_string()), None)
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make a path absolute against the current working directory.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("read current dir".to_string())))?;
    Ok(cwd.join(path))
}
