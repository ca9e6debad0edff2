//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use perq_schema::{CONFIG_FILENAME, Config};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Path of the configuration file in use.
    pub config_path: PathBuf,
    /// Loaded configuration.
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let Some(config_path) = discover_config_file(&cwd) else {
            eprintln!("error: no {CONFIG_FILENAME} found in this directory or its parents");
            eprintln!("Run 'perq init' to create a configuration file.");
            return Err(ExitCode::FAILURE);
        };
        let config = Config::load(&config_path).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self {
            config_path,
            config,
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
pub fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Finds the nearest `perq.toml`, walking up from the given directory.
pub fn discover_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn discovers_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = discover_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn returns_none_without_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config_file(dir.path()).is_none());
    }
}
