use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Options;
use crate::error::{CliError, Result};
use crate::fs::Fs;

const HOME_ENV: &str = "MIACTL_HOME";
const HOME_DIR_NAME: &str = ".miactl";
const CONTEXTS_DIR: &str = "contexts";

/// Resolve the miactl home: `$MIACTL_HOME`, or `~/.miactl`.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(HOME_DIR_NAME))
        .ok_or(CliError::NoHomeDir)
}

/// A named, persisted set of connection parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MiaContext {
    #[serde(rename = "apiBaseUrl")]
    pub api_base_url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub name: String,
}

impl MiaContext {
    pub fn path(home: &Path, name: &str) -> PathBuf {
        home.join(CONTEXTS_DIR).join(name)
    }

    /// Write the context to `<home>/contexts/<name>`, replacing any previous one.
    pub fn save(&self, fs: &Fs, home: &Path) -> Result<PathBuf> {
        if self.name.is_empty() {
            return Err(CliError::CreateContext("empty name".to_string()));
        }
        if self.name.contains(['/', '\\']) || self.name == "." || self.name == ".." {
            return Err(CliError::CreateContext(format!(
                "invalid name {:?}",
                self.name
            )));
        }

        let path = Self::path(home, &self.name);
        fs.write_yaml_file(&path, self)?;
        debug!(path = %path.display(), "context written");
        Ok(path)
    }

    pub fn load(fs: &Fs, home: &Path, name: &str) -> Result<Self> {
        let path = Self::path(home, name);
        if !fs.exists(&path)? {
            return Err(CliError::ContextNotFound {
                name: name.to_string(),
                path,
            });
        }

        let raw = fs.read_file(&path)?;
        serde_yaml::from_slice(&raw).map_err(|source| CliError::ContextParse { path, source })
    }

    /// Fill the connection fields `opts` leaves empty; explicit values win.
    pub fn apply_to(&self, opts: &mut Options) {
        if opts.api_base_url.is_empty() {
            opts.api_base_url = self.api_base_url.clone();
        }
        if opts.api_key.is_empty() {
            opts.api_key = self.api_key.clone();
        }
    }
}
