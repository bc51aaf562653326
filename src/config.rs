use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::PasteError;

const TOKEN_FILE: &str = ".pasteup_token";

/// Where uploads land and where they are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub cdn_host: String,
}

/// Identity recorded on the commit GitHub creates for each upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub message: String,
    pub committer_name: String,
    pub committer_email: String,
}

/// Runtime configuration for the uploader.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitHub REST API (default: https://api.github.com)
    pub api_url: String,
    pub repository: Repository,
    pub commit: CommitInfo,
    /// Request timeout for the PUT (default: 60s, zero is not accepted)
    pub timeout: Duration,
    /// Token taken from `GITHUB_TOKEN`, if set
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: Repository {
                owner: "pys1992".to_string(),
                repo: "storage".to_string(),
                branch: "main".to_string(),
                cdn_host: "cdn.jsdelivr.net".to_string(),
            },
            commit: CommitInfo {
                message: "auto commit".to_string(),
                committer_name: "pys".to_string(),
                committer_email: "me@pys.im".to_string(),
            },
            timeout: Duration::from_secs(60),
            token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source; unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let get = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            api_url: get("GITHUB_API_URL", default.api_url)
                .trim_end_matches('/')
                .to_string(),
            repository: Repository {
                owner: get("PASTEUP_OWNER", default.repository.owner),
                repo: get("PASTEUP_REPO", default.repository.repo),
                branch: get("PASTEUP_BRANCH", default.repository.branch),
                cdn_host: get("PASTEUP_CDN_HOST", default.repository.cdn_host),
            },
            commit: CommitInfo {
                message: get("PASTEUP_COMMIT_MESSAGE", default.commit.message),
                committer_name: get("PASTEUP_COMMITTER_NAME", default.commit.committer_name),
                committer_email: get("PASTEUP_COMMITTER_EMAIL", default.commit.committer_email),
            },
            timeout: lookup("PASTEUP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.timeout),
            token: lookup("GITHUB_TOKEN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        }
    }

    /// The token from the environment, or else the one stored by `--login`.
    pub fn resolve_token(&self) -> Result<String> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => self.resolve_token_from(&token_path()?),
        }
    }

    /// Same as [`Config::resolve_token`] with an explicit token file.
    pub fn resolve_token_from(&self, token_file: &Path) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        load_token_from(token_file)?.ok_or_else(|| PasteError::MissingToken.into())
    }
}

/// Token file in the user's home directory.
pub fn token_path() -> Result<PathBuf> {
    token_path_in(dirs::home_dir())
}

fn token_path_in(home: Option<PathBuf>) -> Result<PathBuf> {
    home.map(|dir| dir.join(TOKEN_FILE))
        .ok_or_else(|| PasteError::NoHomeDirectory.into())
}

/// Persist token into the token file in the home directory.
pub fn persist_token(token: &str) -> Result<PathBuf> {
    let path = token_path()?;
    persist_token_to(&path, token)?;
    Ok(path)
}

/// Write `token` to `path`, readable by the owner only on unix.
pub fn persist_token_to(path: &Path, token: &str) -> Result<()> {
    let context = || format!("Failed to write token file {}", path.display());
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).with_context(context)?;
    // mode() only applies on creation; tighten a file left by an older run
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .with_context(context)?;
    }
    file.write_all(token.trim().as_bytes()).with_context(context)?;
    Ok(())
}

/// Load token from the token file in the home directory.
pub fn load_token() -> Result<Option<String>> {
    load_token_from(&token_path()?)
}

/// Load token from `path`. A missing or blank file is `None`.
pub fn load_token_from(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;
    let token = data.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
