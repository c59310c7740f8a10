//! Cloning remote repositories into temporary checkouts.
//!
//! Glue around the system `git` binary: a URL is cloned into a fresh
//! temporary directory whose checkout lives only as long as the returned
//! handle.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;
use tracing::{error, info};

/// Errors from the clone glue.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git clone failed: {stderr}")]
    CloneFailed { stderr: String },
}

/// A repository cloned into a temporary directory.
///
/// Dropping the checkout removes the clone from disk.
#[derive(Debug)]
pub struct CloneCheckout {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl CloneCheckout {
    /// Root of the cloned working tree.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Clone a git repository into a fresh temporary directory.
///
/// The checkout directory is named after the repository so dump paths read
/// `<repo>/...` rather than a random temp name.
pub fn clone_to_temp(url: &str) -> Result<CloneCheckout, CloneError> {
    let temp_dir = TempDir::new()?;
    let target = temp_dir.path().join(repo_name(url));

    info!(
        "cloning git repository {url} to temporary directory {}",
        target.display()
    );

    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(&target)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!("git clone failed: {stderr}");
        return Err(CloneError::CloneFailed { stderr });
    }

    Ok(CloneCheckout {
        _temp_dir: temp_dir,
        path: target,
    })
}

/// Derive a checkout directory name from a repository URL.
fn repo_name(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .map(|name| name.trim_end_matches(".git"))
        .filter(|name| !name.is_empty())
        .unwrap_or("repo")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/acme/widgets.git"), "widgets");
        assert_eq!(repo_name("https://github.com/acme/widgets"), "widgets");
        assert_eq!(repo_name("https://github.com/acme/widgets/"), "widgets");
        assert_eq!(repo_name("git@github.com:acme/widgets.git"), "widgets");
        assert_eq!(repo_name(""), "repo");
    }

    #[test]
    fn test_clone_of_bogus_url_fails() {
        let result = clone_to_temp("/definitely/not/a/repository");
        assert!(result.is_err());
    }
}
