use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Local checkouts of external docs repos live under this directory.
pub const EXTERNAL_REPOS_DIR: &str = "external-docs";

#[derive(Debug)]
pub enum FetchError {
    Io(std::io::Error),
    Git {
        action: &'static str,
        status: ExitStatus,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Io(e) => write!(f, "IO error: {}", e),
            FetchError::Git { action, status } => {
                write!(f, "git {} failed: {}", action, status)
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<std::io::Error> for FetchError {
    fn from(value: std::io::Error) -> Self {
        FetchError::Io(value)
    }
}

/// Checkout directory name for a (repo, name, branch) triple. Deterministic,
/// so re-runs find the existing clone.
pub fn checkout_name(repo_url: &str, name: &str, branch: &str) -> String {
    let base = repo_url.rsplit('/').next().unwrap_or(repo_url);
    format!("{}_{}{}", base, branch.replace('/', "_"), name)
}

/// Ensure a local checkout of `repo_url` at `branch` exists under
/// `<workdir>/external-docs/` and is up to date. A checkout with local
/// changes is left alone with a warning so a maintainer's edits are never
/// clobbered. Returns the checkout directory name.
pub fn fetch_repo(
    workdir: &Path,
    repo_url: &str,
    name: &str,
    branch: &str,
) -> Result<String, FetchError> {
    let repo_name = checkout_name(repo_url, name, branch);
    let repo_path = workdir.join(EXTERNAL_REPOS_DIR).join(&repo_name);

    if !repo_path.is_dir() {
        let status = Command::new("git")
            .arg("clone")
            .arg("--depth=1")
            .arg(format!("--branch={}", branch))
            .arg(repo_url)
            .arg(&repo_path)
            .status()?;
        if !status.success() {
            return Err(FetchError::Git {
                action: "clone",
                status,
            });
        }
    } else if is_dirty(&repo_path)? {
        println!(
            "Repo \"{}\" has local changes. Not updating.",
            repo_path.display()
        );
    } else {
        let status = Command::new("git")
            .arg("-C")
            .arg(&repo_path)
            .args(["pull", "--no-rebase"])
            .status()?;
        if !status.success() {
            return Err(FetchError::Git {
                action: "pull",
                status,
            });
        }
    }

    Ok(repo_name)
}

fn is_dirty(repo_path: &Path) -> Result<bool, FetchError> {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo_path)
        .args(["diff", "--quiet", "HEAD"])
        .status()?;
    Ok(!status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_name_is_deterministic() {
        let name = checkout_name(
            "https://github.com/inspektor-gadget/inspektor-gadget.git",
            "v0.19.0",
            "v0.19.0",
        );
        assert_eq!(name, "inspektor-gadget.git_v0.19.0v0.19.0");
    }

    #[test]
    fn checkout_name_flattens_branch_slashes() {
        let name = checkout_name("https://example.com/docs.git", "latest", "release/v1");
        assert_eq!(name, "docs.git_release_v1latest");
    }
}
