use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Sequence, Value};

pub const LATEST: &str = "latest";
pub const MAIN: &str = "main";

/// Three published versions plus the rolling `latest` pointer.
pub const DEFAULT_MAX_VERSIONS: usize = 4;

#[derive(Debug)]
pub enum RotateError {
    MalformedConfig(String),
    InvalidVersion(String),
}

impl fmt::Display for RotateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotateError::MalformedConfig(path) => {
                write!(f, "Config is missing a list at {}", path)
            }
            RotateError::InvalidVersion(name) => {
                write!(f, "\"{}\" is not a valid version name", name)
            }
        }
    }
}

impl std::error::Error for RotateError {}

/// One external docs source: a repo whose `dir` subtree is published as
/// version `name`. Entries are compared by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub repo: String,
    pub name: String,
    pub branch: String,
    pub dir: String,
}

impl VersionEntry {
    fn to_value(&self) -> Value {
        let mut entry = Mapping::new();
        entry.insert("repo".into(), self.repo.clone().into());
        entry.insert("name".into(), self.name.clone().into());
        entry.insert("branch".into(), self.branch.clone().into());
        entry.insert("dir".into(), self.dir.clone().into());
        Value::Mapping(entry)
    }
}

/// Where freshly built entries point: the docs repository URL and the
/// directory inside it that holds the documentation.
#[derive(Debug, Clone)]
pub struct RepoConvention {
    pub repo: String,
    pub dir: String,
}

impl Default for RepoConvention {
    fn default() -> Self {
        Self {
            repo: "https://github.com/inspektor-gadget/inspektor-gadget.git".to_string(),
            dir: "docs".to_string(),
        }
    }
}

impl RepoConvention {
    fn entry(&self, name: &str, branch: &str) -> VersionEntry {
        VersionEntry {
            repo: self.repo.clone(),
            name: name.to_string(),
            branch: branch.to_string(),
            dir: self.dir.clone(),
        }
    }

    pub fn latest(&self, version: &str) -> VersionEntry {
        self.entry(LATEST, version)
    }

    pub fn concrete(&self, version: &str) -> VersionEntry {
        self.entry(version, version)
    }

    pub fn main(&self) -> VersionEntry {
        self.entry(MAIN, MAIN)
    }
}

fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name")?.as_str()
}

fn external_docs_mut(doc: &mut Mapping) -> Result<&mut Sequence, RotateError> {
    let malformed = || RotateError::MalformedConfig("params.docs.external_docs".to_string());

    doc.get_mut("params")
        .and_then(|params| params.get_mut("docs"))
        .and_then(|docs| docs.get_mut("external_docs"))
        .and_then(Value::as_sequence_mut)
        .ok_or_else(malformed)
}

/// Rotate `params.docs.external_docs` for a newly published version.
///
/// The resulting list always starts with a fresh `latest` entry tracking the
/// new version's branch and always ends with a fresh `main` entry. Previous
/// concrete versions are carried over in order, minus any stale `latest`,
/// `main` or duplicate of the new version, and truncated once the list would
/// exceed `max_versions`. The sentinels are never carried over, so the
/// output holds at least `[latest, version, main]` even when `max_versions`
/// is below 3. Nothing else in the document is touched.
pub fn rotate(
    doc: &mut Mapping,
    new_version: &str,
    max_versions: usize,
    convention: &RepoConvention,
) -> Result<(), RotateError> {
    if new_version.is_empty() || new_version == LATEST || new_version == MAIN {
        return Err(RotateError::InvalidVersion(new_version.to_string()));
    }

    let list = external_docs_mut(doc)?;
    let previous = std::mem::take(list);

    let mut rotated: Sequence = vec![
        convention.latest(new_version).to_value(),
        convention.concrete(new_version).to_value(),
    ];

    // One slot stays reserved for the trailing main entry.
    for entry in previous {
        if rotated.len() >= max_versions.saturating_sub(1) {
            break;
        }
        match entry_name(&entry) {
            Some(name) if name == LATEST || name == MAIN || name == new_version => continue,
            _ => rotated.push(entry),
        }
    }

    rotated.push(convention.main().to_value());
    *list = rotated;

    Ok(())
}
