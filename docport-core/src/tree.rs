use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::convert::{classify_index, convert_page, convert_root_index, ConvertError};
use crate::rotate::{VersionEntry, LATEST};

/// Docusaurus sidebar manifest for versions whose sidebar is generated from
/// the directory layout.
pub const AUTOGENERATED_SIDEBAR: &str =
    r#"{"mainSidebar": [{"type": "autogenerated","dirName": "."}]}"#;

#[derive(Debug)]
pub enum SyncError {
    Io(std::io::Error),
    Walk(walkdir::Error),
    Convert(ConvertError),
    Json(serde_json::Error),
    InvalidPath(PathBuf),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Io(e) => write!(f, "IO error: {}", e),
            SyncError::Walk(e) => write!(f, "Walk error: {}", e),
            SyncError::Convert(e) => write!(f, "Conversion error: {}", e),
            SyncError::Json(e) => write!(f, "JSON error: {}", e),
            SyncError::InvalidPath(p) => write!(f, "Invalid path: {}", p.display()),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<std::io::Error> for SyncError {
    fn from(value: std::io::Error) -> Self {
        SyncError::Io(value)
    }
}

impl From<walkdir::Error> for SyncError {
    fn from(value: walkdir::Error) -> Self {
        SyncError::Walk(value)
    }
}

impl From<ConvertError> for SyncError {
    fn from(value: ConvertError) -> Self {
        SyncError::Convert(value)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(value: serde_json::Error) -> Self {
        SyncError::Json(value)
    }
}

/// Where a version's pages land in the site tree: `docs/` for the rolling
/// `latest`, a `versioned_docs` subdirectory for everything else.
pub fn version_dest(site_dir: &Path, name: &str) -> PathBuf {
    if name == LATEST {
        site_dir.join("docs")
    } else {
        site_dir.join("versioned_docs").join(format!("version-{}", name))
    }
}

/// Copy one version's docs subtree into the site and convert it in place:
/// fetch checkout -> copy -> Hugo-to-Docusaurus rewrite -> hide_folders
/// cleanup. Returns the destination directory.
pub fn sync_version(
    site_dir: &Path,
    repo_root: &Path,
    entry: &VersionEntry,
    hide_folders: &[String],
) -> Result<PathBuf, SyncError> {
    let src = repo_root.join(&entry.dir);
    let dst = version_dest(site_dir, &entry.name);

    println!("Copying {} to {}", src.display(), dst.display());
    copy_tree(&src, &dst)?;
    convert_tree(&dst, &entry.name, site_dir)?;
    remove_hidden_folders(&dst, hide_folders)?;

    Ok(dst)
}

pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), SyncError> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| SyncError::InvalidPath(entry.path().to_path_buf()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Rewrite a freshly copied version tree to Docusaurus conventions.
pub fn convert_tree(dst_dir: &Path, version_name: &str, site_dir: &Path) -> Result<(), SyncError> {
    if version_name != LATEST {
        write_sidebar_manifest(site_dir, version_name)?;
    }

    // Index pages first: classification renames or deletes files, so the
    // content pass below sees the final layout.
    for path in files_named(dst_dir, |name| name == "_index.md") {
        classify_index(&path, dst_dir)?;
    }

    let root_index = dst_dir.join("index.md");
    if root_index.exists() {
        let contents = std::fs::read_to_string(&root_index)?;
        std::fs::write(&root_index, convert_root_index(&contents))?;
    }

    for path in files_named(dst_dir, |name| {
        name.ends_with(".md") || name.ends_with(".mdx")
    }) {
        let contents = std::fs::read_to_string(&path)?;
        std::fs::write(&path, convert_page(&contents))?;
    }

    Ok(())
}

fn write_sidebar_manifest(site_dir: &Path, version_name: &str) -> Result<(), SyncError> {
    let sidebar_dir = site_dir.join("versioned_sidebars");
    std::fs::create_dir_all(&sidebar_dir)?;
    let path = sidebar_dir.join(format!("version-{}-sidebars.json", version_name));
    std::fs::write(path, AUTOGENERATED_SIDEBAR)?;
    Ok(())
}

/// Delete the configured hidden subfolders from a converted version tree.
pub fn remove_hidden_folders(dst_dir: &Path, hide_folders: &[String]) -> Result<(), SyncError> {
    for folder in hide_folders {
        let folder_path = dst_dir.join(folder);
        if folder_path.exists() {
            println!("hide_folders: removing {}", folder_path.display());
            std::fs::remove_dir_all(&folder_path)?;
        }
    }
    Ok(())
}

/// Write `versions.json`: every published version name except the rolling
/// `latest`, in document order.
pub fn write_versions_manifest(site_dir: &Path, entries: &[VersionEntry]) -> Result<(), SyncError> {
    let versions: Vec<&str> = entries
        .iter()
        .filter(|e| e.name != LATEST)
        .map(|e| e.name.as_str())
        .collect();
    let data = serde_json::to_string(&versions)?;
    std::fs::write(site_dir.join("versions.json"), data)?;
    Ok(())
}

fn files_named<P: AsRef<Path>>(path: P, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.file_name()
                    .to_str()
                    .map(|name| matches(name))
                    .unwrap_or(false)
        })
    {
        paths.push(entry.path().to_path_buf());
    }

    paths
}
