use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::config::split_front_matter;

// Hugo callout: a `> [!TYPE]` line followed by its quoted continuation lines.
static ADMONITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)> \[!(\w+)\]\n((?:> ?.*\n)+)").expect("admonition pattern"));

static QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^> ?").expect("quote marker pattern"));

static ROOT_WEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"weight: \d+").expect("weight pattern"));

#[derive(Debug)]
pub enum ConvertError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    MissingFrontMatterField(&'static str),
    MalformedPage(PathBuf),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io(e) => write!(f, "IO error: {}", e),
            ConvertError::Yaml(e) => write!(f, "YAML error: {}", e),
            ConvertError::MissingFrontMatterField(field) => {
                write!(f, "Front matter is missing \"{}\"", field)
            }
            ConvertError::MalformedPage(p) => write!(f, "Malformed page: {}", p.display()),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<std::io::Error> for ConvertError {
    fn from(value: std::io::Error) -> Self {
        ConvertError::Io(value)
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(value: serde_yaml::Error) -> Self {
        ConvertError::Yaml(value)
    }
}

/// Rewrite one page from Hugo conventions to Docusaurus conventions:
/// - `weight:` front-matter key becomes `sidebar_position:`
/// - links to `_index.md` point at the directory instead
/// - empty link targets left behind by the rewrite are dropped
/// - `> [!TYPE]` callouts become `:::type` fenced admonitions
///
/// A page using none of these comes back unchanged.
pub fn convert_page(text: &str) -> String {
    let text = text.replace("weight: ", "sidebar_position: ");
    let text = text.replace("_index.md", "");
    let text = text.replace("]()", "");
    convert_admonitions(&text)
}

fn convert_admonitions(text: &str) -> String {
    ADMONITION
        .replace_all(text, |caps: &Captures| {
            let kind = caps[1].to_lowercase();
            let body = QUOTE_MARKER.replace_all(&caps[2], "");
            format!(":::{}\n\n{}\n:::\n", kind, body)
        })
        .into_owned()
}

/// The site's root index is always pinned first in the sidebar.
pub fn convert_root_index(text: &str) -> String {
    ROOT_WEIGHT
        .replace_all(text, "sidebar_position: 1")
        .into_owned()
}

#[derive(Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// `_index.md` had body content; renamed to `index.md`.
    Content(PathBuf),
    /// `_index.md` was front matter only; replaced by `_category_.yaml`.
    Category(PathBuf),
}

/// Docusaurus `_category_.yaml` for an auto-generated category index.
#[derive(Debug, Serialize)]
pub struct CategoryMarker {
    pub label: String,
    pub position: u64,
    #[serde(rename = "customProps")]
    pub custom_props: CustomProps,
    pub link: CategoryLink,
}

#[derive(Debug, Serialize)]
pub struct CustomProps {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub slug: String,
}

/// Decide what a Hugo `_index.md` becomes on the Docusaurus side.
///
/// Hugo gives every directory an `_index.md`. When the page carries body
/// content it stays a page and is renamed to `index.md`. When it is front
/// matter only it stands for an auto-generated category, so a
/// `_category_.yaml` is written beside it and the original file is deleted.
pub fn classify_index(index_path: &Path, docs_root: &Path) -> Result<IndexKind, ConvertError> {
    let contents = std::fs::read_to_string(index_path)?;
    let (front, body) = split_front_matter(&contents)
        .ok_or_else(|| ConvertError::MalformedPage(index_path.to_path_buf()))?;

    if body.chars().any(|c| !c.is_whitespace()) {
        let new_path = index_path.with_file_name("index.md");
        std::fs::rename(index_path, &new_path)?;
        return Ok(IndexKind::Content(new_path));
    }

    let marker = category_marker(front, index_path, docs_root)?;
    let marker_path = index_path.with_file_name("_category_.yaml");
    std::fs::write(&marker_path, serde_yaml::to_string(&marker)?)?;
    std::fs::remove_file(index_path)?;

    Ok(IndexKind::Category(marker_path))
}

fn category_marker(
    front: &str,
    index_path: &Path,
    docs_root: &Path,
) -> Result<CategoryMarker, ConvertError> {
    let front: serde_yaml::Mapping = serde_yaml::from_str(front)?;

    let title = front
        .get("title")
        .and_then(serde_yaml::Value::as_str)
        .ok_or(ConvertError::MissingFrontMatterField("title"))?;
    let position = front
        .get("weight")
        .and_then(serde_yaml::Value::as_u64)
        .ok_or(ConvertError::MissingFrontMatterField("weight"))?;
    let description = front
        .get("description")
        .and_then(serde_yaml::Value::as_str)
        .ok_or(ConvertError::MissingFrontMatterField("description"))?;

    Ok(CategoryMarker {
        label: title.to_string(),
        position,
        custom_props: CustomProps {
            description: description.to_string(),
        },
        link: CategoryLink {
            kind: "generated-index".to_string(),
            title: title.to_string(),
            slug: category_slug(index_path, docs_root)
                .ok_or_else(|| ConvertError::MalformedPage(index_path.to_path_buf()))?,
        },
    })
}

/// Slug for a category page: its directory relative to the docs root, with
/// a trailing slash.
fn category_slug(index_path: &Path, docs_root: &Path) -> Option<String> {
    let relative = index_path.parent()?.strip_prefix(docs_root).ok()?;
    if relative.as_os_str().is_empty() {
        return Some("/".to_string());
    }
    Some(format!("{}/", relative.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_weight_key() {
        let page = "---\ntitle: Hi\nweight: 30\n---\n\nBody\n";
        let out = convert_page(page);
        assert!(out.contains("sidebar_position: 30"));
        assert!(!out.contains("weight:"));
    }

    #[test]
    fn rewrites_index_links() {
        let out = convert_page("See [the guide](../guide/_index.md) for more.\n");
        assert_eq!(out, "See [the guide](../guide/) for more.\n");
    }

    #[test]
    fn drops_empty_link_targets() {
        let out = convert_page("Broken [link]() here.\n");
        assert_eq!(out, "Broken [link here.\n");
    }

    #[test]
    fn converts_multi_line_callout() {
        let out = convert_page("> [!WARNING]\n> line one\n> line two\n");
        assert!(out.contains(":::warning\n\nline one\nline two\n\n:::\n"));
    }

    #[test]
    fn callout_keeps_surrounding_text() {
        let page = "Before.\n\n> [!NOTE]\n> remember this\n\nAfter.\n";
        let out = convert_page(page);
        assert!(out.starts_with("Before.\n\n:::note\n\nremember this\n"));
        assert!(out.ends_with("After.\n"));
    }

    #[test]
    fn plain_blockquotes_are_untouched() {
        let page = "> just a quote\n> second line\n";
        assert_eq!(convert_page(page), page);
    }

    #[test]
    fn no_op_page_is_unchanged() {
        let page = "---\ntitle: Hi\n---\n\nNothing special here.\n";
        assert_eq!(convert_page(page), page);
    }

    #[test]
    fn conversion_is_idempotent() {
        let page = "---\nweight: 3\n---\n\n[Guide](x/_index.md) and [gone]()\n\n> [!TIP]\n> hint\n";
        let once = convert_page(page);
        assert_eq!(convert_page(&once), once);
    }

    #[test]
    fn root_index_is_pinned_first() {
        let out = convert_root_index("---\ntitle: Docs\nweight: 40\n---\n");
        assert!(out.contains("sidebar_position: 1"));
    }

    #[test]
    fn index_with_content_is_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_index.md");
        std::fs::write(&path, "---\ntitle: Guide\nweight: 1\n---\n\nReal content.\n").unwrap();

        let kind = classify_index(&path, dir.path()).unwrap();

        let renamed = dir.path().join("index.md");
        assert_eq!(kind, IndexKind::Content(renamed.clone()));
        assert!(!path.exists());
        let contents = std::fs::read_to_string(renamed).unwrap();
        assert!(contents.contains("Real content."));
    }

    #[test]
    fn empty_index_becomes_category_marker() {
        let dir = tempfile::tempdir().unwrap();
        let category = dir.path().join("getting-started");
        std::fs::create_dir(&category).unwrap();
        let path = category.join("_index.md");
        std::fs::write(
            &path,
            "---\ntitle: Getting Started\nweight: 2\ndescription: First steps\n---\n\n   \n",
        )
        .unwrap();

        let kind = classify_index(&path, dir.path()).unwrap();

        let marker_path = category.join("_category_.yaml");
        assert_eq!(kind, IndexKind::Category(marker_path.clone()));
        assert!(!path.exists());

        let marker = std::fs::read_to_string(marker_path).unwrap();
        assert!(marker.contains("label: Getting Started"));
        assert!(marker.contains("position: 2"));
        assert!(marker.contains("description: First steps"));
        assert!(marker.contains("type: generated-index"));
        assert!(marker.contains("slug: getting-started/"));
    }

    #[test]
    fn category_marker_requires_front_matter_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_index.md");
        std::fs::write(&path, "---\ntitle: No weight here\n---\n").unwrap();

        let err = classify_index(&path, dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingFrontMatterField("weight")));
    }
}
