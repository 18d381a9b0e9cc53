use std::{fmt, path::Path};

use serde_yaml::{Mapping, Sequence, Value};

use crate::rotate::VersionEntry;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(serde_yaml::Error),
    NotAMapping,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::NotAMapping => write!(f, "Document is not a mapping"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

/// Load a YAML document as a key-ordered mapping. serde_yaml's `Mapping`
/// keeps insertion order, so a load/save round trip leaves untouched keys
/// exactly where they were.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Mapping, ConfigError> {
    let data = std::fs::read_to_string(path)?;
    parse_document(&data)
}

pub fn parse_document(data: &str) -> Result<Mapping, ConfigError> {
    let value: Value = serde_yaml::from_str(data)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ConfigError::NotAMapping),
    }
}

pub fn save_document<P: AsRef<Path>>(path: P, doc: &Mapping) -> Result<(), ConfigError> {
    let data = serde_yaml::to_string(doc)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Split a page into its front-matter block and body. The block starts with
/// a `---` line at the very top and runs to the next `---` line.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let front = &rest[..end];
    let mut body = &rest[end + 4..];
    if let Some(stripped) = body.strip_prefix('\n') {
        body = stripped;
    }
    Some((front, body))
}

/// Load the front-matter mapping of a markdown file. Files without a
/// front-matter block are parsed as a plain YAML document, so the same
/// entry point accepts `config.yaml` and Hugo content files alike.
pub fn load_front_matter_document<P: AsRef<Path>>(path: P) -> Result<Mapping, ConfigError> {
    let data = std::fs::read_to_string(path)?;
    match split_front_matter(&data) {
        Some((front, _)) => parse_document(front),
        None => parse_document(&data),
    }
}

fn docs_section(doc: &Mapping) -> Option<&Mapping> {
    doc.get("params")?.get("docs")?.as_mapping()
}

pub fn external_docs(doc: &Mapping) -> Option<&Sequence> {
    docs_section(doc)?.get("external_docs")?.as_sequence()
}

/// Deserialize `params.docs.external_docs` into version entries. A document
/// without the section yields an empty list.
pub fn external_doc_entries(doc: &Mapping) -> Result<Vec<VersionEntry>, ConfigError> {
    let Some(seq) = external_docs(doc) else {
        return Ok(Vec::new());
    };

    seq.iter()
        .map(|entry| serde_yaml::from_value(entry.clone()).map_err(ConfigError::Parsing))
        .collect()
}

pub fn hide_folders(doc: &Mapping) -> Vec<String> {
    let Some(section) = docs_section(doc) else {
        return Vec::new();
    };

    match section.get("hide_folders").and_then(Value::as_sequence) {
        Some(folders) => folders
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => Vec::new(),
    }
}
