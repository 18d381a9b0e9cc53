use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use docport_core::config::{external_doc_entries, hide_folders, load_document, load_front_matter_document};
use docport_core::fetch::{fetch_repo, EXTERNAL_REPOS_DIR};
use docport_core::tree::{sync_version, write_versions_manifest};

pub fn make_subcommand() -> Command {
    Command::new("fetch-and-convert")
        .about("Fetch external docs repos and convert them for the site")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("File whose front matter lists the external docs")
                .required(true),
        )
        .arg(
            Arg::new("site-dir")
                .long("site-dir")
                .value_name("DIR")
                .help("Site root directory")
                .default_value("."),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Site configuration file (provides hide_folders)")
                .default_value("./config.yaml"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let source = args
        .get_one::<String>("source")
        .context("source path is required")?;
    let site_dir = PathBuf::from(
        args.get_one::<String>("site-dir")
            .context("site-dir has a default")?,
    );
    let config_path = args
        .get_one::<String>("config")
        .context("config has a default")?;

    let source_doc = load_front_matter_document(source)
        .with_context(|| format!("Failed to read {}", source))?;
    let entries = external_doc_entries(&source_doc)?;

    if entries.is_empty() {
        println!("Warning: No external docs in {}", source);
        return Ok(());
    }

    // Site config is loaded once here and threaded through explicitly.
    let site_config = load_document(config_path)
        .with_context(|| format!("Failed to read {}", config_path))?;
    let hidden = hide_folders(&site_config);

    for entry in &entries {
        let repo_name = fetch_repo(&site_dir, &entry.repo, &entry.name, &entry.branch)?;
        let repo_root = site_dir.join(EXTERNAL_REPOS_DIR).join(&repo_name);
        sync_version(&site_dir, &repo_root, entry, &hidden)?;
    }

    write_versions_manifest(&site_dir, &entries)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warns_and_exits_cleanly_without_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("docs.md");
        std::fs::write(&source, "---\ntitle: Docs\n---\n\nNo external docs here.\n").unwrap();

        let args = make_subcommand()
            .try_get_matches_from(vec!["fetch-and-convert", source.to_str().unwrap()])
            .unwrap();

        assert!(execute(&args).is_ok());
    }
}
