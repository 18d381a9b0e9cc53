use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use docport_core::config::{load_document, save_document};
use docport_core::rotate::{rotate, RepoConvention, DEFAULT_MAX_VERSIONS};

pub fn make_subcommand() -> Command {
    let default_convention = RepoConvention::default();
    Command::new("rotate-config")
        .about("Add a newly published version to the site config")
        .arg(
            Arg::new("config")
                .value_name("CONFIG")
                .help("Site configuration file (rewritten in place)")
                .required(true),
        )
        .arg(
            Arg::new("version")
                .value_name("VERSION")
                .help("Version label being published")
                .required(true),
        )
        .arg(
            Arg::new("max-versions")
                .long("max-versions")
                .value_name("N")
                .help("How many entries to keep, rolling pointers included")
                .default_value(DEFAULT_MAX_VERSIONS.to_string()),
        )
        .arg(
            Arg::new("repo")
                .long("repo")
                .value_name("URL")
                .help("Docs repository for generated entries")
                .default_value(default_convention.repo),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .value_name("DIR")
                .help("Docs directory inside the repository")
                .default_value(default_convention.dir),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config_path = args
        .get_one::<String>("config")
        .context("config path is required")?;
    let version = args
        .get_one::<String>("version")
        .context("version is required")?;
    let max_versions: usize = args
        .get_one::<String>("max-versions")
        .context("max-versions has a default")?
        .parse()
        .context("--max-versions must be a positive integer")?;
    let convention = RepoConvention {
        repo: args
            .get_one::<String>("repo")
            .context("repo has a default")?
            .clone(),
        dir: args
            .get_one::<String>("dir")
            .context("dir has a default")?
            .clone(),
    };

    let mut doc = load_document(config_path)
        .with_context(|| format!("Failed to read {}", config_path))?;
    rotate(&mut doc, version, max_versions, &convention)?;
    save_document(config_path, &doc)
        .with_context(|| format!("Failed to write {}", config_path))?;

    println!("Added {} to {}", version, config_path);

    Ok(())
}
