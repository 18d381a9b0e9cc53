use anyhow::Result;
use clap::Command;

mod cmd;

fn main() -> Result<()> {
    let matches = Command::new("docport")
        .about("Maintain a versioned Docusaurus site fed by external docs repos")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::rotate::make_subcommand())
        .subcommand(cmd::fetch::make_subcommand())
        .get_matches();

    match matches.subcommand() {
        Some(("rotate-config", args)) => cmd::rotate::execute(args),
        Some(("fetch-and-convert", args)) => cmd::fetch::execute(args),
        _ => unreachable!("subcommand required"),
    }
}
