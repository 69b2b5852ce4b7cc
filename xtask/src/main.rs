use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands for acmego", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite with cargo nextest
    Test {
        #[arg(long)]
        profile: Option<String>,
        /// Only run tests whose name contains this filter
        filter: Option<String>,
    },
    /// Formatting, clippy and tests, as run before merging
    Ci,
    /// Install the binary as `A` into cargo's bin directory
    Install,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Test { profile, filter } => test(profile, filter),
        Commands::Ci => {
            cargo(&["fmt", "--all", "--check"])?;
            cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
            test(None, None)
        }
        Commands::Install => cargo(&["install", "--path", "crates/acmego", "--locked"]),
    }
}

fn test(profile: Option<String>, filter: Option<String>) -> Result<()> {
    let mut args = vec!["nextest".to_owned(), "run".to_owned(), "--workspace".to_owned()];
    if let Some(profile) = profile {
        args.push("--profile".into());
        args.push(profile);
    }
    args.extend(filter);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
