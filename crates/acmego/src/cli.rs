use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use clap_complete::Shell;

use crate::app::registry::Registry;

#[derive(Debug, Parser)]
#[command(
    name = "A",
    version,
    about = "Runs Go source tools on the selection of the acme window it was started from"
)]
pub struct Args {
    /// Log more; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
    /// The command to run.
    #[arg(value_name = "CMD", required_unless_present = "completions")]
    pub command: Option<String>,
    /// Arguments for the command.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Args {
    /// The clap command with the registry's command list in the help text.
    pub fn command_with(registry: &Registry) -> clap::Command {
        Self::command().after_help(registry.usage())
    }

    /// Parse the process arguments, exiting with a usage message on error.
    pub fn parse_with(registry: &Registry) -> Self {
        let matches = Self::command_with(registry).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        let matches = Args::command_with(&Registry::builtin()).try_get_matches_from(argv)?;
        Args::from_arg_matches(&matches)
    }

    #[test]
    fn command_keeps_its_arguments_verbatim() {
        let args = parse(&["A", "-vv", "impl", "f *File", "io.Reader"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.command.as_deref(), Some("impl"));
        assert_eq!(args.args, vec!["f *File", "io.Reader"]);
    }

    #[test]
    fn flags_after_the_command_belong_to_it() {
        let args = parse(&["A", "addtags", "json", "-v"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert_eq!(args.args, vec!["json", "-v"]);
    }

    #[test]
    fn command_is_required() {
        assert!(parse(&["A"]).is_err());
        assert!(parse(&["A", "--completions", "bash"]).is_ok());
    }

    #[test]
    fn definition_is_consistent() {
        Args::command_with(&Registry::builtin()).debug_assert();
    }
}
