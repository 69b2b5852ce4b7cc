pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

#[cfg(test)]
mod testing;

use std::io;

use anyhow::{Context as _, Result};

use crate::app::commands::Context;
use crate::app::outcome;
use crate::app::registry::Registry;
use crate::cli::Args;
use crate::infra::acme::{AcmeWindow, read_selection};
use crate::infra::config::Config;
use crate::infra::logging;
use crate::infra::playground::Playground;
use crate::infra::plumb::PlumbPort;
use crate::infra::process::SystemRunner;

/// Execute one `A` invocation.
pub fn run(args: Args, registry: &Registry) -> Result<()> {
    let config = Config::load()?;
    logging::init(logging::level(&config.logging.level(), args.verbose));

    if let Some(shell) = args.completions {
        let mut command = Args::command_with(registry);
        clap_complete::generate(shell, &mut command, "A", &mut io::stdout());
        return Ok(());
    }

    let name = args.command.unwrap_or_default();
    let handler = registry.lookup(&name)?;

    let mut window = AcmeWindow::from_env(&config.acme.fs_root())?;
    let selection = read_selection(&mut window).context("cannot read selection")?;

    let uploader = Playground::new(config.share.url(), config.share.timeout());
    let ctx = Context {
        config: &config,
        tools: &SystemRunner,
        uploader: &uploader,
    };
    tracing::info!(command = %name, file = selection.filename(), "dispatching");
    let result = handler.run(&ctx, &selection, &args.args)?;

    let plumber = PlumbPort::new(config.acme.plumb_root());
    outcome::apply(
        result,
        &mut window,
        &plumber,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}
