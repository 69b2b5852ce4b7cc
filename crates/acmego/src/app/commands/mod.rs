//! Command handlers, one per `A <cmd>`.
//!
//! A handler turns the selection and its arguments into tool invocations and
//! describes the result as an [`Outcome`]; it never touches the window
//! itself. [`crate::app::outcome::apply`] performs the effects.

pub mod doc;
pub mod fill;
pub mod guru;
pub mod refactor;
pub mod share;
pub mod tags;

use anyhow::Result;

use crate::domain::errors::CommandError;
use crate::domain::model::{Invocation, Outcome};
use crate::domain::selection::Selection;
use crate::infra::config::Config;
use crate::infra::playground::SnippetUploader;
use crate::infra::process::ToolRunner;

/// Services available to handlers.
pub struct Context<'a> {
    pub config: &'a Config,
    pub tools: &'a dyn ToolRunner,
    pub uploader: &'a dyn SnippetUploader,
}

impl Context<'_> {
    /// Start an invocation of `tool`, resolved through the `[tools]` config.
    pub fn tool(&self, tool: &str) -> Invocation {
        Invocation::new(self.config.program(tool))
    }

    pub fn run(&self, invocation: &Invocation) -> Result<String> {
        self.tools.run(invocation)
    }

    /// The analysis scope: the first argument if given, else the configured default.
    pub fn scope(&self, args: &[String]) -> String {
        args.first()
            .cloned()
            .unwrap_or_else(|| self.config.defaults.scope())
    }
}

/// The capability every command implements.
pub trait Handler {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome>;
}

pub(crate) fn usage(text: &str) -> anyhow::Error {
    CommandError::Usage(text.to_owned()).into()
}
