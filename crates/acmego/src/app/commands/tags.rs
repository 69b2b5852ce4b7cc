//! `A addtags` and `A rmtags` via `github.com/fatih/gomodifytags`.

use anyhow::{Context as _, Result};
use serde::Deserialize;

use super::{Context, Handler, usage};
use crate::domain::model::{Address, Edit, Outcome};
use crate::domain::selection::Selection;

const ADD_USAGE: &str = "Usage: A addtags <tags> [options]
<tags>:\tcomma-separated tags to add, e.g. json,xml
[options]:\toptions to add, e.g. 'json=omitempty'";

const REMOVE_USAGE: &str = "Usage: A rmtags <tags> [options]
<tags>:\tcomma-separated tags to remove, e.g. json,xml
[options]:\toptions to remove, e.g. 'json=omitempty'";

#[derive(Debug, Deserialize)]
struct ModifiedLines {
    start: usize,
    end: usize,
    #[serde(default)]
    lines: Vec<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// Adds or removes struct tags on the selected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyTags {
    Add,
    Remove,
}

impl ModifyTags {
    fn flags(self) -> (&'static str, &'static str) {
        match self {
            ModifyTags::Add => ("-add-tags", "-add-options"),
            ModifyTags::Remove => ("-remove-tags", "-remove-options"),
        }
    }

    fn usage(self) -> &'static str {
        match self {
            ModifyTags::Add => ADD_USAGE,
            ModifyTags::Remove => REMOVE_USAGE,
        }
    }
}

impl Handler for ModifyTags {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome> {
        let Some(tags) = args.first() else {
            return Err(usage(self.usage()));
        };
        let (tags_flag, options_flag) = self.flags();

        let mut inv = ctx
            .tool("gomodifytags")
            .args(["-file", selection.filename(), "-modified", "-format", "json"])
            .arg("-line")
            .arg(selection.line_sel())
            .arg(tags_flag)
            .arg(tags.as_str());
        if let Some(options) = args.get(1) {
            inv = inv.arg(options_flag).arg(options.as_str());
        }
        let inv = inv.stdin(selection.archive());

        let reply: ModifiedLines = serde_json::from_str(&ctx.run(&inv)?)
            .context("failed to unmarshal gomodifytags output")?;

        let mut text = reply.lines.join("\n");
        text.push('\n');
        Ok(Outcome::Edit {
            edits: vec![Edit {
                addr: Address::Lines(reply.start, reply.end),
                text,
            }],
            show: selection.q0,
            warnings: reply.errors.unwrap_or_default(),
        })
    }
}
