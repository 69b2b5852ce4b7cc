//! `A doc` via `github.com/zmb3/gogetdoc`.

use anyhow::Result;

use super::{Context, Handler};
use crate::domain::model::Outcome;
use crate::domain::selection::Selection;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoDoc;

impl Handler for GoDoc {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, _args: &[String]) -> Result<Outcome> {
        let inv = ctx
            .tool("gogetdoc")
            .args(["-modified", "-pos"])
            .arg(selection.pos())
            .stdin(selection.archive());
        Ok(Outcome::Print(ctx.run(&inv)?))
    }
}
