//! `A share`: uploads the selection to the Go playground and prints its URL.

use anyhow::Result;

use super::{Context, Handler};
use crate::domain::model::Outcome;
use crate::domain::selection::Selection;

#[derive(Debug, Clone, Copy, Default)]
pub struct Share;

impl Handler for Share {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, _args: &[String]) -> Result<Outcome> {
        let url = ctx.uploader.upload(selection.text())?;
        Ok(Outcome::Print(url))
    }
}
