//! `A fstruct` and `A fswitch` via `github.com/davidrjenni/reftools`.

use anyhow::{Context as _, Result};
use serde::Deserialize;

use super::{Context, Handler};
use crate::domain::errors::OffsetError;
use crate::domain::model::{Address, Edit, Outcome};
use crate::domain::offset::char_index;
use crate::domain::selection::Selection;

/// One replacement reported by fillstruct/fillswitch, in byte offsets.
#[derive(Debug, Deserialize)]
struct Replacement {
    start: usize,
    end: usize,
    code: String,
}

/// Fills the literal or switch statement under the cursor.
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    tool: &'static str,
}

impl Fill {
    pub const STRUCT: Fill = Fill { tool: "fillstruct" };
    pub const SWITCH: Fill = Fill { tool: "fillswitch" };
}

impl Handler for Fill {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, _args: &[String]) -> Result<Outcome> {
        let inv = ctx
            .tool(self.tool)
            .args(["-modified", "-file", selection.filename()])
            .arg("-offset")
            .arg(selection.start.to_string())
            .arg("-line")
            .arg(selection.start_line.to_string())
            .stdin(selection.archive());
        let reply = ctx.run(&inv)?;
        let mut replacements: Vec<Replacement> = serde_json::from_str(&reply)
            .with_context(|| format!("failed to unmarshal {} output", self.tool))?;

        // Apply from the back so earlier offsets stay valid.
        replacements.sort_by(|a, b| b.start.cmp(&a.start));
        let body = selection.body();
        let edits = replacements
            .into_iter()
            .map(|r| -> Result<Edit, OffsetError> {
                let addr = Address::Chars(char_index(body, r.start)?, char_index(body, r.end)?);
                Ok(Edit { addr, text: r.code })
            })
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("{} reported an invalid range", self.tool))?;

        Ok(Outcome::Edit {
            edits,
            show: selection.q0,
            warnings: Vec::new(),
        })
    }
}
