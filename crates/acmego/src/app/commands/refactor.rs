//! Commands that rewrite source: `ex`, `rn` and `impl`.

use anyhow::Result;

use super::{Context, Handler, usage};
use crate::domain::model::Outcome;
use crate::domain::offset::char_width_at;
use crate::domain::selection::Selection;

/// `A ex <name>`: moves the selected statements into a new function using
/// `github.com/godoctor/godoctor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extract;

impl Handler for Extract {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome> {
        let Some(name) = args.first() else {
            return Err(usage("Usage: A ex <name>"));
        };
        let pos = format!("{},{}", selection.start, selection.end.saturating_sub(selection.start));
        let inv = ctx
            .tool("godoctor")
            .args(["-scope", ".", "-complete", "-file", selection.filename()])
            .arg("-pos")
            .arg(pos)
            .arg("extract")
            .arg(name.as_str())
            .stdin(selection.body().to_vec());
        let output = ctx.run(&inv)?;
        // godoctor prints the file name on the first line.
        let code = match output.split_once('\n') {
            Some((_, code)) => code.to_owned(),
            None => output,
        };
        Ok(Outcome::ReplaceBody {
            body: code.into_bytes(),
            show: selection.q0,
        })
    }
}

/// `A rn <name>`: renames the identifier under the cursor with
/// `golang.org/x/tools/cmd/gorename`, which edits the files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rename;

impl Handler for Rename {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome> {
        let Some(name) = args.first() else {
            return Err(usage("Usage: A rn <name>"));
        };
        let inv = ctx
            .tool("gorename")
            .arg("-offset")
            .arg(selection.pos())
            .arg("-to")
            .arg(name.as_str());
        ctx.run(&inv)?;
        Ok(Outcome::Reload {
            show: selection.q0,
        })
    }
}

/// `A impl <recv> <iface>`: inserts method stubs generated by
/// `github.com/josharian/impl` at the cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Implement;

impl Handler for Implement {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome> {
        let Some((iface, recv)) = args.split_last().filter(|(_, recv)| !recv.is_empty()) else {
            return Err(usage("Usage: A impl <recv> <iface>"));
        };
        let inv = ctx.tool("impl").arg(recv.join(" ")).arg(iface.as_str());
        let code = ctx.run(&inv)?;

        let body = selection.body();
        let start = selection.start.min(body.len());
        // The character under the cursor is replaced by the stubs.
        let rest = if start + 1 < body.len() {
            let width = char_width_at(body, start).unwrap_or(1);
            &body[start + width..]
        } else {
            &[][..]
        };

        let mut new_body = Vec::with_capacity(body.len() + code.len() + 1);
        new_body.extend_from_slice(&body[..start]);
        new_body.push(b'\n');
        new_body.extend_from_slice(code.as_bytes());
        new_body.extend_from_slice(rest);
        Ok(Outcome::ReplaceBody {
            body: new_body,
            show: selection.q0,
        })
    }
}
