//! Carrying out a command's [`Outcome`] against the window.

use std::io::Write;

use anyhow::{Context, Result};

use crate::domain::model::Outcome;
use crate::infra::acme::{Window, reload_show_addr, show_addr, write_body};
use crate::infra::plumb::{PlumbMessage, Plumber};

/// Perform `outcome`. Command output goes to `out`, tool diagnostics to `err`.
pub fn apply(
    outcome: Outcome,
    win: &mut dyn Window,
    plumber: &dyn Plumber,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    match outcome {
        Outcome::Print(text) => print(out, &text),
        Outcome::Edit {
            edits,
            show,
            warnings,
        } => {
            for edit in edits {
                tracing::trace!(addr = %edit.addr, bytes = edit.text.len(), "applying edit");
                win.write_addr(&edit.addr.to_string())?;
                win.write_data(edit.text.as_bytes())?;
            }
            show_addr(win, show)?;
            if !warnings.is_empty() {
                writeln!(err, "{}", warnings.join("\n"))?;
            }
            Ok(())
        }
        Outcome::ReplaceBody { body, show } => {
            write_body(win, &body)?;
            show_addr(win, show)
        }
        Outcome::Reload { show } => reload_show_addr(win, show),
        Outcome::Plumb { text } => {
            if let Err(error) = plumber.send(&PlumbMessage::edit(&text)) {
                // Leave the position somewhere the user can still click it.
                print(out, &text)?;
                return Err(error).context("failed to plumb");
            }
            Ok(())
        }
    }
}

fn print(out: &mut dyn Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
