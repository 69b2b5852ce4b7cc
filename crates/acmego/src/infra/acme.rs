//! Access to an acme window through acme's file interface.
//!
//! Each window is a directory `<root>/<id>` holding `ctl`, `addr`, `tag`,
//! `body` and `data` files. The address set through `addr` is what `data`
//! writes replace, and acme resets it whenever `addr` is opened afresh, so a
//! window keeps `addr` open for its whole lifetime.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::domain::selection::Selection;

/// The window operations the commands need.
pub trait Window {
    fn read_tag(&mut self) -> Result<String>;
    fn read_body(&mut self) -> Result<Vec<u8>>;
    /// Current value of the window's address as a character range.
    fn read_addr(&mut self) -> Result<(usize, usize)>;
    fn write_addr(&mut self, addr: &str) -> Result<()>;
    fn write_data(&mut self, data: &[u8]) -> Result<()>;
    fn ctl(&mut self, msg: &str) -> Result<()>;
}

/// A window of a running acme, reached through a mounted file server.
#[derive(Debug)]
pub struct AcmeWindow {
    dir: PathBuf,
    ctl: File,
    addr: File,
}

impl AcmeWindow {
    /// Open window `id` below the acme mount point `root`.
    pub fn open(root: &Path, id: u32) -> Result<Self> {
        let dir = root.join(id.to_string());
        let ctl = open_rw(&dir.join("ctl"))?;
        let addr = open_rw(&dir.join("addr"))?;
        tracing::debug!(window = %dir.display(), "opened acme window");
        Ok(Self { dir, ctl, addr })
    }

    /// Open the window acme started us in, named by `$winid`.
    pub fn from_env(root: &Path) -> Result<Self> {
        let raw = env::var("winid").context("winid is not set; run A from within acme")?;
        let id = raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid winid '{raw}'"))?;
        Self::open(root, id)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        let mut buf = Vec::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_end(&mut buf))
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(buf)
    }
}

impl Window for AcmeWindow {
    fn read_tag(&mut self) -> Result<String> {
        let tag = self.read_file("tag")?;
        Ok(String::from_utf8_lossy(&tag).into_owned())
    }

    fn read_body(&mut self) -> Result<Vec<u8>> {
        self.read_file("body")
    }

    fn read_addr(&mut self) -> Result<(usize, usize)> {
        let mut buf = String::new();
        self.addr
            .rewind()
            .and_then(|_| self.addr.read_to_string(&mut buf))
            .context("failed to read addr")?;
        parse_addr(&buf)
    }

    fn write_addr(&mut self, addr: &str) -> Result<()> {
        tracing::trace!(addr, "addr");
        self.addr
            .write_all(addr.as_bytes())
            .with_context(|| format!("failed to set address {addr}"))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        let path = self.dir.join("data");
        OpenOptions::new()
            .write(true)
            .open(&path)
            .and_then(|mut file| file.write_all(data))
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn ctl(&mut self, msg: &str) -> Result<()> {
        tracing::trace!(msg, "ctl");
        self.ctl
            .write_all(msg.as_bytes())
            .with_context(|| format!("ctl message '{msg}' failed"))
    }
}

fn open_rw(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Parse the `q0 q1` pair acme prints when `addr` is read.
fn parse_addr(text: &str) -> Result<(usize, usize)> {
    let mut fields = text.split_whitespace().map(str::parse::<usize>);
    match (fields.next(), fields.next()) {
        (Some(Ok(q0)), Some(Ok(q1))) => Ok((q0, q1)),
        _ => Err(anyhow!("malformed address '{}'", text.trim())),
    }
}

/// The file name is the tag text up to the first space.
fn filename_from_tag(tag: &str) -> Result<String> {
    tag.split_once(' ')
        .map(|(name, _)| name.to_owned())
        .ok_or_else(|| anyhow!("cannot get filename from tag"))
}

/// Snapshot the window's file name, body and dot.
pub fn read_selection(win: &mut dyn Window) -> Result<Selection> {
    let fname = filename_from_tag(&win.read_tag()?)?;
    let body = win.read_body()?;
    // The first read makes sure addr is open before dot is copied into it.
    win.read_addr()?;
    win.ctl("addr=dot")?;
    let (q0, q1) = win.read_addr()?;
    tracing::debug!(file = %fname, q0, q1, "read selection");
    Selection::resolve(Some(fname), body, q0, q1).context("cannot resolve selection")
}

/// Move dot to character `q` and scroll it into view.
pub fn show_addr(win: &mut dyn Window, q: usize) -> Result<()> {
    win.write_addr(&format!("#{q}"))?;
    win.ctl("dot=addr\nshow")
}

/// Reload the body from disk, then show character `q`.
pub fn reload_show_addr(win: &mut dyn Window, q: usize) -> Result<()> {
    win.ctl("get")?;
    show_addr(win, q)
}

/// Replace the whole body as a single change that does not mark the file dirty
/// for undo purposes.
pub fn write_body(win: &mut dyn Window, body: &[u8]) -> Result<()> {
    if let Err(err) = win.ctl("nomark") {
        tracing::warn!(error = %err, "failed to set nomark");
    }
    let result = win
        .write_addr("0,$")
        .and_then(|_| win.write_data(body));
    if let Err(err) = win.ctl("mark") {
        tracing::warn!(error = %err, "failed to set mark");
    }
    result
}
