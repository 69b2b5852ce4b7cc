//! Sending plumb messages so acme opens a file at a position.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// A message in the plumber's wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlumbMessage {
    pub src: String,
    pub dst: String,
    pub wdir: String,
    pub kind: String,
    pub attr: String,
    pub data: Vec<u8>,
}

impl PlumbMessage {
    /// A text message for the `edit` port, as sent by `A def`.
    pub fn edit(text: &str) -> Self {
        Self {
            src: "A".into(),
            dst: "edit".into(),
            wdir: "/".into(),
            kind: "text".into(),
            attr: String::new(),
            data: text.as_bytes().to_vec(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let header = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n",
            self.src,
            self.dst,
            self.wdir,
            self.kind,
            self.attr,
            self.data.len()
        );
        let mut out = header.into_bytes();
        out.extend_from_slice(&self.data);
        out
    }
}

pub trait Plumber {
    fn send(&self, message: &PlumbMessage) -> Result<()>;
}

/// The plumber's file server, written through its `send` file.
#[derive(Debug, Clone)]
pub struct PlumbPort {
    root: PathBuf,
}

impl PlumbPort {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Plumber for PlumbPort {
    fn send(&self, message: &PlumbMessage) -> Result<()> {
        let path = self.root.join("send");
        // The whole message has to arrive in one write.
        OpenOptions::new()
            .write(true)
            .open(&path)
            .and_then(|mut file| file.write_all(&message.encode()))
            .with_context(|| format!("failed to plumb to {}", path.display()))
    }
}
