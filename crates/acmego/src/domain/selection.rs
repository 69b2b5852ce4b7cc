//! Snapshot of an acme window's body and dot.

use crate::domain::errors::OffsetError;
use crate::domain::offset::byte_offset;

/// Immutable view of the window a command runs against.
///
/// `q0`/`q1` are acme character addresses; `start`/`end` are the matching
/// byte offsets into `body` and `start_line`/`end_line` the 1-based lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    fname: Option<String>,
    body: Vec<u8>,
    pub q0: usize,
    pub q1: usize,
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl Selection {
    /// Resolve the character range `q0..q1` against `body`.
    pub fn resolve(
        fname: Option<String>,
        body: Vec<u8>,
        q0: usize,
        q1: usize,
    ) -> Result<Self, OffsetError> {
        let (start, start_line) = byte_offset(&body, q0)?;
        let (end, end_line) = byte_offset(&body, q1)?;
        Ok(Self {
            fname: fname.filter(|name| !name.is_empty()),
            body,
            q0,
            q1,
            start,
            end,
            start_line,
            end_line,
        })
    }

    /// The window's file name, or `-` for unnamed windows.
    pub fn filename(&self) -> &str {
        self.fname.as_deref().unwrap_or("-")
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The selected bytes.
    pub fn text(&self) -> &[u8] {
        self.body.get(self.start..self.end).unwrap_or_default()
    }

    /// The body in the `-modified` archive format understood by the Go tools.
    pub fn archive(&self) -> Vec<u8> {
        let name = self.filename();
        let mut out = Vec::with_capacity(name.len() + self.body.len() + 24);
        out.extend_from_slice(name.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(self.body.len().to_string().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(&self.body);
        out
    }

    /// `file:#start`
    pub fn pos(&self) -> String {
        format!("{}:#{}", self.filename(), self.start)
    }

    /// `file:#start,#end`
    pub fn sel(&self) -> String {
        format!("{},#{}", self.pos(), self.end)
    }

    /// `startline,endline`
    pub fn line_sel(&self) -> String {
        format!("{},{}", self.start_line, self.end_line)
    }
}
