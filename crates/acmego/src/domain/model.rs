//! Domain models for tool invocations and what a command does to the editor.

use std::fmt;

/// An external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, data: Vec<u8>) -> Self {
        self.stdin = Some(data);
        self
    }
}

/// A range in acme's address syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// Whole lines, 1-based and inclusive.
    Lines(usize, usize),
    /// Character offsets.
    Chars(usize, usize),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Lines(a, b) => write!(f, "{a},{b}"),
            Address::Chars(a, b) => write!(f, "#{a},#{b}"),
        }
    }
}

/// Replacement text for one address of the window body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub addr: Address,
    pub text: String,
}

/// The effect of a command, applied to the editor once the tool has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text for standard output (acme shows it in the +Errors window).
    Print(String),
    /// Targeted replacements followed by moving dot to `show`.
    Edit {
        edits: Vec<Edit>,
        show: usize,
        warnings: Vec<String>,
    },
    /// Replace the entire body without undo marks, then show `show`.
    ReplaceBody { body: Vec<u8>, show: usize },
    /// The tool rewrote the file on disk; reload the window, then show `show`.
    Reload { show: usize },
    /// Send `text` to the plumber's edit port.
    Plumb { text: String },
}
