//! In-memory stand-ins for acme, the plumber and the external tools.

use std::cell::RefCell;

use anyhow::{Result, anyhow};

use crate::app::commands::Context;
use crate::domain::model::Invocation;
use crate::domain::selection::Selection;
use crate::infra::acme::Window;
use crate::infra::config::Config;
use crate::infra::playground::SnippetUploader;
use crate::infra::plumb::{PlumbMessage, Plumber};
use crate::infra::process::ToolRunner;

/// Records every file operation as `"<file> <payload>"`.
#[derive(Debug, Default)]
pub struct MemoryWindow {
    pub tag: String,
    pub body: Vec<u8>,
    pub dot: (usize, usize),
    pub log: Vec<String>,
    addr: (usize, usize),
}

impl MemoryWindow {
    pub fn new(tag: &str, body: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            body: body.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    pub fn with_dot(mut self, q0: usize, q1: usize) -> Self {
        self.dot = (q0, q1);
        self
    }
}

impl Window for MemoryWindow {
    fn read_tag(&mut self) -> Result<String> {
        Ok(self.tag.clone())
    }

    fn read_body(&mut self) -> Result<Vec<u8>> {
        Ok(self.body.clone())
    }

    fn read_addr(&mut self) -> Result<(usize, usize)> {
        Ok(self.addr)
    }

    fn write_addr(&mut self, addr: &str) -> Result<()> {
        self.log.push(format!("addr {addr}"));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        self.log
            .push(format!("data {}", String::from_utf8_lossy(data)));
        Ok(())
    }

    fn ctl(&mut self, msg: &str) -> Result<()> {
        if msg == "addr=dot" {
            self.addr = self.dot;
        }
        self.log.push(format!("ctl {msg}"));
        Ok(())
    }
}

/// Returns canned output and remembers what it was asked to run.
#[derive(Debug, Default)]
pub struct FakeRunner {
    output: String,
    fail: bool,
    pub calls: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn returning(output: &str) -> Self {
        Self {
            output: output.to_owned(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn only_call(&self) -> Invocation {
        let calls = self.calls.borrow();
        assert_eq!(calls.len(), 1, "expected exactly one tool call");
        calls[0].clone()
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        self.calls.borrow_mut().push(invocation.clone());
        if self.fail {
            return Err(anyhow!("{} failed: exit status: 1", invocation.program));
        }
        Ok(self.output.clone())
    }
}

#[derive(Debug, Default)]
pub struct FakeUploader {
    pub uploads: RefCell<Vec<Vec<u8>>>,
}

impl SnippetUploader for FakeUploader {
    fn upload(&self, snippet: &[u8]) -> Result<String> {
        self.uploads.borrow_mut().push(snippet.to_vec());
        Ok("https://play.golang.org/p/xyz".to_owned())
    }
}

#[derive(Debug, Default)]
pub struct FakePlumber {
    pub fail: bool,
    pub sent: RefCell<Vec<PlumbMessage>>,
}

impl Plumber for FakePlumber {
    fn send(&self, message: &PlumbMessage) -> Result<()> {
        if self.fail {
            return Err(anyhow!("plumber not running"));
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// A selection of `body` in `/src/main.go` covering characters `q0..q1`.
pub fn selection(body: &str, q0: usize, q1: usize) -> Selection {
    Selection::resolve(Some("/src/main.go".into()), body.as_bytes().to_vec(), q0, q1)
        .expect("valid selection")
}

/// The embedded default configuration.
pub fn test_config() -> Config {
    Config::builtin().expect("built-in config")
}

pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|arg| (*arg).to_owned()).collect()
}

/// Handler context over the given fakes and a default config.
pub fn context<'a>(
    config: &'a Config,
    tools: &'a FakeRunner,
    uploader: &'a FakeUploader,
) -> Context<'a> {
    Context {
        config,
        tools,
        uploader,
    }
}
