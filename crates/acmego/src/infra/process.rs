//! Running the external Go tools.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};

use crate::domain::model::Invocation;

/// Executes tool invocations and returns their standard output.
pub trait ToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Spawns real processes. Tool stderr is passed through to ours.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        let program = invocation.program.as_str();
        tracing::debug!(program, args = ?invocation.args, "running tool");

        let mut child = Command::new(program)
            .args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        // Feed stdin from a separate thread so a tool that writes a lot of
        // output before draining its input cannot deadlock us.
        let feeder = match (child.stdin.take(), invocation.stdin.clone()) {
            (Some(mut stdin), Some(data)) => Some(thread::spawn(move || {
                match stdin.write_all(&data) {
                    Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
            })),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .with_context(|| format!("{program} did not exit cleanly"))?;

        if let Some(feeder) = feeder {
            feeder
                .join()
                .map_err(|_| anyhow!("stdin writer for {program} panicked"))?
                .with_context(|| format!("failed to write input to {program}"))?;
        }

        if !output.status.success() {
            return Err(anyhow!("{program} failed: {}", output.status));
        }

        String::from_utf8(output.stdout).with_context(|| format!("{program} printed invalid UTF-8"))
    }
}
