//! Uploading snippets to the Go playground.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};

/// Stores a snippet remotely and returns the URL it can be viewed at.
pub trait SnippetUploader {
    fn upload(&self, snippet: &[u8]) -> Result<String>;
}

/// Client for a playground compatible `/share` endpoint.
pub struct Playground {
    base_url: String,
    agent: ureq::Agent,
}

impl Playground {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            agent,
        }
    }

    /// Where a shared snippet with `id` is served.
    pub fn snippet_url(&self, id: &str) -> String {
        format!("{}/p/{}", self.base_url, id.trim())
    }
}

impl SnippetUploader for Playground {
    fn upload(&self, snippet: &[u8]) -> Result<String> {
        let endpoint = format!("{}/share", self.base_url);
        tracing::debug!(%endpoint, bytes = snippet.len(), "sharing snippet");
        let response = self
            .agent
            .post(&endpoint)
            .set("Content-Type", "text/plain; charset=utf-8")
            .send_bytes(snippet)
            .map_err(|err| anyhow!("cannot send snippet: {err}"))?;
        let id = response
            .into_string()
            .context("cannot read snippet id")?;
        if id.trim().is_empty() {
            return Err(anyhow!("cannot send snippet: empty response from {endpoint}"));
        }
        Ok(self.snippet_url(&id))
    }
}
