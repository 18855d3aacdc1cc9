pub mod template;
pub mod types;

use anyhow::{Context, Result};
use std::io::Read;

use types::Invocation;

/// Load the invocation document handed over by the host runtime.
///
/// JSON and YAML are both accepted (JSON parses as YAML). A path of `-`
/// reads from stdin.
pub fn load_invocation(path: &str) -> Result<Invocation> {
    let content = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read invocation from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read invocation: {path}"))?
    };

    parse_invocation(&content)
}

pub fn parse_invocation(content: &str) -> Result<Invocation> {
    if content.trim().is_empty() {
        return Ok(Invocation::default());
    }
    serde_yaml::from_str(content).context("Failed to parse invocation document")
}
