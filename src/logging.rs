use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "CONGA_FACTS_LOG";
const DEFAULT_LEVEL: &str = "info";

/// Install the tracing subscriber. Logs go to stderr, stdout carries the
/// JSON result for Ansible.
///
/// `--log-level` wins over `CONGA_FACTS_LOG`, which wins over the config
/// file, which wins over `info`.
pub fn init(level: Option<&str>, configured: Option<&str>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::try_new(directive(level, env.as_deref(), configured))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn directive<'a>(level: Option<&'a str>, env: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    [level, env, configured]
        .into_iter()
        .flatten()
        .find(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level() {
        assert!(init(Some("conga=notalevel"), None).is_err());
    }

    #[test]
    fn test_directive_precedence() {
        assert_eq!(directive(Some("trace"), Some("debug"), Some("warn")), "trace");
        assert_eq!(directive(None, Some("debug"), Some("warn")), "debug");
        assert_eq!(directive(None, None, Some("warn")), "warn");
        assert_eq!(directive(None, Some(""), Some("warn")), "warn");
        assert_eq!(directive(None, None, None), "info");
    }
}
