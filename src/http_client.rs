use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 120;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. Built once; the timeout is read from
/// `ROSTER_HTTP_TIMEOUT_SECS` at that point.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let timeout = timeout_secs(std::env::var("ROSTER_HTTP_TIMEOUT_SECS").ok().as_deref());
        Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(concat!("roster_cards/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build roster http client")
    })
}

/// Unset or unparsable values fall back to the default; the rest is clamped
/// to 1..=120 seconds.
pub(crate) fn timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(1, MAX_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_when_unset_or_garbage() {
        assert_eq!(timeout_secs(None), DEFAULT_TIMEOUT_SECS);
        assert_eq!(timeout_secs(Some("")), DEFAULT_TIMEOUT_SECS);
        assert_eq!(timeout_secs(Some("ten")), DEFAULT_TIMEOUT_SECS);
        assert_eq!(timeout_secs(Some("-5")), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn timeout_is_clamped() {
        assert_eq!(timeout_secs(Some("0")), 1);
        assert_eq!(timeout_secs(Some(" 30 ")), 30);
        assert_eq!(timeout_secs(Some("120")), 120);
        assert_eq!(timeout_secs(Some("9000")), MAX_TIMEOUT_SECS);
    }
}
