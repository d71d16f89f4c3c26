use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::decoder::{self, INFO_FEED_ENCODED, ROSTER_FEED_ENCODED};
use crate::http_cache::{DiskCache, fetch_json};
use crate::http_client::http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Roster,
    Info,
}

impl Feed {
    pub fn label(self) -> &'static str {
        match self {
            Feed::Roster => "roster",
            Feed::Info => "info",
        }
    }

    fn encoded_url(self) -> &'static str {
        match self {
            Feed::Roster => ROSTER_FEED_ENCODED,
            Feed::Info => INFO_FEED_ENCODED,
        }
    }

    fn url_env_key(self) -> &'static str {
        match self {
            Feed::Roster => "ROSTER_FEED_URL",
            Feed::Info => "INFO_FEED_URL",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything that can hand back the raw JSON body of a feed.
pub trait FeedSource {
    fn fetch(&self, feed: Feed) -> Result<String>;

    fn describe(&self, feed: Feed) -> String {
        feed.label().to_string()
    }
}

/// Fetches feeds over HTTP. URLs come from the environment when set,
/// otherwise from the embedded encoded endpoints. Bodies only reach disk
/// when a [`DiskCache`] is attached.
#[derive(Debug, Clone, Default)]
pub struct HttpFeedSource {
    pub roster_url: Option<String>,
    pub info_url: Option<String>,
    pub cache: Option<DiskCache>,
}

impl HttpFeedSource {
    pub fn from_env(cache: Option<DiskCache>) -> Self {
        Self {
            roster_url: opt_env(Feed::Roster.url_env_key()),
            info_url: opt_env(Feed::Info.url_env_key()),
            cache,
        }
    }

    pub fn url(&self, feed: Feed) -> Result<String> {
        let configured = match feed {
            Feed::Roster => self.roster_url.as_ref(),
            Feed::Info => self.info_url.as_ref(),
        };
        if let Some(url) = configured {
            return Ok(url.clone());
        }
        decoder::decode_url(feed.encoded_url())
            .with_context(|| format!("failed to decode {feed} feed endpoint"))
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, feed: Feed) -> Result<String> {
        let client = http_client()?;
        let url = self.url(feed)?;
        let body = match self.cache.as_ref() {
            Some(cache) => cache.fetch(client, &url),
            None => fetch_json(client, &url),
        };
        body.with_context(|| format!("{feed} feed request failed"))
    }

    fn describe(&self, feed: Feed) -> String {
        match self.url(feed) {
            Ok(url) => format!("{feed} feed ({})", redact_query(&url)),
            Err(_) => format!("{feed} feed"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SheetValues {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Parse a sheets `values` body into rows of optional cells. `null` cells
/// read as absent; an empty or `null` body has no rows.
pub fn parse_sheet_rows(raw: &str) -> Result<Vec<Vec<Option<String>>>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let sheet: SheetValues = serde_json::from_str(trimmed).context("invalid feed json")?;
    Ok(sheet
        .values
        .into_iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

fn opt_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val.trim().to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_order_and_absent_cells() {
        let rows = parse_sheet_rows(r#"{"values":[["a","b"],["c",null,3]]}"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Some("a".to_string()), Some("b".to_string())]);
        assert_eq!(rows[1][1], None);
        assert_eq!(rows[1][2].as_deref(), Some("3"));
    }

    #[test]
    fn missing_values_means_no_rows() {
        assert!(parse_sheet_rows(r#"{"range":"Roster!B2:N151"}"#).unwrap().is_empty());
        assert!(parse_sheet_rows("null").unwrap().is_empty());
        assert!(parse_sheet_rows("  ").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_sheet_rows("{values:").is_err());
    }

    #[test]
    fn configured_url_wins_over_embedded() {
        let source = HttpFeedSource {
            roster_url: Some("http://localhost/roster.json".to_string()),
            info_url: None,
            cache: None,
        };
        assert_eq!(source.url(Feed::Roster).unwrap(), "http://localhost/roster.json");
        assert!(source.url(Feed::Info).unwrap().contains("Info!B3:C152"));
        assert_eq!(
            source.describe(Feed::Info),
            "info feed (https://sheets.googleapis.com/v4/spreadsheets/1YCU0Uh2sOOE8lwxLmGQR134kf__yjDbkRJ9IuZwoeDI/values/Info!B3:C152)"
        );
    }
}
