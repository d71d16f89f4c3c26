use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{
    ACCEPT, ETAG, HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "roster_cards";
const CACHE_FILE: &str = "http_cache.json";

/// GET a feed without touching disk. Non-2xx answers are errors carrying
/// the status and body.
pub fn fetch_json(client: &Client, url: &str) -> Result<String> {
    let resp = send(client.get(url))?;
    let status = resp.status();
    read_success(status, resp)
}

/// Feed bodies kept on disk between runs, keyed by URL, so repeat fetches
/// can be answered with 304. Only used when asked for; nothing is written
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskCache {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl DiskCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CACHE_HOME/roster_cards/http_cache.json`, else under `~/.cache`.
    pub fn default_location() -> Option<Self> {
        app_cache_dir().map(|dir| Self::at(dir.join(CACHE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Conditional GET: validators from the stored entry are sent along and
    /// a 304 is answered from disk.
    pub fn fetch(&self, client: &Client, url: &str) -> Result<String> {
        let mut file = self.load();
        let cached = file.entries.get(url).cloned();

        let mut req = client.get(url);
        if let Some(entry) = cached.as_ref() {
            if let Some(etag) = entry.etag.as_deref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_deref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = send(req)?;
        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            return cached
                .map(|entry| entry.body)
                .ok_or_else(|| anyhow::anyhow!("received 304 without cache body"));
        }

        let validators = Validators::from_headers(resp.headers());
        let body = read_success(status, resp)?;
        if validators.etag.is_some() || validators.last_modified.is_some() {
            file.version = CACHE_VERSION;
            file.entries.insert(
                url.to_string(),
                CacheEntry {
                    body: body.clone(),
                    etag: validators.etag,
                    last_modified: validators.last_modified,
                    fetched_at: now_secs(),
                },
            );
            self.store(&file)?;
        }
        Ok(body)
    }

    fn load(&self) -> CacheFile {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return CacheFile::default();
        };
        match serde_json::from_str::<CacheFile>(&raw) {
            Ok(file) if file.version == CACHE_VERSION => file,
            _ => CacheFile::default(),
        }
    }

    fn store(&self, file: &CacheFile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache dir {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(file).context("serialize http cache")?;
        fs::write(&tmp, json).context("write http cache")?;
        fs::rename(&tmp, &self.path).context("swap http cache")?;
        Ok(())
    }
}

struct Validators {
    etag: Option<String>,
    last_modified: Option<String>,
}

impl Validators {
    fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            etag: get(ETAG),
            last_modified: get(LAST_MODIFIED),
        }
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn send(req: RequestBuilder) -> Result<Response> {
    req.header(ACCEPT, "application/json")
        .send()
        .context("request failed")
}

fn read_success(status: StatusCode, resp: Response) -> Result<String> {
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status.as_u16(), body.trim()));
    }
    Ok(body)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
