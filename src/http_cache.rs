use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "hoops_terminal";
const CACHE_FILE: &str = "http_cache.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    fetched_at: u64,
}

/// Time-bounded body cache keyed by URL. Enrichment signals have no
/// correctness requirement on staleness, so a body younger than the caller's
/// TTL is served without touching the network.
pub struct HttpCache {
    entries: Mutex<CacheFile>,
    disk_path: Option<PathBuf>,
}

impl HttpCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(CacheFile::default()),
            disk_path: None,
        }
    }

    /// Cache backed by a versioned file under the XDG cache dir. Unreadable
    /// or version-mismatched files start the cache empty.
    pub fn with_disk() -> Self {
        let disk_path = cache_path();
        let loaded = disk_path.as_ref().map(load_cache_file).unwrap_or_default();
        Self {
            entries: Mutex::new(loaded),
            disk_path,
        }
    }

    pub fn fresh_body(&self, url: &str, ttl: Duration) -> Option<String> {
        let guard = self.entries.lock().expect("http cache lock poisoned");
        let entry = guard.entries.get(url)?;
        let age = now_secs().saturating_sub(entry.fetched_at);
        if age <= ttl.as_secs() {
            Some(entry.body.clone())
        } else {
            None
        }
    }

    fn store(&self, url: &str, body: String) {
        let mut guard = self.entries.lock().expect("http cache lock poisoned");
        guard.version = CACHE_VERSION;
        guard.entries.insert(
            url.to_string(),
            CacheEntry {
                body,
                fetched_at: now_secs(),
            },
        );
        if let Some(path) = &self.disk_path {
            let _ = save_cache_file(path, &guard);
        }
    }
}

impl Default for HttpCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle the report pipeline threads through every fetcher.
pub struct FetchContext<'a> {
    pub client: &'a Client,
    pub cache: &'a HttpCache,
    pub delay_override: Option<Duration>,
}

impl FetchContext<'_> {
    pub fn delay(&self, default: Duration) -> Duration {
        self.delay_override.unwrap_or(default)
    }
}

/// One GET through the TTL cache. A fresh cached body short-circuits both the
/// request and the politeness delay; otherwise the fixed delay runs first and
/// a single attempt is made. Only success bodies are cached.
pub fn fetch_text_cached(
    client: &Client,
    cache: &HttpCache,
    url: &str,
    ttl: Duration,
    delay: Duration,
    extra_headers: &[(&str, &str)],
) -> Result<String> {
    if let Some(body) = cache.fresh_body(url, ttl) {
        return Ok(body);
    }

    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let mut req = client.get(url);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    let resp = match req.send() {
        Ok(resp) => resp,
        Err(err) => anyhow::bail!("request error: {}", err.without_url()),
    };
    let status = resp.status();
    if !status.is_success() {
        anyhow::bail!("fetch failed (code {})", status.as_u16());
    }
    let body = match resp.text() {
        Ok(body) => body,
        Err(err) => anyhow::bail!("body read error: {}", err.without_url()),
    };

    cache.store(url, body.clone());
    Ok(body)
}

fn load_cache_file(path: &PathBuf) -> CacheFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return CacheFile::default();
    };
    let cache = serde_json::from_str::<CacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return CacheFile::default();
    }
    cache
}

fn save_cache_file(path: &PathBuf, cache: &CacheFile) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_served_until_ttl_expires() {
        let cache = HttpCache::new();
        cache.store("https://example.test/a", "body-a".to_string());

        assert_eq!(
            cache.fresh_body("https://example.test/a", Duration::from_secs(3600)),
            Some("body-a".to_string())
        );
    }

    #[test]
    fn unknown_url_misses() {
        let cache = HttpCache::new();
        assert!(cache.fresh_body("https://example.test/missing", Duration::from_secs(60)).is_none());
    }

    #[test]
    fn stale_entry_is_not_served() {
        let cache = HttpCache::new();
        {
            let mut guard = cache.entries.lock().unwrap();
            guard.entries.insert(
                "https://example.test/old".to_string(),
                CacheEntry {
                    body: "stale".to_string(),
                    fetched_at: now_secs().saturating_sub(7200),
                },
            );
        }
        assert!(cache.fresh_body("https://example.test/old", Duration::from_secs(3600)).is_none());
        assert!(
            cache
                .fresh_body("https://example.test/old", Duration::from_secs(8000))
                .is_some()
        );
    }
}
