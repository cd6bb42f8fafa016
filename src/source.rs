//! Data source adapter: fetch a JSON collection, keep a durable backup of
//! the last good payload, and degrade through fallback to empty without ever
//! surfacing an error. Every result is tagged with where it came from.

use anyhow::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;
use url::Url;

use crate::cache::CollectionCache;
use crate::logging::{json_log, json_warn, obj, v_num, v_str};
use crate::model::{decode_collection, Component};
use crate::store::{KvStore, KEY_BACKUP, KEY_BACKUP_DIGEST};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fresh fetch succeeded.
    Live,
    /// Fetch failed; the durable backup was served instead.
    Fallback,
    /// Both the fetch and the backup failed.
    Empty,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Live => "live",
            Origin::Fallback => "fallback",
            Origin::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadResult {
    pub components: Vec<Component>,
    pub origin: Origin,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let resp = self.client.get(path).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("http status {}", resp.status());
        }
        Ok(resp.text().await?)
    }
}

pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn is_http(path: &str) -> bool {
    matches!(Url::parse(path), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct DataSource {
    fetcher: Box<dyn Fetcher>,
}

impl DataSource {
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Pick the fetcher from the path shape: http(s) URLs go over the wire,
    /// anything else is read from the filesystem.
    pub fn for_path(path: &str, timeout_secs: u64) -> Result<Self> {
        let fetcher: Box<dyn Fetcher> = if is_http(path) {
            Box::new(HttpFetcher::new(timeout_secs)?)
        } else {
            Box::new(FileFetcher)
        };
        Ok(Self::new(fetcher))
    }

    /// Load the collection at `path`. Resolution order: in-memory cache, live
    /// fetch, durable backup, empty. Never returns an error; the `origin` tag
    /// says which path was taken. A successful live fetch overwrites the
    /// backup slot with the raw payload and its digest. Live and fallback
    /// results are cached for the session; an empty result is not, so a later
    /// load may retry.
    pub async fn load(
        &self,
        path: &str,
        cache: &mut CollectionCache,
        store: &mut KvStore,
    ) -> LoadResult {
        if let Some(hit) = cache.get() {
            json_log(
                "source",
                obj(&[("event", v_str("cache_hit")), ("origin", v_str(hit.origin.as_str()))]),
            );
            return hit.clone();
        }

        let result = match self.fetcher.fetch(path).await {
            Ok(text) => match decode_collection(&text) {
                Some(components) => {
                    self.write_backup(store, &text);
                    json_log(
                        "source",
                        obj(&[
                            ("event", v_str("loaded")),
                            ("origin", v_str(Origin::Live.as_str())),
                            ("path", v_str(path)),
                            ("count", v_num(components.len() as f64)),
                        ]),
                    );
                    LoadResult { components, origin: Origin::Live }
                }
                None => {
                    json_warn(
                        "source",
                        obj(&[("event", v_str("parse_failure")), ("path", v_str(path))]),
                    );
                    self.fallback(store)
                }
            },
            Err(err) => {
                json_warn(
                    "source",
                    obj(&[
                        ("event", v_str("fetch_failure")),
                        ("path", v_str(path)),
                        ("error", v_str(&err.to_string())),
                    ]),
                );
                self.fallback(store)
            }
        };

        if result.origin != Origin::Empty {
            cache.fill(result.clone());
        }
        result
    }

    fn write_backup(&self, store: &mut KvStore, text: &str) {
        let digest = sha256_hex(text);
        let wrote =
            store.put(KEY_BACKUP, text).and_then(|_| store.put(KEY_BACKUP_DIGEST, &digest));
        if let Err(err) = wrote {
            json_warn(
                "source",
                obj(&[("event", v_str("backup_write_failure")), ("error", v_str(&err.to_string()))]),
            );
        }
    }

    fn fallback(&self, store: &KvStore) -> LoadResult {
        if let Ok(Some(text)) = store.get(KEY_BACKUP) {
            // Backups written before the digest slot existed have no digest;
            // those are accepted as-is.
            let digest_ok = match store.get(KEY_BACKUP_DIGEST) {
                Ok(Some(digest)) => digest == sha256_hex(&text),
                _ => true,
            };
            if !digest_ok {
                json_warn("source", obj(&[("event", v_str("backup_digest_mismatch"))]));
            } else if let Some(components) = decode_collection(&text) {
                json_log(
                    "source",
                    obj(&[
                        ("event", v_str("loaded")),
                        ("origin", v_str(Origin::Fallback.as_str())),
                        ("count", v_num(components.len() as f64)),
                    ]),
                );
                return LoadResult { components, origin: Origin::Fallback };
            } else {
                json_warn("source", obj(&[("event", v_str("backup_parse_failure"))]));
            }
        }
        json_log(
            "source",
            obj(&[("event", v_str("loaded")), ("origin", v_str(Origin::Empty.as_str())), ("count", v_num(0.0))]),
        );
        LoadResult { components: Vec::new(), origin: Origin::Empty }
    }
}
