//! Where raw spell records come from.
//!
//! [`CachedSource`] keeps every downloaded record as `<name>.json` in a cache
//! directory and only asks its [`Download`] implementation on a miss.
//! [`LocalSource`] reads records from a directory and never downloads.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::error::{CardError, Result};

/// Resolves a spell identifier to its raw JSON record.
pub trait SpellSource {
    fn fetch(&self, id: &str) -> Result<Value>;
}

/// Fetches the raw body of one record from a remote service.
pub trait Download {
    fn download(&self, name: &str) -> Result<String>;
}

fn record_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

fn parse_body(id: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| CardError::malformed(id, e))
}

pub struct CachedSource<D> {
    cache_dir: PathBuf,
    downloader: D,
}

impl<D: Download> CachedSource<D> {
    pub fn new(cache_dir: impl Into<PathBuf>, downloader: D) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            downloader,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache file for `id`; names are lower-cased.
    pub fn cache_path(&self, id: &str) -> PathBuf {
        record_path(&self.cache_dir, &id.to_lowercase())
    }
}

impl<D: Download> SpellSource for CachedSource<D> {
    fn fetch(&self, id: &str) -> Result<Value> {
        let name = id.to_lowercase();
        let path = record_path(&self.cache_dir, &name);
        if path.is_file() {
            tracing::debug!(spell = %name, path = %path.display(), "cache hit");
            let body = fs::read_to_string(&path)?;
            return parse_body(id, &body);
        }
        tracing::debug!(spell = %name, "cache miss, downloading");
        let body = self.downloader.download(&name)?;
        // Only well-formed records are cached.
        let value = parse_body(id, &body)?;
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&path, &body)?;
        Ok(value)
    }
}

pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SpellSource for LocalSource {
    fn fetch(&self, id: &str) -> Result<Value> {
        let path = record_path(&self.dir, &id.to_lowercase());
        if !path.is_file() {
            return Err(CardError::NotFound(id.to_string()));
        }
        tracing::debug!(spell = %id, path = %path.display(), "reading local record");
        let body = fs::read_to_string(&path)?;
        parse_body(id, &body)
    }
}

#[cfg(feature = "http")]
pub use http::{TtgClient, DEFAULT_TTG_BASE_URL};

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::{blocking::Client, StatusCode};

    use super::Download;
    use crate::error::{CardError, Result};

    pub const DEFAULT_TTG_BASE_URL: &str = "https://ttg.club/api/v1/spells";

    /// Blocking client for the ttg.club spell API.
    pub struct TtgClient {
        client: Client,
        base_url: String,
    }

    impl TtgClient {
        pub fn new(base_url: &str) -> Self {
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new());
            Self {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }
    }

    impl Default for TtgClient {
        fn default() -> Self {
            Self::new(DEFAULT_TTG_BASE_URL)
        }
    }

    impl Download for TtgClient {
        fn download(&self, name: &str) -> Result<String> {
            let url = format!("{}/{}", self.base_url, name);
            let transport = |message: String| CardError::Transport {
                id: name.to_string(),
                message,
            };
            let response = self
                .client
                .post(&url)
                .send()
                .map_err(|e| transport(e.to_string()))?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(CardError::NotFound(name.to_string()));
            }
            if !status.is_success() {
                return Err(transport(format!("HTTP {status} from {url}")));
            }
            tracing::info!(spell = %name, "downloaded spell record");
            response.text().map_err(|e| transport(e.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn base_url_loses_trailing_slash() {
            let client = TtgClient::new("http://localhost:9/api/v1/spells/");
            assert_eq!(client.base_url(), "http://localhost:9/api/v1/spells");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingDownload {
        body: &'static str,
        calls: Cell<usize>,
    }

    impl Download for CountingDownload {
        fn download(&self, _name: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.to_string())
        }
    }

    struct MissingDownload;

    impl Download for MissingDownload {
        fn download(&self, name: &str) -> Result<String> {
            Err(CardError::NotFound(name.to_string()))
        }
    }

    #[test]
    fn miss_downloads_once_then_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedSource::new(
            dir.path().join("spells/ttg_api"),
            CountingDownload {
                body: r#"{"level": 1}"#,
                calls: Cell::new(0),
            },
        );
        let first = source.fetch("Shield").unwrap();
        let second = source.fetch("shield").unwrap();
        assert_eq!(first, second);
        assert_eq!(source.downloader.calls.get(), 1);
        assert!(source.cache_path("SHIELD").is_file());
    }

    #[test]
    fn invalid_body_is_malformed_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedSource::new(
            dir.path(),
            CountingDownload {
                body: "<html>502</html>",
                calls: Cell::new(0),
            },
        );
        let err = source.fetch("bless").unwrap_err();
        assert!(matches!(err, CardError::MalformedRecord { .. }));
        assert!(!source.cache_path("bless").exists());
    }

    #[test]
    fn download_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedSource::new(dir.path(), MissingDownload);
        assert!(matches!(
            source.fetch("nope").unwrap_err(),
            CardError::NotFound(name) if name == "nope"
        ));
    }

    #[test]
    fn local_source_reads_lowercased_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shield.json"), r#"{"name": "Щит"}"#).unwrap();
        let source = LocalSource::new(dir.path());
        assert_eq!(source.fetch("Shield").unwrap()["name"], "Щит");
        assert!(matches!(
            source.fetch("fireball").unwrap_err(),
            CardError::NotFound(_)
        ));
    }
}
