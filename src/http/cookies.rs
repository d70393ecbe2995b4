//! Durable cookie persistence
//!
//! Session cookies are the only state that outlives a process run. The store
//! is file-backed: loaded once at construction (the file is created empty when
//! absent) and rewritten on [`PersistentCookieStore::save`]. The underlying
//! [`CookieStoreMutex`] is shared with the reqwest client as its cookie
//! provider, so `Set-Cookie` responses accumulate in it automatically.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;

use crate::error::{Error, Result};

/// File-backed cookie store shared with the HTTP client
#[derive(Debug)]
pub struct PersistentCookieStore {
    /// Shared store handed to reqwest as cookie provider
    store: Arc<CookieStoreMutex>,
    /// Backing file path
    path: PathBuf,
}

impl PersistentCookieStore {
    /// Load the store from the given file, creating it empty when absent
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            File::create(&path)?;
        }

        let file = File::open(&path)?;
        let store = if file.metadata()?.len() == 0 {
            CookieStore::default()
        } else {
            cookie_store::serde::json::load(BufReader::new(file))
                .map_err(|e| Error::cookie_store(format!("Failed to load cookie file: {}", e)))?
        };

        Ok(Self {
            store: Arc::new(CookieStoreMutex::new(store)),
            path,
        })
    }

    /// Shared handle for `reqwest::ClientBuilder::cookie_provider`
    pub fn provider(&self) -> Arc<CookieStoreMutex> {
        Arc::clone(&self.store)
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current cookies back to the backing file
    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let store = self
            .store
            .lock()
            .map_err(|e| Error::cookie_store(format!("Cookie store poisoned: {}", e)))?;
        cookie_store::serde::json::save(&store, &mut writer)
            .map_err(|e| Error::cookie_store(format!("Failed to save cookie file: {}", e)))?;
        Ok(())
    }

    /// Drop every cookie and persist the now-empty store
    pub fn clear(&self) -> Result<()> {
        {
            let mut store = self
                .store
                .lock()
                .map_err(|e| Error::cookie_store(format!("Cookie store poisoned: {}", e)))?;
            store.clear();
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        assert!(!path.exists());

        let store = PersistentCookieStore::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let store = PersistentCookieStore::load(&path).unwrap();
        {
            let mut inner = store.store.lock().unwrap();
            let url = url::Url::parse("https://www.instagram.com/").unwrap();
            inner
                .parse("sessionid=abc123; Path=/; Max-Age=86400", &url)
                .unwrap();
        }
        store.save().unwrap();

        let reloaded = PersistentCookieStore::load(&path).unwrap();
        let inner = reloaded.store.lock().unwrap();
        assert!(inner.iter_any().next().is_some());
    }

    #[test]
    fn test_clear_empties_store_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let store = PersistentCookieStore::load(&path).unwrap();
        {
            let mut inner = store.store.lock().unwrap();
            let url = url::Url::parse("https://www.instagram.com/").unwrap();
            inner
                .parse("sessionid=abc123; Path=/; Max-Age=86400", &url)
                .unwrap();
        }
        store.clear().unwrap();

        let reloaded = PersistentCookieStore::load(&path).unwrap();
        let inner = reloaded.store.lock().unwrap();
        assert!(inner.iter_any().next().is_none());
    }
}
