use std::fs;
use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::archive::Expiry;

const UNSAFE_CHARS: &[char] = &[':', '\\', '/', '&', '?', '='];

/// Raw page bodies on disk, one file per URL.
#[derive(Clone, Debug)]
pub struct Cache {
    dir: PathBuf,
}

impl Cache {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Cache { dir })
    }

    pub fn file_name(url: &str) -> String {
        url.replace(UNSAFE_CHARS, "_")
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(Self::file_name(url))
    }

    pub fn load(&self, url: &str, expiry: Expiry) -> io::Result<Option<Bytes>> {
        self.load_at(url, expiry, Utc::now())
    }

    /// A missing, expired or empty file is a miss.
    pub fn load_at(&self, url: &str, expiry: Expiry, now: DateTime<Utc>) -> io::Result<Option<Bytes>> {
        let path = self.path_for(url);
        if !path.exists() {
            return Ok(None);
        }
        if let Some(max_age) = expiry.max_age() {
            let mtime: DateTime<Utc> = fs::metadata(&path)?.modified()?.into();
            if mtime < now - max_age {
                return Ok(None);
            }
        }
        let content = fs::read(&path)?;
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bytes::from(content)))
    }

    pub fn save(&self, url: &str, content: &[u8]) -> io::Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        fs::write(self.path_for(url), content)
    }
}
