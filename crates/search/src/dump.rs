//! Raw response persistence for `--json` runs.

use std::path::{Path, PathBuf};

/// Writes each site's raw body, byte-for-byte, into one directory.
#[derive(Debug, Clone)]
pub struct JsonDump {
    dir: PathBuf,
}

impl JsonDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, site_key: &str, tmdb_id: u64) -> PathBuf {
        self.dir.join(format!("{site_key}_TMDb_{tmdb_id}.json"))
    }

    pub async fn write(
        &self,
        site_key: &str,
        tmdb_id: u64,
        body: &[u8],
    ) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(site_key, tmdb_id);
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}
