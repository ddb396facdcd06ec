//! Media storage for uploaded post images.
//!
//! Files live under a root directory and are addressed by keys such as
//! `posts/small.gif`. A name that is already taken gets a short random
//! suffix before its extension, so uploads never overwrite each other.

use std::io;
use std::path::PathBuf;

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Sub-directory holding post images.
pub const POSTS_DIR: &str = "posts";

/// Local-filesystem media store.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Make sure the root directory exists.
    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Filesystem path for a storage key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Write `data` into `dir` under a name derived from `file_name`.
    ///
    /// Returns the storage key (`dir/name`).
    pub async fn save(&self, dir: &str, file_name: &str, data: &[u8]) -> io::Result<String> {
        let target_dir = self.root.join(dir);
        fs::create_dir_all(&target_dir).await?;

        let clean = sanitize_file_name(file_name);
        let mut candidate = clean.clone();
        loop {
            let path = target_dir.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    let key = format!("{dir}/{candidate}");
                    tracing::debug!(key = %key, size = data.len(), "Stored media file");
                    return Ok(key);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = with_random_suffix(&clean);
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        fs::try_exists(self.path_for(key)).await.unwrap_or(false)
    }

    pub async fn read(&self, key: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(key)).await
    }
}

/// Keep only the final path component and a conservative character set.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn with_random_suffix(name: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(7).collect();
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{name}_{suffix}"),
    }
}
