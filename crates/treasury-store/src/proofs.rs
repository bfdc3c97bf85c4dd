use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use treasury_core::{ProofStore, ProofUpload};
use uuid::Uuid;

pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Writes proof files into a directory that the gateway serves statically.
#[derive(Debug, Clone)]
pub struct DiskProofStore {
    root: PathBuf,
}

impl DiskProofStore {
    /// Creates the directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create upload directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ProofStore for DiskProofStore {
    async fn save(&self, upload: &ProofUpload) -> anyhow::Result<String> {
        let file_name = proof_file_name(upload);
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .with_context(|| format!("failed to write proof {}", path.display()))?;
        debug!(path = %path.display(), bytes = upload.bytes.len(), "proof stored");

        Ok(format!("{UPLOADS_URL_PREFIX}/{file_name}"))
    }
}

/// Keeps proof bytes in memory, keyed by their URL.
#[derive(Default)]
pub struct InMemoryProofStore {
    files: RwLock<Vec<(String, Vec<u8>)>>,
}

impl InMemoryProofStore {
    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        let files = self.files.read().await;
        files
            .iter()
            .find(|(stored, _)| stored == url)
            .map(|(_, bytes)| bytes.clone())
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl ProofStore for InMemoryProofStore {
    async fn save(&self, upload: &ProofUpload) -> anyhow::Result<String> {
        let url = format!("{UPLOADS_URL_PREFIX}/{}", proof_file_name(upload));
        self.files.write().await.push((url.clone(), upload.bytes.clone()));
        Ok(url)
    }
}

fn proof_file_name(upload: &ProofUpload) -> String {
    format!(
        "screenshot-{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        upload.extension()
    )
}
