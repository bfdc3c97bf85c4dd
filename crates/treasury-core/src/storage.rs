use async_trait::async_trait;

use crate::models::{PaymentRecord, ProofUpload};

/// Ordered, append-only home of payment records.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn append(&self, record: PaymentRecord) -> anyhow::Result<PaymentRecord>;
    /// Every record in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<PaymentRecord>>;
}

/// Keeps proof files and hands back the URL path they are served from.
#[async_trait]
pub trait ProofStore: Send + Sync {
    async fn save(&self, upload: &ProofUpload) -> anyhow::Result<String>;
}
