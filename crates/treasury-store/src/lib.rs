mod proofs;

use async_trait::async_trait;
use tokio::sync::RwLock;
use treasury_core::{PaymentRecord, PaymentStore};

pub use proofs::{DiskProofStore, InMemoryProofStore, UPLOADS_URL_PREFIX};

/// Process-lifetime payment store. Everything is lost on restart.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    records: RwLock<Vec<PaymentRecord>>,
}

impl InMemoryPaymentStore {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn append(&self, record: PaymentRecord) -> anyhow::Result<PaymentRecord> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> anyhow::Result<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.clone())
    }
}
