//! In-crate fixtures shared by the unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    models::{PaymentRecord, PaymentSubmission, ProofUpload, ResidentType},
    month::MonthKey,
    storage::{PaymentStore, ProofStore},
};

#[derive(Default)]
pub struct VecPayments {
    pub records: Mutex<Vec<PaymentRecord>>,
}

#[async_trait]
impl PaymentStore for VecPayments {
    async fn append(&self, record: PaymentRecord) -> anyhow::Result<PaymentRecord> {
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> anyhow::Result<Vec<PaymentRecord>> {
        Ok(self.records.lock().await.clone())
    }
}

#[derive(Default)]
pub struct CountingProofs {
    pub saved: Mutex<Vec<String>>,
}

#[async_trait]
impl ProofStore for CountingProofs {
    async fn save(&self, upload: &ProofUpload) -> anyhow::Result<String> {
        let mut saved = self.saved.lock().await;
        let url = format!("/uploads/proof-{}.{}", saved.len(), upload.extension());
        saved.push(url.clone());
        Ok(url)
    }
}

pub fn stores() -> (Arc<VecPayments>, Arc<CountingProofs>) {
    (Arc::new(VecPayments::default()), Arc::new(CountingProofs::default()))
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// A complete, valid submission for flat `flat`.
pub fn submission(flat: &str, transaction_id: &str, amount: &str) -> PaymentSubmission {
    PaymentSubmission {
        flat_number: Some(flat.to_string()),
        resident_name: Some("A".to_string()),
        resident_type: Some("owner".to_string()),
        payment_purpose: Some("maintenance".to_string()),
        amount_paid: Some(amount.to_string()),
        transaction_id: Some(transaction_id.to_string()),
        payment_date: Some("2024-06-01".to_string()),
        ..PaymentSubmission::default()
    }
}

pub fn screenshot() -> ProofUpload {
    ProofUpload {
        file_name: Some("proof.png".to_string()),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

pub fn record(flat: &str, amount: i64, month: &str, created_at: DateTime<Utc>) -> PaymentRecord {
    PaymentRecord {
        id: format!("payment-{}", created_at.timestamp_millis()),
        flat_number: flat.to_string(),
        resident_name: format!("Resident {flat}"),
        resident_type: ResidentType::Tenant,
        payment_purpose: "maintenance".to_string(),
        amount_paid: Decimal::new(amount, 0),
        transaction_id: format!("TXN-{flat}-{}", created_at.timestamp()),
        upi_id: String::new(),
        bank_details: String::new(),
        notes: String::new(),
        payment_date: "2024-06-01".to_string(),
        screenshot_url: "/uploads/proof.png".to_string(),
        month: MonthKey::parse(month).unwrap(),
        created_at,
    }
}
