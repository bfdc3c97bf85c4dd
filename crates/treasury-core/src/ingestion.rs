use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::{TreasuryError, TreasuryResult},
    models::{PaymentRecord, PaymentSubmission, ProofUpload, ResidentType},
    society::SocietyProfile,
    storage::{PaymentStore, ProofStore},
};

pub const ALLOWED_PROOF_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_RESIDENT_TYPE: &str = "Resident type must be owner or tenant";
pub const SCREENSHOT_REQUIRED: &str = "Screenshot is required";
pub const INVALID_FILE_TYPE: &str = "Invalid file type";
pub const FILE_TOO_LARGE: &str = "File too large";
pub const INVALID_AMOUNT: &str = "Amount must be a valid number";
pub const NON_POSITIVE_AMOUNT: &str = "Amount must be greater than 0";
pub const DUPLICATE_SUBMISSION: &str =
    "This transaction ID has already been submitted for this flat this month";

/// Validates resident submissions and appends them to the payment store.
///
/// This is the only place the store is mutated. The duplicate check and the
/// append run under one gate, so two identical submissions racing each other
/// cannot both land.
pub struct PaymentIngestion {
    payments: Arc<dyn PaymentStore>,
    proofs: Arc<dyn ProofStore>,
    profile: SocietyProfile,
    gate: Mutex<()>,
}

struct CheckedSubmission {
    flat_number: String,
    resident_name: String,
    resident_type: ResidentType,
    payment_purpose: String,
    amount_paid: String,
    transaction_id: String,
    payment_date: String,
    upi_id: String,
    bank_details: String,
    notes: String,
}

impl PaymentIngestion {
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        proofs: Arc<dyn ProofStore>,
        profile: SocietyProfile,
    ) -> Self {
        Self {
            payments,
            proofs,
            profile,
            gate: Mutex::new(()),
        }
    }

    pub async fn submit(
        &self,
        submission: PaymentSubmission,
        proof: Option<ProofUpload>,
    ) -> TreasuryResult<PaymentRecord> {
        self.submit_at(submission, proof, Utc::now()).await
    }

    /// Same as [`submit`](Self::submit) with an explicit submission instant,
    /// which drives both `created_at` and the month bucket.
    pub async fn submit_at(
        &self,
        submission: PaymentSubmission,
        proof: Option<ProofUpload>,
        now: DateTime<Utc>,
    ) -> TreasuryResult<PaymentRecord> {
        let checked = check_fields(submission)?;
        let proof = proof.ok_or_else(|| TreasuryError::validation(SCREENSHOT_REQUIRED))?;
        check_proof(&proof)?;
        let amount_paid = parse_amount(&checked.amount_paid)?;
        let month = self.profile.current_month(now);

        let _gate = self.gate.lock().await;

        let existing = self.payments.list().await?;
        let duplicate = existing.iter().any(|record| {
            record.transaction_id == checked.transaction_id
                && record.flat_number == checked.flat_number
                && record.month == month
        });
        if duplicate {
            warn!(
                flat_number = %checked.flat_number,
                transaction_id = %checked.transaction_id,
                month = %month,
                "duplicate payment submission rejected"
            );
            return Err(TreasuryError::Conflict(DUPLICATE_SUBMISSION.to_string()));
        }

        let screenshot_url = self.proofs.save(&proof).await?;

        let record = PaymentRecord {
            id: format!("payment-{}", now.timestamp_millis()),
            flat_number: checked.flat_number,
            resident_name: checked.resident_name,
            resident_type: checked.resident_type,
            payment_purpose: checked.payment_purpose,
            amount_paid,
            transaction_id: checked.transaction_id,
            upi_id: checked.upi_id,
            bank_details: checked.bank_details,
            notes: checked.notes,
            payment_date: checked.payment_date,
            screenshot_url,
            month,
            created_at: now,
        };

        let stored = self.payments.append(record).await?;
        info!(
            payment_id = %stored.id,
            flat_number = %stored.flat_number,
            amount = %stored.amount_paid,
            month = %stored.month,
            "payment recorded"
        );

        Ok(stored)
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional(value: Option<String>) -> String {
    required(value).unwrap_or_default()
}

fn check_fields(submission: PaymentSubmission) -> TreasuryResult<CheckedSubmission> {
    let missing = || TreasuryError::validation(MISSING_FIELDS);

    let flat_number = required(submission.flat_number).ok_or_else(missing)?;
    let resident_name = required(submission.resident_name).ok_or_else(missing)?;
    let resident_type = required(submission.resident_type).ok_or_else(missing)?;
    let payment_purpose = required(submission.payment_purpose).ok_or_else(missing)?;
    let amount_paid = required(submission.amount_paid).ok_or_else(missing)?;
    let transaction_id = required(submission.transaction_id).ok_or_else(missing)?;
    let payment_date = required(submission.payment_date).ok_or_else(missing)?;

    let resident_type = ResidentType::parse(&resident_type)
        .ok_or_else(|| TreasuryError::validation(INVALID_RESIDENT_TYPE))?;

    Ok(CheckedSubmission {
        flat_number,
        resident_name,
        resident_type,
        payment_purpose,
        amount_paid,
        transaction_id,
        payment_date,
        upi_id: optional(submission.upi_id),
        bank_details: optional(submission.bank_details),
        notes: optional(submission.notes),
    })
}

fn check_proof(proof: &ProofUpload) -> TreasuryResult<()> {
    let content_type = proof.content_type.as_deref().unwrap_or_default();
    if !ALLOWED_PROOF_TYPES.contains(&content_type) {
        return Err(TreasuryError::validation(INVALID_FILE_TYPE));
    }
    if proof.bytes.len() > MAX_PROOF_BYTES {
        return Err(TreasuryError::validation(FILE_TOO_LARGE));
    }

    Ok(())
}

fn parse_amount(raw: &str) -> TreasuryResult<Decimal> {
    let amount = Decimal::from_str(raw).map_err(|_| TreasuryError::validation(INVALID_AMOUNT))?;
    if amount <= Decimal::ZERO {
        return Err(TreasuryError::validation(NON_POSITIVE_AMOUNT));
    }

    Ok(amount)
}
