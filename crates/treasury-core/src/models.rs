use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResidentType {
    Owner,
    Tenant,
}

impl ResidentType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "owner" => Some(Self::Owner),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Tenant => "tenant",
        }
    }
}

/// A stored payment proof. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub flat_number: String,
    pub resident_name: String,
    pub resident_type: ResidentType,
    pub payment_purpose: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    pub transaction_id: String,
    pub upi_id: String,
    pub bank_details: String,
    pub notes: String,
    pub payment_date: String,
    pub screenshot_url: String,
    /// Derived from submission time, not from `payment_date`.
    pub month: MonthKey,
    pub created_at: DateTime<Utc>,
}

/// Form fields of a resident submission as received, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmission {
    pub flat_number: Option<String>,
    pub resident_name: Option<String>,
    pub resident_type: Option<String>,
    pub payment_purpose: Option<String>,
    pub amount_paid: Option<String>,
    pub transaction_id: Option<String>,
    pub upi_id: Option<String>,
    pub bank_details: Option<String>,
    pub payment_date: Option<String>,
    pub notes: Option<String>,
}

impl PaymentSubmission {
    /// Assigns a multipart/form field by its wire name. Unknown names are
    /// ignored and reported back as `false`.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "flatNumber" => &mut self.flat_number,
            "residentName" => &mut self.resident_name,
            "residentType" => &mut self.resident_type,
            "paymentPurpose" => &mut self.payment_purpose,
            "amountPaid" => &mut self.amount_paid,
            "transactionId" => &mut self.transaction_id,
            "upiId" => &mut self.upi_id,
            "bankDetails" => &mut self.bank_details,
            "paymentDate" => &mut self.payment_date,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Proof-of-payment file attached to a submission.
#[derive(Debug, Clone, Default)]
pub struct ProofUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ProofUpload {
    /// File extension taken from the original name, falling back to the
    /// declared content type.
    pub fn extension(&self) -> &str {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        match (from_name, self.content_type.as_deref()) {
            (Some(ext), _) => ext,
            (None, Some("image/jpeg")) => "jpg",
            (None, Some("image/png")) => "png",
            (None, Some("application/pdf")) => "pdf",
            _ => "bin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_collected: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pending: Decimal,
    pub flats_paid: i64,
    /// Not clamped: negative when more distinct flats paid than exist.
    pub flats_not_paid: i64,
    pub month: MonthKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resident_type_is_case_insensitive() {
        assert_eq!(ResidentType::parse("Owner"), Some(ResidentType::Owner));
        assert_eq!(ResidentType::parse(" tenant "), Some(ResidentType::Tenant));
        assert_eq!(ResidentType::parse("landlord"), None);
    }

    #[test]
    fn set_field_maps_wire_names() {
        let mut submission = PaymentSubmission::default();
        assert!(submission.set_field("flatNumber", "101".to_string()));
        assert!(submission.set_field("amountPaid", "5000".to_string()));
        assert!(!submission.set_field("screenshot", "x".to_string()));

        assert_eq!(submission.flat_number.as_deref(), Some("101"));
        assert_eq!(submission.amount_paid.as_deref(), Some("5000"));
    }

    #[test]
    fn proof_extension_prefers_file_name() {
        let named = ProofUpload {
            file_name: Some("receipt.PNG".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![],
        };
        assert_eq!(named.extension(), "PNG");

        let unnamed = ProofUpload {
            file_name: Some("receipt".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![],
        };
        assert_eq!(unnamed.extension(), "pdf");
    }
}
