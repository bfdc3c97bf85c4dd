pub mod aggregation;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod models;
pub mod month;
pub mod society;
pub mod storage;
#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregation::{DEFAULT_RECENT_LIMIT, PaymentReports};
pub use error::{TreasuryError, TreasuryResult};
pub use export::{render_report, report_file_name};
pub use ingestion::PaymentIngestion;
pub use models::{DashboardSummary, PaymentRecord, PaymentSubmission, ProofUpload, ResidentType};
pub use month::MonthKey;
pub use society::SocietyProfile;
pub use storage::{PaymentStore, ProofStore};
