use std::{collections::BTreeSet, sync::Arc};

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    error::TreasuryResult,
    models::{DashboardSummary, PaymentRecord},
    month::MonthKey,
    society::SocietyProfile,
    storage::PaymentStore,
};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Read side over the payment store. Nothing is cached; every call
/// recomputes from the full record list.
pub struct PaymentReports {
    payments: Arc<dyn PaymentStore>,
    profile: SocietyProfile,
}

impl PaymentReports {
    pub fn new(payments: Arc<dyn PaymentStore>, profile: SocietyProfile) -> Self {
        Self { payments, profile }
    }

    pub fn profile(&self) -> &SocietyProfile {
        &self.profile
    }

    pub fn current_month(&self) -> MonthKey {
        self.profile.current_month(Utc::now())
    }

    pub async fn dashboard(&self, month: &MonthKey) -> TreasuryResult<DashboardSummary> {
        let records = self.payments.list().await?;
        summarize(&records, month, &self.profile)
    }

    pub async fn monthly(&self, month: &MonthKey) -> TreasuryResult<Vec<PaymentRecord>> {
        let records = self.payments.list().await?;
        Ok(for_month(records, month))
    }

    pub async fn recent(&self, limit: usize) -> TreasuryResult<Vec<PaymentRecord>> {
        let records = self.payments.list().await?;
        Ok(most_recent(records, limit))
    }

    /// Every record in insertion order.
    pub async fn all(&self) -> TreasuryResult<Vec<PaymentRecord>> {
        Ok(self.payments.list().await?)
    }
}

pub fn summarize(
    records: &[PaymentRecord],
    month: &MonthKey,
    profile: &SocietyProfile,
) -> TreasuryResult<DashboardSummary> {
    let in_month = records.iter().filter(|record| &record.month == month);

    let mut total_collected = Decimal::ZERO;
    let mut flats = BTreeSet::new();
    for record in in_month {
        total_collected = total_collected
            .checked_add(record.amount_paid)
            .ok_or_else(|| anyhow!("total collected for {month} overflows"))?;
        flats.insert(record.flat_number.as_str());
    }

    let flats_paid = flats.len() as i64;
    let flats_not_paid = profile.total_flats - flats_paid;
    let total_pending = Decimal::from(flats_not_paid)
        .checked_mul(profile.maintenance_per_flat)
        .ok_or_else(|| anyhow!("total pending for {month} overflows"))?;

    Ok(DashboardSummary {
        total_collected,
        total_pending,
        flats_paid,
        flats_not_paid,
        month: month.clone(),
    })
}

/// Records of one month, newest first.
pub fn for_month(records: Vec<PaymentRecord>, month: &MonthKey) -> Vec<PaymentRecord> {
    let mut selected: Vec<PaymentRecord> = records
        .into_iter()
        .filter(|record| &record.month == month)
        .collect();
    newest_first(&mut selected);
    selected
}

pub fn most_recent(mut records: Vec<PaymentRecord>, limit: usize) -> Vec<PaymentRecord> {
    newest_first(&mut records);
    records.truncate(limit);
    records
}

fn newest_first(records: &mut [PaymentRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
