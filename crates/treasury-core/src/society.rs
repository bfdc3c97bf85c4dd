use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;

use crate::month::MonthKey;

/// Fixed facts about the apartment complex that the dashboard is computed
/// against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocietyProfile {
    pub total_flats: i64,
    pub maintenance_per_flat: Decimal,
    /// Offset in which calendar months are cut.
    pub utc_offset: FixedOffset,
}

impl Default for SocietyProfile {
    fn default() -> Self {
        Self {
            total_flats: 40,
            maintenance_per_flat: Decimal::new(5000, 0),
            utc_offset: Utc.fix(),
        }
    }
}

impl SocietyProfile {
    pub fn current_month(&self, now: DateTime<Utc>) -> MonthKey {
        MonthKey::from_datetime(&now.with_timezone(&self.utc_offset))
    }
}
