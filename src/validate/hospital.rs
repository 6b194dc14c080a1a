use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{HospitalizationError, HospitalizationPeriod};

/// One patient's hospitalization stays, sorted and non-overlapping.
///
/// The no-overlap invariant is enforced at insertion time, so point
/// queries only ever need to inspect the closest preceding stay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HospitalizationLog {
    /// Sorted by `start_date`, pairwise disjoint.
    periods: Vec<HospitalizationPeriod>,
}

impl HospitalizationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a collaborator snapshot, verifying order invariants.
    pub fn from_snapshot(
        mut periods: Vec<HospitalizationPeriod>,
    ) -> Result<Self, HospitalizationError> {
        periods.sort_by_key(|p| p.start_date);
        let mut log = Self::default();
        for period in periods {
            log.insert(period)?;
        }
        Ok(log)
    }

    /// Insert a stay, rejecting inverted ranges and intersections with
    /// recorded stays.
    pub fn insert(&mut self, period: HospitalizationPeriod) -> Result<(), HospitalizationError> {
        if period.end_date < period.start_date {
            return Err(HospitalizationError::InvalidRange {
                start: period.start_date,
                end: period.end_date,
            });
        }

        let idx = self
            .periods
            .partition_point(|p| p.start_date < period.start_date);

        if idx > 0 && self.periods[idx - 1].end_date >= period.start_date {
            return Err(HospitalizationError::Overlapping {
                start: period.start_date,
            });
        }
        if let Some(next) = self.periods.get(idx) {
            if period.end_date >= next.start_date {
                return Err(HospitalizationError::Overlapping {
                    start: period.start_date,
                });
            }
        }

        self.periods.insert(idx, period);
        Ok(())
    }

    /// Whether the patient was hospitalized on `date` (inclusive on both
    /// ends of each stay).
    pub fn covers(&self, date: NaiveDate) -> bool {
        let idx = self.periods.partition_point(|p| p.start_date <= date);
        idx > 0 && self.periods[idx - 1].covers(date)
    }

    pub fn periods(&self) -> &[HospitalizationPeriod] {
        &self.periods
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
