use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{CareCode, CatalogError, TariffError, ValidityPeriod};

/// The care code catalog with time-bounded prices.
///
/// Periods are kept sorted by start date per code, so the effective price
/// is found by binary search and the no-overlap invariant is checked
/// against at most two neighbors at insertion time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TariffCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEntry {
    info: CareCode,
    /// Sorted by `start_date`; disjoint when built through `add_period`.
    periods: Vec<ValidityPeriod>,
}

impl TariffCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a care code. Codes are unique; "contribution undue" is
    /// only accepted on reimbursed codes.
    pub fn register_code(&mut self, code: CareCode) -> Result<(), CatalogError> {
        if code.contribution_undue && !code.reimbursed {
            return Err(CatalogError::ContributionUndueNotReimbursed(code.code));
        }
        if self.entries.contains_key(&code.code) {
            return Err(CatalogError::DuplicateCode(code.code));
        }
        self.entries.insert(
            code.code.clone(),
            CatalogEntry {
                info: code,
                periods: Vec::new(),
            },
        );
        Ok(())
    }

    /// Add a validity period to a registered code, keeping the period list
    /// sorted and disjoint. An open-ended period must be the most recent.
    pub fn add_period(&mut self, code: &str, period: ValidityPeriod) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .get_mut(code)
            .ok_or_else(|| CatalogError::UnknownCode(code.to_string()))?;

        if let Some(end) = period.end_date {
            if end < period.start_date {
                return Err(CatalogError::InvalidPeriod {
                    start: period.start_date,
                    end,
                });
            }
        }

        let idx = entry
            .periods
            .partition_point(|p| p.start_date < period.start_date);

        // The predecessor must end strictly before the new period starts.
        // An open-ended predecessor covers everything after its start.
        if idx > 0 {
            let prev = &entry.periods[idx - 1];
            match prev.end_date {
                None => {
                    return Err(CatalogError::OverlappingPeriods {
                        code: code.to_string(),
                        start: period.start_date,
                    });
                }
                Some(prev_end) if prev_end >= period.start_date => {
                    return Err(CatalogError::OverlappingPeriods {
                        code: code.to_string(),
                        start: period.start_date,
                    });
                }
                Some(_) => {}
            }
        }

        // The successor must start strictly after the new period ends.
        if let Some(next) = entry.periods.get(idx) {
            match period.end_date {
                None => {
                    return Err(CatalogError::OpenEndedNotLatest {
                        code: code.to_string(),
                    });
                }
                Some(end) if end >= next.start_date => {
                    return Err(CatalogError::OverlappingPeriods {
                        code: code.to_string(),
                        start: period.start_date,
                    });
                }
                Some(_) => {}
            }
        }

        entry.periods.insert(idx, period);
        Ok(())
    }

    /// Bulk-load a collaborator snapshot without write-time checks.
    ///
    /// Persistence data may predate the no-overlap invariant, so
    /// [`resolve_price`](Self::resolve_price) still detects overlapping
    /// coverage defensively on every read.
    pub fn from_snapshot(
        codes: impl IntoIterator<Item = (CareCode, Vec<ValidityPeriod>)>,
    ) -> Self {
        let mut entries = BTreeMap::new();
        for (info, mut periods) in codes {
            periods.sort_by_key(|p| p.start_date);
            entries.insert(info.code.clone(), CatalogEntry { info, periods });
        }
        Self { entries }
    }

    /// Look up a registered care code.
    pub fn care_code(&self, code: &str) -> Option<&CareCode> {
        self.entries.get(code).map(|e| &e.info)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Validity periods of a code, sorted by start date.
    pub fn periods(&self, code: &str) -> Option<&[ValidityPeriod]> {
        self.entries.get(code).map(|e| e.periods.as_slice())
    }

    /// Resolve the gross tariff price effective on `on_date`.
    ///
    /// Boundary dates are inclusive on both ends. No covering period
    /// (including an unknown code) fails with
    /// [`TariffError::NoPriceDefined`]; two covering periods in a
    /// corrupted snapshot fail with [`TariffError::AmbiguousPrice`] —
    /// the engine never silently picks one.
    pub fn resolve_price(&self, code: &str, on_date: NaiveDate) -> Result<Decimal, TariffError> {
        let no_price = || TariffError::NoPriceDefined {
            code: code.to_string(),
            date: on_date,
        };
        let entry = self.entries.get(code).ok_or_else(no_price)?;

        // Only periods starting on or before the date can cover it. The
        // back-scan is bounded by the handful of tariff revisions a code
        // accumulates; snapshots bypass insertion checks, so a single
        // candidate cannot be trusted here.
        let idx = entry.periods.partition_point(|p| p.start_date <= on_date);
        let mut found: Option<Decimal> = None;
        for period in entry.periods[..idx].iter().rev() {
            if period.covers(on_date) {
                if found.is_some() {
                    return Err(TariffError::AmbiguousPrice {
                        code: code.to_string(),
                        date: on_date,
                    });
                }
                found = Some(period.gross_amount);
            }
        }
        found.ok_or_else(no_price)
    }

    /// Number of registered care codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
