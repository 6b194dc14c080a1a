use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pricing faults raised by the tariff catalog.
///
/// Both variants are fatal to the act being priced: the engine never
/// defaults a missing price to zero and never silently picks one of two
/// overlapping periods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TariffError {
    /// No validity period of the care code covers the date.
    #[error("no price defined for care code {code} on {date}")]
    NoPriceDefined { code: String, date: NaiveDate },

    /// More than one validity period covers the date — a data integrity
    /// fault in the loaded snapshot.
    #[error("overlapping validity periods for care code {code} cover {date}")]
    AmbiguousPrice { code: String, date: NaiveDate },
}

/// Registration-time faults raised when building a tariff catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("care code {0} is already registered")]
    DuplicateCode(String),

    #[error("unknown care code {0}")]
    UnknownCode(String),

    #[error("validity end date {end} is before start date {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("validity period starting {start} overlaps an existing period of {code}")]
    OverlappingPeriods { code: String, start: NaiveDate },

    /// An open-ended period must be the most recent one of its code.
    #[error("open-ended validity period of {code} must be the most recent")]
    OpenEndedNotLatest { code: String },

    /// "Participation forfaitaire non dûe" only applies to acts the CNS
    /// reimburses.
    #[error("contribution undue can only be set on CNS-reimbursed codes ({0})")]
    ContributionUndueNotReimbursed(String),
}

/// Faults raised when building a hospitalization log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HospitalizationError {
    #[error("hospitalization end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("hospitalization starting {start} intersects another stay")]
    Overlapping { start: NaiveDate },
}

/// Matricule (social-security code) parsing and plausibility faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatriculeError {
    #[error("matricule does not follow the CNS scheme")]
    Unparseable,

    #[error("matricule implies an implausible age of {0}")]
    ImplausibleAge(i32),
}

/// Errors raised by invoice construction and numbering utilities.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactureError {
    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Invoice number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),
}

/// Structured reason attached to a [`ValidationRejection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionCode {
    /// The act date falls inside a hospitalization stay.
    Hospitalized,
    /// The act date is on or after the patient's death date.
    Deceased,
    /// A conflicting care code is already billed for the same day.
    CodeConflict,
    /// Accepting the act would exceed the invoice capacity.
    CapacityExceeded,
}

impl RejectionCode {
    /// Stable wire identifier for collaborators.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hospitalized => "HOSPITALIZED",
            Self::Deceased => "DECEASED",
            Self::CodeConflict => "CODE_CONFLICT",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
        }
    }

    /// Parse from the wire identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "HOSPITALIZED" => Some(Self::Hospitalized),
            "DECEASED" => Some(Self::Deceased),
            "CODE_CONFLICT" => Some(Self::CodeConflict),
            "CAPACITY_EXCEEDED" => Some(Self::CapacityExceeded),
            _ => None,
        }
    }
}

/// One failed validation check.
///
/// Rejections are expected, frequent business outcomes the caller presents
/// to a user — they are returned as values, never raised as errors, and a
/// rejected act leaves no partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRejection {
    pub code: RejectionCode,
    /// Human-readable description.
    pub message: String,
}

impl ValidationRejection {
    pub fn new(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}
