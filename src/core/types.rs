use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A billable tariff code for a type of nursing act.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareCode {
    /// Unique code identifier (e.g. "N29", "NF01").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Longer description shown on invoice documents.
    pub description: String,
    /// Whether the CNS reimburses this act ("prise en charge par CNS").
    pub reimbursed: bool,
    /// "Participation forfaitaire non dûe" — when set, the statutory 12%
    /// share is not deducted and the insurer covers the full tariff.
    /// Only meaningful on reimbursed codes.
    pub contribution_undue: bool,
}

impl CareCode {
    /// Create a reimbursed care code with an empty description.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            reimbursed: true,
            contribution_undue: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn reimbursed(mut self, reimbursed: bool) -> Self {
        self.reimbursed = reimbursed;
        self
    }

    pub fn contribution_undue(mut self, contribution_undue: bool) -> Self {
        self.contribution_undue = contribution_undue;
        self
    }
}

impl std::fmt::Display for CareCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.code, self.name)
    }
}

/// A time-bounded price entry for a [`CareCode`].
///
/// `end_date` of `None` means the period is open-ended (currently valid).
/// Both bounds are inclusive. Periods of one care code must not overlap;
/// the catalog enforces this at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Full tariff price ("montant brut") effective during this period.
    pub gross_amount: Decimal,
}

impl ValidityPeriod {
    /// A period closed on both ends.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, gross_amount: Decimal) -> Self {
        Self {
            start_date,
            end_date: Some(end_date),
            gross_amount,
        }
    }

    /// A period with no end date — the currently valid tariff.
    pub fn open_ended(start_date: NaiveDate, gross_amount: Decimal) -> Self {
        Self {
            start_date,
            end_date: None,
            gross_amount,
        }
    }

    /// Whether `date` falls inside this period (inclusive on both ends).
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}

impl std::fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end_date {
            Some(end) => write!(f, "from {} to {}", self.start_date, end),
            None => write!(f, "from {} onwards", self.start_date),
        }
    }
}

/// The patient flag bundle supplied per billing request.
///
/// Collaborators (persistence layer) load this snapshot; the engine never
/// looks a patient up itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientFlags {
    /// Patient without CNS coverage; billed privately, never reimbursed.
    pub is_private: bool,
    /// Statutory participation waiver — the patient owes no 12% share.
    pub participation_statutaire: bool,
    /// Recorded date of death, if any. Acts on or after this date are
    /// rejected.
    pub date_of_death: Option<NaiveDate>,
    /// Age at billing time, when known (see [`super::matricule`]).
    pub age: Option<i32>,
}

/// One performed, billable nursing act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prestation {
    /// Care code identifier this act bills under.
    pub care_code: String,
    /// Employee who performed the act, when recorded.
    pub employee: Option<String>,
    /// Exact time the act was performed.
    pub timestamp: NaiveDateTime,
    /// Performed at the patient's home; triggers the automatic pairing
    /// with the configured displacement code.
    pub at_home: bool,
}

impl Prestation {
    /// Calendar date of the act — the granularity all validation rules
    /// operate on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Outcome of pricing one act: full tariff, insurer share, patient share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingResult {
    /// Full tariff price before any split.
    pub gross: Decimal,
    /// Portion reimbursed by the insurer.
    pub net: Decimal,
    /// The patient's co-payment share.
    pub personal_participation: Decimal,
}

/// An act accepted onto an invoice, frozen with its computed amounts.
///
/// Invoiced acts are never mutated; corrections soft-remove the act and
/// submit a replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilledAct {
    pub prestation: Prestation,
    pub billing: BillingResult,
    removed: bool,
}

impl BilledAct {
    pub(crate) fn new(prestation: Prestation, billing: BillingResult) -> Self {
        Self {
            prestation,
            billing,
            removed: false,
        }
    }

    /// Soft-removed acts stay on the invoice for audit but are excluded
    /// from counts, conflicts, and totals.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }
}

/// One hospitalization stay, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalizationPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HospitalizationPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Identifier of an [`InvoiceBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub u64);

/// Optional accident reference carried on an invoice ("numéro d'accident").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccidentReference {
    pub number: String,
    pub date: NaiveDate,
}

/// A "mémoire d'honoraire" — one invoice document for one patient.
///
/// Holds at most [`crate::assembly::PRESTATION_LIMIT_MAX`] active acts.
/// Acts are appended through [`crate::assembly::InvoiceAssembler`] only,
/// which validates and prices them first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Unique invoice number.
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    /// Invoice for a patient without CNS coverage. Must match the
    /// patient's own classification; checked at construction.
    pub is_private: bool,
    /// Collaborator-side patient identifier.
    pub patient_id: String,
    pub accident: Option<AccidentReference>,
    /// Batch this invoice is attached to, if any.
    pub batch: Option<BatchId>,
    acts: Vec<BilledAct>,
}

impl InvoiceItem {
    pub(crate) fn from_parts(
        invoice_number: String,
        invoice_date: NaiveDate,
        is_private: bool,
        patient_id: String,
        accident: Option<AccidentReference>,
    ) -> Self {
        Self {
            invoice_number,
            invoice_date,
            is_private,
            patient_id,
            accident,
            batch: None,
            acts: Vec::new(),
        }
    }

    /// All acts ever accepted, soft-removed ones included.
    pub fn acts(&self) -> &[BilledAct] {
        &self.acts
    }

    /// Acts that count: accepted and not soft-removed.
    pub fn active_acts(&self) -> impl Iterator<Item = &BilledAct> {
        self.acts.iter().filter(|a| !a.is_removed())
    }

    pub fn active_count(&self) -> usize {
        self.active_acts().count()
    }

    /// Whether the act at `index` exists and is not soft-removed.
    pub fn is_active(&self, index: usize) -> bool {
        self.acts.get(index).is_some_and(|a| !a.is_removed())
    }

    /// Whether an active act with the given care code exists on `date`.
    pub fn has_active_code_on(&self, care_code: &str, date: NaiveDate) -> bool {
        self.active_acts()
            .any(|a| a.prestation.care_code == care_code && a.prestation.date() == date)
    }

    /// Soft-remove the act at `index`. Returns false if the index is out
    /// of range or the act was already removed.
    pub fn remove_act(&mut self, index: usize) -> bool {
        match self.acts.get_mut(index) {
            Some(act) if !act.is_removed() => {
                act.mark_removed();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn push_act(&mut self, act: BilledAct) {
        self.acts.push(act);
    }

    /// Sum the amounts of all active acts.
    pub fn totals(&self) -> InvoiceTotals {
        let mut totals = InvoiceTotals::default();
        for act in self.active_acts() {
            totals.gross_total += act.billing.gross;
            totals.net_total += act.billing.net;
            totals.participation_total += act.billing.personal_participation;
        }
        totals
    }
}

impl std::fmt::Display for InvoiceItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invoice no. {} - patient {}",
            self.invoice_number, self.patient_id
        )
    }
}

/// Summed amounts over an invoice's active acts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub gross_total: Decimal,
    pub net_total: Decimal,
    pub participation_total: Decimal,
}

/// A date-ranged grouping of non-private invoices for bulk submission to
/// the CNS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceBatch {
    pub id: BatchId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// When the batch was transmitted, if it has been.
    pub send_date: Option<NaiveDate>,
    /// When the batch was paid, if it has been.
    pub payment_date: Option<NaiveDate>,
}

impl InvoiceBatch {
    pub fn new(id: BatchId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id,
            start_date,
            end_date,
            send_date: None,
            payment_date: None,
        }
    }

    /// Whether `date` falls inside the batch window (inclusive).
    pub fn window_contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl std::fmt::Display for InvoiceBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "from {} to {}", self.start_date, self.end_date)
    }
}
