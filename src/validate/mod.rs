//! Act validation against hospitalization, death date, exclusivity, and
//! invoice capacity.

mod hospital;

pub use hospital::HospitalizationLog;

use crate::assembly::AssemblerConfig;
use crate::core::{
    InvoiceItem, PatientFlags, Prestation, RejectionCode, ValidationRejection,
};
use crate::tariff::ExclusivityRules;

/// Stateless validation of one proposed act.
///
/// All checks run independently and every failure is reported, so the
/// caller can present the full list to a user. An empty result means the
/// act is billable. Validation never mutates anything; appending is the
/// assembler's job and happens only when this returns empty.
#[derive(Debug, Clone, Copy)]
pub struct ActValidator<'a> {
    rules: &'a ExclusivityRules,
    config: &'a AssemblerConfig,
}

impl<'a> ActValidator<'a> {
    pub fn new(rules: &'a ExclusivityRules, config: &'a AssemblerConfig) -> Self {
        Self { rules, config }
    }

    /// Validate a proposed act against the target invoice.
    ///
    /// `replacing` names the index of an act being superseded in the same
    /// transaction; that act is excluded from the conflict and capacity
    /// checks.
    pub fn validate(
        &self,
        act: &Prestation,
        patient: &PatientFlags,
        hospitalizations: &HospitalizationLog,
        invoice: &InvoiceItem,
        replacing: Option<usize>,
    ) -> Vec<ValidationRejection> {
        let mut rejections = Vec::new();
        let date = act.date();

        if hospitalizations.covers(date) {
            rejections.push(ValidationRejection::new(
                RejectionCode::Hospitalized,
                format!("patient has hospitalization records for {date}"),
            ));
        }

        if let Some(death) = patient.date_of_death {
            if date >= death {
                rejections.push(ValidationRejection::new(
                    RejectionCode::Deceased,
                    format!(
                        "act date {date} cannot be later than or equal to the patient's death date {death}"
                    ),
                ));
            }
        }

        self.check_exclusivity(act, invoice, replacing, &mut rejections);
        self.check_capacity(act, invoice, replacing, &mut rejections);

        rejections
    }

    /// An act conflicts with any active same-day act billing the same code
    /// or a code from a shared exclusivity group.
    fn check_exclusivity(
        &self,
        act: &Prestation,
        invoice: &InvoiceItem,
        replacing: Option<usize>,
        rejections: &mut Vec<ValidationRejection>,
    ) {
        let date = act.date();
        let conflicting: Vec<&str> = invoice
            .acts()
            .iter()
            .enumerate()
            .filter(|(index, billed)| {
                !billed.is_removed()
                    && replacing != Some(*index)
                    && billed.prestation.date() == date
            })
            .map(|(_, billed)| billed.prestation.care_code.as_str())
            .filter(|billed_code| {
                *billed_code == act.care_code || self.rules.conflicts(&act.care_code, billed_code)
            })
            .collect();

        if !conflicting.is_empty() {
            rejections.push(ValidationRejection::new(
                RejectionCode::CodeConflict,
                format!(
                    "care code {} cannot be applied because care code(s) {} have been billed already for {date}",
                    act.care_code,
                    conflicting.join(", "),
                ),
            ));
        }
    }

    /// Capacity is checked on the resulting count: current active acts,
    /// minus the superseded one, plus the candidate, plus the automatic
    /// at-home pair when one would be created.
    fn check_capacity(
        &self,
        act: &Prestation,
        invoice: &InvoiceItem,
        replacing: Option<usize>,
        rejections: &mut Vec<ValidationRejection>,
    ) {
        let mut resulting = invoice.active_count();
        if replacing.is_some_and(|index| invoice.is_active(index)) {
            resulting -= 1;
        }
        resulting += 1;
        if act.at_home && !invoice.has_active_code_on(&self.config.at_home_care_code, act.date()) {
            resulting += 1;
        }

        if resulting > self.config.prestation_limit_max {
            rejections.push(ValidationRejection::new(
                RejectionCode::CapacityExceeded,
                format!(
                    "max number of prestations for one invoice is {}",
                    self.config.prestation_limit_max
                ),
            ));
        }
    }
}
