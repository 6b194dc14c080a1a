//! Invoice assembly: submitting validated acts onto invoices and grouping
//! invoices into batches.

mod batch;

pub use batch::{AssignmentResult, assign_to_batch};

use serde::{Deserialize, Serialize};

use crate::billing::BillingCalculator;
use crate::core::{
    BilledAct, BillingResult, InvoiceItem, PatientFlags, Prestation, TariffError,
    ValidationRejection,
};
use crate::tariff::{ExclusivityRules, TariffCatalog};
use crate::validate::{ActValidator, HospitalizationLog};

/// Maximum number of active acts one invoice may hold.
pub const PRESTATION_LIMIT_MAX: usize = 20;

/// Tunables of the assembly pipeline.
///
/// Threaded explicitly through every call; the engine has no ambient
/// configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Capacity ceiling per invoice.
    pub prestation_limit_max: usize,
    /// Care code billed automatically alongside an at-home act
    /// (displacement fee).
    pub at_home_care_code: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            prestation_limit_max: PRESTATION_LIMIT_MAX,
            at_home_care_code: "NF01".to_string(),
        }
    }
}

/// Outcome of submitting one act.
///
/// Rejection is a normal, frequent business outcome — it is a value, not
/// an error. Only tariff faults surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// The act (and its at-home pair, when one was due) was appended.
    Accepted {
        billing: BillingResult,
        /// Billing of the automatically created at-home pair, if any.
        pair: Option<BillingResult>,
    },
    /// The act failed validation; the invoice is untouched.
    Rejected(Vec<ValidationRejection>),
}

/// Validates, prices, and appends acts onto invoices.
///
/// `submit` and `replace` take the invoice by exclusive reference and run
/// "count, validate, append" inside that single borrow, so two concurrent
/// submissions to the same invoice cannot interleave and over-fill it.
/// Callers sharing invoices across threads wrap each invoice in a `Mutex`
/// to obtain the same critical section.
#[derive(Debug, Clone)]
pub struct InvoiceAssembler<'a> {
    catalog: &'a TariffCatalog,
    rules: &'a ExclusivityRules,
    config: AssemblerConfig,
}

impl<'a> InvoiceAssembler<'a> {
    pub fn new(catalog: &'a TariffCatalog, rules: &'a ExclusivityRules) -> Self {
        Self::with_config(catalog, rules, AssemblerConfig::default())
    }

    pub fn with_config(
        catalog: &'a TariffCatalog,
        rules: &'a ExclusivityRules,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            catalog,
            rules,
            config,
        }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Submit one act for the invoice's patient.
    ///
    /// On validation failure the rejections are returned and the invoice
    /// is untouched. On tariff failure (for the act or its at-home pair)
    /// the error propagates and the invoice is untouched. Only when every
    /// step succeeded are the act and its pair appended.
    pub fn submit(
        &self,
        invoice: &mut InvoiceItem,
        act: Prestation,
        patient: &PatientFlags,
        hospitalizations: &HospitalizationLog,
    ) -> Result<SubmitOutcome, TariffError> {
        self.submit_inner(invoice, act, patient, hospitalizations, None)
    }

    /// Supersede the act at `index` with a new one in a single
    /// transaction. The superseded act is excluded from the conflict and
    /// capacity checks and soft-removed only on acceptance.
    pub fn replace(
        &self,
        invoice: &mut InvoiceItem,
        index: usize,
        act: Prestation,
        patient: &PatientFlags,
        hospitalizations: &HospitalizationLog,
    ) -> Result<SubmitOutcome, TariffError> {
        self.submit_inner(invoice, act, patient, hospitalizations, Some(index))
    }

    fn submit_inner(
        &self,
        invoice: &mut InvoiceItem,
        act: Prestation,
        patient: &PatientFlags,
        hospitalizations: &HospitalizationLog,
        replacing: Option<usize>,
    ) -> Result<SubmitOutcome, TariffError> {
        let validator = ActValidator::new(self.rules, &self.config);
        let rejections = validator.validate(&act, patient, hospitalizations, invoice, replacing);
        if !rejections.is_empty() {
            return Ok(SubmitOutcome::Rejected(rejections));
        }

        // Price everything before touching the invoice, so a tariff fault
        // cannot leave a half-applied transaction.
        let calculator = BillingCalculator::new(self.catalog);
        let billing = calculator.compute(&act, patient)?;

        let pair = if act.at_home
            && !invoice.has_active_code_on(&self.config.at_home_care_code, act.date())
        {
            let pair_act = Prestation {
                care_code: self.config.at_home_care_code.clone(),
                employee: act.employee.clone(),
                timestamp: act.timestamp,
                at_home: false,
            };
            let pair_billing = calculator.compute(&pair_act, patient)?;
            Some((pair_act, pair_billing))
        } else {
            None
        };

        if let Some(index) = replacing {
            invoice.remove_act(index);
        }
        invoice.push_act(BilledAct::new(act, billing.clone()));
        let pair_billing = pair.map(|(pair_act, pair_billing)| {
            invoice.push_act(BilledAct::new(pair_act, pair_billing.clone()));
            pair_billing
        });

        Ok(SubmitOutcome::Accepted {
            billing,
            pair: pair_billing,
        })
    }
}
