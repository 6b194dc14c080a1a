use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::round_half_up;
use crate::core::{BillingResult, PatientFlags, Prestation, TariffError};
use crate::tariff::TariffCatalog;

/// Computes the gross, net, and personal-participation amounts for one
/// act.
///
/// The CNS reimburses 88% of the tariff; the remaining 12% is the
/// patient's statutory share. Both shares are rounded to 2 places
/// separately — downstream reconciliation sums the post-rounded values,
/// so the net share must never be derived as `gross - participation`.
#[derive(Debug, Clone, Copy)]
pub struct BillingCalculator<'a> {
    catalog: &'a TariffCatalog,
}

impl<'a> BillingCalculator<'a> {
    pub fn new(catalog: &'a TariffCatalog) -> Self {
        Self { catalog }
    }

    /// Price one act for one patient on the act's date.
    ///
    /// Tariff errors propagate unchanged; there is no fallback price.
    pub fn compute(
        &self,
        act: &Prestation,
        patient: &PatientFlags,
    ) -> Result<BillingResult, TariffError> {
        let date = act.date();
        let gross = self.catalog.resolve_price(&act.care_code, date)?;
        let info = self
            .catalog
            .care_code(&act.care_code)
            .ok_or_else(|| TariffError::NoPriceDefined {
                code: act.care_code.clone(),
                date,
            })?;

        // Private acts never flow through the CNS channel.
        if patient.is_private || !info.reimbursed {
            return Ok(BillingResult {
                gross,
                net: Decimal::ZERO,
                personal_participation: gross,
            });
        }

        // "Participation forfaitaire non dûe": the 12% share is waived and
        // the insurer covers the full tariff.
        if info.contribution_undue {
            return Ok(BillingResult {
                gross,
                net: gross,
                personal_participation: Decimal::ZERO,
            });
        }

        let net = round_half_up(gross * dec!(0.88), 2);
        let personal_participation = if patient.participation_statutaire {
            Decimal::ZERO
        } else {
            round_half_up(gross * dec!(0.12), 2)
        };

        Ok(BillingResult {
            gross,
            net,
            personal_participation,
        })
    }
}
