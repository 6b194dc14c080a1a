use chrono::{NaiveDate, NaiveDateTime};

use super::error::FactureError;
use super::types::*;

/// Builder for constructing coherent invoices.
///
/// ```
/// use chrono::NaiveDate;
/// use curafact::core::*;
///
/// let patient = PatientFlags { is_private: true, ..Default::default() };
/// let invoice = InvoiceItemBuilder::new("2024-0101", NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
///     .patient("P-0042", &patient)
///     .private(true)
///     .build()
///     .unwrap();
/// assert!(invoice.is_private);
/// ```
pub struct InvoiceItemBuilder {
    invoice_number: String,
    invoice_date: NaiveDate,
    is_private: bool,
    patient: Option<(String, bool)>,
    accident: Option<AccidentReference>,
}

impl InvoiceItemBuilder {
    pub fn new(invoice_number: impl Into<String>, invoice_date: NaiveDate) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            invoice_date,
            is_private: false,
            patient: None,
            accident: None,
        }
    }

    /// Set the patient this invoice bills. The flags are captured to check
    /// private/CNS coherence at build time.
    pub fn patient(mut self, patient_id: impl Into<String>, flags: &PatientFlags) -> Self {
        self.patient = Some((patient_id.into(), flags.is_private));
        self
    }

    /// Mark the invoice as private (patient without CNS coverage).
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn accident(mut self, number: impl Into<String>, date: NaiveDate) -> Self {
        self.accident = Some(AccidentReference {
            number: number.into(),
            date,
        });
        self
    }

    /// Build the invoice, checking number and patient coherence.
    pub fn build(self) -> Result<InvoiceItem, FactureError> {
        if self.invoice_number.trim().is_empty() {
            return Err(FactureError::Builder(
                "invoice number must not be empty".into(),
            ));
        }

        let (patient_id, patient_is_private) = self
            .patient
            .ok_or_else(|| FactureError::Builder("patient is required".into()))?;

        if self.is_private && !patient_is_private {
            return Err(FactureError::Builder(
                "only private patients are allowed on a private invoice".into(),
            ));
        }
        if !self.is_private && patient_is_private {
            return Err(FactureError::Builder(
                "private patients cannot be billed on a CNS invoice".into(),
            ));
        }

        Ok(InvoiceItem::from_parts(
            self.invoice_number,
            self.invoice_date,
            self.is_private,
            patient_id,
            self.accident,
        ))
    }
}

/// Builder for care acts.
pub struct PrestationBuilder {
    care_code: String,
    timestamp: NaiveDateTime,
    employee: Option<String>,
    at_home: bool,
}

impl PrestationBuilder {
    pub fn new(care_code: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            care_code: care_code.into(),
            timestamp,
            employee: None,
            at_home: false,
        }
    }

    pub fn employee(mut self, employee: impl Into<String>) -> Self {
        self.employee = Some(employee.into());
        self
    }

    pub fn at_home(mut self, at_home: bool) -> Self {
        self.at_home = at_home;
        self
    }

    pub fn build(self) -> Prestation {
        Prestation {
            care_code: self.care_code,
            employee: self.employee,
            timestamp: self.timestamp,
            at_home: self.at_home,
        }
    }
}
