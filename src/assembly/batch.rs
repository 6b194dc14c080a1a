use serde::{Deserialize, Serialize};

use crate::core::{InvoiceBatch, InvoiceItem};

/// Membership changes produced by one batch assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// Invoice numbers attached to the batch during this run.
    pub attached: Vec<String>,
    /// Invoice numbers detached from the batch during this run.
    pub detached: Vec<String>,
}

/// Recompute which invoices belong to a batch.
///
/// Disassociate-then-associate: invoices attached to this batch whose
/// date left the window are detached, then unattached eligible invoices
/// are attached. An invoice is eligible when it is not private, its date
/// falls inside the batch window (inclusive), and it is not attached to a
/// different batch — assignment never steals invoices.
///
/// The operation is idempotent: running it twice yields the same
/// membership as running it once.
pub fn assign_to_batch(invoices: &mut [InvoiceItem], batch: &InvoiceBatch) -> AssignmentResult {
    let mut result = AssignmentResult::default();

    for invoice in invoices.iter_mut() {
        let eligible = !invoice.is_private && batch.window_contains(invoice.invoice_date);
        match invoice.batch {
            Some(attached_to) if attached_to == batch.id => {
                if !eligible {
                    invoice.batch = None;
                    result.detached.push(invoice.invoice_number.clone());
                }
            }
            None if eligible => {
                invoice.batch = Some(batch.id);
                result.attached.push(invoice.invoice_number.clone());
            }
            _ => {}
        }
    }

    result
}
