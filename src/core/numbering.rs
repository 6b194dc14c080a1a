use chrono::{Datelike, NaiveDate};

use super::error::FactureError;

/// Gapless invoice number sequence generator.
///
/// Generates invoice numbers in the format `{prefix}{year}-{sequential}`,
/// e.g. "2024-0001", "2024-0002". Invoice numbers must be unique and
/// gapless within a sequence; this struct tracks the last issued number.
#[derive(Debug, Clone)]
pub struct InvoiceNumberSequence {
    prefix: String,
    year: i32,
    next_number: u64,
    zero_pad: usize,
}

impl InvoiceNumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>, year: i32) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number: 1,
            zero_pad: 4,
        }
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, year: i32, next_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number,
            zero_pad: 4,
        }
    }

    /// Resume after the highest numeric suffix found among existing invoice
    /// numbers. Numbers that do not end in a plain integer are skipped.
    pub fn continue_from<'a>(
        prefix: impl Into<String>,
        year: i32,
        existing: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let max = existing
            .into_iter()
            .filter_map(|number| number.rsplit('-').next())
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self::starting_at(prefix, year, max + 1)
    }

    /// Set zero-padding width (default: 4, so "0001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Generate the next invoice number.
    pub fn next_number(&mut self) -> String {
        let num = self.next_number;
        self.next_number += 1;
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            self.year,
            num,
            width = self.zero_pad
        )
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            self.year,
            self.next_number,
            width = self.zero_pad
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Next number that will be issued, without prefix/formatting.
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Advance to a new year, resetting the counter to 1.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), FactureError> {
        if new_year <= self.year {
            return Err(FactureError::Numbering(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance year if the given date is in a new year.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let date_year = date.year();
        if date_year > self.year {
            self.year = date_year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_numbering() {
        let mut seq = InvoiceNumberSequence::new("", 2024);
        assert_eq!(seq.next_number(), "2024-0001");
        assert_eq!(seq.next_number(), "2024-0002");
        assert_eq!(seq.next_number(), "2024-0003");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = InvoiceNumberSequence::new("F", 2024);
        assert_eq!(seq.peek(), "F2024-0001");
        assert_eq!(seq.peek(), "F2024-0001");
        assert_eq!(seq.next_number(), "F2024-0001");
        assert_eq!(seq.peek(), "F2024-0002");
    }

    #[test]
    fn continue_from_existing_numbers() {
        let existing = ["2024-0007", "2024-0012", "2024-0003"];
        let mut seq = InvoiceNumberSequence::continue_from("", 2024, existing);
        assert_eq!(seq.next_number(), "2024-0013");
    }

    #[test]
    fn continue_from_skips_non_numeric() {
        let existing = ["2024-0002", "AVOIR-X", ""];
        let mut seq = InvoiceNumberSequence::continue_from("", 2024, existing);
        assert_eq!(seq.next_number(), "2024-0003");
    }

    #[test]
    fn continue_from_empty_starts_at_one() {
        let mut seq = InvoiceNumberSequence::continue_from("", 2024, []);
        assert_eq!(seq.next_number(), "2024-0001");
    }

    #[test]
    fn custom_padding() {
        let mut seq = InvoiceNumberSequence::new("", 2024).with_padding(6);
        assert_eq!(seq.next_number(), "2024-000001");
    }

    #[test]
    fn year_advance() {
        let mut seq = InvoiceNumberSequence::new("", 2024);
        seq.next_number();
        seq.next_number();
        seq.advance_year(2025).unwrap();
        assert_eq!(seq.next_number(), "2025-0001");
    }

    #[test]
    fn year_advance_rejects_past() {
        let mut seq = InvoiceNumberSequence::new("", 2024);
        assert!(seq.advance_year(2023).is_err());
        assert!(seq.advance_year(2024).is_err());
    }

    #[test]
    fn auto_advance_year() {
        let mut seq = InvoiceNumberSequence::new("", 2024);
        seq.next_number();

        let jan_2025 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(seq.auto_advance(jan_2025));
        assert_eq!(seq.next_number(), "2025-0001");

        let feb_2025 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(!seq.auto_advance(feb_2025));
        assert_eq!(seq.next_number(), "2025-0002");
    }
}
