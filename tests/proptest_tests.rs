//! Property-based tests for the tariff, billing, and batching invariants.

use chrono::{Days, NaiveDate};
use curafact::assembly::assign_to_batch;
use curafact::billing::BillingCalculator;
use curafact::core::*;
use curafact::tariff::{ExclusivityRules, TariffCatalog};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base_date().checked_add_days(Days::new(offset)).unwrap()
}

/// Contiguous closed periods built from random segment lengths, starting
/// at `base_date()`. Returns the catalog plus each period's day-offset
/// range and price.
fn catalog_from_segments(lengths: &[u64]) -> (TariffCatalog, Vec<(u64, u64, Decimal)>) {
    let mut catalog = TariffCatalog::new();
    catalog
        .register_code(CareCode::new("N29", "Soins d'hygiène"))
        .unwrap();

    let mut ranges = Vec::new();
    let mut offset = 0u64;
    for (i, len) in lengths.iter().enumerate() {
        let start = offset;
        let end = offset + len - 1;
        let price = Decimal::new(2000 + i as i64, 2);
        catalog
            .add_period("N29", ValidityPeriod::new(day(start), day(end), price))
            .unwrap();
        ranges.push((start, end, price));
        offset = end + 1;
    }
    (catalog, ranges)
}

/// Generate a reasonable 2-place money amount (0.01 to 99999.99).
fn arb_gross() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn price_catalog(gross: Decimal) -> TariffCatalog {
    let mut catalog = TariffCatalog::new();
    catalog
        .register_code(CareCode::new("N29", "Soins d'hygiène"))
        .unwrap();
    catalog
        .add_period("N29", ValidityPeriod::open_ended(base_date(), gross))
        .unwrap();
    catalog
}

fn some_act() -> Prestation {
    PrestationBuilder::new("N29", day(10).and_hms_opt(9, 0, 0).unwrap()).build()
}

proptest! {
    /// Every date inside some period resolves to that period's price;
    /// every date outside all periods is NoPriceDefined.
    #[test]
    fn resolution_is_total_over_contiguous_periods(
        lengths in prop::collection::vec(1u64..60, 1..6),
        probe in 0u64..400,
    ) {
        let (catalog, ranges) = catalog_from_segments(&lengths);
        let result = catalog.resolve_price("N29", day(probe));

        match ranges.iter().find(|(start, end, _)| (*start..=*end).contains(&probe)) {
            Some((_, _, price)) => prop_assert_eq!(result, Ok(*price)),
            None => {
                let is_no_price = matches!(result, Err(TariffError::NoPriceDefined { .. }));
                prop_assert!(is_no_price);
            }
        }
    }

    /// Both shares are rounded separately, and for 2-place tariffs the
    /// post-rounded shares always sum back to the gross.
    #[test]
    fn split_reconciles_for_two_place_tariffs(gross in arb_gross()) {
        let catalog = price_catalog(gross);
        let calculator = BillingCalculator::new(&catalog);
        let result = calculator.compute(&some_act(), &PatientFlags::default()).unwrap();

        let net = (gross * Decimal::new(88, 2))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        let participation = (gross * Decimal::new(12, 2))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);

        prop_assert_eq!(result.net, net);
        prop_assert_eq!(result.personal_participation, participation);
        prop_assert_eq!(result.net + result.personal_participation, gross);
    }

    /// A private patient never gets anything reimbursed.
    #[test]
    fn private_patient_always_pays_gross(gross in arb_gross()) {
        let catalog = price_catalog(gross);
        let calculator = BillingCalculator::new(&catalog);
        let private = PatientFlags { is_private: true, ..Default::default() };
        let result = calculator.compute(&some_act(), &private).unwrap();

        prop_assert_eq!(result.net, Decimal::ZERO);
        prop_assert_eq!(result.personal_participation, gross);
    }

    /// Statutory participation zeroes the patient share and nothing else.
    #[test]
    fn statutory_participation_only_waives_patient_share(gross in arb_gross()) {
        let catalog = price_catalog(gross);
        let calculator = BillingCalculator::new(&catalog);
        let statutory = PatientFlags { participation_statutaire: true, ..Default::default() };
        let result = calculator.compute(&some_act(), &statutory).unwrap();

        let net = (gross * Decimal::new(88, 2))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(result.net, net);
        prop_assert_eq!(result.personal_participation, Decimal::ZERO);
    }

    /// conflicts(a, b) == conflicts(b, a) for arbitrary group layouts.
    #[test]
    fn conflicts_are_symmetric(
        groups in prop::collection::vec(
            prop::collection::vec(0u8..12, 2..5),
            0..4,
        ),
        a in 0u8..12,
        b in 0u8..12,
    ) {
        let mut rules = ExclusivityRules::new();
        for group in &groups {
            rules.add_group(group.iter().map(|n| format!("C{n}")));
        }
        let code_a = format!("C{a}");
        let code_b = format!("C{b}");
        prop_assert_eq!(rules.conflicts(&code_a, &code_b), rules.conflicts(&code_b, &code_a));
    }

    /// Batch assignment is idempotent: a second run changes nothing.
    #[test]
    fn batch_assignment_is_idempotent(
        offsets in prop::collection::vec(0u64..120, 1..12),
        window_start in 0u64..60,
        window_len in 0u64..60,
    ) {
        let flags = PatientFlags::default();
        let mut invoices: Vec<InvoiceItem> = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                InvoiceItemBuilder::new(format!("2020-{:04}", i + 1), day(*offset))
                    .patient("P-0001", &flags)
                    .build()
                    .unwrap()
            })
            .collect();

        let batch = InvoiceBatch::new(BatchId(1), day(window_start), day(window_start + window_len));

        assign_to_batch(&mut invoices, &batch);
        let after_first: Vec<Option<BatchId>> = invoices.iter().map(|i| i.batch).collect();

        let second = assign_to_batch(&mut invoices, &batch);
        let after_second: Vec<Option<BatchId>> = invoices.iter().map(|i| i.batch).collect();

        prop_assert_eq!(after_first, after_second);
        prop_assert!(second.attached.is_empty());
        prop_assert!(second.detached.is_empty());
    }
}
