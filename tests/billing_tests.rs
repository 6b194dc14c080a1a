use chrono::{NaiveDate, NaiveDateTime};
use curafact::billing::BillingCalculator;
use curafact::core::*;
use curafact::tariff::TariffCatalog;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(10, 0, 0).unwrap()
}

fn catalog() -> TariffCatalog {
    let mut catalog = TariffCatalog::new();

    catalog
        .register_code(CareCode::new("N29", "Soins d'hygiène"))
        .unwrap();
    catalog
        .add_period("N29", ValidityPeriod::open_ended(date(2015, 1, 1), dec!(30.00)))
        .unwrap();

    catalog
        .register_code(CareCode::new("N50", "Pansement complexe"))
        .unwrap();
    catalog
        .add_period("N50", ValidityPeriod::open_ended(date(2015, 1, 1), dec!(100.00)))
        .unwrap();

    catalog
        .register_code(CareCode::new("PRV1", "Soins de confort").reimbursed(false))
        .unwrap();
    catalog
        .add_period("PRV1", ValidityPeriod::open_ended(date(2015, 1, 1), dec!(45.00)))
        .unwrap();

    catalog
        .register_code(CareCode::new("FRF1", "Forfait dépendance").contribution_undue(true))
        .unwrap();
    catalog
        .add_period("FRF1", ValidityPeriod::open_ended(date(2015, 1, 1), dec!(18.40)))
        .unwrap();

    catalog
}

fn act(code: &str, timestamp: NaiveDateTime) -> Prestation {
    PrestationBuilder::new(code, timestamp).build()
}

fn cns_patient() -> PatientFlags {
    PatientFlags::default()
}

// --- The 88/12 split ---

#[test]
fn n29_reimbursed_split() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("N29", ts(2015, 6, 15)), &cns_patient())
        .unwrap();

    assert_eq!(result.gross, dec!(30.00));
    assert_eq!(result.net, dec!(26.40));
    assert_eq!(result.personal_participation, dec!(3.60));
}

#[test]
fn round_hundred_split() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("N50", ts(2020, 3, 1)), &cns_patient())
        .unwrap();

    assert_eq!(result.gross, dec!(100.00));
    assert_eq!(result.net, dec!(88.00));
    assert_eq!(result.personal_participation, dec!(12.00));
}

#[test]
fn shares_are_rounded_separately() {
    let mut catalog = TariffCatalog::new();
    catalog.register_code(CareCode::new("N33", "Soins")).unwrap();
    // Tariff imports carry more than two decimals.
    catalog
        .add_period("N33", ValidityPeriod::open_ended(date(2020, 1, 1), dec!(10.3333)))
        .unwrap();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("N33", ts(2020, 6, 1)), &cns_patient())
        .unwrap();

    // 10.3333 × 0.88 = 9.093304 → 9.09; 10.3333 × 0.12 = 1.239996 → 1.24.
    assert_eq!(result.net, dec!(9.09));
    assert_eq!(result.personal_participation, dec!(1.24));
}

#[test]
fn two_decimal_gross_reconciles_exactly() {
    let mut catalog = TariffCatalog::new();
    catalog.register_code(CareCode::new("N34", "Soins")).unwrap();
    catalog
        .add_period("N34", ValidityPeriod::open_ended(date(2020, 1, 1), dec!(30.05)))
        .unwrap();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("N34", ts(2020, 6, 1)), &cns_patient())
        .unwrap();

    // 26.444 → 26.44 and 3.606 → 3.61; the post-rounded shares sum back
    // to the gross, which is what invoice reconciliation checks.
    assert_eq!(result.net, dec!(26.44));
    assert_eq!(result.personal_participation, dec!(3.61));
    assert_eq!(result.net + result.personal_participation, result.gross);
}

// --- Patient flag branches ---

#[test]
fn private_patient_pays_everything() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);
    let private = PatientFlags {
        is_private: true,
        ..Default::default()
    };

    for code in ["N29", "N50", "PRV1", "FRF1"] {
        let result = calculator.compute(&act(code, ts(2020, 3, 1)), &private).unwrap();
        assert_eq!(result.net, Decimal::ZERO, "code {code}");
        assert_eq!(result.personal_participation, result.gross, "code {code}");
    }
}

#[test]
fn non_reimbursed_code_never_hits_cns() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("PRV1", ts(2020, 3, 1)), &cns_patient())
        .unwrap();

    assert_eq!(result.gross, dec!(45.00));
    assert_eq!(result.net, Decimal::ZERO);
    assert_eq!(result.personal_participation, dec!(45.00));
}

#[test]
fn statutory_participation_waives_patient_share() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);
    let patient = PatientFlags {
        participation_statutaire: true,
        ..Default::default()
    };

    let result = calculator.compute(&act("N50", ts(2020, 3, 1)), &patient).unwrap();

    assert_eq!(result.net, dec!(88.00));
    assert_eq!(result.personal_participation, Decimal::ZERO);
}

#[test]
fn contribution_undue_reimburses_full_tariff() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let result = calculator
        .compute(&act("FRF1", ts(2020, 3, 1)), &cns_patient())
        .unwrap();

    assert_eq!(result.gross, dec!(18.40));
    assert_eq!(result.net, dec!(18.40));
    assert_eq!(result.personal_participation, Decimal::ZERO);
}

// --- Error propagation ---

#[test]
fn unknown_code_propagates_no_price_defined() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let err = calculator
        .compute(&act("ZZ99", ts(2020, 3, 1)), &cns_patient())
        .unwrap_err();

    assert_eq!(
        err,
        TariffError::NoPriceDefined {
            code: "ZZ99".into(),
            date: date(2020, 3, 1),
        }
    );
}

#[test]
fn date_before_first_tariff_propagates_no_price_defined() {
    let catalog = catalog();
    let calculator = BillingCalculator::new(&catalog);

    let err = calculator
        .compute(&act("N29", ts(2014, 12, 31)), &cns_patient())
        .unwrap_err();

    assert!(matches!(err, TariffError::NoPriceDefined { .. }));
}

#[test]
fn ambiguous_price_propagates_unchanged() {
    let catalog = TariffCatalog::from_snapshot([(
        CareCode::new("N29", "Soins d'hygiène"),
        vec![
            ValidityPeriod::open_ended(date(2015, 1, 1), dec!(30.00)),
            ValidityPeriod::open_ended(date(2016, 1, 1), dec!(31.00)),
        ],
    )]);
    let calculator = BillingCalculator::new(&catalog);

    let err = calculator
        .compute(&act("N29", ts(2020, 3, 1)), &cns_patient())
        .unwrap_err();

    assert!(matches!(err, TariffError::AmbiguousPrice { .. }));
}
