//! # curafact
//!
//! Billing engine for home-nursing care invoicing: CNS tariff resolution,
//! net/participation split, act validation, and invoice batch assembly.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! The engine is a pure, synchronous library: persistence, document
//! rendering, and transport are collaborator concerns and feed it in-memory
//! snapshots ([`tariff::TariffCatalog`], [`tariff::ExclusivityRules`],
//! [`validate::HospitalizationLog`], [`core::PatientFlags`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use curafact::assembly::{InvoiceAssembler, SubmitOutcome};
//! use curafact::core::*;
//! use curafact::tariff::{ExclusivityRules, TariffCatalog};
//! use curafact::validate::HospitalizationLog;
//! use rust_decimal_macros::dec;
//!
//! let mut catalog = TariffCatalog::new();
//! catalog.register_code(CareCode::new("N29", "Soins d'hygiène")).unwrap();
//! catalog
//!     .add_period(
//!         "N29",
//!         ValidityPeriod::open_ended(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(), dec!(30.00)),
//!     )
//!     .unwrap();
//!
//! let rules = ExclusivityRules::new();
//! let assembler = InvoiceAssembler::new(&catalog, &rules);
//!
//! let patient = PatientFlags::default();
//! let mut invoice =
//!     InvoiceItemBuilder::new("2015-0042", NaiveDate::from_ymd_opt(2015, 6, 30).unwrap())
//!         .patient("P-0017", &patient)
//!         .build()
//!         .unwrap();
//!
//! let act = PrestationBuilder::new(
//!     "N29",
//!     NaiveDate::from_ymd_opt(2015, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap(),
//! )
//! .build();
//!
//! let outcome = assembler
//!     .submit(&mut invoice, act, &patient, &HospitalizationLog::new())
//!     .unwrap();
//!
//! match outcome {
//!     SubmitOutcome::Accepted { billing, .. } => {
//!         assert_eq!(billing.gross, dec!(30.00));
//!         assert_eq!(billing.net, dec!(26.40));
//!         assert_eq!(billing.personal_participation, dec!(3.60));
//!     }
//!     SubmitOutcome::Rejected(rejections) => unreachable!("{rejections:?}"),
//! }
//! ```

pub mod assembly;
pub mod billing;
pub mod core;
pub mod tariff;
pub mod validate;

// Re-export core types at crate root for convenience
pub use crate::core::*;
