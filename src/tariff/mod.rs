//! Read-only tariff reference data.
//!
//! The catalog resolves the price effective on a given date; the
//! exclusivity rules decide which care codes may coexist on the same day.
//! Both are loaded once per billing request and are safe for unlimited
//! concurrent readers.

mod catalog;
mod exclusivity;

pub use catalog::TariffCatalog;
pub use exclusivity::ExclusivityRules;
