//! Core billing types, error taxonomy, numbering, and matricule helpers.
//!
//! This module provides the foundational types of the billing engine:
//! care codes and their validity periods, acts, invoices, batches, and
//! the patient flag bundle supplied by collaborators.

mod builder;
mod error;
pub mod matricule;
mod numbering;
mod types;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
