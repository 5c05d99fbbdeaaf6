//! Payslip generation engine.
//!
//! Pure, deterministic computation: a [`crate::model::salary::SalaryConfiguration`]
//! plus one calendar month of attendance rows in, a fully itemized payslip
//! payload out. No clock reads, no randomness, no I/O; persistence and
//! payment-status defaulting against a reference date are the API layer's
//! concern.

pub mod components;
pub mod engine;
pub mod error;
pub mod summary;

pub use error::PayrollError;
