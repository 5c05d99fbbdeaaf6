use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("monthly wage must be positive, got {0}")]
    InvalidSalaryConfiguration(Decimal),

    #[error("employee {0} has no salary configuration")]
    MissingSalaryConfiguration(u64),

    #[error("payroll already exists for employee {employee_id} period {month}/{year}")]
    DuplicatePayrollPeriod {
        employee_id: u64,
        month: u32,
        year: i32,
    },

    /// Non-fatal: the window has no working days, so per-day rates and LOP
    /// collapse to zero. Surfaced as a warning alongside the result, never
    /// as a rejection.
    #[error("no working days between {start} and {end}")]
    EmptyAttendanceWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}
