use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Payment lifecycle of a payroll record. Strictly forward-moving:
/// Pending -> Processed -> Paid.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
pub enum PaymentStatus {
    Pending,
    Processed,
    Paid,
}

impl PaymentStatus {
    fn rank(self) -> u8 {
        match self {
            PaymentStatus::Pending => 0,
            PaymentStatus::Processed => 1,
            PaymentStatus::Paid => 2,
        }
    }

    /// A transition is legal only when it moves forward. Skipping ahead
    /// (Pending -> Paid) is allowed; regressing is not.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// One generated payslip: a snapshot of salary components, the attendance
/// aggregate it was derived from, and the resulting gross/net amounts.
/// Unique per (employee_id, month, year).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 25000.0, value_type = f64)]
    pub basic_salary: Decimal,

    #[schema(example = 12500.0, value_type = f64)]
    pub hra: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub transport_allowance: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub medical_allowance: Decimal,
    #[schema(example = 17335.0, value_type = f64)]
    pub other_allowance: Decimal,

    #[schema(example = 200.0, value_type = f64)]
    pub tax_deduction: Decimal,
    #[schema(example = 3000.0, value_type = f64)]
    pub pf_deduction: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub insurance_deduction: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub other_deduction: Decimal,

    #[schema(example = 3165.0, value_type = f64)]
    pub bonuses: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub overtime_pay: Decimal,

    #[schema(example = 0)]
    pub lop_days: u32,
    #[schema(example = 0.0, value_type = f64)]
    pub lop_deduction: Decimal,

    pub total_working_days: u32,
    pub present_days: u32,
    pub half_days: u32,
    pub paid_leaves: u32,
    pub sick_leaves: u32,
    pub unpaid_leaves: u32,
    pub absent_days: u32,
    pub late_arrivals: u32,
    #[schema(example = 2.5, value_type = f64)]
    pub overtime_hours: Decimal,

    #[schema(example = 58000.0, value_type = f64)]
    pub gross_salary: Decimal,
    #[schema(example = 54800.0, value_type = f64)]
    pub net_salary: Decimal,

    pub payment_status: PaymentStatus,

    #[schema(example = "2026-01-28", value_type = String, format = "date", nullable = true)]
    pub payment_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_never_regresses() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Processed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Processed.can_transition_to(PaymentStatus::Paid));

        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Processed));
        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Processed.can_transition_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Pending));
    }
}
