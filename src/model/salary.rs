use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::components::ComponentPercents;

/// Per-employee wage configuration. One row per employee; every column has a
/// database-side default so a freshly configured employee starts from the
/// standard split (basic 50% of wage, HRA 50% of basic, PF 12%, professional
/// tax 200 flat).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryConfiguration {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 50000.0, value_type = f64)]
    pub monthly_wage: Decimal,

    #[schema(example = 50.0, value_type = f64)]
    pub basic_pct: Decimal,

    /// Percentage of *basic salary*, not of the monthly wage.
    #[schema(example = 50.0, value_type = f64)]
    pub hra_pct: Decimal,

    #[schema(example = 16.67, value_type = f64)]
    pub standard_pct: Decimal,

    #[schema(example = 6.33, value_type = f64)]
    pub performance_pct: Decimal,

    #[schema(example = 6.33, value_type = f64)]
    pub lta_pct: Decimal,

    #[schema(example = 11.67, value_type = f64)]
    pub fixed_pct: Decimal,

    /// Percentage of basic salary.
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employee_pct: Decimal,

    /// Percentage of basic salary. Informational only, never deducted from
    /// net pay.
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employer_pct: Decimal,

    /// Flat monthly amount, not a percentage.
    #[schema(example = 200.0, value_type = f64)]
    pub professional_tax: Decimal,

    #[schema(example = 0.0, value_type = f64)]
    pub income_tax_pct: Decimal,

    #[schema(example = 5)]
    pub working_days_per_week: u8,

    #[schema(example = 1.0, value_type = f64)]
    pub break_time_hours: Decimal,
}

impl SalaryConfiguration {
    pub fn percents(&self) -> ComponentPercents {
        ComponentPercents {
            basic: self.basic_pct,
            hra: self.hra_pct,
            standard_allowance: self.standard_pct,
            performance_bonus: self.performance_pct,
            leave_travel_allowance: self.lta_pct,
            fixed_allowance: self.fixed_pct,
            pf_employee: self.pf_employee_pct,
            pf_employer: self.pf_employer_pct,
            professional_tax: self.professional_tax,
            income_tax: self.income_tax_pct,
        }
    }
}
