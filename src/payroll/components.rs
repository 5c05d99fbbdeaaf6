//! Salary component derivation.
//!
//! The component split is an ordered chain of named percentage derivations.
//! Order matters: HRA and both provident-fund contributions apply to the
//! *basic salary* produced by the first step, not to the monthly wage, so
//! editing the basic percentage moves them too. The chain is data
//! ([`derivation_chain`]) rather than inline arithmetic so each step can be
//! inspected and tested on its own.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::PayrollError;

/// Amount a percentage is taken against.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Basis {
    MonthlyWage,
    BasicSalary,
}

/// The named outputs of the derivation chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Component {
    BasicSalary,
    HouseRentAllowance,
    StandardAllowance,
    PerformanceBonus,
    LeaveTravelAllowance,
    FixedAllowance,
    EmployeePf,
    EmployerPf,
    IncomeTax,
}

/// One step of the chain: `amount = basis * percent / 100`.
#[derive(Debug, Copy, Clone)]
pub struct Derivation {
    pub component: Component,
    pub basis: Basis,
    pub percent: Decimal,
}

/// Percentage weights for the component split. The weights are independent
/// of each other and are not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComponentPercents {
    /// Of monthly wage.
    #[schema(example = 50.0, value_type = f64)]
    pub basic: Decimal,
    /// Of basic salary.
    #[schema(example = 50.0, value_type = f64)]
    pub hra: Decimal,
    #[schema(example = 16.67, value_type = f64)]
    pub standard_allowance: Decimal,
    #[schema(example = 6.33, value_type = f64)]
    pub performance_bonus: Decimal,
    #[schema(example = 6.33, value_type = f64)]
    pub leave_travel_allowance: Decimal,
    #[schema(example = 11.67, value_type = f64)]
    pub fixed_allowance: Decimal,
    /// Of basic salary.
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employee: Decimal,
    /// Of basic salary.
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employer: Decimal,
    /// Flat monthly amount, not a percentage.
    #[schema(example = 200.0, value_type = f64)]
    pub professional_tax: Decimal,
    /// Of monthly wage.
    #[schema(example = 0.0, value_type = f64)]
    pub income_tax: Decimal,
}

impl Default for ComponentPercents {
    fn default() -> Self {
        Self {
            basic: Decimal::new(50, 0),
            hra: Decimal::new(50, 0),
            standard_allowance: Decimal::new(1667, 2),
            performance_bonus: Decimal::new(633, 2),
            leave_travel_allowance: Decimal::new(633, 2),
            fixed_allowance: Decimal::new(1167, 2),
            pf_employee: Decimal::new(12, 0),
            pf_employer: Decimal::new(12, 0),
            professional_tax: Decimal::new(200, 0),
            income_tax: Decimal::ZERO,
        }
    }
}

/// Itemized component amounts for one month. Values are exact; call
/// [`ComponentBreakdown::rounded`] before handing amounts to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComponentBreakdown {
    #[schema(example = 50000.0, value_type = f64)]
    pub monthly_wage: Decimal,
    #[schema(example = 25000.0, value_type = f64)]
    pub basic_salary: Decimal,
    #[schema(example = 12500.0, value_type = f64)]
    pub hra: Decimal,
    #[schema(example = 8335.0, value_type = f64)]
    pub standard_allowance: Decimal,
    #[schema(example = 3165.0, value_type = f64)]
    pub performance_bonus: Decimal,
    #[schema(example = 3165.0, value_type = f64)]
    pub leave_travel_allowance: Decimal,
    #[schema(example = 5835.0, value_type = f64)]
    pub fixed_allowance: Decimal,
    #[schema(example = 3000.0, value_type = f64)]
    pub employee_pf: Decimal,
    /// Informational only; never subtracted from net pay.
    #[schema(example = 3000.0, value_type = f64)]
    pub employer_pf: Decimal,
    #[schema(example = 200.0, value_type = f64)]
    pub professional_tax: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub income_tax: Decimal,
}

/// Round a monetary amount to 2 decimal places, half away from zero. The
/// single rounding point for everything the engine emits.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Wage must be strictly positive before any derivation runs.
pub fn ensure_positive_wage(monthly_wage: Decimal) -> Result<(), PayrollError> {
    if monthly_wage <= Decimal::ZERO {
        return Err(PayrollError::InvalidSalaryConfiguration(monthly_wage));
    }
    Ok(())
}

/// The ordered derivation chain for a set of percentage weights. Basic
/// salary comes first; every later step names the basis it draws from.
pub fn derivation_chain(percents: &ComponentPercents) -> [Derivation; 9] {
    [
        Derivation {
            component: Component::BasicSalary,
            basis: Basis::MonthlyWage,
            percent: percents.basic,
        },
        Derivation {
            component: Component::HouseRentAllowance,
            basis: Basis::BasicSalary,
            percent: percents.hra,
        },
        Derivation {
            component: Component::StandardAllowance,
            basis: Basis::MonthlyWage,
            percent: percents.standard_allowance,
        },
        Derivation {
            component: Component::PerformanceBonus,
            basis: Basis::MonthlyWage,
            percent: percents.performance_bonus,
        },
        Derivation {
            component: Component::LeaveTravelAllowance,
            basis: Basis::MonthlyWage,
            percent: percents.leave_travel_allowance,
        },
        Derivation {
            component: Component::FixedAllowance,
            basis: Basis::MonthlyWage,
            percent: percents.fixed_allowance,
        },
        Derivation {
            component: Component::EmployeePf,
            basis: Basis::BasicSalary,
            percent: percents.pf_employee,
        },
        Derivation {
            component: Component::EmployerPf,
            basis: Basis::BasicSalary,
            percent: percents.pf_employer,
        },
        Derivation {
            component: Component::IncomeTax,
            basis: Basis::MonthlyWage,
            percent: percents.income_tax,
        },
    ]
}

/// Evaluate the derivation chain against a monthly wage. Intermediate
/// amounts keep full precision; nothing is rounded here.
pub fn derive_salary_components(
    monthly_wage: Decimal,
    percents: &ComponentPercents,
) -> ComponentBreakdown {
    let hundred = Decimal::ONE_HUNDRED;

    let mut breakdown = ComponentBreakdown {
        monthly_wage,
        basic_salary: Decimal::ZERO,
        hra: Decimal::ZERO,
        standard_allowance: Decimal::ZERO,
        performance_bonus: Decimal::ZERO,
        leave_travel_allowance: Decimal::ZERO,
        fixed_allowance: Decimal::ZERO,
        employee_pf: Decimal::ZERO,
        employer_pf: Decimal::ZERO,
        professional_tax: percents.professional_tax,
        income_tax: Decimal::ZERO,
    };

    for step in derivation_chain(percents) {
        let base = match step.basis {
            Basis::MonthlyWage => monthly_wage,
            Basis::BasicSalary => breakdown.basic_salary,
        };
        let amount = base * step.percent / hundred;

        match step.component {
            Component::BasicSalary => breakdown.basic_salary = amount,
            Component::HouseRentAllowance => breakdown.hra = amount,
            Component::StandardAllowance => breakdown.standard_allowance = amount,
            Component::PerformanceBonus => breakdown.performance_bonus = amount,
            Component::LeaveTravelAllowance => breakdown.leave_travel_allowance = amount,
            Component::FixedAllowance => breakdown.fixed_allowance = amount,
            Component::EmployeePf => breakdown.employee_pf = amount,
            Component::EmployerPf => breakdown.employer_pf = amount,
            Component::IncomeTax => breakdown.income_tax = amount,
        }
    }

    breakdown
}

impl ComponentBreakdown {
    /// Client-facing copy with every amount rounded once.
    pub fn rounded(&self) -> Self {
        Self {
            monthly_wage: round_money(self.monthly_wage),
            basic_salary: round_money(self.basic_salary),
            hra: round_money(self.hra),
            standard_allowance: round_money(self.standard_allowance),
            performance_bonus: round_money(self.performance_bonus),
            leave_travel_allowance: round_money(self.leave_travel_allowance),
            fixed_allowance: round_money(self.fixed_allowance),
            employee_pf: round_money(self.employee_pf),
            employer_pf: round_money(self.employer_pf),
            professional_tax: round_money(self.professional_tax),
            income_tax: round_money(self.income_tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_split_a_60000_wage() {
        let breakdown = derive_salary_components(dec!(60000), &ComponentPercents::default());

        assert_eq!(breakdown.basic_salary, dec!(30000));
        assert_eq!(breakdown.hra, dec!(15000));
        assert_eq!(breakdown.standard_allowance, dec!(10002.0000));
        assert_eq!(breakdown.employee_pf, dec!(3600));
        assert_eq!(breakdown.employer_pf, dec!(3600));
        assert_eq!(breakdown.professional_tax, dec!(200));
        assert_eq!(breakdown.income_tax, dec!(0));
    }

    #[test]
    fn derivation_is_deterministic() {
        let percents = ComponentPercents::default();
        let first = derive_salary_components(dec!(47350.55), &percents);
        let second = derive_salary_components(dec!(47350.55), &percents);
        assert_eq!(first, second);
    }

    #[test]
    fn hra_follows_basic_not_wage() {
        // Raising the basic percentage must drag HRA and PF with it even
        // though the wage is unchanged.
        let mut percents = ComponentPercents::default();
        percents.basic = dec!(60);

        let breakdown = derive_salary_components(dec!(50000), &percents);
        assert_eq!(breakdown.basic_salary, dec!(30000));
        assert_eq!(breakdown.hra, dec!(15000));
        assert_eq!(breakdown.employee_pf, dec!(3600));
    }

    #[test]
    fn hra_tracks_basic_under_randomized_overrides() {
        // The dependency chain must hold for any weights, not just defaults.
        let wages = [dec!(18000), dec!(50000), dec!(123456.78)];
        let basics = [dec!(35), dec!(50), dec!(62.5)];
        let hras = [dec!(20), dec!(50), dec!(75)];

        for wage in wages {
            for basic in basics {
                for hra in hras {
                    let mut percents = ComponentPercents::default();
                    percents.basic = basic;
                    percents.hra = hra;

                    let b = derive_salary_components(wage, &percents);
                    assert_eq!(b.basic_salary, wage * basic / dec!(100));
                    assert_eq!(b.hra, b.basic_salary * hra / dec!(100));
                    assert_eq!(b.employee_pf, b.basic_salary * dec!(12) / dec!(100));
                }
            }
        }
    }

    #[test]
    fn pf_is_independent_of_allowances() {
        let mut percents = ComponentPercents::default();
        percents.standard_allowance = dec!(99);
        percents.fixed_allowance = dec!(99);

        let breakdown = derive_salary_components(dec!(50000), &percents);
        assert_eq!(breakdown.employee_pf, dec!(3000));
    }

    #[test]
    fn rounding_happens_once_at_output() {
        let breakdown = derive_salary_components(dec!(33333.33), &ComponentPercents::default());
        // Intermediate keeps full precision.
        assert_eq!(breakdown.standard_allowance, dec!(33333.33) * dec!(16.67) / dec!(100));
        // Output is rounded half away from zero to 2dp.
        assert_eq!(breakdown.rounded().standard_allowance, dec!(5556.67));
    }

    #[test]
    fn non_positive_wage_is_rejected_before_derivation() {
        assert!(ensure_positive_wage(dec!(0)).is_err());
        assert!(ensure_positive_wage(dec!(-1)).is_err());
        assert!(ensure_positive_wage(dec!(0.01)).is_ok());
    }
}
