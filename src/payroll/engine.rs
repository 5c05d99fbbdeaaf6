//! Loss-of-pay reconciliation and payslip assembly.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::components::{ComponentBreakdown, round_money};
use super::summary::{AttendanceSummary, SummaryOptions};
use crate::model::payroll::PaymentStatus;

/// A payroll month. `start`/`end_exclusive` bound the attendance window.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Period {
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { month, year })
    }

    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated in Period::new")
    }

    pub fn end_exclusive(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).expect("validated in Period::new")
    }

    /// Whole months between this period and `reference`. Positive when the
    /// period lies in the past.
    fn months_before(&self, reference: NaiveDate) -> i32 {
        (reference.year() - self.year) * 12 + (reference.month() as i32 - self.month as i32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LossOfPay {
    pub lop_days: u32,
    #[schema(example = 2272.73, value_type = f64)]
    pub lop_deduction: Decimal,
}

/// Basic salary spread over the calendar working days of the window. A
/// window with no working days yields a zero rate instead of dividing by
/// zero.
pub fn per_day_rate(basic_salary: Decimal, total_working_days: u32) -> Decimal {
    if total_working_days == 0 {
        return Decimal::ZERO;
    }
    basic_salary / Decimal::from(total_working_days)
}

/// Unpaid absence turned into a deduction. Absent days and unpaid leaves
/// each forfeit a full day; half-days deliberately contribute nothing.
pub fn compute_loss_of_pay(summary: &AttendanceSummary, basic_salary: Decimal) -> LossOfPay {
    let lop_days = summary.absent_days + summary.unpaid_leaves;
    let rate = per_day_rate(basic_salary, summary.total_working_days);
    LossOfPay {
        lop_days,
        lop_deduction: Decimal::from(lop_days) * rate,
    }
}

/// Admin-supplied absolute amounts folded into the payslip on top of the
/// derived components.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PayrollOverrides {
    #[schema(example = 1600.0, value_type = f64, nullable = true)]
    pub transport_allowance: Option<Decimal>,
    #[schema(example = 1250.0, value_type = f64, nullable = true)]
    pub medical_allowance: Option<Decimal>,
    #[schema(example = 0.0, value_type = f64, nullable = true)]
    pub other_allowance: Option<Decimal>,
    #[schema(example = 500.0, value_type = f64, nullable = true)]
    pub insurance_deduction: Option<Decimal>,
    #[schema(example = 0.0, value_type = f64, nullable = true)]
    pub other_deduction: Option<Decimal>,
    #[schema(example = 5000.0, value_type = f64, nullable = true)]
    pub bonuses: Option<Decimal>,
}

/// A complete, unsaved payslip. Every monetary field is already rounded, so
/// the gross/net identities hold exactly on what the caller persists.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayslipDraft {
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
    pub lop_days: u32,
    #[schema(example = 0.0, value_type = f64)]
    pub lop_deduction: Decimal,
    pub summary: AttendanceSummary,
    #[schema(example = 58000.0, value_type = f64)]
    pub gross_salary: Decimal,
    #[schema(example = 54800.0, value_type = f64)]
    pub net_salary: Decimal,
}

/// Assemble the payslip from the derived components, the attendance summary
/// and the loss-of-pay figures. Deterministic: identical inputs produce an
/// identical draft, field for field.
///
/// Component mapping: HRA stays its own allowance; standard, leave-travel
/// and fixed allowances fold into `other_allowance`; the performance bonus
/// lands in `bonuses`. Professional and income tax fold into
/// `tax_deduction`. Late arrivals forfeit half a day's pay per
/// `late_arrivals_per_half_day` occurrences, charged to `other_deduction`.
pub fn build_payroll(
    breakdown: &ComponentBreakdown,
    summary: &AttendanceSummary,
    lop: &LossOfPay,
    overrides: &PayrollOverrides,
    opts: &SummaryOptions,
) -> PayslipDraft {
    let two = Decimal::from(2);
    let day_rate = per_day_rate(breakdown.basic_salary, summary.total_working_days);

    let late_penalty = if opts.late_arrivals_per_half_day > 0 {
        Decimal::from(summary.late_arrivals / opts.late_arrivals_per_half_day) * day_rate / two
    } else {
        Decimal::ZERO
    };

    let overtime_pay = if opts.standard_daily_hours > Decimal::ZERO {
        summary.overtime_hours * day_rate / opts.standard_daily_hours
    } else {
        Decimal::ZERO
    };

    let basic_salary = round_money(breakdown.basic_salary);
    let hra = round_money(breakdown.hra);
    let transport_allowance = round_money(overrides.transport_allowance.unwrap_or(Decimal::ZERO));
    let medical_allowance = round_money(overrides.medical_allowance.unwrap_or(Decimal::ZERO));
    let other_allowance = round_money(
        breakdown.standard_allowance
            + breakdown.leave_travel_allowance
            + breakdown.fixed_allowance
            + overrides.other_allowance.unwrap_or(Decimal::ZERO),
    );
    let bonuses = round_money(
        breakdown.performance_bonus + overrides.bonuses.unwrap_or(Decimal::ZERO),
    );
    let overtime_pay = round_money(overtime_pay);

    let tax_deduction = round_money(breakdown.professional_tax + breakdown.income_tax);
    let pf_deduction = round_money(breakdown.employee_pf);
    let insurance_deduction = round_money(overrides.insurance_deduction.unwrap_or(Decimal::ZERO));
    let other_deduction =
        round_money(overrides.other_deduction.unwrap_or(Decimal::ZERO) + late_penalty);
    let lop_deduction = round_money(lop.lop_deduction);

    // Gross and net are computed from the rounded pieces so the identities
    // hold exactly on the persisted record.
    let gross_salary = basic_salary
        + hra
        + transport_allowance
        + medical_allowance
        + other_allowance
        + bonuses
        + overtime_pay;
    let total_deductions = tax_deduction + pf_deduction + insurance_deduction + other_deduction;
    let net_salary = gross_salary - total_deductions - lop_deduction;

    PayslipDraft {
        basic_salary,
        hra,
        transport_allowance,
        medical_allowance,
        other_allowance,
        tax_deduction,
        pf_deduction,
        insurance_deduction,
        other_deduction,
        bonuses,
        overtime_pay,
        lop_days: lop.lop_days,
        lop_deduction,
        summary: summary.clone(),
        gross_salary,
        net_salary,
    }
}

/// Payment status by recency against an explicit reference date: the
/// reference month is Pending, the month before Processed, anything older
/// Paid on the 28th of its period. Future periods stay Pending. The engine
/// never reads the clock; callers decide what "now" means.
pub fn default_payment_status(
    period: Period,
    reference_date: NaiveDate,
) -> (PaymentStatus, Option<NaiveDate>) {
    match period.months_before(reference_date) {
        i32::MIN..=0 => (PaymentStatus::Pending, None),
        1 => (PaymentStatus::Processed, None),
        _ => {
            let pay_date = NaiveDate::from_ymd_opt(period.year, period.month, 28);
            (PaymentStatus::Paid, pay_date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::components::{ComponentPercents, derive_salary_components};
    use rust_decimal_macros::dec;

    fn summary_with(
        total_working_days: u32,
        absent_days: u32,
        unpaid_leaves: u32,
    ) -> AttendanceSummary {
        AttendanceSummary {
            total_working_days,
            present_days: total_working_days
                .saturating_sub(absent_days)
                .saturating_sub(unpaid_leaves),
            half_days: 0,
            paid_leaves: 0,
            sick_leaves: 0,
            unpaid_leaves,
            absent_days,
            late_arrivals: 0,
            overtime_hours: Decimal::ZERO,
            unaccounted_days: 0,
        }
    }

    #[test]
    fn lop_days_are_absences_plus_unpaid_leaves() {
        let summary = summary_with(22, 3, 2);
        let lop = compute_loss_of_pay(&summary, dec!(25000));
        assert_eq!(lop.lop_days, 5);
    }

    #[test]
    fn half_days_never_contribute_to_lop() {
        let mut summary = summary_with(22, 0, 0);
        summary.half_days = 4;
        let lop = compute_loss_of_pay(&summary, dec!(25000));
        assert_eq!(lop.lop_days, 0);
        assert_eq!(lop.lop_deduction, dec!(0));
    }

    #[test]
    fn two_unpaid_days_in_a_22_day_month() {
        let summary = summary_with(22, 0, 2);
        let lop = compute_loss_of_pay(&summary, dec!(25000));
        // 25000 / 22 ~= 1136.36 per day, two days ~= 2272.73.
        assert_eq!(round_money(lop.lop_deduction), dec!(2272.73));
    }

    #[test]
    fn zero_working_days_yields_zero_lop_without_panicking() {
        let summary = summary_with(0, 0, 0);
        let lop = compute_loss_of_pay(&summary, dec!(25000));
        assert_eq!(lop.lop_deduction, dec!(0));
        assert_eq!(per_day_rate(dec!(25000), 0), dec!(0));
    }

    #[test]
    fn clean_month_nets_gross_minus_statutory_deductions() {
        let breakdown = derive_salary_components(dec!(50000), &ComponentPercents::default());
        let summary = summary_with(22, 0, 0);
        let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        let draft = build_payroll(
            &breakdown,
            &summary,
            &lop,
            &PayrollOverrides::default(),
            &SummaryOptions::default(),
        );

        assert_eq!(draft.lop_days, 0);
        assert_eq!(draft.lop_deduction, dec!(0));
        // Net = gross - (PF + professional tax 200 + income tax 0).
        assert_eq!(
            draft.net_salary,
            draft.gross_salary - draft.pf_deduction - dec!(200)
        );
    }

    #[test]
    fn net_identity_holds_exactly_on_the_draft() {
        let breakdown = derive_salary_components(dec!(73211.19), &ComponentPercents::default());
        let mut summary = summary_with(21, 1, 1);
        summary.late_arrivals = 7;
        summary.overtime_hours = dec!(5.25);
        let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        let overrides = PayrollOverrides {
            transport_allowance: Some(dec!(1600)),
            insurance_deduction: Some(dec!(450)),
            ..Default::default()
        };
        let draft = build_payroll(
            &breakdown,
            &summary,
            &lop,
            &overrides,
            &SummaryOptions::default(),
        );

        let gross = draft.basic_salary
            + draft.hra
            + draft.transport_allowance
            + draft.medical_allowance
            + draft.other_allowance
            + draft.bonuses
            + draft.overtime_pay;
        let deductions = draft.tax_deduction
            + draft.pf_deduction
            + draft.insurance_deduction
            + draft.other_deduction;
        assert_eq!(draft.gross_salary, gross);
        assert_eq!(draft.net_salary, gross - deductions - draft.lop_deduction);
    }

    #[test]
    fn build_payroll_is_idempotent() {
        let breakdown = derive_salary_components(dec!(50000), &ComponentPercents::default());
        let mut summary = summary_with(22, 1, 0);
        summary.late_arrivals = 4;
        let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        let opts = SummaryOptions::default();
        let overrides = PayrollOverrides::default();

        let first = build_payroll(&breakdown, &summary, &lop, &overrides, &opts);
        let second = build_payroll(&breakdown, &summary, &lop, &overrides, &opts);
        assert_eq!(first, second);
    }

    #[test]
    fn every_third_late_arrival_charges_half_a_day() {
        let breakdown = derive_salary_components(dec!(44000), &ComponentPercents::default());
        let mut summary = summary_with(22, 0, 0);
        summary.late_arrivals = 6;
        let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        let draft = build_payroll(
            &breakdown,
            &summary,
            &lop,
            &PayrollOverrides::default(),
            &SummaryOptions::default(),
        );

        // basic 22000 over 22 days = 1000/day; 6 lates = 2 half days = 1000.
        assert_eq!(draft.other_deduction, dec!(1000.00));
    }

    #[test]
    fn overtime_is_paid_at_the_hourly_day_rate() {
        let breakdown = derive_salary_components(dec!(44000), &ComponentPercents::default());
        let mut summary = summary_with(22, 0, 0);
        summary.overtime_hours = dec!(4);
        let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        let draft = build_payroll(
            &breakdown,
            &summary,
            &lop,
            &PayrollOverrides::default(),
            &SummaryOptions::default(),
        );

        // 1000/day over 8h = 125/h; 4h = 500.
        assert_eq!(draft.overtime_pay, dec!(500.00));
    }

    #[test]
    fn period_window_bounds() {
        let period = Period::new(12, 2025).unwrap();
        assert_eq!(period.start(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(
            period.end_exclusive(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert!(Period::new(13, 2025).is_none());
        assert!(Period::new(0, 2025).is_none());
    }

    #[test]
    fn payment_status_follows_the_reference_date() {
        let reference = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let (status, date) = default_payment_status(Period::new(3, 2026).unwrap(), reference);
        assert_eq!(status, PaymentStatus::Pending);
        assert!(date.is_none());

        let (status, date) = default_payment_status(Period::new(2, 2026).unwrap(), reference);
        assert_eq!(status, PaymentStatus::Processed);
        assert!(date.is_none());

        let (status, date) = default_payment_status(Period::new(12, 2025).unwrap(), reference);
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 28));

        // Future periods stay pending.
        let (status, _) = default_payment_status(Period::new(6, 2026).unwrap(), reference);
        assert_eq!(status, PaymentStatus::Pending);
    }
}
