//! Attendance window aggregation.
//!
//! Reduces one employee's attendance rows over `[period_start, period_end)`
//! to the counters a payslip is built from. `total_working_days` is a pure
//! calendar computation over the window and does not depend on what was
//! actually recorded, so a sparse month still yields a sane per-day rate.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::attendance::{Attendance, AttendanceStatus, LeaveCategory};

/// Knobs the aggregation depends on. Grace and daily hours come from server
/// config, the working week from the employee's salary configuration.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Check-ins after this time-of-day count as late arrivals.
    pub late_grace: NaiveTime,
    /// Hours in a standard working day; the overtime threshold.
    pub standard_daily_hours: Decimal,
    /// 5 = Mon-Fri, 6 = Mon-Sat, 7 = every day.
    pub working_days_per_week: u8,
    /// Every N late arrivals forfeit half a day's pay.
    pub late_arrivals_per_half_day: u32,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            late_grace: NaiveTime::from_hms_opt(9, 15, 0).expect("valid grace time"),
            standard_daily_hours: Decimal::new(8, 0),
            working_days_per_week: 5,
            late_arrivals_per_half_day: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    /// Weekdays in the window per the configured working week; a calendar
    /// count, not a record count.
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
    /// Recorded days beyond the calendar working-day count. Incomplete or
    /// overfull months are reported here, never rejected.
    pub unaccounted_days: i64,
}

/// Whether `date` falls on a working day for the given week length.
pub fn is_working_day(date: NaiveDate, working_days_per_week: u8) -> bool {
    let days = working_days_per_week.clamp(1, 7) as u32;
    date.weekday().num_days_from_monday() < days
}

/// Calendar count of working days in `[start, end)`.
pub fn working_day_count(start: NaiveDate, end: NaiveDate, working_days_per_week: u8) -> u32 {
    start
        .iter_days()
        .take_while(|day| *day < end)
        .filter(|day| is_working_day(*day, working_days_per_week))
        .count() as u32
}

/// Reduce attendance rows to the summary counters. Rows outside
/// `[period_start, period_end)` are ignored; each row has exactly one
/// status, so the per-status counters are mutually exclusive.
pub fn summarize_attendance(
    records: &[Attendance],
    period_start: NaiveDate,
    period_end: NaiveDate,
    opts: &SummaryOptions,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        total_working_days: working_day_count(period_start, period_end, opts.working_days_per_week),
        present_days: 0,
        half_days: 0,
        paid_leaves: 0,
        sick_leaves: 0,
        unpaid_leaves: 0,
        absent_days: 0,
        late_arrivals: 0,
        overtime_hours: Decimal::ZERO,
        unaccounted_days: 0,
    };

    let mut recorded_days = 0i64;

    for record in records {
        if record.date < period_start || record.date >= period_end {
            continue;
        }
        recorded_days += 1;

        match record.status {
            AttendanceStatus::Present => {
                summary.present_days += 1;
                let overtime = record.worked_hours() - opts.standard_daily_hours;
                if overtime > Decimal::ZERO {
                    summary.overtime_hours += overtime;
                }
            }
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
            AttendanceStatus::Leave => match record.pay_category() {
                LeaveCategory::Paid => summary.paid_leaves += 1,
                LeaveCategory::Sick => summary.sick_leaves += 1,
                LeaveCategory::Unpaid => summary.unpaid_leaves += 1,
            },
        }

        if matches!(
            record.status,
            AttendanceStatus::Present | AttendanceStatus::HalfDay
        ) {
            if let Some(check_in) = record.check_in {
                if check_in > opts.late_grace {
                    summary.late_arrivals += 1;
                }
            }
        }
    }

    summary.unaccounted_days = recorded_days - summary.total_working_days as i64;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(
        date: NaiveDate,
        status: AttendanceStatus,
        check_in: Option<(u32, u32)>,
        work_hours: Option<Decimal>,
    ) -> Attendance {
        Attendance {
            id: 0,
            employee_id: 1,
            date,
            status,
            check_in: check_in.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            check_out: None,
            work_hours,
            leave_category: None,
            remarks: None,
        }
    }

    #[test]
    fn working_day_counts_for_known_months() {
        // August 2025 starts on a Friday and has 31 days.
        assert_eq!(working_day_count(day(2025, 8, 1), day(2025, 9, 1), 5), 21);
        assert_eq!(working_day_count(day(2025, 8, 1), day(2025, 9, 1), 6), 26);
        assert_eq!(working_day_count(day(2025, 8, 1), day(2025, 9, 1), 7), 31);
        // February 2026 (non-leap).
        assert_eq!(working_day_count(day(2026, 2, 1), day(2026, 3, 1), 5), 20);
    }

    #[test]
    fn weekend_only_window_has_zero_working_days() {
        // 2026-01-03/04 is a Saturday/Sunday pair.
        assert_eq!(working_day_count(day(2026, 1, 3), day(2026, 1, 5), 5), 0);
    }

    #[test]
    fn statuses_bucket_exclusively() {
        let opts = SummaryOptions::default();
        let records = vec![
            row(day(2026, 1, 5), AttendanceStatus::Present, Some((9, 0)), Some(dec!(8))),
            row(day(2026, 1, 6), AttendanceStatus::HalfDay, Some((9, 5)), Some(dec!(4))),
            row(day(2026, 1, 7), AttendanceStatus::Absent, None, None),
            {
                let mut leave = row(day(2026, 1, 8), AttendanceStatus::Leave, None, None);
                leave.remarks = Some("Sick Leave".into());
                leave
            },
            {
                let mut leave = row(day(2026, 1, 9), AttendanceStatus::Leave, None, None);
                leave.leave_category = Some(LeaveCategory::Unpaid);
                leave
            },
        ];

        let summary = summarize_attendance(&records, day(2026, 1, 1), day(2026, 2, 1), &opts);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.sick_leaves, 1);
        assert_eq!(summary.unpaid_leaves, 1);
        assert_eq!(summary.paid_leaves, 0);
        // January 2026: 22 Mon-Fri days.
        assert_eq!(summary.total_working_days, 22);
        assert_eq!(summary.unaccounted_days, 5 - 22);
    }

    #[test]
    fn records_outside_the_window_do_not_contribute() {
        let opts = SummaryOptions::default();
        let records = vec![
            row(day(2025, 12, 31), AttendanceStatus::Present, Some((9, 0)), Some(dec!(8))),
            row(day(2026, 2, 1), AttendanceStatus::Absent, None, None),
        ];
        let summary = summarize_attendance(&records, day(2026, 1, 1), day(2026, 2, 1), &opts);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.absent_days, 0);
    }

    #[test]
    fn late_arrivals_respect_the_grace_threshold() {
        let opts = SummaryOptions::default();
        let records = vec![
            row(day(2026, 1, 5), AttendanceStatus::Present, Some((9, 15)), Some(dec!(8))),
            row(day(2026, 1, 6), AttendanceStatus::Present, Some((9, 16)), Some(dec!(8))),
            row(day(2026, 1, 7), AttendanceStatus::HalfDay, Some((10, 0)), Some(dec!(4))),
            row(day(2026, 1, 8), AttendanceStatus::Absent, None, None),
        ];
        let summary = summarize_attendance(&records, day(2026, 1, 1), day(2026, 2, 1), &opts);
        // 09:15 exactly is within grace; absences never count as late.
        assert_eq!(summary.late_arrivals, 2);
    }

    #[test]
    fn overtime_accrues_only_on_present_days_past_standard_hours() {
        let opts = SummaryOptions::default();
        let records = vec![
            row(day(2026, 1, 5), AttendanceStatus::Present, Some((9, 0)), Some(dec!(10.5))),
            row(day(2026, 1, 6), AttendanceStatus::Present, Some((9, 0)), Some(dec!(7))),
            row(day(2026, 1, 7), AttendanceStatus::HalfDay, Some((9, 0)), Some(dec!(12))),
        ];
        let summary = summarize_attendance(&records, day(2026, 1, 1), day(2026, 2, 1), &opts);
        assert_eq!(summary.overtime_hours, dec!(2.5));
    }
}
