use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Daily attendance outcome. Stored as the literal strings the
/// `attendance.status` column carries.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
    #[sqlx(rename = "Half-day")]
    #[serde(rename = "Half-day")]
    #[strum(serialize = "Half-day")]
    HalfDay,
}

/// Pay treatment of a leave day. Written when the leave request is
/// approved, so payroll never has to guess from free text.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
pub enum LeaveCategory {
    Paid,
    Sick,
    Unpaid,
}

impl LeaveCategory {
    /// Fallback classification for rows that predate the `leave_category`
    /// column. Remarks containing "sick" map to Sick; the recognized paid
    /// kinds map to Paid; everything else is Unpaid.
    pub fn from_remarks(remarks: &str) -> Self {
        let remarks = remarks.to_lowercase();
        if remarks.contains("sick") {
            LeaveCategory::Sick
        } else if ["casual", "annual", "personal", "paid"]
            .iter()
            .any(|kind| remarks.contains(kind))
        {
            LeaveCategory::Paid
        } else {
            LeaveCategory::Unpaid
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "09:02:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,

    #[schema(example = "17:45:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,

    #[schema(example = 8.72, value_type = f64, nullable = true)]
    pub work_hours: Option<Decimal>,

    pub leave_category: Option<LeaveCategory>,

    #[schema(example = "Sick Leave", nullable = true)]
    pub remarks: Option<String>,
}

impl Attendance {
    /// Hours worked for the day. Prefers the stored `work_hours` column and
    /// falls back to the check-in/check-out pair; zero when either stamp is
    /// missing.
    pub fn worked_hours(&self) -> Decimal {
        if let Some(hours) = self.work_hours {
            return hours;
        }
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => {
                let seconds = (check_out - check_in).num_seconds().max(0);
                Decimal::from(seconds) / Decimal::from(3600)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Pay category of a Leave row: the explicit column when present,
    /// otherwise classified from remarks.
    pub fn pay_category(&self) -> LeaveCategory {
        if let Some(category) = self.leave_category {
            return category;
        }
        LeaveCategory::from_remarks(self.remarks.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remarks_fallback_recognizes_sick_and_paid_kinds() {
        assert_eq!(LeaveCategory::from_remarks("Sick Leave"), LeaveCategory::Sick);
        assert_eq!(LeaveCategory::from_remarks("Casual Leave"), LeaveCategory::Paid);
        assert_eq!(LeaveCategory::from_remarks("Annual leave"), LeaveCategory::Paid);
        assert_eq!(LeaveCategory::from_remarks("Personal Leave"), LeaveCategory::Paid);
    }

    #[test]
    fn unrecognized_remarks_fall_back_to_unpaid() {
        assert_eq!(LeaveCategory::from_remarks(""), LeaveCategory::Unpaid);
        assert_eq!(LeaveCategory::from_remarks("family function"), LeaveCategory::Unpaid);
    }

    #[test]
    fn explicit_category_wins_over_remarks() {
        let row = Attendance {
            id: 1,
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status: AttendanceStatus::Leave,
            check_in: None,
            check_out: None,
            work_hours: None,
            leave_category: Some(LeaveCategory::Paid),
            remarks: Some("Sick Leave".into()),
        };
        assert_eq!(row.pay_category(), LeaveCategory::Paid);
    }

    #[test]
    fn worked_hours_derives_from_stamps_when_column_is_empty() {
        let row = Attendance {
            id: 1,
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status: AttendanceStatus::Present,
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 30, 0),
            work_hours: None,
            leave_category: None,
            remarks: None,
        };
        assert_eq!(row.worked_hours(), Decimal::new(85, 1));
    }
}
