use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::Attendance;
use crate::model::payroll::{PaymentStatus, Payroll};
use crate::model::salary::SalaryConfiguration;
use crate::payroll::PayrollError;
use crate::payroll::components::{derive_salary_components, ensure_positive_wage, round_money};
use crate::payroll::engine::{
    PayrollOverrides, Period, build_payroll, compute_loss_of_pay, default_payment_status,
};
use crate::payroll::summary::{AttendanceSummary, SummaryOptions, summarize_attendance};
use crate::utils::db_utils::{build_update_sql, execute_update};

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,

    /// Regenerate over an existing record instead of rejecting with 409.
    #[serde(default)]
    pub update_existing: bool,

    pub overrides: Option<PayrollOverrides>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PreviewQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AllowanceBlock {
    #[schema(example = 12500.0, value_type = f64)]
    pub hra: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub transport: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub medical: Decimal,
    #[schema(example = 17335.0, value_type = f64)]
    pub other: Decimal,
}

#[derive(Serialize, ToSchema)]
pub struct DeductionBlock {
    #[schema(example = 200.0, value_type = f64)]
    pub tax: Decimal,
    #[schema(example = 3000.0, value_type = f64)]
    pub provident_fund: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub insurance: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub other: Decimal,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollResponse {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 25000.0, value_type = f64)]
    pub basic_salary: Decimal,
    pub allowances: AllowanceBlock,
    pub deductions: DeductionBlock,
    #[schema(example = 3165.0, value_type = f64)]
    pub bonuses: Decimal,
    #[schema(example = 0.0, value_type = f64)]
    pub overtime_pay: Decimal,

    pub lop_days: u32,
    #[schema(example = 0.0, value_type = f64)]
    pub lop_deduction: Decimal,

    pub attendance_summary: AttendanceSummary,

    #[schema(example = 58000.0, value_type = f64)]
    pub gross_salary: Decimal,
    #[schema(example = 54800.0, value_type = f64)]
    pub net_salary: Decimal,

    pub payment_status: PaymentStatus,
    #[schema(example = "2026-01-28", value_type = String, format = "date", nullable = true)]
    pub payment_date: Option<NaiveDate>,
}

impl From<Payroll> for PayrollResponse {
    fn from(row: Payroll) -> Self {
        let recorded = row.present_days
            + row.half_days
            + row.paid_leaves
            + row.sick_leaves
            + row.unpaid_leaves
            + row.absent_days;
        Self {
            id: row.id,
            employee_id: row.employee_id,
            month: row.month,
            year: row.year,
            basic_salary: row.basic_salary,
            allowances: AllowanceBlock {
                hra: row.hra,
                transport: row.transport_allowance,
                medical: row.medical_allowance,
                other: row.other_allowance,
            },
            deductions: DeductionBlock {
                tax: row.tax_deduction,
                provident_fund: row.pf_deduction,
                insurance: row.insurance_deduction,
                other: row.other_deduction,
            },
            bonuses: row.bonuses,
            overtime_pay: row.overtime_pay,
            lop_days: row.lop_days,
            lop_deduction: row.lop_deduction,
            attendance_summary: AttendanceSummary {
                total_working_days: row.total_working_days,
                present_days: row.present_days,
                half_days: row.half_days,
                paid_leaves: row.paid_leaves,
                sick_leaves: row.sick_leaves,
                unpaid_leaves: row.unpaid_leaves,
                absent_days: row.absent_days,
                late_arrivals: row.late_arrivals,
                overtime_hours: row.overtime_hours,
                unaccounted_days: recorded as i64 - row.total_working_days as i64,
            },
            gross_salary: row.gross_salary,
            net_salary: row.net_salary,
            payment_status: row.payment_status,
            payment_date: row.payment_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

fn payroll_error_response(err: &PayrollError) -> HttpResponse {
    let body = serde_json::json!({ "message": err.to_string() });
    match err {
        PayrollError::InvalidSalaryConfiguration(_) => HttpResponse::BadRequest().json(body),
        PayrollError::MissingSalaryConfiguration(_) => HttpResponse::NotFound().json(body),
        PayrollError::DuplicatePayrollPeriod { .. } => HttpResponse::Conflict().json(body),
        PayrollError::EmptyAttendanceWindow { .. } => HttpResponse::BadRequest().json(body),
    }
}

async fn fetch_salary_configuration(
    pool: &MySqlPool,
    employee_id: u64,
) -> actix_web::Result<Option<SalaryConfiguration>> {
    sqlx::query_as::<_, SalaryConfiguration>(
        "SELECT * FROM salary_configurations WHERE employee_id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch salary configuration");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}

async fn fetch_attendance_window(
    pool: &MySqlPool,
    employee_id: u64,
    period: Period,
) -> actix_web::Result<Vec<Attendance>> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, date, status, check_in, check_out, work_hours, leave_category, remarks
        FROM attendance
        WHERE employee_id = ?
        AND date >= ?
        AND date < ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(period.start())
    .bind(period.end_exclusive())
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch attendance window");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}

fn summary_options(config: &Config, salary: &SalaryConfiguration) -> SummaryOptions {
    SummaryOptions {
        late_grace: config.late_arrival_grace,
        standard_daily_hours: config.standard_daily_hours,
        working_days_per_week: salary.working_days_per_week,
        late_arrivals_per_half_day: config.late_arrivals_per_half_day,
    }
}

/// Generate (or regenerate) the payslip for one employee and month.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 201, description = "Payroll generated", body = PayrollResponse),
        (status = 200, description = "Payroll regenerated", body = PayrollResponse),
        (status = 400, description = "Invalid period or salary configuration"),
        (status = 404, description = "No salary configuration for employee"),
        (status = 409, description = "Payroll already exists for the period"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<GeneratePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let Some(period) = Period::new(payload.month, payload.year) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid period: month must be 1-12"
        })));
    };

    let Some(salary) = fetch_salary_configuration(pool.get_ref(), payload.employee_id).await?
    else {
        return Ok(payroll_error_response(
            &PayrollError::MissingSalaryConfiguration(payload.employee_id),
        ));
    };

    if let Err(err) = ensure_positive_wage(salary.monthly_wage) {
        return Ok(payroll_error_response(&err));
    }

    let existing_id = sqlx::query_scalar::<_, u64>(
        "SELECT id FROM payrolls WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .bind(payload.year)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to check for existing payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if existing_id.is_some() && !payload.update_existing {
        return Ok(payroll_error_response(&PayrollError::DuplicatePayrollPeriod {
            employee_id: payload.employee_id,
            month: payload.month,
            year: payload.year,
        }));
    }

    let records = fetch_attendance_window(pool.get_ref(), payload.employee_id, period).await?;

    let opts = summary_options(&config, &salary);
    let summary = summarize_attendance(&records, period.start(), period.end_exclusive(), &opts);
    let breakdown = derive_salary_components(salary.monthly_wage, &salary.percents());
    let lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
    let overrides = payload.overrides.clone().unwrap_or_default();
    let draft = build_payroll(&breakdown, &summary, &lop, &overrides, &opts);

    // The engine is clock-free; recency is decided here, once, explicitly.
    let reference_date = Utc::now().date_naive();
    let (payment_status, payment_date) = default_payment_status(period, reference_date);

    let created = if let Some(payroll_id) = existing_id {
        // Regeneration replaces the financial snapshot but never touches the
        // payment lifecycle.
        let update_result = sqlx::query(
            r#"
            UPDATE payrolls SET
                basic_salary = ?, hra = ?, transport_allowance = ?, medical_allowance = ?,
                other_allowance = ?, tax_deduction = ?, pf_deduction = ?, insurance_deduction = ?,
                other_deduction = ?, bonuses = ?, overtime_pay = ?, lop_days = ?, lop_deduction = ?,
                total_working_days = ?, present_days = ?, half_days = ?, paid_leaves = ?,
                sick_leaves = ?, unpaid_leaves = ?, absent_days = ?, late_arrivals = ?,
                overtime_hours = ?, gross_salary = ?, net_salary = ?
            WHERE id = ?
            "#,
        )
        .bind(draft.basic_salary)
        .bind(draft.hra)
        .bind(draft.transport_allowance)
        .bind(draft.medical_allowance)
        .bind(draft.other_allowance)
        .bind(draft.tax_deduction)
        .bind(draft.pf_deduction)
        .bind(draft.insurance_deduction)
        .bind(draft.other_deduction)
        .bind(draft.bonuses)
        .bind(draft.overtime_pay)
        .bind(draft.lop_days)
        .bind(draft.lop_deduction)
        .bind(draft.summary.total_working_days)
        .bind(draft.summary.present_days)
        .bind(draft.summary.half_days)
        .bind(draft.summary.paid_leaves)
        .bind(draft.summary.sick_leaves)
        .bind(draft.summary.unpaid_leaves)
        .bind(draft.summary.absent_days)
        .bind(draft.summary.late_arrivals)
        .bind(draft.summary.overtime_hours)
        .bind(draft.gross_salary)
        .bind(draft.net_salary)
        .bind(payroll_id)
        .execute(pool.get_ref())
        .await;

        if let Err(e) = update_result {
            tracing::error!(error = %e, payroll_id, "Failed to regenerate payroll");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
        false
    } else {
        let insert_result = sqlx::query(
            r#"
            INSERT INTO payrolls
                (employee_id, month, year, basic_salary, hra, transport_allowance,
                 medical_allowance, other_allowance, tax_deduction, pf_deduction,
                 insurance_deduction, other_deduction, bonuses, overtime_pay, lop_days,
                 lop_deduction, total_working_days, present_days, half_days, paid_leaves,
                 sick_leaves, unpaid_leaves, absent_days, late_arrivals, overtime_hours,
                 gross_salary, net_salary, payment_status, payment_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payload.employee_id)
        .bind(payload.month)
        .bind(payload.year)
        .bind(draft.basic_salary)
        .bind(draft.hra)
        .bind(draft.transport_allowance)
        .bind(draft.medical_allowance)
        .bind(draft.other_allowance)
        .bind(draft.tax_deduction)
        .bind(draft.pf_deduction)
        .bind(draft.insurance_deduction)
        .bind(draft.other_deduction)
        .bind(draft.bonuses)
        .bind(draft.overtime_pay)
        .bind(draft.lop_days)
        .bind(draft.lop_deduction)
        .bind(draft.summary.total_working_days)
        .bind(draft.summary.present_days)
        .bind(draft.summary.half_days)
        .bind(draft.summary.paid_leaves)
        .bind(draft.summary.sick_leaves)
        .bind(draft.summary.unpaid_leaves)
        .bind(draft.summary.absent_days)
        .bind(draft.summary.late_arrivals)
        .bind(draft.summary.overtime_hours)
        .bind(draft.gross_salary)
        .bind(draft.net_salary)
        .bind(payment_status)
        .bind(payment_date)
        .execute(pool.get_ref())
        .await;

        if let Err(e) = insert_result {
            // A concurrent generation for the same key lost the existence
            // check race; surface it as the same conflict.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(payroll_error_response(&PayrollError::DuplicatePayrollPeriod {
                        employee_id: payload.employee_id,
                        month: payload.month,
                        year: payload.year,
                    }));
                }
            }
            tracing::error!(error = %e, "Failed to insert payroll");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
        true
    };

    let row = sqlx::query_as::<_, Payroll>(
        "SELECT * FROM payrolls WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(payload.employee_id)
    .bind(payload.month)
    .bind(payload.year)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch generated payroll");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        employee_id = payload.employee_id,
        month = payload.month,
        year = payload.year,
        net_salary = %row.net_salary,
        "Payroll generated"
    );

    let mut body = serde_json::to_value(PayrollResponse::from(row))
        .map_err(actix_web::error::ErrorInternalServerError)?;
    if summary.total_working_days == 0 {
        let warning = PayrollError::EmptyAttendanceWindow {
            start: period.start(),
            end: period.end_exclusive(),
        };
        body["warning"] = Value::String(warning.to_string());
    }

    if created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

/// Read-only attendance summary for a period; nothing is persisted.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Attendance summary with LOP preview"),
        (status = 400, description = "Invalid period"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn preview_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<PreviewQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let Some(period) = Period::new(query.month, query.year) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid period: month must be 1-12"
        })));
    };

    let salary = fetch_salary_configuration(pool.get_ref(), query.employee_id).await?;
    let records = fetch_attendance_window(pool.get_ref(), query.employee_id, period).await?;

    let opts = match &salary {
        Some(salary) => summary_options(&config, salary),
        None => SummaryOptions {
            late_grace: config.late_arrival_grace,
            standard_daily_hours: config.standard_daily_hours,
            late_arrivals_per_half_day: config.late_arrivals_per_half_day,
            ..SummaryOptions::default()
        },
    };
    let summary = summarize_attendance(&records, period.start(), period.end_exclusive(), &opts);

    // LOP amounts only make sense with a configured wage; the day counts
    // stand on their own.
    let lop = salary.as_ref().map(|salary| {
        let breakdown = derive_salary_components(salary.monthly_wage, &salary.percents());
        let mut lop = compute_loss_of_pay(&summary, breakdown.basic_salary);
        lop.lop_deduction = round_money(lop.lop_deduction);
        lop
    });
    let lop_days = summary.absent_days + summary.unpaid_leaves;

    let mut body = serde_json::json!({
        "employee_id": query.employee_id,
        "month": query.month,
        "year": query.year,
        "summary": &summary,
        "lop_days": lop_days,
        "lop": lop,
    });
    if summary.total_working_days == 0 {
        let warning = PayrollError::EmptyAttendanceWindow {
            start: period.start(),
            end: period.end_exclusive(),
        };
        body["warning"] = Value::String(warning.to_string());
    }

    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, body = PayrollResponse),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let payroll_id = path.into_inner();

    let payroll = sqlx::query_as::<_, Payroll>("SELECT * FROM payrolls WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match payroll {
        Some(p) => Ok(HttpResponse::Ok().json(PayrollResponse::from(p))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (where_sql, employee_filter) = match query.employee_id {
        Some(id) => (" WHERE employee_id = ?", Some(id)),
        None => ("", None),
    };

    let count_sql = format!("SELECT COUNT(*) FROM payrolls{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = employee_filter {
        count_q = count_q.bind(id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payrolls");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT * FROM payrolls{} ORDER BY year DESC, month DESC, employee_id LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, Payroll>(&data_sql);
    if let Some(id) = employee_filter {
        data_q = data_q.bind(id);
    }

    let rows = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data: rows.into_iter().map(PayrollResponse::from).collect(),
        page,
        per_page,
        total,
    }))
}

const PAYROLL_EDITABLE_COLUMNS: &[&str] = &[
    "transport_allowance",
    "medical_allowance",
    "other_allowance",
    "insurance_deduction",
    "other_deduction",
    "bonuses",
];

/// Admin edit of override-able amounts. Gross and net are recomputed
/// server-side from the stored row, never trusted from the client.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}",
    request_body = Object,
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll updated", body = PayrollResponse),
        (status = 400, description = "No editable fields in payload"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let update = build_update_sql("payrolls", &body, PAYROLL_EDITABLE_COLUMNS, "id", payroll_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to update payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll record not found"
        })));
    }

    let row = sqlx::query_as::<_, Payroll>("SELECT * FROM payrolls WHERE id = ?")
        .bind(payroll_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to re-fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let gross_salary = row.basic_salary
        + row.hra
        + row.transport_allowance
        + row.medical_allowance
        + row.other_allowance
        + row.bonuses
        + row.overtime_pay;
    let net_salary = gross_salary
        - (row.tax_deduction + row.pf_deduction + row.insurance_deduction + row.other_deduction)
        - row.lop_deduction;

    sqlx::query("UPDATE payrolls SET gross_salary = ?, net_salary = ? WHERE id = ?")
        .bind(gross_salary)
        .bind(net_salary)
        .bind(payroll_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to recompute payroll totals");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let mut row = row;
    row.gross_salary = gross_salary;
    row.net_salary = net_salary;

    Ok(HttpResponse::Ok().json(PayrollResponse::from(row)))
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePaymentStatus {
    pub status: PaymentStatus,

    /// Payment date to stamp when moving to Paid; defaults to today.
    #[schema(example = "2026-01-28", value_type = String, format = "date", nullable = true)]
    pub payment_date: Option<NaiveDate>,
}

/// Move a payroll record along Pending -> Processed -> Paid.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/status",
    request_body = UpdatePaymentStatus,
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Status updated", body = PayrollResponse),
        (status = 400, description = "Transition would regress the status"),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payment_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdatePaymentStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let current = sqlx::query_as::<_, Payroll>("SELECT * FROM payrolls WHERE id = ?")
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(mut current) = current else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll record not found"
        })));
    };

    if !current.payment_status.can_transition_to(body.status) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!(
                "Cannot move payment status from {} to {}",
                current.payment_status, body.status
            )
        })));
    }

    // payment_date exists exactly while the record is Paid.
    let payment_date = match body.status {
        PaymentStatus::Paid => Some(body.payment_date.unwrap_or_else(|| Utc::now().date_naive())),
        _ => None,
    };

    sqlx::query("UPDATE payrolls SET payment_status = ?, payment_date = ? WHERE id = ?")
        .bind(body.status)
        .bind(payment_date)
        .bind(payroll_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to update payment status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    current.payment_status = body.status;
    current.payment_date = payment_date;

    Ok(HttpResponse::Ok().json(PayrollResponse::from(current)))
}
