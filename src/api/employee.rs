use crate::{
    auth::auth::AuthUser,
    model::{employee::Employee, salary::SalaryConfiguration},
    payroll::PayrollError,
    payroll::components::ensure_positive_wage,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-3000", value_type = String)]
    pub employee_code: String,
    #[schema(example = "John", value_type = String)]
    pub first_name: String,
    #[schema(example = "Doe", value_type = String)]
    pub last_name: String,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering", value_type = String)]
    pub department: Option<String>,
    #[schema(example = "Software Engineer", value_type = String)]
    pub designation: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: chrono::NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "phone": "+911712345678",
        "department": "Engineering",
        "designation": "Software Engineer",
        "hire_date": "2024-01-01",
        "status": "active"
    }])
)]
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 5)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Object, example = json!({
            "message": "Employee created successfully"
        })),
        (status = 409, description = "Employee code or email already exists"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, department, designation, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.department)
    .bind(&payload.designation)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Employee code or email already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("department", Query, description = "Filter by department"),
        ("designation", Query, description = "Filter by designation"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(department) = &query.department {
        conditions.push("department = ?");
        bindings.push(department.clone());
    }

    if let Some(designation) = &query.designation {
        conditions.push("designation = ?");
        bindings.push(designation.clone());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 403, description = "Not authorized to view this profile"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    // Employees can only read their own profile; HR/Admin read anyone.
    if auth.is_employee() && auth.employee_id != Some(employee_id) {
        return Err(actix_web::error::ErrorForbidden(
            "Not authorized to view this profile",
        ));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            ErrorInternalServerError("Database error")
        })?;

    match employee {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

const EMPLOYEE_EDITABLE_COLUMNS: &[&str] = &[
    "employee_code",
    "first_name",
    "last_name",
    "email",
    "phone",
    "department",
    "designation",
    "hire_date",
    "status",
];

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated successfully", body = Object, example = json!({
            "message": "Employee updated successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();

    let update = build_update_sql("employees", &body, EMPLOYEE_EDITABLE_COLUMNS, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            ErrorInternalServerError("Database error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct UpsertSalaryConfiguration {
    #[schema(example = 50000.0, value_type = f64)]
    pub monthly_wage: Decimal,
    #[schema(example = 50.0, value_type = f64)]
    pub basic_pct: Option<Decimal>,
    #[schema(example = 50.0, value_type = f64)]
    pub hra_pct: Option<Decimal>,
    #[schema(example = 16.67, value_type = f64)]
    pub standard_pct: Option<Decimal>,
    #[schema(example = 6.33, value_type = f64)]
    pub performance_pct: Option<Decimal>,
    #[schema(example = 6.33, value_type = f64)]
    pub lta_pct: Option<Decimal>,
    #[schema(example = 11.67, value_type = f64)]
    pub fixed_pct: Option<Decimal>,
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employee_pct: Option<Decimal>,
    #[schema(example = 12.0, value_type = f64)]
    pub pf_employer_pct: Option<Decimal>,
    #[schema(example = 200.0, value_type = f64)]
    pub professional_tax: Option<Decimal>,
    #[schema(example = 0.0, value_type = f64)]
    pub income_tax_pct: Option<Decimal>,
    #[schema(example = 5)]
    pub working_days_per_week: Option<u8>,
    #[schema(example = 1.0, value_type = f64)]
    pub break_time_hours: Option<Decimal>,
}

/// Salary configuration lookup
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/salary",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Salary configuration", body = SalaryConfiguration),
        (status = 404, description = "Employee has no salary configuration")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_salary_configuration(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();

    let salary = sqlx::query_as::<_, SalaryConfiguration>(
        "SELECT * FROM salary_configurations WHERE employee_id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch salary configuration");
        ErrorInternalServerError("Database error")
    })?;

    match salary {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": PayrollError::MissingSalaryConfiguration(employee_id).to_string()
        }))),
    }
}

/// Create or replace an employee's salary configuration
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}/salary",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpsertSalaryConfiguration,
    responses(
        (status = 200, description = "Salary configuration saved", body = SalaryConfiguration),
        (status = 400, description = "Monthly wage must be positive"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_salary_configuration(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpsertSalaryConfiguration>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();

    if let Err(err) = ensure_positive_wage(payload.monthly_wage) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": err.to_string()
        })));
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ? LIMIT 1)",
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to check employee existence");
        ErrorInternalServerError("Database error")
    })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let defaults = crate::payroll::components::ComponentPercents::default();

    sqlx::query(
        r#"
        INSERT INTO salary_configurations
            (employee_id, monthly_wage, basic_pct, hra_pct, standard_pct, performance_pct,
             lta_pct, fixed_pct, pf_employee_pct, pf_employer_pct, professional_tax,
             income_tax_pct, working_days_per_week, break_time_hours)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            monthly_wage = VALUES(monthly_wage),
            basic_pct = VALUES(basic_pct),
            hra_pct = VALUES(hra_pct),
            standard_pct = VALUES(standard_pct),
            performance_pct = VALUES(performance_pct),
            lta_pct = VALUES(lta_pct),
            fixed_pct = VALUES(fixed_pct),
            pf_employee_pct = VALUES(pf_employee_pct),
            pf_employer_pct = VALUES(pf_employer_pct),
            professional_tax = VALUES(professional_tax),
            income_tax_pct = VALUES(income_tax_pct),
            working_days_per_week = VALUES(working_days_per_week),
            break_time_hours = VALUES(break_time_hours)
        "#,
    )
    .bind(employee_id)
    .bind(payload.monthly_wage)
    .bind(payload.basic_pct.unwrap_or(defaults.basic))
    .bind(payload.hra_pct.unwrap_or(defaults.hra))
    .bind(payload.standard_pct.unwrap_or(defaults.standard_allowance))
    .bind(payload.performance_pct.unwrap_or(defaults.performance_bonus))
    .bind(payload.lta_pct.unwrap_or(defaults.leave_travel_allowance))
    .bind(payload.fixed_pct.unwrap_or(defaults.fixed_allowance))
    .bind(payload.pf_employee_pct.unwrap_or(defaults.pf_employee))
    .bind(payload.pf_employer_pct.unwrap_or(defaults.pf_employer))
    .bind(payload.professional_tax.unwrap_or(defaults.professional_tax))
    .bind(payload.income_tax_pct.unwrap_or(defaults.income_tax))
    .bind(payload.working_days_per_week.unwrap_or(5))
    .bind(payload.break_time_hours.unwrap_or(Decimal::ONE))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to save salary configuration");
        ErrorInternalServerError("Database error")
    })?;

    let saved = sqlx::query_as::<_, SalaryConfiguration>(
        "SELECT * FROM salary_configurations WHERE employee_id = ?",
    )
    .bind(employee_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to re-fetch salary configuration");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(saved))
}
