use crate::api::attendance::{AttendanceFilter, AttendanceListResponse};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, UpsertSalaryConfiguration,
};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse};
use crate::api::payroll::{
    AllowanceBlock, DeductionBlock, GeneratePayroll, PaginatedPayrollResponse, PayrollQuery,
    PayrollResponse, PreviewQuery, UpdatePaymentStatus,
};
use crate::model::attendance::{Attendance, AttendanceStatus, LeaveCategory};
use crate::model::employee::Employee;
use crate::model::payroll::PaymentStatus;
use crate::model::salary::SalaryConfiguration;
use crate::payroll::components::{ComponentBreakdown, ComponentPercents};
use crate::payroll::engine::{PayrollOverrides, PayslipDraft};
use crate::payroll::summary::AttendanceSummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dayflow HR API",
        version = "1.0.0",
        description = r#"
## Dayflow — HR Management System

This API powers an HR management system: employee records, attendance
tracking, leave approval, and payroll/payslip generation.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles and salary configurations
- **Leave Management**
  - Apply for leave, approve/reject requests; approvals write categorized
    attendance so payroll never guesses from free text
- **Attendance Management**
  - Daily check-in and check-out tracking, HR-side listing and filtering
- **Payroll Management**
  - Generate attendance-reconciled payslips (salary components, provident
    fund, loss-of-pay, overtime), preview summaries, and walk payment
    status through Pending → Processed → Paid

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::get_salary_configuration,
        crate::api::employee::upsert_salary_configuration,

        crate::api::payroll::generate_payroll,
        crate::api::payroll::preview_attendance,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::update_payroll,
        crate::api::payroll::update_payment_status
    ),
    components(
        schemas(
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            CreateLeave,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            SalaryConfiguration,
            UpsertSalaryConfiguration,
            Attendance,
            AttendanceStatus,
            LeaveCategory,
            AttendanceFilter,
            AttendanceListResponse,
            AttendanceSummary,
            ComponentPercents,
            ComponentBreakdown,
            PayrollOverrides,
            PayslipDraft,
            PaymentStatus,
            GeneratePayroll,
            PreviewQuery,
            PayrollQuery,
            AllowanceBlock,
            DeductionBlock,
            PayrollResponse,
            PaginatedPayrollResponse,
            UpdatePaymentStatus
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Employee", description = "Employee and salary configuration APIs"),
        (name = "Payroll", description = "Payslip generation and payment APIs"),
    )
)]
pub struct ApiDoc;
