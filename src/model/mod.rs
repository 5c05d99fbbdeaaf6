pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod role;
pub mod salary;
