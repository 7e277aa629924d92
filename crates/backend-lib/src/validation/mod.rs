// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use employee_common::{EmployeeUpdate, NewDepartment, NewEmployee};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap());
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid department: {0}")]
    InvalidDepartment(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a login name
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::InvalidUsername(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }

    Ok(username)
}

/// Validate a first or last name
pub fn validate_name<'a>(field: &str, name: &'a str) -> ValidationResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName(format!("{field} must not be empty")));
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "{field} cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(trimmed)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email must not be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email format is invalid".to_string(),
        ));
    }

    Ok(email)
}

fn validate_position(position: &str) -> ValidationResult<&str> {
    if position.trim().is_empty() {
        return Err(ValidationError::InvalidPosition(
            "Position must not be empty".to_string(),
        ));
    }
    Ok(position)
}

fn validate_department_id(department_id: i64) -> ValidationResult<i64> {
    if department_id < 1 {
        return Err(ValidationError::InvalidDepartment(format!(
            "Department id {department_id} is not valid"
        )));
    }
    Ok(department_id)
}

/// Validate an employee creation request
pub fn validate_new_employee(employee: &NewEmployee) -> ValidationResult<()> {
    validate_name("First name", &employee.first_name)?;
    validate_name("Last name", &employee.last_name)?;
    validate_email(&employee.email)?;
    validate_position(&employee.position)?;
    validate_department_id(employee.department_id)?;
    Ok(())
}

/// Validate an employee update request
pub fn validate_employee_update(update: &EmployeeUpdate) -> ValidationResult<()> {
    validate_name("First name", &update.first_name)?;
    validate_name("Last name", &update.last_name)?;
    validate_position(&update.position)?;
    validate_department_id(update.department_id)?;
    Ok(())
}

/// Validate a department creation request
pub fn validate_new_department(department: &NewDepartment) -> ValidationResult<()> {
    if department.department_name.trim().is_empty() {
        return Err(ValidationError::InvalidName(
            "Department name must not be empty".to_string(),
        ));
    }
    Ok(())
}
