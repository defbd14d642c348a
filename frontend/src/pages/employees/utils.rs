use std::str::FromStr;

use crate::api::{Department, FieldErrors, NewEmployee};

const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const INVALID_DEPARTMENT: &str = "Select a valid department.";

pub const FIELDS: [&str; 4] = ["employee_id", "full_name", "email", "department"];

/// Raw input of the "add employee" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

impl EmployeeForm {
    /// Unknown field names are ignored.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let slot = match field {
            "employee_id" => &mut self.employee_id,
            "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "department" => &mut self.department,
            _ => return,
        };
        *slot = value.into();
    }

    pub fn to_payload(&self) -> Result<NewEmployee, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut required = |field: &str, value: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                errors.push(field, REQUIRED);
            }
            trimmed.to_string()
        };
        let employee_id = required("employee_id", &self.employee_id);
        let full_name = required("full_name", &self.full_name);
        let email = required("email", &self.email);
        let department_raw = required("department", &self.department);

        if !email.is_empty() && !looks_like_email(&email) {
            errors.push("email", INVALID_EMAIL);
        }
        let department = if department_raw.is_empty() {
            None
        } else {
            match Department::from_str(&department_raw) {
                Ok(department) => Some(department),
                Err(_) => {
                    errors.push("department", INVALID_DEPARTMENT);
                    None
                }
            }
        };

        match department {
            Some(department) if errors.is_empty() => Ok(NewEmployee {
                employee_id,
                full_name,
                email,
                department,
            }),
            _ => Err(errors),
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
