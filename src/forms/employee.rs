use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FieldErrors, FormMode};
use crate::api::RosterApi;
use crate::cache::{CollectionKey, QueryCache};
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePayload};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields of the add/edit employee form. Dates arrive as `YYYY-MM-DD` from
/// `<input type="date">`, empty when unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct EmployeeForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_date(raw: &str) -> Result<Option<DateTime<Utc>>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(())?;
    Ok(Some(midnight.and_utc()))
}

impl EmployeeForm {
    pub fn from_employee(employee: &Employee) -> Self {
        EmployeeForm {
            name: employee.name.clone(),
            surname: employee.surname.clone(),
            position: employee.position.clone(),
            team: employee.team_id.clone().unwrap_or_default(),
            start_date: format_date(employee.start_date),
            end_date: format_date(employee.end_date),
        }
    }

    fn trimmed(&self) -> EmployeeForm {
        EmployeeForm {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            position: self.position.trim().to_string(),
            team: self.team.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        }
    }

    /// Validates the form and turns it into the API body. An end date before
    /// the start date is reported on `end_date`.
    pub fn check(&self) -> Result<EmployeePayload, FieldErrors> {
        let form = self.trimmed();
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::default(),
            Err(err) => FieldErrors::from(err),
        };

        let start_date = parse_date(&form.start_date).unwrap_or_else(|_| {
            errors.add("start_date", "Invalid date");
            None
        });
        let end_date = parse_date(&form.end_date).unwrap_or_else(|_| {
            errors.add("end_date", "Invalid date");
            None
        });
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("end_date", "End date can't be before start date");
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(EmployeePayload {
            name: form.name,
            surname: form.surname,
            position: form.position,
            team_id: Some(form.team).filter(|id| !id.is_empty()),
            start_date,
            end_date,
        })
    }
}

pub fn success_message(mode: &FormMode) -> &'static str {
    if mode.is_edit() {
        "Employee Updated"
    } else {
        "Employee Added"
    }
}

pub fn error_message(mode: &FormMode) -> &'static str {
    if mode.is_edit() {
        "Error updating employee"
    } else {
        "Error adding employee"
    }
}

/// Creates or updates the employee and marks the employee list stale.
pub async fn submit(
    api: &dyn RosterApi,
    cache: &QueryCache,
    mode: &FormMode,
    payload: &EmployeePayload,
) -> Result<Employee, AppError> {
    let employee = match mode {
        FormMode::Create => api.create_employee(payload).await?,
        FormMode::Edit(id) => api.update_employee(id, payload).await?,
    };
    cache.invalidate(CollectionKey::Employees);
    info!("saved employee {} ({})", employee.id, employee.full_name());
    Ok(employee)
}
