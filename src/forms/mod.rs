pub mod employee;
pub mod lifecycle;
pub mod team;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use validator::ValidationErrors;

use crate::ui::transient::Banner;

pub use employee::EmployeeForm;
pub use lifecycle::{FormLifecycle, FormStatus};
pub use team::TeamForm;

/// Whether a form creates a record or edits the one with the given id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormEntity {
    Team,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormKey {
    pub entity: FormEntity,
    pub mode: FormMode,
}

impl FormKey {
    pub fn team(mode: FormMode) -> Self {
        FormKey { entity: FormEntity::Team, mode }
    }

    pub fn employee(mode: FormMode) -> Self {
        FormKey { entity: FormEntity::Employee, mode }
    }
}

/// First message per field, ready for inline display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(err: ValidationErrors) -> Self {
        let mut errors = FieldErrors::default();
        for (field, errs) in err.field_errors() {
            if let Some(first) = errs.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                errors.add(field, message);
            }
        }
        errors
    }
}

/// Submission state of every open form.
#[derive(Debug, Default)]
pub struct FormRegistry {
    forms: HashMap<FormKey, FormLifecycle>,
}

impl FormRegistry {
    pub fn new() -> Self {
        FormRegistry::default()
    }

    pub fn succeed(&mut self, key: &FormKey, banner: Banner, now: DateTime<Utc>, window: Duration) {
        self.forms.entry(key.clone()).or_default().succeed(banner, now, window);
    }

    pub fn fail(&mut self, key: &FormKey, banner: Banner, now: DateTime<Utc>, window: Duration) {
        self.forms.entry(key.clone()).or_default().fail(banner, now, window);
    }

    /// Polls a form and forgets it once it has nothing left to show.
    pub fn poll(&mut self, key: &FormKey, now: DateTime<Utc>) -> FormStatus {
        let status = match self.forms.get_mut(key) {
            Some(lifecycle) => lifecycle.poll(now),
            None => FormStatus::Ready,
        };
        if matches!(status, FormStatus::Ready | FormStatus::Completed) {
            self.forms.remove(key);
        }
        status
    }
}
