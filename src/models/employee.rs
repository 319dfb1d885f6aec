use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub position: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team_id: Option<String>,
}

impl Employee {
    /// Former iff the end date is set and already passed at `now`.
    pub fn is_former_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.end_date, Some(end) if end < now)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Body of `POST /employees` and `PUT /employees/{id}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EmployeePayload {
    pub name: String,
    pub surname: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
