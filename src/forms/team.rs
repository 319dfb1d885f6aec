use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FieldErrors, FormMode};
use crate::api::RosterApi;
use crate::cache::{CollectionKey, QueryCache};
use crate::errors::AppError;
use crate::models::team::{Team, TeamPayload};

/// Fields of the add/edit team form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct TeamForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub parent_team: String,
}

impl TeamForm {
    pub fn from_team(team: &Team) -> Self {
        TeamForm {
            name: team.name.clone(),
            parent_team: team.parent_team_id.clone().unwrap_or_default(),
        }
    }

    fn trimmed(&self) -> TeamForm {
        TeamForm {
            name: self.name.trim().to_string(),
            parent_team: self.parent_team.trim().to_string(),
        }
    }

    /// Validates the form and turns it into the API body.
    pub fn check(&self) -> Result<TeamPayload, FieldErrors> {
        let form = self.trimmed();
        form.validate().map_err(FieldErrors::from)?;

        Ok(TeamPayload {
            name: form.name,
            parent_team_id: Some(form.parent_team).filter(|id| !id.is_empty()),
        })
    }
}

pub fn success_message(mode: &FormMode) -> &'static str {
    if mode.is_edit() {
        "Team Updated"
    } else {
        "Team Added"
    }
}

pub fn error_message(mode: &FormMode) -> &'static str {
    if mode.is_edit() {
        "Error updating team"
    } else {
        "Error adding team"
    }
}

/// Creates or updates the team and marks the team list stale.
pub async fn submit(
    api: &dyn RosterApi,
    cache: &QueryCache,
    mode: &FormMode,
    payload: &TeamPayload,
) -> Result<Team, AppError> {
    let team = match mode {
        FormMode::Create => api.create_team(payload).await?,
        FormMode::Edit(id) => api.update_team(id, payload).await?,
    };
    cache.invalidate(CollectionKey::Teams);
    info!("saved team {} ({})", team.id, team.name);
    Ok(team)
}
