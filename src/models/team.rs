use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_team_id: Option<String>,
}

/// Body of `POST /teams` and `PUT /teams/{id}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamPayload {
    pub name: String,
    pub parent_team_id: Option<String>,
}
