use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;

use crate::api::RosterApi;
use crate::cache::QueryCache;
use crate::errors::AppError;
use crate::forms::FormRegistry;
use crate::models::employee::Employee;
use crate::models::team::Team;
use crate::roster::{attach_employees, build_team_forest, Forest};
use crate::ui::{BoardState, PendingActions};
use crate::views::Templates;

/// Shared by every handler through `web::Data`.
pub struct AppState {
    pub api: Arc<dyn RosterApi>,
    pub cache: QueryCache,
    pub pending: PendingActions,
    pub templates: Templates,
    pub feedback_window: Duration,
    board: Mutex<BoardState>,
    forms: Mutex<FormRegistry>,
}

/// One fetch cycle: the employee list and the forest rebuilt from both lists.
pub struct Roster {
    pub employees: Arc<Vec<Employee>>,
    pub forest: Forest,
}

impl AppState {
    pub fn new(api: Arc<dyn RosterApi>, feedback_window: Duration) -> Result<Self, AppError> {
        Ok(AppState {
            api,
            cache: QueryCache::new(),
            pending: PendingActions::new(),
            templates: Templates::new()?,
            feedback_window,
            board: Mutex::new(BoardState::new()),
            forms: Mutex::new(FormRegistry::new()),
        })
    }

    pub fn board(&self) -> MutexGuard<'_, BoardState> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn forms(&self) -> MutexGuard<'_, FormRegistry> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn teams(&self) -> Result<Arc<Vec<Team>>, AppError> {
        self.cache.teams(self.api.as_ref()).await
    }

    pub async fn employees(&self) -> Result<Arc<Vec<Employee>>, AppError> {
        self.cache.employees(self.api.as_ref()).await
    }

    /// Reads both collections (from cache when fresh) and rebuilds the
    /// forest from scratch.
    pub async fn load_roster(&self) -> Result<Roster, AppError> {
        let (teams, employees) = futures_util::try_join!(self.teams(), self.employees())?;
        let mut forest = build_team_forest(&teams);
        attach_employees(&mut forest, &employees);
        Ok(Roster { employees, forest })
    }
}
