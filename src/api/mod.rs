pub mod auth;
pub mod client;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePayload};
use crate::models::team::{Team, TeamPayload};

pub use client::RosterClient;

/// The remote teams/employees service.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn list_teams(&self) -> Result<Vec<Team>, AppError>;
    async fn get_team(&self, id: &str) -> Result<Team, AppError>;
    async fn create_team(&self, payload: &TeamPayload) -> Result<Team, AppError>;
    async fn update_team(&self, id: &str, payload: &TeamPayload) -> Result<Team, AppError>;
    async fn delete_team(&self, id: &str) -> Result<(), AppError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, AppError>;
    async fn get_employee(&self, id: &str) -> Result<Employee, AppError>;
    async fn create_employee(&self, payload: &EmployeePayload) -> Result<Employee, AppError>;
    async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> Result<Employee, AppError>;
    async fn delete_employee(&self, id: &str) -> Result<(), AppError>;
}
