use async_trait::async_trait;
use log::error;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::auth::BearerToken;
use super::RosterApi;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePayload};
use crate::models::team::{Team, TeamPayload};

#[derive(Debug, Clone)]
pub struct RosterClient {
    http: Client,
    base_url: Url,
    token: BearerToken,
}

impl RosterClient {
    pub fn new(base_url: Url, token: BearerToken) -> Self {
        RosterClient {
            http: Client::new(),
            base_url,
            token,
        }
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("{} cannot be used as an API base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<(String, RequestBuilder), AppError> {
        let url = self.endpoint_url(segments)?;
        let endpoint = url.path().to_string();

        let request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.token.header_value())
            .header(CONTENT_TYPE, "application/json");
        Ok((endpoint, request))
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<reqwest::Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("API request to {} failed: {}", endpoint, status);
            return Err(AppError::Api {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        let (endpoint, request) = self.request(Method::GET, segments)?;
        Ok(self.send(&endpoint, request).await?.json::<T>().await?)
    }

    async fn submit<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        let (endpoint, request) = self.request(method, segments)?;
        Ok(self.send(&endpoint, request.json(body)).await?.json::<T>().await?)
    }

    async fn remove(&self, segments: &[&str]) -> Result<(), AppError> {
        let (endpoint, request) = self.request(Method::DELETE, segments)?;
        self.send(&endpoint, request).await?;
        Ok(())
    }
}

#[async_trait]
impl RosterApi for RosterClient {
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.fetch(&["teams"]).await
    }

    async fn get_team(&self, id: &str) -> Result<Team, AppError> {
        self.fetch(&["teams", id]).await
    }

    async fn create_team(&self, payload: &TeamPayload) -> Result<Team, AppError> {
        self.submit(Method::POST, &["teams"], payload).await
    }

    async fn update_team(&self, id: &str, payload: &TeamPayload) -> Result<Team, AppError> {
        self.submit(Method::PUT, &["teams", id], payload).await
    }

    async fn delete_team(&self, id: &str) -> Result<(), AppError> {
        self.remove(&["teams", id]).await
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        self.fetch(&["employees"]).await
    }

    async fn get_employee(&self, id: &str) -> Result<Employee, AppError> {
        self.fetch(&["employees", id]).await
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> Result<Employee, AppError> {
        self.submit(Method::POST, &["employees"], payload).await
    }

    async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> Result<Employee, AppError> {
        self.submit(Method::PUT, &["employees", id], payload).await
    }

    async fn delete_employee(&self, id: &str) -> Result<(), AppError> {
        self.remove(&["employees", id]).await
    }
}
