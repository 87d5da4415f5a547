//! Typed client for the CRPMS API.
//!
//! The session (bearer token plus the cached profile) lives in an explicit
//! [`Session`] value with load/store/clear lifecycle methods instead of any
//! ambient global state. There is no token refresh: when the server answers
//! 401 the caller has to log in again.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::handlers::{CurrentUser, TokenResponse};
use crate::cars::repo::Car;
use crate::records::repo::{ServiceRecord, ServiceRecordRow};
use crate::reports::handlers::{Bill, DailyReport};
use crate::services::repo::Service;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("api error ({status}): {msg}")]
    Api { status: u16, msg: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not logged in")]
    NoSession,
}

/// Current session: the bearer token and the profile it was issued for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<CurrentUser>,
}

impl Session {
    /// Loads a previously stored session; a missing file yields an empty one.
    pub fn load(path: &Path) -> anyhow::Result<Session> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn store(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub plate_number: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub driver_phone: String,
    pub mechanic_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub service_code: String,
    pub service_name: String,
    pub service_price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub plate_number: String,
    pub service_code: String,
    pub amount_paid: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatedCar {
    pub msg: String,
    pub car: Car,
}

#[derive(Debug, Deserialize)]
pub struct CreatedService {
    pub msg: String,
    pub service: Service,
}

#[derive(Debug, Deserialize)]
pub struct CreatedRecord {
    pub msg: String,
    pub record: ServiceRecord,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    pub session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: Session::default(),
        }
    }

    pub fn with_session(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.session.token.as_deref().ok_or(ClientError::NoSession)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let msg = resp
                .json::<ErrorBody>()
                .await
                .map(|b| b.msg)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                msg,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::parse(resp).await
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(self.bearer()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::parse(resp).await
    }

    // -- auth --------------------------------------------------------------

    /// Registers a new user and starts a session with the returned token.
    pub async fn register(&mut self, payload: &RegisterPayload) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let token: TokenResponse = Self::parse(resp).await?;
        self.session.token = Some(token.token);
        self.session.user = Some(self.current_user().await?);
        Ok(())
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let token: TokenResponse = Self::parse(resp).await?;
        self.session.token = Some(token.token);
        self.session.user = Some(self.current_user().await?);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session.clear();
    }

    pub async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        self.get("/auth/user").await
    }

    // -- cars --------------------------------------------------------------

    pub async fn list_cars(&self) -> Result<Vec<Car>, ClientError> {
        self.get("/cars").await
    }

    pub async fn get_car(&self, plate_number: &str) -> Result<Car, ClientError> {
        self.get(&format!("/cars/{plate_number}")).await
    }

    pub async fn create_car(&self, car: &NewCar) -> Result<CreatedCar, ClientError> {
        self.post("/cars", car).await
    }

    // -- services ----------------------------------------------------------

    pub async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get("/services").await
    }

    pub async fn get_service(&self, service_code: &str) -> Result<Service, ClientError> {
        self.get(&format!("/services/{service_code}")).await
    }

    pub async fn create_service(&self, service: &NewService) -> Result<CreatedService, ClientError> {
        self.post("/services", service).await
    }

    // -- service records ---------------------------------------------------

    pub async fn list_records(&self) -> Result<Vec<ServiceRecordRow>, ClientError> {
        self.get("/service-records").await
    }

    pub async fn get_record(&self, record_number: i64) -> Result<ServiceRecordRow, ClientError> {
        self.get(&format!("/service-records/{record_number}")).await
    }

    pub async fn create_record(&self, record: &NewRecord) -> Result<CreatedRecord, ClientError> {
        self.post("/service-records", record).await
    }

    pub async fn update_record(
        &self,
        record_number: i64,
        record: &NewRecord,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/service-records/{record_number}")))
            .bearer_auth(self.bearer()?)
            .json(record)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::parse(resp).await
    }

    pub async fn delete_record(&self, record_number: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/service-records/{record_number}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let _: serde_json::Value = Self::parse(resp).await?;
        Ok(())
    }

    // -- reports -----------------------------------------------------------

    pub async fn daily_report(&self, date: Option<&str>) -> Result<DailyReport, ClientError> {
        match date {
            Some(d) => self.get(&format!("/reports/daily?date={d}")).await,
            None => self.get("/reports/daily").await,
        }
    }

    pub async fn bill(&self, record_number: i64) -> Result<Bill, ClientError> {
        self.get(&format!("/reports/bill/{record_number}")).await
    }
}
