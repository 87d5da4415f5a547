use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::db::AppState;
use crate::error::ApiError;
use crate::services::repo::Service;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub service_code: String,
    pub service_name: String,
    pub service_price: Decimal,
}

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/:service_code", get(get_service))
}

#[instrument(skip(state))]
pub async fn list_services(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<Service>>, ApiError> {
    let services = Service::list(&state.db).await?;
    Ok(Json(services))
}

#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(service_code): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let service = Service::find_by_code(&state.db, &service_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

#[instrument(skip(state, payload))]
pub async fn create_service(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if payload.service_code.is_empty()
        || payload.service_name.is_empty()
        || payload.service_price.is_zero()
    {
        return Err(ApiError::InvalidInput("Please enter all fields".into()));
    }
    if payload.service_price.is_sign_negative() {
        return Err(ApiError::InvalidInput(
            "Service price must not be negative".into(),
        ));
    }

    if Service::find_by_code(&state.db, &payload.service_code)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Service with this code already exists".into(),
        ));
    }

    let service = Service {
        service_code: payload.service_code,
        service_name: payload.service_name,
        service_price: payload.service_price,
    };
    let service = Service::create(&state.db, &service)
        .await
        .map_err(|e| ApiError::from_db(e, "Service with this code already exists"))?;

    info!(service_code = %service.service_code, "service added");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "msg": "Service added successfully", "service": service })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn service_wire_shape() {
        let service = Service {
            service_code: "OIL001".into(),
            service_name: "Oil Change".into(),
            service_price: dec!(60000),
        };
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["serviceCode"], "OIL001");
        assert_eq!(json["serviceName"], "Oil Change");
        assert_eq!(json["servicePrice"], "60000");
    }

    #[test]
    fn create_request_parses_numeric_price() {
        let req: CreateServiceRequest = serde_json::from_str(
            r#"{"serviceCode":"WHE001","serviceName":"Wheel alignment","servicePrice":5000}"#,
        )
        .unwrap();
        assert_eq!(req.service_price, dec!(5000));
    }
}
