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
use crate::cars::repo::Car;
use crate::db::AppState;
use crate::error::ApiError;
use crate::records::repo::{ServiceRecord, ServiceRecordRow};
use crate::services::repo::Service;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordRequest {
    pub plate_number: String,
    pub service_code: String,
    pub amount_paid: Decimal,
}

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/service-records", get(list_records).post(create_record))
        .route(
            "/service-records/:record_number",
            get(get_record).put(update_record).delete(delete_record),
        )
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<ServiceRecordRow>>, ApiError> {
    let records = ServiceRecord::list(&state.db).await?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(record_number): Path<i64>,
) -> Result<Json<ServiceRecordRow>, ApiError> {
    let record = ServiceRecord::find_joined(&state.db, record_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service record not found".into()))?;
    Ok(Json(record))
}

/// Referenced car and service are validated before the insert so the caller
/// gets "Car not found" / "Service not found" rather than a bare FK error.
async fn check_references(state: &AppState, payload: &RecordRequest) -> Result<(), ApiError> {
    if Car::find_by_plate(&state.db, &payload.plate_number)
        .await?
        .is_none()
    {
        return Err(ApiError::InvalidInput("Car not found".into()));
    }
    if Service::find_by_code(&state.db, &payload.service_code)
        .await?
        .is_none()
    {
        return Err(ApiError::InvalidInput("Service not found".into()));
    }
    Ok(())
}

fn check_fields(payload: &RecordRequest) -> Result<(), ApiError> {
    if payload.plate_number.is_empty()
        || payload.service_code.is_empty()
        || payload.amount_paid.is_zero()
    {
        return Err(ApiError::InvalidInput("Please enter all fields".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<RecordRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    check_fields(&payload)?;
    check_references(&state, &payload).await?;

    // The acting user from the verified claim is recorded as the receiver.
    let record = ServiceRecord::create(
        &state.db,
        &payload.plate_number,
        &payload.service_code,
        payload.amount_paid,
        claims.sub,
    )
    .await?;

    info!(
        record_number = record.record_number,
        plate_number = %record.plate_number,
        "service record added"
    );
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "msg": "Service record added successfully",
            "record": record,
        })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_record(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(record_number): Path<i64>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_fields(&payload)?;

    if ServiceRecord::find_by_number(&state.db, record_number)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Service record not found".into()));
    }

    check_references(&state, &payload).await?;

    ServiceRecord::update(
        &state.db,
        record_number,
        &payload.plate_number,
        &payload.service_code,
        payload.amount_paid,
    )
    .await?;

    info!(record_number, "service record updated");
    Ok(Json(serde_json::json!({
        "msg": "Service record updated successfully",
        "record": {
            "recordNumber": record_number,
            "plateNumber": payload.plate_number,
            "serviceCode": payload.service_code,
            "amountPaid": payload.amount_paid,
        },
    })))
}

#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(record_number): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if ServiceRecord::find_by_number(&state.db, record_number)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Service record not found".into()));
    }

    ServiceRecord::delete(&state.db, record_number).await?;

    info!(record_number, "service record deleted");
    Ok(Json(serde_json::json!({
        "msg": "Service record deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_request_rejects_missing_fields() {
        let req: RecordRequest =
            serde_json::from_str(r#"{"plateNumber":"RAD123A","serviceCode":"OIL001"}"#).unwrap();
        assert!(check_fields(&req).is_err());
    }

    #[test]
    fn record_request_accepts_complete_fields() {
        let req = RecordRequest {
            plate_number: "RAD123A".into(),
            service_code: "OIL001".into(),
            amount_paid: dec!(60000),
        };
        assert!(check_fields(&req).is_ok());
    }
}
