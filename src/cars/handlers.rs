use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::jwt::AuthUser;
use crate::cars::repo::Car;
use crate::db::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCarRequest {
    pub plate_number: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub driver_phone: String,
    pub mechanic_name: String,
}

pub fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/:plate_number", get(get_car))
}

#[instrument(skip(state))]
pub async fn list_cars(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<Car>>, ApiError> {
    let cars = Car::list(&state.db).await?;
    Ok(Json(cars))
}

#[instrument(skip(state))]
pub async fn get_car(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(plate_number): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let car = Car::find_by_plate(&state.db, &plate_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Car not found".into()))?;
    Ok(Json(car))
}

#[instrument(skip(state, payload))]
pub async fn create_car(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if payload.plate_number.is_empty()
        || payload.car_type.is_empty()
        || payload.model.is_empty()
        || payload.manufacturing_year == 0
        || payload.driver_phone.is_empty()
        || payload.mechanic_name.is_empty()
    {
        return Err(ApiError::InvalidInput("Please enter all fields".into()));
    }

    if Car::find_by_plate(&state.db, &payload.plate_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Car with this plate number already exists".into(),
        ));
    }

    let car = Car {
        plate_number: payload.plate_number,
        car_type: payload.car_type,
        model: payload.model,
        manufacturing_year: payload.manufacturing_year,
        driver_phone: payload.driver_phone,
        mechanic_name: payload.mechanic_name,
    };
    let car = Car::create(&state.db, &car)
        .await
        .map_err(|e| ApiError::from_db(e, "Car with this plate number already exists"))?;

    info!(plate_number = %car.plate_number, "car added");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "msg": "Car added successfully", "car": car })),
    ))
}
