use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Car on file, keyed by its plate number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub plate_number: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub driver_phone: String,
    pub mechanic_name: String,
}

impl Car {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT plate_number, car_type, model, manufacturing_year, driver_phone, mechanic_name
            FROM cars
            ORDER BY plate_number
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(cars)
    }

    pub async fn find_by_plate(db: &PgPool, plate_number: &str) -> anyhow::Result<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            SELECT plate_number, car_type, model, manufacturing_year, driver_phone, mechanic_name
            FROM cars
            WHERE plate_number = $1
            "#,
        )
        .bind(plate_number)
        .fetch_optional(db)
        .await?;
        Ok(car)
    }

    pub async fn create(db: &PgPool, car: &Car) -> anyhow::Result<Car> {
        let created = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (plate_number, car_type, model, manufacturing_year, driver_phone, mechanic_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING plate_number, car_type, model, manufacturing_year, driver_phone, mechanic_name
            "#,
        )
        .bind(&car.plate_number)
        .bind(&car.car_type)
        .bind(&car.model)
        .bind(car.manufacturing_year)
        .bind(&car.driver_phone)
        .bind(&car.mechanic_name)
        .fetch_one(db)
        .await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_wire_shape() {
        let car = Car {
            plate_number: "RAD123A".into(),
            car_type: "Sedan".into(),
            model: "Corolla".into(),
            manufacturing_year: 2020,
            driver_phone: "+250700000000".into(),
            mechanic_name: "John".into(),
        };
        let json = serde_json::to_value(&car).unwrap();
        assert_eq!(json["plateNumber"], "RAD123A");
        assert_eq!(json["type"], "Sedan");
        assert_eq!(json["manufacturingYear"], 2020);
        assert_eq!(json["mechanicName"], "John");
    }
}
