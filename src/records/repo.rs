use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Service rendered to a car, as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub record_number: i64,
    pub plate_number: String,
    pub service_code: String,
    pub amount_paid: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub payment_date: OffsetDateTime,
    pub received_by: i64,
}

/// Listing projection: the record joined with the car, service and the
/// username of the user who received the payment. The raw `received_by` id
/// and the `received_by_user` username are both exposed on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecordRow {
    pub record_number: i64,
    pub plate_number: String,
    pub service_code: String,
    pub amount_paid: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub payment_date: OffsetDateTime,
    pub received_by: i64,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub driver_phone: String,
    pub mechanic_name: String,
    pub service_name: String,
    pub received_by_user: String,
}

const JOINED_SELECT: &str = r#"
    SELECT sr.record_number, sr.plate_number, sr.service_code, sr.amount_paid,
           sr.payment_date, sr.received_by,
           c.car_type, c.model, c.driver_phone, c.mechanic_name,
           s.service_name, u.username AS received_by_user
    FROM service_records sr
    JOIN cars c ON sr.plate_number = c.plate_number
    JOIN services s ON sr.service_code = s.service_code
    JOIN users u ON sr.received_by = u.id
"#;

impl ServiceRecord {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ServiceRecordRow>> {
        let rows = sqlx::query_as::<_, ServiceRecordRow>(&format!(
            "{JOINED_SELECT} ORDER BY sr.payment_date DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_joined(
        db: &PgPool,
        record_number: i64,
    ) -> anyhow::Result<Option<ServiceRecordRow>> {
        let row = sqlx::query_as::<_, ServiceRecordRow>(&format!(
            "{JOINED_SELECT} WHERE sr.record_number = $1"
        ))
        .bind(record_number)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_number(
        db: &PgPool,
        record_number: i64,
    ) -> anyhow::Result<Option<ServiceRecord>> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT record_number, plate_number, service_code, amount_paid, payment_date, received_by
            FROM service_records
            WHERE record_number = $1
            "#,
        )
        .bind(record_number)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }

    pub async fn create(
        db: &PgPool,
        plate_number: &str,
        service_code: &str,
        amount_paid: Decimal,
        received_by: i64,
    ) -> anyhow::Result<ServiceRecord> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO service_records (plate_number, service_code, amount_paid, received_by)
            VALUES ($1, $2, $3, $4)
            RETURNING record_number, plate_number, service_code, amount_paid, payment_date, received_by
            "#,
        )
        .bind(plate_number)
        .bind(service_code)
        .bind(amount_paid)
        .bind(received_by)
        .fetch_one(db)
        .await?;
        Ok(record)
    }

    pub async fn update(
        db: &PgPool,
        record_number: i64,
        plate_number: &str,
        service_code: &str,
        amount_paid: Decimal,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE service_records
            SET plate_number = $2, service_code = $3, amount_paid = $4
            WHERE record_number = $1
            "#,
        )
        .bind(record_number)
        .bind(plate_number)
        .bind(service_code)
        .bind(amount_paid)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, record_number: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM service_records WHERE record_number = $1")
            .bind(record_number)
            .execute(db)
            .await?;
        Ok(())
    }
}
