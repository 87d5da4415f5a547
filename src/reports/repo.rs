use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

/// Row backing the daily report: records of one calendar day joined with
/// display fields. `received_by` here is the username projection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyRow {
    pub record_number: i64,
    pub plate_number: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub service_name: String,
    pub amount_paid: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub payment_date: OffsetDateTime,
    pub received_by: String,
}

/// Row backing the bill: one record with everything needed for the invoice.
/// `received_by` here is the receiver's full name projection.
#[derive(Debug, Clone, FromRow)]
pub struct BillRow {
    pub record_number: i64,
    pub plate_number: String,
    pub car_type: String,
    pub model: String,
    pub driver_phone: String,
    pub mechanic_name: String,
    pub service_name: String,
    pub service_price: Decimal,
    pub amount_paid: Decimal,
    pub payment_date: OffsetDateTime,
    pub received_by: String,
}

pub async fn records_for_day(db: &PgPool, day: Date) -> anyhow::Result<Vec<DailyRow>> {
    let rows = sqlx::query_as::<_, DailyRow>(
        r#"
        SELECT sr.record_number, sr.plate_number, c.car_type, c.model, s.service_name,
               sr.amount_paid, sr.payment_date, u.username AS received_by
        FROM service_records sr
        JOIN cars c ON sr.plate_number = c.plate_number
        JOIN services s ON sr.service_code = s.service_code
        JOIN users u ON sr.received_by = u.id
        WHERE (sr.payment_date AT TIME ZONE 'UTC')::date = $1
        ORDER BY sr.payment_date
        "#,
    )
    .bind(day)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn bill_row(db: &PgPool, record_number: i64) -> anyhow::Result<Option<BillRow>> {
    let row = sqlx::query_as::<_, BillRow>(
        r#"
        SELECT sr.record_number, sr.plate_number, c.car_type, c.model, c.driver_phone,
               c.mechanic_name, s.service_name, s.service_price, sr.amount_paid,
               sr.payment_date, u.full_name AS received_by
        FROM service_records sr
        JOIN cars c ON sr.plate_number = c.plate_number
        JOIN services s ON sr.service_code = s.service_code
        JOIN users u ON sr.received_by = u.id
        WHERE sr.record_number = $1
        "#,
    )
    .bind(record_number)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
