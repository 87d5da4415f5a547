use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::db::AppState;
use crate::error::ApiError;
use crate::reports::repo::{self, BillRow, DailyRow};

const DAY_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Debug, Deserialize, Default)]
pub struct DailyParams {
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceBreakdown {
    pub count: u64,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub total_records: u64,
    pub total_amount: Decimal,
    pub services: BTreeMap<String, ServiceBreakdown>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyReport {
    pub summary: DailySummary,
    pub records: Vec<DailyRow>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCar {
    pub plate_number: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub model: String,
    pub driver_phone: String,
    pub mechanic_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillService {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayment {
    pub amount_paid: Decimal,
    pub received_by: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_number: String,
    pub date: String,
    pub car: BillCar,
    pub service: BillService,
    pub payment: BillPayment,
    pub balance: Decimal,
}

impl Bill {
    fn from_row(row: BillRow) -> anyhow::Result<Bill> {
        Ok(Bill {
            bill_number: format!("BILL-{}", row.record_number),
            date: row.payment_date.date().format(DAY_FORMAT)?,
            car: BillCar {
                plate_number: row.plate_number,
                car_type: row.car_type,
                model: row.model,
                driver_phone: row.driver_phone,
                mechanic_name: row.mechanic_name,
            },
            service: BillService {
                name: row.service_name,
                price: row.service_price,
            },
            payment: BillPayment {
                amount_paid: row.amount_paid,
                received_by: row.received_by,
            },
            balance: row.service_price - row.amount_paid,
        })
    }
}

/// Aggregates one day's rows into per-service counts and exact decimal sums.
fn summarize(date: Date, rows: &[DailyRow]) -> DailySummary {
    let mut services: BTreeMap<String, ServiceBreakdown> = BTreeMap::new();
    let mut total_amount = Decimal::ZERO;

    for row in rows {
        total_amount += row.amount_paid;
        let entry = services
            .entry(row.service_name.clone())
            .or_insert(ServiceBreakdown {
                count: 0,
                amount: Decimal::ZERO,
            });
        entry.count += 1;
        entry.amount += row.amount_paid;
    }

    DailySummary {
        date: date
            .format(DAY_FORMAT)
            .unwrap_or_else(|_| date.to_string()),
        total_records: rows.len() as u64,
        total_amount,
        services,
    }
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/daily", get(daily_report))
        .route("/reports/bill/:record_number", get(bill))
}

#[instrument(skip(state))]
pub async fn daily_report(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(params): Query<DailyParams>,
) -> Result<Json<DailyReport>, ApiError> {
    let day = match &params.date {
        Some(raw) => Date::parse(raw, DAY_FORMAT)
            .map_err(|_| ApiError::InvalidInput("Invalid date, expected YYYY-MM-DD".into()))?,
        None => OffsetDateTime::now_utc().date(),
    };

    let records = repo::records_for_day(&state.db, day).await?;
    let summary = summarize(day, &records);

    Ok(Json(DailyReport { summary, records }))
}

#[instrument(skip(state))]
pub async fn bill(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(record_number): Path<i64>,
) -> Result<Json<Bill>, ApiError> {
    let row = repo::bill_row(&state.db, record_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service record not found".into()))?;
    Ok(Json(Bill::from_row(row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    fn row(n: i64, service: &str, amount: Decimal) -> DailyRow {
        DailyRow {
            record_number: n,
            plate_number: "RAD123A".into(),
            car_type: "Sedan".into(),
            model: "Corolla".into(),
            service_name: service.into(),
            amount_paid: amount,
            payment_date: datetime!(2026-08-27 09:30 UTC),
            received_by: "admin1".into(),
        }
    }

    #[test]
    fn summarize_totals_and_partitions() {
        let rows = vec![
            row(1, "Oil Change", dec!(60000)),
            row(2, "Oil Change", dec!(30000.50)),
            row(3, "Wheel alignment", dec!(5000)),
        ];
        let summary = summarize(date!(2026 - 08 - 27), &rows);

        assert_eq!(summary.date, "2026-08-27");
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_amount, dec!(95000.50));

        // Per-service buckets partition all rows without overlap.
        assert_eq!(summary.services.len(), 2);
        assert_eq!(
            summary.services["Oil Change"],
            ServiceBreakdown {
                count: 2,
                amount: dec!(90000.50)
            }
        );
        assert_eq!(
            summary.services["Wheel alignment"],
            ServiceBreakdown {
                count: 1,
                amount: dec!(5000)
            }
        );
        let bucket_total: u64 = summary.services.values().map(|b| b.count).sum();
        assert_eq!(bucket_total, summary.total_records);
        let bucket_amount: Decimal = summary.services.values().map(|b| b.amount).sum();
        assert_eq!(bucket_amount, summary.total_amount);
    }

    #[test]
    fn summarize_empty_day() {
        let summary = summarize(date!(2026 - 01 - 01), &[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert!(summary.services.is_empty());
    }

    #[test]
    fn bill_balance_is_price_minus_paid() {
        let bill = Bill::from_row(BillRow {
            record_number: 7,
            plate_number: "RAD123A".into(),
            car_type: "Sedan".into(),
            model: "Corolla".into(),
            driver_phone: "+250700000000".into(),
            mechanic_name: "John".into(),
            service_name: "Oil Change".into(),
            service_price: dec!(60000),
            amount_paid: dec!(60000),
            payment_date: datetime!(2026-08-27 09:30 UTC),
            received_by: "Admin One".into(),
        })
        .expect("bill");

        assert_eq!(bill.bill_number, "BILL-7");
        assert_eq!(bill.date, "2026-08-27");
        assert_eq!(bill.balance, Decimal::ZERO);
        assert_eq!(bill.payment.received_by, "Admin One");
    }

    #[test]
    fn bill_partial_payment_leaves_balance() {
        let bill = Bill::from_row(BillRow {
            record_number: 8,
            plate_number: "RAD123A".into(),
            car_type: "Sedan".into(),
            model: "Corolla".into(),
            driver_phone: "+250700000000".into(),
            mechanic_name: "John".into(),
            service_name: "Engine repair".into(),
            service_price: dec!(150000),
            amount_paid: dec!(100000.25),
            payment_date: datetime!(2026-08-27 11:00 UTC),
            received_by: "Admin One".into(),
        })
        .expect("bill");

        assert_eq!(bill.balance, dec!(49999.75));
    }

    #[test]
    fn daily_report_serializes_summary_shape() {
        let rows = vec![row(1, "Oil Change", dec!(60000))];
        let report = DailyReport {
            summary: summarize(date!(2026 - 08 - 27), &rows),
            records: rows,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["totalRecords"], 1);
        assert_eq!(json["summary"]["services"]["Oil Change"]["count"], 1);
        assert_eq!(json["records"][0]["receivedBy"], "admin1");
    }
}
