use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Priced catalogue entry, keyed by its service code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_code: String,
    pub service_name: String,
    pub service_price: Decimal,
}

impl Service {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT service_code, service_name, service_price
            FROM services
            ORDER BY service_name
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(services)
    }

    pub async fn find_by_code(db: &PgPool, service_code: &str) -> anyhow::Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT service_code, service_name, service_price
            FROM services
            WHERE service_code = $1
            "#,
        )
        .bind(service_code)
        .fetch_optional(db)
        .await?;
        Ok(service)
    }

    pub async fn create(db: &PgPool, service: &Service) -> anyhow::Result<Service> {
        let created = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (service_code, service_name, service_price)
            VALUES ($1, $2, $3)
            RETURNING service_code, service_name, service_price
            "#,
        )
        .bind(&service.service_code)
        .bind(&service.service_name)
        .bind(service.service_price)
        .fetch_one(db)
        .await?;
        Ok(created)
    }
}
