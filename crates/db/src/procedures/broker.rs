//! Stock broker stored-call wrappers.

use serde::Serialize;
use sqlx::PgPool;

/// A broker row as returned by `public."FetchStockBroker"`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct BrokerRow {
    /// Broker identifier.
    #[sqlx(rename = "Id")]
    pub id: i32,
    /// Broker name.
    #[sqlx(rename = "Name")]
    pub name: String,
    /// Short display code.
    #[sqlx(rename = "ShortCode")]
    pub short_code: String,
    /// Whether the entity acts as a full-service broker.
    #[sqlx(rename = "IsBroker")]
    pub is_broker: bool,
    /// Whether the entity is a discount broker.
    #[sqlx(rename = "IsDiscountBroker")]
    pub is_discount_broker: bool,
    /// Active flag.
    #[sqlx(rename = "IsActive")]
    pub is_active: bool,
    /// Creation time, epoch seconds.
    #[sqlx(rename = "CreatedOn")]
    pub created_on: Option<i64>,
    /// Last update time, epoch seconds.
    #[sqlx(rename = "UpdatedOn")]
    pub updated_on: Option<i64>,
}

/// Fields for creating or updating a broker.
///
/// The flags are optional: create defaults them, while update passes the
/// caller's values through (nulls included) for the procedure to resolve.
#[derive(Debug, Clone)]
pub struct BrokerInput {
    /// Broker name.
    pub name: String,
    /// Short display code.
    pub short_code: String,
    /// Whether the entity acts as a full-service broker.
    pub is_broker: Option<bool>,
    /// Whether the entity is a discount broker.
    pub is_discount_broker: Option<bool>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Broker repository.
#[derive(Debug, Clone)]
pub struct BrokerRepository {
    pool: PgPool,
}

impl BrokerRepository {
    /// Creates a new broker repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches all brokers via `public."FetchStockBroker"()`.
    pub async fn fetch_all(&self) -> Result<Vec<BrokerRow>, sqlx::Error> {
        sqlx::query_as::<_, BrokerRow>(r#"SELECT * FROM public."FetchStockBroker"()"#)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetches a single broker by id.
    ///
    /// The fetch function has no dedicated by-id variant; the unfiltered
    /// listing is scanned, as the portal has always done.
    pub async fn fetch_by_id(&self, id: i32) -> Result<Option<BrokerRow>, sqlx::Error> {
        let brokers =
            sqlx::query_as::<_, BrokerRow>(r#"SELECT * FROM public."FetchStockBroker"($1, $2)"#)
                .bind(Option::<i32>::None)
                .bind(Option::<bool>::None)
                .fetch_all(&self.pool)
                .await?;

        Ok(brokers.into_iter().find(|b| b.id == id))
    }

    /// Inserts a broker via `public."InsertStockBroker"`.
    pub async fn insert(&self, input: &BrokerInput) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."InsertStockBroker"($1, $2, $3, $4, $5)"#)
            .bind(&input.name)
            .bind(&input.short_code)
            .bind(input.is_broker)
            .bind(input.is_discount_broker)
            .bind(input.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Updates a broker via `public."UpdateStockBroker"`.
    pub async fn update(&self, id: i32, input: &BrokerInput) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."UpdateStockBroker"($1, $2, $3, $4, $5, $6)"#)
            .bind(id)
            .bind(&input.name)
            .bind(&input.short_code)
            .bind(input.is_broker)
            .bind(input.is_discount_broker)
            .bind(input.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes a broker row directly; no delete procedure exists for
    /// brokers.
    pub async fn delete(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query(r#"DELETE FROM public."StockBrokers" WHERE "Id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_serializes_pascal_case() {
        let row = BrokerRow {
            id: 7,
            name: "Acme Securities".to_string(),
            short_code: "ACME".to_string(),
            is_broker: true,
            is_discount_broker: false,
            is_active: true,
            created_on: Some(1_700_000_000),
            updated_on: None,
        };

        let json = serde_json::to_value(&row).expect("serializes");
        assert_eq!(json["Id"], 7);
        assert_eq!(json["ShortCode"], "ACME");
        assert_eq!(json["IsDiscountBroker"], false);
        assert_eq!(json["UpdatedOn"], serde_json::Value::Null);
    }
}
