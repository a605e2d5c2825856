//! Currency stored-call wrappers.

use serde::Serialize;
use sqlx::PgPool;

/// A currency row as returned by `public."FetchCurrencies"`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct CurrencyRow {
    /// Currency identifier.
    #[sqlx(rename = "Id")]
    pub id: i32,
    /// Currency name.
    #[sqlx(rename = "Name")]
    pub name: String,
    /// ISO 4217 currency code.
    #[sqlx(rename = "CurrencyCode")]
    pub currency_code: String,
    /// Display symbol.
    #[sqlx(rename = "CurrencySymbol")]
    pub currency_symbol: String,
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

/// Fields for creating a currency.
#[derive(Debug, Clone)]
pub struct CurrencyInput {
    /// Currency name.
    pub name: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Display symbol.
    pub currency_symbol: String,
    /// Active flag.
    pub is_active: bool,
}

/// Currency repository.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    pool: PgPool,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches all currencies via `public."FetchCurrencies"()`.
    pub async fn fetch_all(&self) -> Result<Vec<CurrencyRow>, sqlx::Error> {
        sqlx::query_as::<_, CurrencyRow>(r#"SELECT * FROM public."FetchCurrencies"()"#)
            .fetch_all(&self.pool)
            .await
    }

    /// Inserts a currency via `public."InsertCurrency"`.
    pub async fn insert(&self, input: &CurrencyInput) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."InsertCurrency"($1, $2, $3, $4)"#)
            .bind(&input.name)
            .bind(&input.currency_code)
            .bind(&input.currency_symbol)
            .bind(input.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
