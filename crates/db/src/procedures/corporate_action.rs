//! Corporate-action stored-call wrappers.

use ritefolio_core::corporate_action::{ValidatedCorporateAction, ValidatedDetail};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;
use uuid::Uuid;

/// PostgreSQL SQLSTATE for foreign-key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// An action-type lookup row as returned by
/// `public."FetchCorporateActionType"`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct CorporateActionTypeRow {
    /// Type identifier.
    #[sqlx(rename = "Id")]
    pub id: i32,
    /// Short code.
    #[sqlx(rename = "Code")]
    pub code: String,
    /// Display name.
    #[sqlx(rename = "Name")]
    pub name: String,
    /// BSE vendor code.
    #[sqlx(rename = "BseCode")]
    pub bse_code: Option<String>,
    /// Trendlyne vendor code.
    #[sqlx(rename = "TrendlyneCode")]
    pub trendlyne_code: Option<String>,
    /// MoneyControl vendor code.
    #[sqlx(rename = "MoneyControlCode")]
    pub money_control_code: Option<String>,
    /// Whether records of this type are dividends.
    #[sqlx(rename = "IsDividend")]
    pub is_dividend: bool,
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

/// A record row as returned by `public."FetchCorpActionRecords"`, joined
/// with its source stock and action-type names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct CorporateActionRecordRow {
    /// Record identifier.
    #[sqlx(rename = "Id")]
    pub id: Uuid,
    /// Source security.
    #[sqlx(rename = "SourceStockId")]
    pub source_stock_id: Uuid,
    /// Source security ISIN.
    #[sqlx(rename = "Isin")]
    pub isin: String,
    /// Source security symbol.
    #[sqlx(rename = "Symbol")]
    pub symbol: String,
    /// Source security name.
    #[sqlx(rename = "StockName")]
    pub stock_name: String,
    /// Action-type lookup code.
    #[sqlx(rename = "CorporateActionTypeId")]
    pub corporate_action_type_id: i32,
    /// Action-type display name.
    #[sqlx(rename = "CorporateActionName")]
    pub corporate_action_name: String,
    /// Ex-date, epoch seconds.
    #[sqlx(rename = "ExDate")]
    pub ex_date: i64,
    /// Record date, epoch seconds.
    #[sqlx(rename = "RecordDate")]
    pub record_date: i64,
    /// Allotment date, epoch seconds.
    #[sqlx(rename = "AllotmentDate")]
    pub allotment_date: Option<i64>,
    /// Free-text remark.
    #[sqlx(rename = "Remark")]
    pub remark: Option<String>,
    /// Active flag.
    #[sqlx(rename = "IsActive")]
    pub is_active: bool,
    /// Creation time, epoch seconds.
    #[sqlx(rename = "CreatedOn")]
    pub created_on: i64,
    /// Last update time, epoch seconds.
    #[sqlx(rename = "UpdatedOn")]
    pub updated_on: Option<i64>,
}

/// A detail row as returned by `public."FetchCorpActionDetails"`, joined
/// with its target stock identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct CorporateActionDetailRow {
    /// Detail identifier.
    #[sqlx(rename = "Id")]
    pub id: Uuid,
    /// Owning record.
    #[sqlx(rename = "CorporateActionRecordId")]
    pub corporate_action_record_id: Uuid,
    /// Target security; null for cash outcomes.
    #[sqlx(rename = "TargetStockId")]
    pub target_stock_id: Option<Uuid>,
    /// Target security ISIN.
    #[sqlx(rename = "Isin")]
    pub isin: Option<String>,
    /// Target security symbol.
    #[sqlx(rename = "Symbol")]
    pub symbol: Option<String>,
    /// Target security name.
    #[sqlx(rename = "StockName")]
    pub stock_name: Option<String>,
    /// Quantity held side of the entitlement ratio.
    #[sqlx(rename = "RatioQuantityHeld")]
    pub ratio_quantity_held: Decimal,
    /// Quantity entitled side of the entitlement ratio.
    #[sqlx(rename = "RatioQuantityEntitled")]
    pub ratio_quantity_entitled: Decimal,
    /// Book value held side.
    #[sqlx(rename = "RatioBookValueHeld")]
    pub ratio_book_value_held: Option<Decimal>,
    /// Book value entitled side.
    #[sqlx(rename = "RatioBookValueEntitled")]
    pub ratio_book_value_entitled: Option<Decimal>,
    /// Whether the line represents a cash realization.
    #[sqlx(rename = "TargetSaleRow")]
    pub target_sale_row: Option<bool>,
    /// Free-text remark.
    #[sqlx(rename = "Remark")]
    pub remark: Option<String>,
    /// Active flag.
    #[sqlx(rename = "IsActive")]
    pub is_active: bool,
    /// Creation time, epoch seconds.
    #[sqlx(rename = "CreatedOn")]
    pub created_on: i64,
    /// Last update time, epoch seconds.
    #[sqlx(rename = "UpdatedOn")]
    pub updated_on: Option<i64>,
}

/// Filters for `public."FetchCorpActionRecords"`.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    /// Source security filter.
    pub source_stock_id: Option<Uuid>,
    /// Action-type filter.
    pub corp_action_type_id: Option<i32>,
    /// Window start, epoch seconds.
    pub start_date: i64,
    /// Window end, epoch seconds.
    pub end_date: i64,
    /// Exact record id.
    pub action_record_id: Option<Uuid>,
    /// Active flag filter.
    pub is_active: Option<bool>,
    /// Row offset.
    pub row_start: i32,
    /// Row limit.
    pub row_limit: i32,
}

/// Fields for `public."UpdateCorpActRecord"`.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    /// Source security.
    pub source_stock_id: Uuid,
    /// Action-type lookup code.
    pub corp_action_type_id: i32,
    /// Ex-date, epoch seconds.
    pub ex_date: i64,
    /// Record date, epoch seconds.
    pub record_date: i64,
    /// Allotment date, epoch seconds.
    pub allotment_date: Option<i64>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

/// Fields for `public."UpdateCorpActDetail"`.
#[derive(Debug, Clone)]
pub struct DetailUpdate {
    /// Owning record.
    pub action_record_id: Uuid,
    /// Target security; null for cash outcomes.
    pub target_stock_id: Option<Uuid>,
    /// Quantity held side of the entitlement ratio.
    pub ratio_quantity_held: Decimal,
    /// Quantity entitled side of the entitlement ratio.
    pub ratio_quantity_entitled: Decimal,
    /// Book value held side.
    pub ratio_book_value_held: Option<Decimal>,
    /// Book value entitled side.
    pub ratio_book_value_entitled: Option<Decimal>,
    /// Whether the line represents a cash realization.
    pub target_sale_row: bool,
    /// Reference document URL.
    pub reference_doc_url: Option<String>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

/// Errors from deleting a corporate action record.
#[derive(Debug, Error)]
pub enum RecordDeleteError {
    /// Detail rows still reference the record.
    #[error("corporate action record has associated details")]
    HasDetails,

    /// Any other database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Shape of one detail object inside the `details_json` procedure
/// parameter.
#[derive(Debug, Serialize)]
struct DetailParams<'a> {
    target_stock_id: Option<Uuid>,
    ratio_quantity_held: Decimal,
    ratio_quantity_entitled: Decimal,
    ratio_book_value_held: Option<Decimal>,
    ratio_book_value_entitled: Option<Decimal>,
    target_sale_row: bool,
    reference_doc_url: Option<&'a str>,
    remark: Option<&'a str>,
}

impl<'a> From<&'a ValidatedDetail> for DetailParams<'a> {
    fn from(detail: &'a ValidatedDetail) -> Self {
        Self {
            target_stock_id: detail.target_stock_id,
            ratio_quantity_held: detail.ratio_quantity_held,
            ratio_quantity_entitled: detail.ratio_quantity_entitled,
            ratio_book_value_held: detail.ratio_book_value_held,
            ratio_book_value_entitled: detail.ratio_book_value_entitled,
            target_sale_row: detail.target_sale_row,
            reference_doc_url: detail.reference_doc_url.as_deref(),
            remark: detail.remark.as_deref(),
        }
    }
}

fn detail_params(details: &[ValidatedDetail]) -> Vec<DetailParams<'_>> {
    details.iter().map(DetailParams::from).collect()
}

/// Corporate-action repository.
#[derive(Debug, Clone)]
pub struct CorporateActionRepository {
    pool: PgPool,
}

impl CorporateActionRepository {
    /// Creates a new corporate-action repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches all action types via `public."FetchCorporateActionType"()`.
    pub async fn fetch_types(&self) -> Result<Vec<CorporateActionTypeRow>, sqlx::Error> {
        sqlx::query_as::<_, CorporateActionTypeRow>(
            r#"SELECT * FROM public."FetchCorporateActionType"()"#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Fetches records via `public."FetchCorpActionRecords"`.
    pub async fn fetch_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<CorporateActionRecordRow>, sqlx::Error> {
        sqlx::query_as::<_, CorporateActionRecordRow>(
            r#"SELECT * FROM public."FetchCorpActionRecords"($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(filter.source_stock_id)
        .bind(filter.corp_action_type_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.action_record_id)
        .bind(filter.is_active)
        .bind(filter.row_start)
        .bind(filter.row_limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Inserts a record together with all its detail rows as one atomic
    /// unit via `public."InsertCorpActRecord"`.
    ///
    /// The leading NULL is the procedure's INOUT parameter carrying the
    /// generated record id; it is not read back (see DESIGN.md).
    pub async fn insert_record(
        &self,
        action: &ValidatedCorporateAction,
    ) -> Result<(), sqlx::Error> {
        let details = detail_params(&action.details);

        sqlx::query(r#"CALL public."InsertCorpActRecord"(NULL, $1, $2, $3, $4, $5, $6, $7, $8)"#)
            .bind(action.source_stock_id)
            .bind(action.corp_action_type_id)
            .bind(action.ex_date)
            .bind(action.record_date)
            .bind(action.allotment_date)
            .bind(Json(&details))
            .bind(action.is_active)
            .bind(action.remark.as_deref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Recomputes the derived corporate-action log via
    /// `ritefolio."BulkUpsertCorpActionLogs"`.
    ///
    /// Null scoping parameters recompute across all profiles and accounts.
    pub async fn refresh_logs(&self) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL ritefolio."BulkUpsertCorpActionLogs"($1, $2, $3)"#)
            .bind(Option::<Uuid>::None) // p_profile_id
            .bind(Option::<Uuid>::None) // p_demat_account_id
            .bind(Option::<Uuid>::None) // p_corporate_action_id
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Updates a record via `public."UpdateCorpActRecord"`.
    pub async fn update_record(&self, id: Uuid, update: &RecordUpdate) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."UpdateCorpActRecord"($1, $2, $3, $4, $5, $6, $7, $8)"#)
            .bind(id)
            .bind(update.source_stock_id)
            .bind(update.corp_action_type_id)
            .bind(update.ex_date)
            .bind(update.record_date)
            .bind(update.allotment_date)
            .bind(update.remark.as_deref())
            .bind(update.is_active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes a record via `public."DeleteCorpActRecord"`.
    ///
    /// # Errors
    ///
    /// Returns `HasDetails` when the database rejects the delete with a
    /// foreign-key violation, i.e. detail rows still reference the record.
    pub async fn delete_record(&self, id: Uuid) -> Result<(), RecordDeleteError> {
        sqlx::query(r#"CALL public."DeleteCorpActRecord"($1)"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                    RecordDeleteError::HasDetails
                }
                _ => RecordDeleteError::Database(e),
            })?;
        Ok(())
    }

    /// Fetches the detail rows of a record via
    /// `public."FetchCorpActionDetails"`.
    pub async fn fetch_details(
        &self,
        record_id: Uuid,
    ) -> Result<Vec<CorporateActionDetailRow>, sqlx::Error> {
        sqlx::query_as::<_, CorporateActionDetailRow>(
            r#"SELECT * FROM public."FetchCorpActionDetails"($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(record_id)
        .bind(Option::<Uuid>::None) // p_target_stock_id
        .bind(Option::<Uuid>::None) // p_action_detail_id
        .bind(Option::<bool>::None) // p_is_active
        .bind(0_i32)
        .bind(1000_i32)
        .fetch_all(&self.pool)
        .await
    }

    /// Updates a detail via `public."UpdateCorpActDetail"`.
    ///
    /// Parameter order quirk: `p_reference_doc_url` precedes `p_remark`.
    pub async fn update_detail(
        &self,
        detail_id: Uuid,
        update: &DetailUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CALL public."UpdateCorpActDetail"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(detail_id)
        .bind(update.action_record_id)
        .bind(update.target_stock_id)
        .bind(update.ratio_quantity_held)
        .bind(update.ratio_quantity_entitled)
        .bind(update.ratio_book_value_held)
        .bind(update.ratio_book_value_entitled)
        .bind(update.target_sale_row)
        .bind(update.reference_doc_url.as_deref())
        .bind(update.remark.as_deref())
        .bind(update.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deletes a detail via `public."DeleteCorpActDetail"`.
    pub async fn delete_detail(&self, detail_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."DeleteCorpActDetail"($1)"#)
            .bind(detail_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn validated_detail(held: Decimal) -> ValidatedDetail {
        ValidatedDetail {
            target_stock_id: None,
            ratio_quantity_held: held,
            ratio_quantity_entitled: dec!(2),
            ratio_book_value_held: None,
            ratio_book_value_entitled: None,
            target_sale_row: false,
            reference_doc_url: None,
            remark: None,
        }
    }

    #[test]
    fn test_detail_params_preserve_count_and_order() {
        let details = vec![
            validated_detail(dec!(1)),
            validated_detail(dec!(3)),
            validated_detail(dec!(5)),
        ];

        let params = detail_params(&details);
        assert_eq!(params.len(), details.len());

        let json = serde_json::to_value(&params).expect("serializes");
        let array = json.as_array().expect("array");
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["ratio_quantity_held"], "1");
        assert_eq!(array[1]["ratio_quantity_held"], "3");
        assert_eq!(array[2]["ratio_quantity_held"], "5");
    }

    #[test]
    fn test_detail_params_snake_case_shape() {
        let detail = ValidatedDetail {
            target_stock_id: Some(
                Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").expect("valid uuid"),
            ),
            ratio_quantity_held: dec!(1),
            ratio_quantity_entitled: dec!(2),
            ratio_book_value_held: Some(dec!(10)),
            ratio_book_value_entitled: Some(dec!(5)),
            target_sale_row: true,
            reference_doc_url: Some("https://example.com/circular.pdf".to_string()),
            remark: Some("demerger line".to_string()),
        };

        let json = serde_json::to_value(detail_params(std::slice::from_ref(&detail)))
            .expect("serializes");
        let object = json[0].as_object().expect("object");

        for key in [
            "target_stock_id",
            "ratio_quantity_held",
            "ratio_quantity_entitled",
            "ratio_book_value_held",
            "ratio_book_value_entitled",
            "target_sale_row",
            "reference_doc_url",
            "remark",
        ] {
            assert!(object.contains_key(key), "missing key: {key}");
        }
        assert_eq!(object.len(), 8);
        assert_eq!(json[0]["target_sale_row"], true);
    }

    #[test]
    fn test_detail_params_default_fields_are_null() {
        let json =
            serde_json::to_value(detail_params(&[validated_detail(dec!(1))])).expect("serializes");
        assert_eq!(json[0]["target_stock_id"], serde_json::Value::Null);
        assert_eq!(json[0]["ratio_book_value_held"], serde_json::Value::Null);
        assert_eq!(json[0]["reference_doc_url"], serde_json::Value::Null);
        assert_eq!(json[0]["target_sale_row"], false);
    }
}
