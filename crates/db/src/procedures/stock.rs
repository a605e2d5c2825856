//! Stock master-data stored-call wrappers.
//!
//! Stocks live in two places: the directory proper (listed and unlisted
//! securities, served by `ritefolio."FetchStocks"`) and a staging area for
//! partially-known entries awaiting enrichment, which a procedure migrates
//! into the directory once complete.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A directory stock row as returned by `ritefolio."FetchStocks"`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct StockRow {
    /// Stock identifier.
    #[sqlx(rename = "Id")]
    pub id: Uuid,
    /// Country of listing.
    #[sqlx(rename = "CountryId")]
    pub country_id: i32,
    /// Investment type lookup id.
    #[sqlx(rename = "InvestmentTypeId")]
    pub investment_type_id: i32,
    /// ISIN.
    #[sqlx(rename = "Isin")]
    pub isin: String,
    /// Stock name.
    #[sqlx(rename = "Name")]
    pub name: String,
    /// Face value.
    #[sqlx(rename = "FaceValue")]
    pub face_value: Decimal,
    /// Whether the stock is exchange-listed.
    #[sqlx(rename = "Listed")]
    pub listed: bool,
    /// Exchange symbol.
    #[sqlx(rename = "Symbol")]
    pub symbol: String,
    /// BSE scrip code.
    #[sqlx(rename = "BseCode")]
    pub bse_code: Option<String>,
    /// Macro sector classification.
    #[sqlx(rename = "MacroSector")]
    pub macro_sector: Option<String>,
    /// Sector classification.
    #[sqlx(rename = "Sector")]
    pub sector: Option<String>,
    /// Industry classification.
    #[sqlx(rename = "Industry")]
    pub industry: Option<String>,
    /// Basic industry classification.
    #[sqlx(rename = "BasicIndustry")]
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    #[sqlx(rename = "SectoralIndex")]
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    #[sqlx(rename = "Slb")]
    pub slb: Option<bool>,
    /// Listing date, epoch seconds.
    #[sqlx(rename = "ListingDate")]
    pub listing_date: Option<i64>,
    /// Record date, epoch seconds.
    #[sqlx(rename = "RecordDate")]
    pub record_date: Option<i64>,
    /// Issue date, epoch seconds.
    #[sqlx(rename = "IssueDate")]
    pub issue_date: Option<i64>,
    /// Maturity date, epoch seconds (debt instruments).
    #[sqlx(rename = "MaturityDate")]
    pub maturity_date: Option<i64>,
    /// IPO date, epoch seconds.
    #[sqlx(rename = "IpoDate")]
    pub ipo_date: Option<i64>,
    /// Broad industry classification.
    #[sqlx(rename = "BroadIndustry")]
    pub broad_industry: Option<String>,
    /// Trading series.
    #[sqlx(rename = "Series")]
    pub series: Option<String>,
    /// Issuer name (debt instruments).
    #[sqlx(rename = "Issuer")]
    pub issuer: Option<String>,
    /// Coupon rate (debt instruments).
    #[sqlx(rename = "CouponRate")]
    pub coupon_rate: Option<Decimal>,
    /// Coupon payment frequency.
    #[sqlx(rename = "CouponFrequency")]
    pub coupon_frequency: Option<String>,
    /// Listing status.
    #[sqlx(rename = "Status")]
    pub status: Option<String>,
    /// Free-text description.
    #[sqlx(rename = "Description")]
    pub description: Option<String>,
    /// Scheme name (funds).
    #[sqlx(rename = "SchemeName")]
    pub scheme_name: Option<String>,
    /// Parent security, when derived from one.
    #[sqlx(rename = "ParentStockId")]
    pub parent_stock_id: Option<Uuid>,
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

/// A staging stock row as returned by `public."FetchStagingStocks"`.
///
/// Staging entries are created from a single identifier, so almost every
/// column is nullable until the entry is enriched.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct StagingStockRow {
    /// Stock identifier.
    #[sqlx(rename = "Id")]
    pub id: Uuid,
    /// Country of listing.
    #[sqlx(rename = "CountryId")]
    pub country_id: Option<i32>,
    /// Investment type lookup id.
    #[sqlx(rename = "InvestmentTypeId")]
    pub investment_type_id: Option<i32>,
    /// ISIN.
    #[sqlx(rename = "Isin")]
    pub isin: Option<String>,
    /// Stock name.
    #[sqlx(rename = "Name")]
    pub name: Option<String>,
    /// Face value.
    #[sqlx(rename = "FaceValue")]
    pub face_value: Option<Decimal>,
    /// Whether the stock is exchange-listed (always false in staging).
    #[sqlx(rename = "Listed")]
    pub listed: bool,
    /// Exchange symbol.
    #[sqlx(rename = "Symbol")]
    pub symbol: Option<String>,
    /// BSE scrip code.
    #[sqlx(rename = "BseCode")]
    pub bse_code: Option<String>,
    /// Basic industry classification.
    #[sqlx(rename = "BasicIndustry")]
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    #[sqlx(rename = "SectoralIndex")]
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    #[sqlx(rename = "Slb")]
    pub slb: Option<bool>,
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

/// Identifier returned by `public."InsertStockStaging"`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StagingStockId {
    /// The newly created staging stock id.
    pub v_stock_id: Uuid,
}

/// Universal search parameters for `ritefolio."FetchStocks"`.
///
/// The search value is fanned into the symbol, ISIN, name, and BSE-code
/// parameters; the function ORs them together.
#[derive(Debug, Clone, Default)]
pub struct StockSearch {
    /// Value matched against symbol, ISIN, name, and BSE code.
    pub search_value: Option<String>,
    /// Investment type filter.
    pub investment_type_id: Option<i32>,
    /// Country filter.
    pub country_id: Option<i32>,
    /// Listed/unlisted filter.
    pub is_listed: Option<bool>,
    /// Active flag filter.
    pub is_active: Option<bool>,
    /// Exact stock id.
    pub stock_id: Option<Uuid>,
    /// Parent stock filter.
    pub parent_stock_id: Option<Uuid>,
}

/// Column filters shared by the listed and staging listings.
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// Exchange symbol filter.
    pub symbol: Option<String>,
    /// ISIN filter.
    pub isin: Option<String>,
    /// Stock name filter.
    pub stock_name: Option<String>,
    /// BSE scrip code filter.
    pub bse_code: Option<String>,
    /// Investment type filter.
    pub investment_type_id: Option<i32>,
    /// Country filter.
    pub country_id: Option<i32>,
    /// Active flag filter.
    pub is_active: Option<bool>,
}

/// Full field set for `public."InsertStock"` and
/// `public."UpdateStockDirectory"`.
#[derive(Debug, Clone)]
pub struct StockDirectoryInput {
    /// Country of listing.
    pub country_id: i32,
    /// Investment type lookup id.
    pub investment_type_id: i32,
    /// ISIN.
    pub isin: Option<String>,
    /// Stock name.
    pub stock_name: String,
    /// Face value.
    pub face_value: Decimal,
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Macro sector classification.
    pub macro_sector: Option<String>,
    /// Sector classification.
    pub sector: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Basic industry classification.
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    pub slb: bool,
    /// Listing date, epoch seconds.
    pub listing_date: Option<i64>,
    /// Record date, epoch seconds.
    pub record_date: Option<i64>,
    /// Issue date, epoch seconds.
    pub issue_date: Option<i64>,
    /// Maturity date, epoch seconds.
    pub maturity_date: Option<i64>,
    /// IPO date, epoch seconds.
    pub ipo_date: Option<i64>,
    /// Broad industry classification.
    pub broad_industry: Option<String>,
    /// Trading series.
    pub series: Option<String>,
    /// Issuer name.
    pub issuer: Option<String>,
    /// Coupon rate.
    pub coupon_rate: Option<Decimal>,
    /// Coupon payment frequency.
    pub coupon_frequency: Option<String>,
    /// Listing status.
    pub status: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Scheme name.
    pub scheme_name: Option<String>,
    /// Parent security.
    pub parent_stock_id: Option<Uuid>,
    /// Active flag.
    pub is_active: bool,
}

/// Fields for creating a staging stock; at least one identifier among
/// symbol, ISIN, and BSE code must be supplied (enforced by the caller).
#[derive(Debug, Clone, Default)]
pub struct StagingStockInput {
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// ISIN.
    pub isin: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Stock name.
    pub stock_name: Option<String>,
    /// Country of listing.
    pub country_id: Option<i32>,
    /// Creating user reference.
    pub created_by: Option<String>,
}

/// Fields for updating a staging stock via `public."UpdateStagingStock"`.
#[derive(Debug, Clone, Default)]
pub struct StagingStockUpdate {
    /// Country of listing.
    pub country_id: Option<i32>,
    /// Investment type lookup id.
    pub investment_type_id: Option<i32>,
    /// ISIN.
    pub isin: Option<String>,
    /// Stock name.
    pub stock_name: Option<String>,
    /// Face value.
    pub face_value: Option<Decimal>,
    /// Exchange symbol.
    pub symbol: Option<String>,
    /// BSE scrip code.
    pub bse_code: Option<String>,
    /// Basic industry classification.
    pub basic_industry: Option<String>,
    /// Sectoral index membership.
    pub sectoral_index: Option<String>,
    /// Securities-lending-and-borrowing eligibility.
    pub slb: bool,
    /// Active flag.
    pub is_active: bool,
}

/// Stock repository.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Universal stock search via the short-arity `FetchStocks` call.
    pub async fn search(&self, search: &StockSearch) -> Result<Vec<StockRow>, sqlx::Error> {
        sqlx::query_as::<_, StockRow>(
            r#"SELECT * FROM ritefolio."FetchStocks"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(search.search_value.as_deref()) // p_symbol
        .bind(search.search_value.as_deref()) // p_isin
        .bind(search.search_value.as_deref()) // p_stock_name
        .bind(search.search_value.as_deref()) // p_bse_code
        .bind(search.investment_type_id)
        .bind(search.country_id)
        .bind(search.is_listed)
        .bind(search.is_active)
        .bind(search.stock_id)
        .bind(search.parent_stock_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Paginated directory listing via the full-arity `FetchStocks` call.
    pub async fn fetch_directory(
        &self,
        filter: &StockFilter,
        is_listed: bool,
        row_start: i32,
        row_limit: i32,
    ) -> Result<Vec<StockRow>, sqlx::Error> {
        sqlx::query_as::<_, StockRow>(
            r#"SELECT * FROM ritefolio."FetchStocks"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(filter.symbol.as_deref())
        .bind(filter.isin.as_deref())
        .bind(filter.stock_name.as_deref())
        .bind(filter.bse_code.as_deref())
        .bind(filter.investment_type_id)
        .bind(filter.country_id)
        .bind(is_listed)
        .bind(filter.is_active)
        .bind(Option::<Uuid>::None) // p_stock_id
        .bind(Option::<Uuid>::None) // p_parent_stock_id
        .bind(row_start)
        .bind(row_limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Fetches one unlisted stock by id (active or not).
    pub async fn fetch_unlisted_by_id(&self, id: Uuid) -> Result<Option<StockRow>, sqlx::Error> {
        sqlx::query_as::<_, StockRow>(
            r#"SELECT * FROM ritefolio."FetchStocks"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<i32>::None)
        .bind(Option::<i32>::None)
        .bind(false) // p_is_listed
        .bind(Option::<bool>::None)
        .bind(id)
        .bind(Option::<Uuid>::None)
        .bind(0_i32)
        .bind(1_i32)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts a listed stock via `public."InsertStock"`.
    pub async fn insert_listed(
        &self,
        stock_exchange_ids: &[i32],
        input: &StockDirectoryInput,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CALL public."InsertStock"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                $29, $30)"#,
        )
        .bind(input.country_id)
        .bind(input.investment_type_id)
        .bind(stock_exchange_ids)
        .bind(input.isin.as_deref())
        .bind(&input.stock_name)
        .bind(input.face_value)
        .bind(true) // p_is_listed
        .bind(input.symbol.as_deref())
        .bind(input.bse_code.as_deref())
        .bind(input.macro_sector.as_deref())
        .bind(input.sector.as_deref())
        .bind(input.industry.as_deref())
        .bind(input.basic_industry.as_deref())
        .bind(input.sectoral_index.as_deref())
        .bind(input.slb)
        .bind(input.listing_date)
        .bind(input.record_date)
        .bind(input.issue_date)
        .bind(input.maturity_date)
        .bind(input.ipo_date)
        .bind(input.broad_industry.as_deref())
        .bind(input.series.as_deref())
        .bind(input.issuer.as_deref())
        .bind(input.coupon_rate)
        .bind(input.coupon_frequency.as_deref())
        .bind(input.status.as_deref())
        .bind(input.description.as_deref())
        .bind(input.scheme_name.as_deref())
        .bind(input.parent_stock_id)
        .bind(input.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Updates a directory stock via `public."UpdateStockDirectory"`.
    pub async fn update_directory(
        &self,
        id: Uuid,
        is_listed: bool,
        input: &StockDirectoryInput,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CALL public."UpdateStockDirectory"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27,
                $28, $29, $30)"#,
        )
        .bind(id)
        .bind(input.country_id)
        .bind(input.investment_type_id)
        .bind(input.isin.as_deref())
        .bind(&input.stock_name)
        .bind(input.face_value)
        .bind(is_listed)
        .bind(input.symbol.as_deref())
        .bind(input.bse_code.as_deref())
        .bind(input.macro_sector.as_deref())
        .bind(input.sector.as_deref())
        .bind(input.industry.as_deref())
        .bind(input.basic_industry.as_deref())
        .bind(input.sectoral_index.as_deref())
        .bind(input.slb)
        .bind(input.listing_date)
        .bind(input.record_date)
        .bind(input.issue_date)
        .bind(input.maturity_date)
        .bind(input.ipo_date)
        .bind(input.broad_industry.as_deref())
        .bind(input.series.as_deref())
        .bind(input.issuer.as_deref())
        .bind(input.coupon_rate)
        .bind(input.coupon_frequency.as_deref())
        .bind(input.status.as_deref())
        .bind(input.description.as_deref())
        .bind(input.scheme_name.as_deref())
        .bind(input.parent_stock_id)
        .bind(input.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Paginated staging listing via `public."FetchStagingStocks"`.
    pub async fn fetch_staging(
        &self,
        filter: &StockFilter,
        row_start: i32,
        row_limit: i32,
    ) -> Result<Vec<StagingStockRow>, sqlx::Error> {
        sqlx::query_as::<_, StagingStockRow>(
            r#"SELECT * FROM public."FetchStagingStocks"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(filter.symbol.as_deref())
        .bind(filter.isin.as_deref())
        .bind(filter.stock_name.as_deref())
        .bind(filter.bse_code.as_deref())
        .bind(filter.investment_type_id)
        .bind(filter.country_id)
        .bind(filter.is_active)
        .bind(Option::<Uuid>::None) // p_stock_id
        .bind(Option::<Uuid>::None) // p_parent_stock_id
        .bind(row_start)
        .bind(row_limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Fetches one staging stock by id (active or not).
    pub async fn fetch_staging_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<StagingStockRow>, sqlx::Error> {
        sqlx::query_as::<_, StagingStockRow>(
            r#"SELECT * FROM public."FetchStagingStocks"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind(Option::<i32>::None)
        .bind(Option::<i32>::None)
        .bind(Option::<bool>::None)
        .bind(id)
        .bind(Option::<Uuid>::None)
        .bind(0_i32)
        .bind(1_i32)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts a staging stock via the `public."InsertStockStaging"`
    /// function, returning the generated id.
    pub async fn insert_staging(
        &self,
        input: &StagingStockInput,
    ) -> Result<StagingStockId, sqlx::Error> {
        sqlx::query_as::<_, StagingStockId>(
            r#"SELECT * FROM public."InsertStockStaging"($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(input.symbol.as_deref())
        .bind(input.isin.as_deref())
        .bind(input.bse_code.as_deref())
        .bind(input.stock_name.as_deref())
        .bind(input.country_id)
        .bind(input.created_by.as_deref())
        .fetch_one(&self.pool)
        .await
    }

    /// Updates a staging stock via `public."UpdateStagingStock"`.
    ///
    /// The procedure shares the 30-parameter directory shape; fields the
    /// staging form does not expose are passed as null.
    pub async fn update_staging(
        &self,
        id: Uuid,
        update: &StagingStockUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CALL public."UpdateStagingStock"($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27,
                $28, $29, $30)"#,
        )
        .bind(id)
        .bind(update.country_id)
        .bind(update.investment_type_id)
        .bind(update.isin.as_deref())
        .bind(update.stock_name.as_deref())
        .bind(update.face_value)
        .bind(false) // p_is_listed
        .bind(update.symbol.as_deref())
        .bind(update.bse_code.as_deref())
        .bind(Option::<String>::None) // p_macro_sector
        .bind(Option::<String>::None) // p_sector
        .bind(Option::<String>::None) // p_industry
        .bind(update.basic_industry.as_deref())
        .bind(update.sectoral_index.as_deref())
        .bind(update.slb)
        .bind(Option::<i64>::None) // p_listing_date
        .bind(Option::<i64>::None) // p_record_date
        .bind(Option::<i64>::None) // p_issue_date
        .bind(Option::<i64>::None) // p_maturity_date
        .bind(Option::<i64>::None) // p_ipo_date
        .bind(Option::<String>::None) // p_broad_industry
        .bind(Option::<String>::None) // p_series
        .bind(Option::<String>::None) // p_issuer
        .bind(Option::<Decimal>::None) // p_coupon_rate
        .bind(Option::<String>::None) // p_coupon_frequency
        .bind(Option::<String>::None) // p_status
        .bind(Option::<String>::None) // p_description
        .bind(Option::<String>::None) // p_scheme_name
        .bind(Option::<Uuid>::None) // p_parent_stock_id
        .bind(update.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Promotes a staging stock into the directory via
    /// `public."MigrateStagingStock"`.
    pub async fn migrate_staging(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(r#"CALL public."MigrateStagingStock"($1)"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
