use crate::error::DbError;
use crate::store::RecordStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{DateRange, RawDealRecord};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the `deal_valuations` table. It encapsulates all SQL and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A row fetched from the `deal_valuations` table.
#[derive(Debug, Clone, FromRow)]
pub struct DbDealRecord {
    pub deal_uid: String,
    pub date: NaiveDate,
    pub keyword: String,
    pub volume: Decimal,
    pub price: Decimal,
    pub init_volume: Option<Decimal>,
    pub init_price: Option<Decimal>,
    pub sold_volume: Option<Decimal>,
    pub sold_amount: Option<Decimal>,
}

impl From<DbDealRecord> for RawDealRecord {
    fn from(row: DbDealRecord) -> Self {
        RawDealRecord {
            deal_uid: row.deal_uid,
            date: row.date,
            keyword: row.keyword,
            volume: row.volume,
            price: row.price,
            init_volume: row.init_volume,
            init_price: row.init_price,
            sold_volume: row.sold_volume,
            sold_amount: row.sold_amount,
        }
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches all records for a keyword, optionally within an inclusive date range.
    /// Rows come back ordered by date, then deal, then insertion, so repeated reads of
    /// an unchanged table are identical.
    pub async fn get_records(
        &self,
        keyword: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<RawDealRecord>, DbError> {
        let (from, to) = match range {
            Some(r) => (Some(r.from), Some(r.to)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, DbDealRecord>(
            r#"
            SELECT deal_uid, date, keyword, volume, price,
                   init_volume, init_price, sold_volume, sold_amount
            FROM deal_valuations
            WHERE keyword = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date ASC, deal_uid ASC, id ASC
            "#,
        )
        .bind(keyword)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(keyword, rows = rows.len(), "Fetched deal records.");
        Ok(rows.into_iter().map(RawDealRecord::from).collect())
    }

    /// Saves a single raw record. Records are never updated in place.
    pub async fn save_record(&self, record: &RawDealRecord) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO deal_valuations
                (deal_uid, date, keyword, volume, price, init_volume, init_price, sold_volume, sold_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.deal_uid)
        .bind(record.date)
        .bind(&record.keyword)
        .bind(record.volume)
        .bind(record.price)
        .bind(record.init_volume)
        .bind(record.init_price)
        .bind(record.sold_volume)
        .bind(record.sold_amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for DbRepository {
    async fn fetch(
        &self,
        keyword: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<RawDealRecord>, DbError> {
        self.get_records(keyword, range).await
    }
}
