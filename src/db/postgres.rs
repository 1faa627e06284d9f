//! PostgreSQL persistence for tracked stocks, price history and signals

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use tokio_postgres::{error::SqlState, Client, NoTls, Row};
use tracing::{debug, error, info};

use crate::models::indicators::Signal;
use crate::models::stock::{
    NewSignal, PriceBar, PriceHistoryEntry, Quote, SignalRecord, SignalStats, StockStats,
    TrackedStock,
};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),
    #[error("Query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid stored value: {0}")]
    Decode(String),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS tracked_stocks (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        symbol TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (user_id, symbol)
    );
    CREATE TABLE IF NOT EXISTS stock_price_history (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        volume BIGINT NOT NULL DEFAULT 0,
        trading_day DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (symbol, trading_day)
    );
    CREATE TABLE IF NOT EXISTS stock_signals (
        id BIGSERIAL PRIMARY KEY,
        stock_id BIGINT NOT NULL REFERENCES tracked_stocks (id) ON DELETE CASCADE,
        signal_type TEXT NOT NULL,
        confidence INTEGER NOT NULL,
        price_at_signal DOUBLE PRECISION NOT NULL,
        indicator_data JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );
";

pub struct StockDatabase {
    client: Client,
}

impl StockDatabase {
    pub async fn connect(database_url: &str) -> Result<Self, DatabaseError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        let db = Self { client };
        db.init_schema().await?;
        info!("PostgreSQL schema ready");

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), DatabaseError> {
        self.client.batch_execute(SCHEMA).await?;
        Ok(())
    }

    /// Tracked stocks for a user with the number of stored price points and
    /// the most recent trading day, newest tracking first.
    pub async fn list_tracked_stocks(&self, user_id: i64) -> Result<Vec<TrackedStock>, DatabaseError> {
        let rows = self
            .client
            .query(
                "SELECT ts.id, ts.symbol, ts.created_at,
                        COUNT(sp.id) AS price_points,
                        MAX(sp.trading_day) AS last_updated
                 FROM tracked_stocks ts
                 LEFT JOIN stock_price_history sp ON ts.symbol = sp.symbol
                 WHERE ts.user_id = $1
                 GROUP BY ts.id, ts.symbol, ts.created_at
                 ORDER BY ts.created_at DESC",
                &[&user_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| TrackedStock {
                id: row.get("id"),
                symbol: row.get("symbol"),
                created_at: row.get("created_at"),
                price_points: row.get("price_points"),
                last_updated: row.get("last_updated"),
            })
            .collect())
    }

    /// Start tracking `symbol` for a user. Fails with `Conflict` when it is
    /// already tracked.
    pub async fn track_stock(&self, user_id: i64, symbol: &str) -> Result<TrackedStock, DatabaseError> {
        let existing = self
            .client
            .query_opt(
                "SELECT id FROM tracked_stocks WHERE user_id = $1 AND symbol = $2",
                &[&user_id, &symbol],
            )
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Conflict(
                "Stock is already being tracked".to_string(),
            ));
        }

        let row = self
            .client
            .query_one(
                "INSERT INTO tracked_stocks (user_id, symbol)
                 VALUES ($1, $2)
                 RETURNING id, symbol, created_at",
                &[&user_id, &symbol],
            )
            .await?;

        Ok(TrackedStock {
            id: row.get("id"),
            symbol: row.get("symbol"),
            created_at: row.get("created_at"),
            price_points: None,
            last_updated: None,
        })
    }

    /// Remove a tracked stock, returning its symbol.
    pub async fn untrack_stock(&self, stock_id: i64) -> Result<String, DatabaseError> {
        let row = self
            .client
            .query_opt(
                "DELETE FROM tracked_stocks WHERE id = $1 RETURNING symbol",
                &[&stock_id],
            )
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Tracked stock".to_string()))?;
        Ok(row.get("symbol"))
    }

    pub async fn tracked_symbols(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = self
            .client
            .query("SELECT DISTINCT symbol FROM tracked_stocks ORDER BY symbol", &[])
            .await?;
        Ok(rows.iter().map(|row| row.get("symbol")).collect())
    }

    /// Store a quote, replacing any price already stored for its trading day.
    pub async fn upsert_quote(&self, quote: &Quote) -> Result<(), DatabaseError> {
        self.client
            .execute(
                "INSERT INTO stock_price_history (symbol, price, volume, trading_day)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (symbol, trading_day) DO UPDATE SET
                 price = EXCLUDED.price, volume = EXCLUDED.volume",
                &[
                    &quote.symbol,
                    &quote.price,
                    &quote.volume,
                    &quote.latest_trading_day,
                ],
            )
            .await?;
        Ok(())
    }

    /// Store daily closes, keeping rows that already exist. Returns the number
    /// of new rows.
    pub async fn insert_history(&self, symbol: &str, bars: &[PriceBar]) -> Result<u64, DatabaseError> {
        let statement = self
            .client
            .prepare(
                "INSERT INTO stock_price_history (symbol, price, volume, trading_day)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (symbol, trading_day) DO NOTHING",
            )
            .await?;

        let mut inserted = 0;
        for bar in bars {
            inserted += self
                .client
                .execute(&statement, &[&symbol, &bar.close, &bar.volume, &bar.date])
                .await?;
        }

        debug!(symbol = %symbol, inserted, total = bars.len(), "Stored historical prices");
        Ok(inserted)
    }

    /// Stored prices for the last `days` days, newest first.
    pub async fn price_history(&self, symbol: &str, days: i32) -> Result<Vec<PriceHistoryEntry>, DatabaseError> {
        let rows = self
            .client
            .query(
                "SELECT id, symbol, price, volume, trading_day, created_at
                 FROM stock_price_history
                 WHERE symbol = $1 AND trading_day >= CURRENT_DATE - $2::INTEGER
                 ORDER BY trading_day DESC",
                &[&symbol, &days],
            )
            .await?;
        Ok(rows.iter().map(price_entry_from_row).collect())
    }

    pub async fn latest_price(&self, symbol: &str) -> Result<Option<PriceHistoryEntry>, DatabaseError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, symbol, price, volume, trading_day, created_at
                 FROM stock_price_history
                 WHERE symbol = $1
                 ORDER BY trading_day DESC, created_at DESC
                 LIMIT 1",
                &[&symbol],
            )
            .await?;
        Ok(row.as_ref().map(price_entry_from_row))
    }

    /// Summary statistics over stored prices; `None` when nothing is stored.
    pub async fn stock_stats(&self, symbol: &str) -> Result<Option<StockStats>, DatabaseError> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) AS data_points,
                        MIN(price) AS min_price,
                        MAX(price) AS max_price,
                        AVG(price) AS avg_price,
                        MIN(trading_day) AS earliest_date,
                        MAX(trading_day) AS latest_date
                 FROM stock_price_history
                 WHERE symbol = $1",
                &[&symbol],
            )
            .await?;

        let data_points: i64 = row.get("data_points");
        if data_points == 0 {
            return Ok(None);
        }

        Ok(Some(StockStats {
            data_points,
            min_price: row.get("min_price"),
            max_price: row.get("max_price"),
            avg_price: row.get("avg_price"),
            earliest_date: row.get("earliest_date"),
            latest_date: row.get("latest_date"),
        }))
    }

    pub async fn signals_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<SignalRecord>, DatabaseError> {
        let rows = self
            .client
            .query(
                "SELECT ss.id, ss.signal_type, ss.confidence, ss.price_at_signal,
                        ss.indicator_data, ss.created_at, ts.symbol
                 FROM stock_signals ss
                 JOIN tracked_stocks ts ON ss.stock_id = ts.id
                 WHERE ts.user_id = $1
                 ORDER BY ss.created_at DESC
                 LIMIT $2",
                &[&user_id, &limit],
            )
            .await?;
        rows.iter().map(|row| signal_from_row(row, true)).collect()
    }

    pub async fn signals_for_symbol(&self, symbol: &str, limit: i64) -> Result<Vec<SignalRecord>, DatabaseError> {
        let rows = self
            .client
            .query(
                "SELECT ss.id, ss.signal_type, ss.confidence, ss.price_at_signal,
                        ss.indicator_data, ss.created_at
                 FROM stock_signals ss
                 JOIN tracked_stocks ts ON ss.stock_id = ts.id
                 WHERE ts.symbol = $1
                 ORDER BY ss.created_at DESC
                 LIMIT $2",
                &[&symbol, &limit],
            )
            .await?;
        rows.iter().map(|row| signal_from_row(row, false)).collect()
    }

    pub async fn create_signal(&self, signal: &NewSignal) -> Result<SignalRecord, DatabaseError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO stock_signals (stock_id, signal_type, confidence, price_at_signal, indicator_data)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id, signal_type, confidence, price_at_signal, indicator_data, created_at",
                &[
                    &signal.stock_id,
                    &signal.signal_type.as_str(),
                    &signal.confidence,
                    &signal.price_at_signal,
                    &signal.indicator_data,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
                    DatabaseError::NotFound(format!("Stock {}", signal.stock_id))
                } else {
                    DatabaseError::Query(e)
                }
            })?;
        signal_from_row(&row, false)
    }

    /// Per-type signal counts for a user's tracked stocks, most frequent first.
    pub async fn signal_stats(&self, user_id: i64) -> Result<Vec<SignalStats>, DatabaseError> {
        let rows = self
            .client
            .query(
                "SELECT ss.signal_type,
                        COUNT(*) AS count,
                        AVG(ss.confidence)::DOUBLE PRECISION AS avg_confidence,
                        MAX(ss.created_at) AS last_signal
                 FROM stock_signals ss
                 JOIN tracked_stocks ts ON ss.stock_id = ts.id
                 WHERE ts.user_id = $1
                 GROUP BY ss.signal_type
                 ORDER BY count DESC",
                &[&user_id],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(SignalStats {
                    signal_type: parse_signal(row.get("signal_type"))?,
                    count: row.get("count"),
                    avg_confidence: row.get("avg_confidence"),
                    last_signal: row.get("last_signal"),
                })
            })
            .collect()
    }
}

fn price_entry_from_row(row: &Row) -> PriceHistoryEntry {
    PriceHistoryEntry {
        id: row.get("id"),
        symbol: row.get("symbol"),
        price: row.get("price"),
        volume: row.get("volume"),
        trading_day: row.get::<_, NaiveDate>("trading_day"),
        created_at: row.get::<_, DateTime<Utc>>("created_at"),
    }
}

fn signal_from_row(row: &Row, with_symbol: bool) -> Result<SignalRecord, DatabaseError> {
    Ok(SignalRecord {
        id: row.get("id"),
        signal_type: parse_signal(row.get("signal_type"))?,
        confidence: row.get("confidence"),
        price_at_signal: row.get("price_at_signal"),
        indicator_data: row.get::<_, Option<Value>>("indicator_data"),
        created_at: row.get("created_at"),
        symbol: if with_symbol { row.get("symbol") } else { None },
    })
}

fn parse_signal(raw: &str) -> Result<Signal, DatabaseError> {
    raw.parse().map_err(DatabaseError::Decode)
}
