use crate::{
    env::DbConfig,
    error::{DbError, PoolError},
    pool::PoolSettings,
    sql::{
        dialect,
        mysql::{params::positional_params, row::decode_row},
    },
};
use model::{core::value::Value, pagination::page::PageResult, records::row::RowData};
use mysql_async::{Conn, Opts, OptsBuilder, Pool, TxOpts, prelude::Queryable};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Outcome of a single write statement.
#[derive(Debug, Clone, Copy)]
pub struct WriteSummary {
    pub affected_rows: u64,
    pub last_insert_id: Option<u64>,
}

/// One environment's pooled MySQL handle. Cloning shares the pool.
///
/// Connections are handed out one at a time and check themselves back in
/// when dropped, so every exit path releases its connection.
#[derive(Clone, Debug)]
pub struct MySqlAdapter {
    pool: Pool,
    block_on_exhausted: bool,
    acquire_timeout: Duration,
}

impl MySqlAdapter {
    /// Builds the pool for `config`. Construction is synchronous and lazy:
    /// no connection is opened until first use.
    pub fn connect(config: &DbConfig, settings: &PoolSettings) -> Result<Self, PoolError> {
        let pool_opts = settings.pool_opts()?;
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(non_empty(&config.database))
            .init(vec![format!("SET NAMES {}", config.charset)])
            .pool_opts(pool_opts)
            .into();

        Ok(MySqlAdapter {
            pool: Pool::new(opts),
            block_on_exhausted: settings.block_on_exhausted,
            acquire_timeout: settings.acquire_timeout,
        })
    }

    /// Obtains one connection, honoring the blocking policy.
    pub async fn acquire(&self) -> Result<Conn, PoolError> {
        if self.block_on_exhausted {
            return Ok(self.pool.get_conn().await?);
        }

        match tokio::time::timeout(self.acquire_timeout, self.pool.get_conn()).await {
            Ok(conn) => Ok(conn?),
            Err(_) => Err(PoolError::Exhausted {
                waited_ms: self.acquire_timeout.as_millis() as u64,
            }),
        }
    }

    /// Liveness probe: a `SELECT 1` round-trip.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;
        let val: Option<i32> = conn.query_first("SELECT 1").await?;
        match val {
            Some(1) => Ok(()),
            other => Err(DbError::Unexpected(format!(
                "ping returned {other:?} instead of 1"
            ))),
        }
    }

    /// Ad-hoc parameterized SELECT. The `table` label is attached to the
    /// decoded rows and may be empty for cross-table queries.
    pub async fn query_rows(
        &self,
        table: &str,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<RowData>, DbError> {
        debug!(%sql, "executing query");
        let mut conn = self.acquire().await?;
        let rows: Vec<mysql_async::Row> = conn.exec(sql, positional_params(params)).await?;
        Ok(rows.iter().map(|row| decode_row(table, row)).collect())
    }

    /// Fetches one keyset page: rows with identifier strictly greater than
    /// `after`, ascending, at most `limit` of them. An empty result means
    /// end-of-table.
    pub async fn fetch_page(
        &self,
        table: &str,
        id_column: &str,
        after: u64,
        limit: usize,
    ) -> Result<PageResult, DbError> {
        let table_ident = dialect::checked_identifier(table)?;
        let id_ident = dialect::checked_identifier(id_column)?;
        let sql = format!(
            "SELECT * FROM {table_ident} WHERE {id_ident} > ? ORDER BY {id_ident} ASC LIMIT ?"
        );
        info!(%sql, after, limit, "executing page query");

        let start = Instant::now();
        let mut conn = self.acquire().await?;
        let rows: Vec<mysql_async::Row> = conn.exec(sql.as_str(), (after, limit as u64)).await?;
        let rows = rows.iter().map(|row| decode_row(table, row)).collect();

        Ok(PageResult::new(rows, start.elapsed().as_millis()))
    }

    /// Executes a parameterized statement under autocommit. Failures
    /// propagate; there is no rollback path.
    pub async fn exec(&self, sql: &str, params: &[Value]) -> Result<WriteSummary, DbError> {
        debug!(%sql, "executing statement");
        let mut conn = self.acquire().await?;
        conn.exec_drop(sql, positional_params(params)).await?;
        Ok(WriteSummary {
            affected_rows: conn.affected_rows(),
            last_insert_id: conn.last_insert_id(),
        })
    }

    /// Runs a parameterized write inside a transaction: commit on success,
    /// rollback on failure. The failure is returned to the caller either
    /// way; deciding whether a failed write is fatal is the caller's call.
    pub async fn exec_write(&self, sql: &str, params: &[Value]) -> Result<WriteSummary, DbError> {
        debug!(%sql, "executing transactional write");
        let mut conn = self.acquire().await?;
        let mut tx = conn.start_transaction(TxOpts::default()).await?;

        if let Err(err) = tx.exec_drop(sql, positional_params(params)).await {
            error!(%sql, error = %err, "write failed, rolling back");
            tx.rollback().await?;
            return Err(DbError::Sql(err));
        }

        let summary = WriteSummary {
            affected_rows: tx.affected_rows(),
            last_insert_id: tx.last_insert_id(),
        };
        tx.commit().await?;
        Ok(summary)
    }

    /// Runs one statement against many parameter sets inside a single
    /// transaction, rolling all of them back if any set fails.
    pub async fn exec_write_batch(
        &self,
        sql: &str,
        param_sets: &[Vec<Value>],
    ) -> Result<WriteSummary, DbError> {
        debug!(%sql, sets = param_sets.len(), "executing batched write");
        let mut conn = self.acquire().await?;
        let mut tx = conn.start_transaction(TxOpts::default()).await?;

        let params = param_sets.iter().map(|values| positional_params(values));
        if let Err(err) = tx.exec_batch(sql, params).await {
            error!(%sql, error = %err, "batched write failed, rolling back");
            tx.rollback().await?;
            return Err(DbError::Sql(err));
        }

        let summary = WriteSummary {
            affected_rows: tx.affected_rows(),
            last_insert_id: tx.last_insert_id(),
        };
        tx.commit().await?;
        Ok(summary)
    }

    /// Closes every connection in the pool. Part of process shutdown; the
    /// adapter must not be used afterwards.
    pub async fn disconnect(self) -> Result<(), DbError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
