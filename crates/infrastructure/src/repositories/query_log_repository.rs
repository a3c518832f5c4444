use async_trait::async_trait;
use bastion_dns_application::ports::QueryLogRepository;
use bastion_dns_domain::{
    BlockReason, ClientActivity, DomainCount, DomainError, QueryLogEntry, QueryLogPage,
    QueryLogSummary, RecordType,
};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

const CHANNEL_CAPACITY: usize = 10_000;
const MAX_BATCH_SIZE: usize = 500;
const FLUSH_INTERVAL_MS: u64 = 100;

/// Owned, `Send` copy of an entry waiting in the channel.
struct PendingEntry {
    created_at: String,
    client_ip: String,
    domain: String,
    query_type: String,
    blocked: bool,
    latency_ms: i64,
    status: &'static str,
    upstream: Option<String>,
    block_reason: Option<&'static str>,
    cached: bool,
}

impl PendingEntry {
    fn from_entry(entry: QueryLogEntry) -> Self {
        Self {
            created_at: entry.timestamp.unwrap_or_else(|| {
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
            }),
            client_ip: entry.client_ip.to_canonical().to_string(),
            domain: entry.domain.to_string(),
            query_type: entry.query_type.to_string(),
            blocked: entry.blocked,
            latency_ms: entry.latency_ms.min(i64::MAX as u64) as i64,
            status: entry.status.as_str(),
            upstream: entry.upstream.map(|u| u.to_string()),
            block_reason: entry.block_reason.map(|r| r.as_str()),
            cached: entry.cached,
        }
    }
}

enum LogCommand {
    Entry(PendingEntry),
    Flush(oneshot::Sender<()>),
}

type QueryLogRow = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    i64,
    String,
    Option<String>,
    Option<String>,
    i64,
);

/// SQLite query log with a batching writer.
///
/// `log_query` only enqueues; a background task writes batches of up to
/// `MAX_BATCH_SIZE` rows every `FLUSH_INTERVAL_MS`. Entries that do not fit
/// in the channel are dropped and counted.
pub struct SqliteQueryLogRepository {
    pool: SqlitePool,
    sender: mpsc::Sender<LogCommand>,
    dropped: Arc<AtomicU64>,
}

impl SqliteQueryLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_capacity(pool, CHANNEL_CAPACITY)
    }

    pub fn with_capacity(pool: SqlitePool, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let flush_pool = pool.clone();
        tokio::spawn(async move {
            Self::flush_loop(flush_pool, receiver).await;
        });

        info!(
            channel_capacity = capacity,
            batch_size = MAX_BATCH_SIZE,
            flush_interval_ms = FLUSH_INTERVAL_MS,
            "Query log batching enabled"
        );

        Self {
            pool,
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Waits until every entry enqueued before this call has been written.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(LogCommand::Flush(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn flush_loop(pool: SqlitePool, mut receiver: mpsc::Receiver<LogCommand>) {
        let mut batch: Vec<PendingEntry> = Vec::with_capacity(MAX_BATCH_SIZE);
        let mut flush_interval = tokio::time::interval(Duration::from_millis(FLUSH_INTERVAL_MS));

        loop {
            tokio::select! {
                maybe_command = receiver.recv() => {
                    match maybe_command {
                        Some(LogCommand::Entry(entry)) => {
                            batch.push(entry);
                            while batch.len() < MAX_BATCH_SIZE {
                                match receiver.try_recv() {
                                    Ok(LogCommand::Entry(e)) => batch.push(e),
                                    Ok(LogCommand::Flush(done)) => {
                                        Self::flush_batch(&pool, &mut batch).await;
                                        let _ = done.send(());
                                    }
                                    Err(_) => break,
                                }
                            }
                            if batch.len() >= MAX_BATCH_SIZE {
                                Self::flush_batch(&pool, &mut batch).await;
                            }
                        }
                        Some(LogCommand::Flush(done)) => {
                            Self::flush_batch(&pool, &mut batch).await;
                            let _ = done.send(());
                        }
                        None => {
                            Self::flush_batch(&pool, &mut batch).await;
                            info!("Query log flush task shutting down");
                            return;
                        }
                    }
                }
                _ = flush_interval.tick() => {
                    Self::flush_batch(&pool, &mut batch).await;
                }
            }
        }
    }

    async fn flush_batch(pool: &SqlitePool, batch: &mut Vec<PendingEntry>) {
        let count = batch.len();
        if count == 0 {
            return;
        }

        let mut sql = String::from(
            "INSERT INTO query_log (created_at, client_ip, domain, query_type, blocked, latency_ms, status, upstream, block_reason, cached) VALUES ",
        );

        for i in 0..count {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
        }

        let mut query = sqlx::query(&sql);
        for entry in batch.iter() {
            query = query
                .bind(&entry.created_at)
                .bind(&entry.client_ip)
                .bind(&entry.domain)
                .bind(&entry.query_type)
                .bind(if entry.blocked { 1i64 } else { 0 })
                .bind(entry.latency_ms)
                .bind(entry.status)
                .bind(entry.upstream.as_deref())
                .bind(entry.block_reason)
                .bind(if entry.cached { 1i64 } else { 0 });
        }

        match query.execute(pool).await {
            Ok(_) => {
                debug!(count, "Query log batch flushed");
            }
            Err(e) => {
                error!(error = %e, count, "Failed to flush query log batch");
            }
        }

        batch.clear();
    }

    fn row_to_entry(row: QueryLogRow) -> Option<QueryLogEntry> {
        let (
            id,
            created_at,
            client_ip,
            domain,
            query_type,
            blocked,
            latency_ms,
            status,
            upstream,
            block_reason,
            cached,
        ) = row;

        Some(QueryLogEntry {
            id: Some(id),
            timestamp: Some(created_at),
            client_ip: client_ip.parse().ok()?,
            domain: Arc::from(domain.as_str()),
            query_type: query_type.parse::<RecordType>().ok()?,
            blocked: blocked != 0,
            latency_ms: latency_ms.max(0) as u64,
            status: status.parse().ok()?,
            upstream: upstream.map(|u| Arc::from(u.as_str())),
            block_reason: block_reason.and_then(|r| r.parse::<BlockReason>().ok()),
            cached: cached != 0,
        })
    }

    async fn top_domains(
        &self,
        blocked_only: bool,
        top_n: u32,
    ) -> Result<Vec<DomainCount>, DomainError> {
        let sql = if blocked_only {
            "SELECT domain, COUNT(*) AS hits FROM query_log
             WHERE created_at >= datetime('now', '-24 hours') AND blocked = 1
             GROUP BY domain ORDER BY hits DESC, domain LIMIT ?"
        } else {
            "SELECT domain, COUNT(*) AS hits FROM query_log
             WHERE created_at >= datetime('now', '-24 hours')
             GROUP BY domain ORDER BY hits DESC, domain LIMIT ?"
        };

        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .bind(top_n as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch top domains");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows
            .into_iter()
            .map(|(domain, count)| DomainCount {
                domain,
                count: count.max(0) as u64,
            })
            .collect())
    }
}

#[async_trait]
impl QueryLogRepository for SqliteQueryLogRepository {
    fn log_query(&self, entry: QueryLogEntry) {
        match self
            .sender
            .try_send(LogCommand::Entry(PendingEntry::from_entry(entry)))
        {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped.is_power_of_two() {
                    warn!(dropped, "Query log channel full, dropping entries");
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                error!("Query log channel closed");
            }
        }
    }

    fn dropped_entries(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[instrument(skip(self))]
    async fn get_page(&self, page: u32, limit: u32) -> Result<QueryLogPage, DomainError> {
        let offset = (page.max(1) as i64 - 1) * limit as i64;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM query_log")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count query log");
                DomainError::DatabaseError(e.to_string())
            })?;

        let rows = sqlx::query_as::<_, QueryLogRow>(
            "SELECT id, created_at, client_ip, domain, query_type, blocked, latency_ms, status, upstream,
                    block_reason, cached
             FROM query_log ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch query log page");
            DomainError::DatabaseError(e.to_string())
        })?;

        let entries: Vec<QueryLogEntry> = rows.into_iter().filter_map(Self::row_to_entry).collect();

        debug!(count = entries.len(), page, "Query log page fetched");
        Ok(QueryLogPage {
            entries,
            total: total.0.max(0) as u64,
            page,
            limit,
        })
    }

    #[instrument(skip(self))]
    async fn summary(&self, top_n: u32) -> Result<QueryLogSummary, DomainError> {
        let (total_24h, blocked_24h, last_5m, avg_latency_1h, active_clients_1h): (
            i64,
            Option<i64>,
            Option<i64>,
            Option<f64>,
            i64,
        ) = sqlx::query_as(
            "SELECT
                COUNT(*),
                SUM(CASE WHEN blocked = 1 THEN 1 ELSE 0 END),
                SUM(CASE WHEN created_at >= datetime('now', '-5 minutes') THEN 1 ELSE 0 END),
                AVG(CASE WHEN created_at >= datetime('now', '-1 hour') THEN latency_ms END),
                COUNT(DISTINCT CASE WHEN created_at >= datetime('now', '-1 hour') THEN client_ip END)
             FROM query_log WHERE created_at >= datetime('now', '-24 hours')",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch query log summary");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(QueryLogSummary {
            total_24h: total_24h.max(0) as u64,
            blocked_24h: blocked_24h.unwrap_or(0).max(0) as u64,
            queries_last_5m: last_5m.unwrap_or(0).max(0) as u64,
            avg_latency_ms_1h: avg_latency_1h.unwrap_or(0.0),
            active_clients_1h: active_clients_1h.max(0) as u64,
            top_domains: self.top_domains(false, top_n).await?,
            top_blocked: self.top_domains(true, top_n).await?,
        })
    }

    #[instrument(skip(self))]
    async fn client_activity(&self, limit: u32) -> Result<Vec<ClientActivity>, DomainError> {
        let rows: Vec<(String, i64, Option<i64>, Option<String>, Option<i64>)> = sqlx::query_as(
            "SELECT q.client_ip,
                    COUNT(*) AS queries,
                    SUM(CASE WHEN q.blocked = 1 THEN 1 ELSE 0 END),
                    MAX(q.created_at),
                    MAX(cs.blocked)
             FROM query_log q
             LEFT JOIN client_settings cs ON cs.client_ip = q.client_ip
             GROUP BY q.client_ip
             ORDER BY queries DESC, q.client_ip
             LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch client activity");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .filter_map(|(client_ip, queries, blocked, last_seen, banned)| {
                Some(ClientActivity {
                    client_ip: client_ip.parse().ok()?,
                    query_count: queries.max(0) as u64,
                    blocked_count: blocked.unwrap_or(0).max(0) as u64,
                    last_seen,
                    is_banned: banned.unwrap_or(0) != 0,
                })
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM query_log WHERE created_at < datetime('now', ?)")
            .bind(format!("-{} days", days))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete old query log entries");
                DomainError::DatabaseError(e.to_string())
            })?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted, days, "Old query log entries removed");
        }
        Ok(deleted)
    }
}
