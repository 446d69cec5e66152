use super::IDispatchLogRepo;
use chrono::{DateTime, NaiveDate, Utc};
use payloop_domain::{DispatchRecord, DispatchStats, ReminderKind, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresDispatchLogRepo {
    pool: PgPool,
}

impl PostgresDispatchLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DispatchRecordRaw {
    record_uid: Uuid,
    tenant_uid: Uuid,
    kind: String,
    sent_at: DateTime<Utc>,
    sent_on: NaiveDate,
    success: bool,
    cost: f64,
    message_id: Option<String>,
    error: Option<String>,
}

impl TryFrom<DispatchRecordRaw> for DispatchRecord {
    type Error = anyhow::Error;

    fn try_from(e: DispatchRecordRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.record_uid.into(),
            tenant_id: e.tenant_uid.into(),
            kind: e.kind.parse::<ReminderKind>()?,
            sent_at: e.sent_at,
            sent_on: e.sent_on,
            success: e.success,
            cost: e.cost,
            message_id: e.message_id,
            error: e.error,
        })
    }
}

#[derive(Debug, FromRow)]
struct StatsRaw {
    total_sent: i64,
    total_failed: i64,
    total_cost: f64,
    sent_today: i64,
}

#[async_trait::async_trait]
impl IDispatchLogRepo for PostgresDispatchLogRepo {
    async fn insert(&self, record: &DispatchRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dispatch_log
            (record_uid, tenant_uid, kind, sent_at, sent_on, success, cost, message_id, error)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.inner_ref())
        .bind(record.tenant_id.inner_ref())
        .bind(record.kind.as_str())
        .bind(record.sent_at)
        .bind(record.sent_on)
        .bind(record.success)
        .bind(record.cost)
        .bind(&record.message_id)
        .bind(&record.error)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert dispatch record: {:?}. DB returned error: {:?}",
                record, e
            );
            e
        })?;
        Ok(())
    }

    async fn was_sent_on(&self, tenant_id: &ID, day: NaiveDate) -> anyhow::Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM dispatch_log
            WHERE tenant_uid = $1
            AND success = TRUE
            AND sent_on = $2
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Idempotence lookup for tenant: {:?} on day: {} failed. DB returned error: {:?}",
                tenant_id, day, e
            );
            e
        })?;
        Ok(count > 0)
    }

    async fn stats(
        &self,
        since: Option<DateTime<Utc>>,
        today: NaiveDate,
    ) -> anyhow::Result<DispatchStats> {
        let stats: StatsRaw = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE success) AS total_sent,
                COUNT(*) FILTER (WHERE NOT success) AS total_failed,
                COALESCE(SUM(cost) FILTER (WHERE success), 0) AS total_cost,
                COUNT(*) FILTER (WHERE success AND sent_on = $2) AS sent_today
            FROM dispatch_log
            WHERE $1::timestamptz IS NULL OR sent_at >= $1
            "#,
        )
        .bind(since)
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Dispatch log stats query failed. DB returned error: {:?}", e);
            e
        })?;

        let attempts = stats.total_sent + stats.total_failed;
        let success_rate = if attempts == 0 {
            0.0
        } else {
            stats.total_sent as f64 / attempts as f64
        };

        Ok(DispatchStats {
            total_sent: stats.total_sent as u64,
            total_failed: stats.total_failed as u64,
            total_cost: stats.total_cost,
            sent_today: stats.sent_today as u64,
            success_rate,
        })
    }

    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<DispatchRecord>> {
        let records_raw: Vec<DispatchRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM dispatch_log
            ORDER BY sent_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find recent dispatch records failed. DB returned error: {:?}",
                e
            );
            e
        })?;
        records_raw.into_iter().map(|r| r.try_into()).collect()
    }
}
