mod inmemory;
mod postgres;

use chrono::{DateTime, NaiveDate, Utc};
pub use inmemory::InMemoryDispatchLogRepo;
use payloop_domain::{DispatchRecord, DispatchStats, ID};
pub use postgres::PostgresDispatchLogRepo;

/// Append-only record of every reminder send attempt. The log answers the
/// idempotence question ("did this tenant already get a successful send
/// today?") and feeds the stats and recent-activity views, so it must be
/// durable across process restarts.
#[async_trait::async_trait]
pub trait IDispatchLogRepo: Send + Sync {
    async fn insert(&self, record: &DispatchRecord) -> anyhow::Result<()>;
    /// True iff a *successful* record exists for the tenant on `day`
    async fn was_sent_on(&self, tenant_id: &ID, day: NaiveDate) -> anyhow::Result<bool>;
    async fn stats(
        &self,
        since: Option<DateTime<Utc>>,
        today: NaiveDate,
    ) -> anyhow::Result<DispatchStats>;
    /// Newest first
    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<DispatchRecord>>;
}
