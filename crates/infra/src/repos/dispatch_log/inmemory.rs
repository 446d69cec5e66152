use super::IDispatchLogRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, NaiveDate, Utc};
use payloop_domain::{DispatchRecord, DispatchStats, ID};

pub struct InMemoryDispatchLogRepo {
    records: std::sync::Mutex<Vec<DispatchRecord>>,
}

impl InMemoryDispatchLogRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryDispatchLogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDispatchLogRepo for InMemoryDispatchLogRepo {
    async fn insert(&self, record: &DispatchRecord) -> anyhow::Result<()> {
        insert(record, &self.records);
        Ok(())
    }

    async fn was_sent_on(&self, tenant_id: &ID, day: NaiveDate) -> anyhow::Result<bool> {
        let matches = find_by(&self.records, |record| {
            record.tenant_id == *tenant_id && record.success && record.sent_on == day
        });
        Ok(!matches.is_empty())
    }

    async fn stats(
        &self,
        since: Option<DateTime<Utc>>,
        today: NaiveDate,
    ) -> anyhow::Result<DispatchStats> {
        let records = find_by(&self.records, |record| match since {
            Some(since) => record.sent_at >= since,
            None => true,
        });
        Ok(DispatchStats::from_records(&records, today))
    }

    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<DispatchRecord>> {
        let mut records = find_by(&self.records, |_| true);
        records.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        records.truncate(limit);
        Ok(records)
    }
}
