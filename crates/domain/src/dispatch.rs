use crate::reminder::ReminderKind;
use crate::shared::entity::ID;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One attempt at delivering a reminder to a tenant, successful or not.
/// Records are immutable once appended to the dispatch log.
///
/// Invariant: for any tenant there is at most one record with
/// `success == true` per `sent_on` day. The eligibility check enforces this
/// by consulting the log before dispatching.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub id: ID,
    pub tenant_id: ID,
    pub kind: ReminderKind,
    pub sent_at: DateTime<Utc>,
    /// Calendar day of the attempt in the property manager's local timezone.
    /// Idempotence and the daily counters key on this day, not on the UTC
    /// date of `sent_at`: the two differ when business hours straddle UTC
    /// midnight.
    pub sent_on: NaiveDate,
    pub success: bool,
    /// Cost in KES of the send; 0.0 for failed attempts
    pub cost: f64,
    /// Gateway-assigned message id, present for accepted messages
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Aggregate view over the dispatch log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchStats {
    pub total_sent: u64,
    pub total_failed: u64,
    /// Sum of costs of successful sends only
    pub total_cost: f64,
    pub sent_today: u64,
    /// Fraction of attempts that succeeded, in [0, 1]; 0.0 with no records
    pub success_rate: f64,
}

impl DispatchStats {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a DispatchRecord>,
        today: NaiveDate,
    ) -> Self {
        let mut total_sent = 0u64;
        let mut total_failed = 0u64;
        let mut total_cost = 0f64;
        let mut sent_today = 0u64;

        for record in records {
            if record.success {
                total_sent += 1;
                total_cost += record.cost;
                if record.sent_on == today {
                    sent_today += 1;
                }
            } else {
                total_failed += 1;
            }
        }

        let attempts = total_sent + total_failed;
        let success_rate = if attempts == 0 {
            0.0
        } else {
            total_sent as f64 / attempts as f64
        };

        Self {
            total_sent,
            total_failed,
            total_cost,
            sent_today,
            success_rate,
        }
    }
}
