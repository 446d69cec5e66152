use crate::shared::usecase::UseCase;
use chrono::Timelike;
use payloop_domain::{reminder_event_on, reminder_text, DispatchRecord, TenantStatus, ID};
use payloop_infra::PayloopContext;
use std::collections::HashMap;
use tracing::{info, warn};

/// Name shown when a tenant's property cannot be resolved. A missing lookup
/// must never block a reminder.
const FALLBACK_PROPERTY_NAME: &str = "Your Property";

/// Runs one reminder pass: walks every tenant, decides who is due for a
/// reminder today and dispatches at most one message per eligible tenant.
/// Both the hourly timer and the manual trigger funnel into this use case.
#[derive(Debug)]
pub struct ExecuteReminderPassUseCase;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReminderPassSummary {
    /// True when the pass was skipped entirely by the business-hour guard
    pub outside_business_hours: bool,
    /// Tenants that passed every eligibility check this pass
    pub eligible: usize,
    pub dispatched: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ReminderPassError {
    #[error("Unable to read or update the dispatch state: {0}")]
    StorageError(#[from] anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for ExecuteReminderPassUseCase {
    type Response = ReminderPassSummary;

    type Errors = ReminderPassError;

    async fn execute(&mut self, ctx: &PayloopContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now_local();
        let hour = now.hour();
        if hour < ctx.config.business_hour_start || hour > ctx.config.business_hour_end {
            info!("Skipping reminder pass at hour {}: outside business hours", hour);
            return Ok(ReminderPassSummary {
                outside_business_hours: true,
                ..Default::default()
            });
        }
        let today = now.date();

        let tenants = ctx.repos.tenants.find_all().await?;
        if tenants.is_empty() {
            return Ok(ReminderPassSummary::default());
        }

        let property_names: HashMap<ID, String> = ctx
            .repos
            .properties
            .find_all()
            .await?
            .into_iter()
            .map(|property| (property.id, property.name))
            .collect();

        let mut summary = ReminderPassSummary::default();

        for tenant in tenants {
            if tenant.status == TenantStatus::Inactive {
                continue;
            }

            let event = match reminder_event_on(
                tenant.due_day,
                today,
                ctx.config.reminder_days_before,
                ctx.config.reminder_days_after,
            ) {
                Some(event) => event,
                None => continue,
            };

            // At most one successful send per tenant per day. Failed attempts
            // do not count, so the next pass picks those tenants up again.
            if ctx.repos.dispatch_log.was_sent_on(&tenant.id, today).await? {
                continue;
            }

            summary.eligible += 1;

            let property_name = property_names
                .get(&tenant.property_id)
                .map(String::as_str)
                .unwrap_or(FALLBACK_PROPERTY_NAME);
            let text = reminder_text(
                &tenant.name,
                tenant.rent_amount,
                tenant.due_day,
                property_name,
                &event,
            );

            let response = ctx.sms.send(&tenant.phone, &text).await;
            if response.success {
                summary.dispatched += 1;
                info!(
                    "Dispatched {} reminder to tenant: {}",
                    event.kind().as_str(),
                    tenant.id
                );
            } else {
                summary.failed += 1;
                warn!(
                    "Failed to dispatch {} reminder to tenant: {}. Error: {:?}",
                    event.kind().as_str(),
                    tenant.id,
                    response.error
                );
            }

            let record = DispatchRecord {
                id: Default::default(),
                tenant_id: tenant.id.clone(),
                kind: event.kind(),
                sent_at: ctx.sys.now(),
                // Keyed on the same local day the eligibility check used, so
                // idempotence holds even when business hours straddle UTC
                // midnight
                sent_on: today,
                success: response.success,
                cost: response.cost,
                message_id: response.message_id,
                error: response.error,
            };
            ctx.repos.dispatch_log.insert(&record).await?;

            tokio::time::sleep(ctx.config.inter_message_delay).await;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use payloop_domain::{Property, ReminderKind, Tenant};
    use payloop_infra::{FakeSmsTransport, ISys, PayloopContext};
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticTimeSys {
        local: NaiveDateTime,
    }

    impl ISys for StaticTimeSys {
        fn now(&self) -> DateTime<Utc> {
            Utc.from_utc_datetime(&self.local)
        }

        fn now_local(&self) -> NaiveDateTime {
            self.local
        }
    }

    fn ctx_at(transport: Arc<FakeSmsTransport>, local: NaiveDateTime) -> PayloopContext {
        let mut ctx = PayloopContext::create_inmemory(transport);
        ctx.sys = Arc::new(StaticTimeSys { local });
        ctx.config.inter_message_delay = Duration::ZERO;
        ctx
    }

    fn jan(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn tenant(due_day: u32, status: TenantStatus, property_id: ID) -> Tenant {
        Tenant {
            id: Default::default(),
            name: "Jane Wanjiku".to_string(),
            phone: "0712345678".to_string(),
            rent_amount: 15000,
            due_day,
            status,
            property_id,
        }
    }

    async fn seed_property(ctx: &PayloopContext) -> ID {
        let property = Property {
            id: Default::default(),
            name: "Sunrise Apartments".to_string(),
            location: "Nairobi".to_string(),
        };
        ctx.repos.properties.insert(&property).await.unwrap();
        property.id
    }

    #[tokio::test]
    async fn skips_everything_outside_business_hours() {
        for hour in [0, 7, 19, 23] {
            let transport = Arc::new(FakeSmsTransport::new());
            let ctx = ctx_at(transport.clone(), jan(15, hour));
            let property_id = seed_property(&ctx).await;
            ctx.repos
                .tenants
                .insert(&tenant(15, TenantStatus::Active, property_id))
                .await
                .unwrap();

            let summary = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

            assert!(summary.outside_business_hours, "hour {} should be quiet", hour);
            assert_eq!(summary.eligible, 0);
            assert!(transport.sent().is_empty());
            assert!(ctx.repos.dispatch_log.find_recent(10).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn runs_at_the_boundary_hours() {
        for hour in [8, 18] {
            let transport = Arc::new(FakeSmsTransport::new());
            let ctx = ctx_at(transport.clone(), jan(15, hour));
            let property_id = seed_property(&ctx).await;
            ctx.repos
                .tenants
                .insert(&tenant(15, TenantStatus::Active, property_id))
                .await
                .unwrap();

            let summary = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

            assert!(!summary.outside_business_hours);
            assert_eq!(summary.dispatched, 1, "hour {} is inside business hours", hour);
        }
    }

    #[tokio::test]
    async fn dispatches_once_per_tenant_per_day() {
        let transport = Arc::new(FakeSmsTransport::new());
        let ctx = ctx_at(transport.clone(), jan(15, 10));
        let property_id = seed_property(&ctx).await;
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, property_id))
            .await
            .unwrap();

        let first = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(first.eligible, 1);
        assert_eq!(first.dispatched, 1);
        assert_eq!(first.failed, 0);

        // Same day again, e.g. the next hourly tick
        let second = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(second.eligible, 0);
        assert_eq!(second.dispatched, 0);

        assert_eq!(transport.sent().len(), 1);
        let records = ctx.repos.dispatch_log.find_recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ReminderKind::DueToday);
        assert!(records[0].success);
        assert!(records[0].cost > 0.0);
    }

    #[tokio::test]
    async fn records_the_event_kind_that_fired() {
        // Due on the 15th, seen on the 12th: three days ahead
        let transport = Arc::new(FakeSmsTransport::new());
        let ctx = ctx_at(transport.clone(), jan(12, 10));
        let property_id = seed_property(&ctx).await;
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, property_id))
            .await
            .unwrap();

        execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

        let records = ctx.repos.dispatch_log.find_recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ReminderKind::DueSoon);
        assert!(transport.sent()[0].1.contains("due in 3 days"));
    }

    #[tokio::test]
    async fn skips_inactive_tenants_and_quiet_days() {
        let transport = Arc::new(FakeSmsTransport::new());
        let ctx = ctx_at(transport.clone(), jan(15, 10));
        let property_id = seed_property(&ctx).await;
        // Inactive tenant whose rent is due today
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Inactive, property_id.clone()))
            .await
            .unwrap();
        // Active tenant with no reminder due on the 15th
        ctx.repos
            .tenants
            .insert(&tenant(20, TenantStatus::Active, property_id))
            .await
            .unwrap();

        let summary = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

        assert_eq!(summary.eligible, 0);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn suspended_and_defaulting_tenants_still_get_reminders() {
        let transport = Arc::new(FakeSmsTransport::new());
        let ctx = ctx_at(transport.clone(), jan(15, 10));
        let property_id = seed_property(&ctx).await;
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Suspended, property_id.clone()))
            .await
            .unwrap();
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Defaulter, property_id))
            .await
            .unwrap();

        let summary = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

        assert_eq!(summary.dispatched, 2);
    }

    #[tokio::test]
    async fn a_failed_send_does_not_stop_the_pass_or_count_as_sent() {
        let transport = Arc::new(FakeSmsTransport::with_outcomes(vec![Err(
            "Network error or invalid phone number".to_string(),
        )]));
        let ctx = ctx_at(transport.clone(), jan(15, 10));
        let property_id = seed_property(&ctx).await;
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, property_id.clone()))
            .await
            .unwrap();
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, property_id))
            .await
            .unwrap();

        let first = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(first.eligible, 2);
        assert_eq!(first.dispatched, 1);
        assert_eq!(first.failed, 1);

        // The failed tenant is still unsent today and gets another attempt
        let second = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(second.eligible, 1);
        assert_eq!(second.dispatched, 1);

        let records = ctx.repos.dispatch_log.find_recent(10).await.unwrap();
        assert_eq!(records.len(), 3);
        let failed: Vec<_> = records.iter().filter(|r| !r.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].cost, 0.0);
        assert!(failed[0].error.is_some());
    }

    /// Clock of a host whose local time runs ahead of UTC, e.g. a machine
    /// east of the meridian: early business hours still fall on the previous
    /// UTC date.
    struct OffsetTimeSys {
        local: NaiveDateTime,
        utc_offset: chrono::Duration,
    }

    impl ISys for OffsetTimeSys {
        fn now(&self) -> DateTime<Utc> {
            Utc.from_utc_datetime(&(self.local - self.utc_offset))
        }

        fn now_local(&self) -> NaiveDateTime {
            self.local
        }
    }

    #[tokio::test]
    async fn stays_idempotent_when_business_hours_straddle_utc_midnight() {
        // 08:30 local on the 15th at UTC+9 is 23:30 UTC on the 14th
        let transport = Arc::new(FakeSmsTransport::new());
        let mut ctx = PayloopContext::create_inmemory(transport.clone());
        ctx.sys = Arc::new(OffsetTimeSys {
            local: jan(15, 8),
            utc_offset: chrono::Duration::hours(9),
        });
        ctx.config.inter_message_delay = Duration::ZERO;
        let property_id = seed_property(&ctx).await;
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, property_id))
            .await
            .unwrap();

        let first = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(first.dispatched, 1);

        let second = execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();
        assert_eq!(second.eligible, 0);
        assert_eq!(second.dispatched, 0);
        assert_eq!(transport.sent().len(), 1);

        // The record keys on the local day even though the UTC date differs
        let records = ctx.repos.dispatch_log.find_recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].sent_on,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            records[0].sent_at.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
        );
    }

    struct UnreachableTenantRepo;

    #[async_trait::async_trait]
    impl payloop_infra::ITenantRepo for UnreachableTenantRepo {
        async fn insert(&self, _tenant: &Tenant) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("connection closed"))
        }

        async fn find_all(&self) -> anyhow::Result<Vec<Tenant>> {
            Err(anyhow::anyhow!("connection closed"))
        }
    }

    #[tokio::test]
    async fn a_data_store_failure_aborts_the_pass_before_any_send() {
        let transport = Arc::new(FakeSmsTransport::new());
        let mut ctx = ctx_at(transport.clone(), jan(15, 10));
        ctx.repos.tenants = Arc::new(UnreachableTenantRepo);

        let res = execute(ExecuteReminderPassUseCase, &ctx).await;

        assert!(matches!(res, Err(ReminderPassError::StorageError(_))));
        assert!(transport.sent().is_empty());
        assert!(ctx.repos.dispatch_log.find_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_a_generic_property_name() {
        let transport = Arc::new(FakeSmsTransport::new());
        let ctx = ctx_at(transport.clone(), jan(15, 10));
        // No property seeded; the tenant points at an id the repo cannot resolve
        ctx.repos
            .tenants
            .insert(&tenant(15, TenantStatus::Active, ID::new()))
            .await
            .unwrap();

        execute(ExecuteReminderPassUseCase, &ctx).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Your Property"));
    }
}
