use crate::reminders::execute_reminder_pass::{
    ExecuteReminderPassUseCase, ReminderPassError, ReminderPassSummary,
};
use crate::shared::usecase::execute;
use payloop_domain::{DispatchRecord, DispatchStats};
use payloop_infra::PayloopContext;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

struct RunningTimer {
    stop: watch::Sender<bool>,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

/// Owns the hourly reminder timer and the manual trigger. Both funnel into
/// the same pass use case and are serialized through `pass_lock`, so two
/// passes can never interleave their sends.
pub struct RentReminderScheduler {
    ctx: PayloopContext,
    pass_lock: Arc<tokio::sync::Mutex<()>>,
    inner: Mutex<Option<RunningTimer>>,
}

impl RentReminderScheduler {
    pub fn new(ctx: PayloopContext) -> Self {
        Self {
            ctx,
            pass_lock: Arc::new(tokio::sync::Mutex::new(())),
            inner: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().is_some()
    }

    /// Spawns the timer task. The first pass runs right away, then once per
    /// `poll_interval`. Calling `start` on a running scheduler is a no-op.
    pub fn start(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.is_some() {
            info!("Reminder scheduler is already running");
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let ctx = self.ctx.clone();
        let pass_lock = self.pass_lock.clone();
        let poll_interval = ctx.config.poll_interval;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                // Stop only interrupts the wait, never a pass in flight
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = stop_rx.changed() => break,
                }
                let _guard = pass_lock.lock().await;
                let _ = execute(ExecuteReminderPassUseCase, &ctx).await;
            }
            info!("Reminder scheduler timer stopped");
        });

        info!(
            "Reminder scheduler started with a poll interval of {:?}",
            poll_interval
        );
        *inner = Some(RunningTimer {
            stop: stop_tx,
            handle,
        });
    }

    /// Stops the timer. A pass that is already running completes normally.
    pub fn stop(&self) {
        if let Some(timer) = self.inner.lock().unwrap().take() {
            // The receiver is gone only if the task already exited
            let _ = timer.stop.send(true);
        }
    }

    /// Runs one pass immediately, e.g. from an operator action. The pass is
    /// subject to the same business-hour guard and idempotence checks as the
    /// timed ones and waits for any pass already in flight.
    pub async fn trigger_manual_check(&self) -> Result<ReminderPassSummary, ReminderPassError> {
        let _guard = self.pass_lock.lock().await;
        execute(ExecuteReminderPassUseCase, &self.ctx).await
    }

    /// Lifetime totals over the dispatch log
    pub async fn get_stats(&self) -> anyhow::Result<DispatchStats> {
        self.ctx
            .repos
            .dispatch_log
            .stats(None, self.ctx.sys.now_local().date())
            .await
    }

    /// The most recent dispatch attempts, newest first
    pub async fn get_recent_logs(&self, limit: usize) -> anyhow::Result<Vec<DispatchRecord>> {
        self.ctx.repos.dispatch_log.find_recent(limit).await
    }
}

impl Drop for RentReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
