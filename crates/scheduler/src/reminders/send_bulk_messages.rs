use crate::shared::usecase::UseCase;
use payloop_infra::PayloopContext;
use tracing::info;

/// One destination in a bulk batch, e.g. an announcement to every tenant of
/// a property. The message is taken as-is; no reminder template is applied.
#[derive(Debug, Clone)]
pub struct BulkRecipient {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkSendFailure {
    pub phone: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkSendSummary {
    /// True when at least one message went out
    pub success: bool,
    /// Sum of costs of the successful sends, in KES
    pub total_cost: f64,
    pub sent_count: usize,
    pub failed_count: usize,
    pub failures: Vec<BulkSendFailure>,
}

/// Sends one ad-hoc message to each recipient, pacing the gateway calls the
/// same way the reminder pass does. A failed recipient is recorded and the
/// batch moves on; nothing is retried.
#[derive(Debug)]
pub struct SendBulkMessagesUseCase {
    pub recipients: Vec<BulkRecipient>,
}

#[derive(Debug, thiserror::Error)]
pub enum BulkSendError {}

#[async_trait::async_trait]
impl UseCase for SendBulkMessagesUseCase {
    type Response = BulkSendSummary;

    type Errors = BulkSendError;

    async fn execute(&mut self, ctx: &PayloopContext) -> Result<Self::Response, Self::Errors> {
        let mut summary = BulkSendSummary {
            success: false,
            total_cost: 0.0,
            sent_count: 0,
            failed_count: 0,
            failures: Vec::new(),
        };

        for recipient in &self.recipients {
            let response = ctx.sms.send(&recipient.phone, &recipient.message).await;
            if response.success {
                summary.sent_count += 1;
                summary.total_cost += response.cost;
            } else {
                summary.failed_count += 1;
                summary.failures.push(BulkSendFailure {
                    phone: recipient.phone.clone(),
                    error: response
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string()),
                });
            }

            tokio::time::sleep(ctx.config.inter_message_delay).await;
        }

        summary.success = summary.sent_count > 0;
        info!(
            "Bulk send finished. Sent: {}. Failed: {}.",
            summary.sent_count, summary.failed_count
        );

        Ok(summary)
    }
}
