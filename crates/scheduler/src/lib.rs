mod job_scheduler;
mod reminders;
mod shared;

pub use job_scheduler::RentReminderScheduler;
pub use reminders::execute_reminder_pass::{
    ExecuteReminderPassUseCase, ReminderPassError, ReminderPassSummary,
};
pub use reminders::send_bulk_messages::{
    BulkRecipient, BulkSendError, BulkSendFailure, BulkSendSummary, SendBulkMessagesUseCase,
};
pub use shared::usecase::{execute, UseCase};
