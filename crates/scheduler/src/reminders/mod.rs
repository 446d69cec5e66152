pub mod execute_reminder_pass;
pub mod send_bulk_messages;
