mod dispatch;
mod message;
mod phone;
mod property;
mod reminder;
mod shared;
mod sms;
mod tenant;

pub use dispatch::{DispatchRecord, DispatchStats};
pub use message::reminder_text;
pub use phone::{InvalidPhoneError, PhoneNumber};
pub use property::Property;
pub use reminder::{reminder_event_on, ReminderEvent, ReminderKind};
pub use shared::entity::{InvalidIDError, ID};
pub use sms::message_cost;
pub use tenant::{InvalidTenantStatusError, Tenant, TenantStatus};
