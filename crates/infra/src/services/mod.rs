mod sms;

pub use sms::{FakeSmsTransport, HttpSmsTransport, ISmsTransport, SmsGateway, SmsResponse};
