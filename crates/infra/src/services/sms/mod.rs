use payloop_domain::{message_cost, PhoneNumber};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::error;

/// Outcome of one send attempt as reported to callers. The gateway never
/// raises: transport failures and invalid destinations come back as
/// unsuccessful responses so a batch can record them and carry on.
#[derive(Debug, Clone)]
pub struct SmsResponse {
    pub success: bool,
    /// Gateway-assigned id for accepted messages
    pub message_id: Option<String>,
    /// Cost in KES; 0.0 when nothing was billed
    pub cost: f64,
    pub error: Option<String>,
}

impl SmsResponse {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            message_id: None,
            cost: 0.0,
            error: Some(error),
        }
    }
}

/// The wire seam towards the SMS provider. Production uses the HTTP
/// transport; tests inject a scripted fake instead of relying on
/// randomness inside the client.
#[async_trait::async_trait]
pub trait ISmsTransport: Send + Sync {
    /// Delivers one message, returning the gateway message id on acceptance
    async fn deliver(&self, destination: &PhoneNumber, text: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct GatewayMessageRequest<'a> {
    destination: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GatewayMessageResponse {
    accepted: bool,
    #[serde(default)]
    id: Option<String>,
}

pub struct HttpSmsTransport {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpSmsTransport {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl ISmsTransport for HttpSmsTransport {
    async fn deliver(&self, destination: &PhoneNumber, text: &str) -> anyhow::Result<String> {
        let body = GatewayMessageRequest {
            destination: destination.as_str(),
            text,
        };
        match self
            .client
            .post(&self.url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(res) => {
                let res = res.json::<GatewayMessageResponse>().await.map_err(|e| {
                    error!(
                        "[Unexpected Response] SMS gateway POST error. Error message: {:?}",
                        e
                    );
                    anyhow::Error::new(e)
                })?;
                if res.accepted {
                    Ok(res.id.unwrap_or_default())
                } else {
                    Err(anyhow::anyhow!(
                        "Gateway did not accept message to {}",
                        destination
                    ))
                }
            }
            Err(e) => {
                error!(
                    "[Network Error] SMS gateway POST error. Error message: {:?}",
                    e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}

/// The one adapter in front of the external SMS gateway: normalizes the
/// destination, estimates the message cost and hands the text to the
/// transport. No component talks to the gateway except through this type.
pub struct SmsGateway {
    transport: Arc<dyn ISmsTransport>,
}

impl SmsGateway {
    pub fn new(transport: Arc<dyn ISmsTransport>) -> Self {
        Self { transport }
    }

    /// Sends one message. Retries are the caller's decision; a failed send
    /// is reported once and not repeated here.
    pub async fn send(&self, phone_raw: &str, message: &str) -> SmsResponse {
        let destination = match phone_raw.parse::<PhoneNumber>() {
            Ok(phone) => phone,
            Err(e) => return SmsResponse::failed(e.to_string()),
        };

        match self.transport.deliver(&destination, message).await {
            Ok(message_id) => SmsResponse {
                success: true,
                message_id: Some(message_id).filter(|id| !id.is_empty()),
                cost: message_cost(message),
                error: None,
            },
            Err(e) => SmsResponse::failed(e.to_string()),
        }
    }
}

/// Scripted transport for tests. Outcomes are popped in order; once the
/// script runs out every further send is accepted. Every call is recorded
/// so tests can assert on what reached the wire.
pub struct FakeSmsTransport {
    outcomes: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeSmsTransport {
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    pub fn with_outcomes(outcomes: Vec<Result<String, String>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(destination, text)` pairs in the order they were attempted
    pub fn sent(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for FakeSmsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsTransport for FakeSmsTransport {
    async fn deliver(&self, destination: &PhoneNumber, text: &str) -> anyhow::Result<String> {
        let call_count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((destination.as_str().to_string(), text.to_string()));
            calls.len()
        };
        match self.outcomes.lock().unwrap().pop_front() {
            None => Ok(format!("ATXid_test_{}", call_count)),
            Some(Ok(message_id)) => Ok(message_id),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
        }
    }
}
