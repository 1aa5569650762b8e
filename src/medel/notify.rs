use crate::medel::content;
use crate::medel::rng::Picker;
use anyhow::{Result, bail};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const SHORT_BODY_CHARS: usize = 50;
const SEND_TIMEOUT_SECS: u64 = 10;
const TTL_SECS: u32 = 60;

/// Expo push payload. Built fresh per run, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    /// Single token as a string, several as an array.
    pub to: Value,
    pub sound: String,
    pub title: String,
    pub body: String,
    pub data: NotificationData,
    pub ttl: u32,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationData {
    /// Provider display name; the app keys its detail view on it.
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub url: String,
}

fn recipient_value(tokens: &str) -> Value {
    let parts: Vec<&str> = tokens
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() == 1 {
        Value::String(parts[0].to_string())
    } else {
        Value::Array(parts.into_iter().map(|t| Value::String(t.to_string())).collect())
    }
}

/// First 50 characters plus `"..."` when longer than 50, else unchanged.
fn short_body(message: &str) -> String {
    if message.chars().count() > SHORT_BODY_CHARS {
        let mut out: String = message.chars().take(SHORT_BODY_CHARS).collect();
        out.push_str("...");
        out
    } else {
        message.to_string()
    }
}

/// Pure payload construction; clamps rather than failing. Flavor title and
/// image are picked independently at random per call.
pub fn build_payload(
    message: &str,
    provider_display_name: &str,
    push_tokens: &str,
    picker: &mut dyn Picker,
) -> NotificationPayload {
    let flavor = content::FLAVOR_TITLES[picker.pick(content::FLAVOR_TITLES.len())];
    let image_index = picker.pick(content::IMAGE_COUNT) + 1;

    NotificationPayload {
        to: recipient_value(push_tokens),
        sound: "default".to_string(),
        title: content::NOTIFICATION_TITLE.to_string(),
        body: short_body(message),
        data: NotificationData {
            id: provider_display_name.to_string(),
            title: flavor.to_string(),
            body: message.to_string(),
            image_url: content::image_url(image_index),
            url: content::LINK_URL.to_string(),
        },
        ttl: TTL_SECS,
        priority: "high".to_string(),
    }
}

/// Delivery seam; the production impl POSTs to the Expo gateway.
pub trait PushSender {
    fn send(&self, payload: &NotificationPayload) -> Result<()>;
}

pub struct ExpoSender {
    client: Client,
    url: String,
}

impl ExpoSender {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

/// Gateway response validation. HTTP 200 does not imply success: the body
/// can still carry a per-recipient failure under `data` (or `errors`).
fn validate_response(status: u16, body: &str) -> Result<Value> {
    if status != 200 {
        bail!("gateway returned HTTP {status}: {body}");
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => bail!("gateway returned malformed JSON: {body}"),
    };

    let reported = parsed.get("data").or_else(|| parsed.get("errors"));
    if let Some(obj) = reported.and_then(Value::as_object) {
        let status_field = obj
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if status_field != "ok" {
            bail!(
                "gateway reported failure: {}",
                serde_json::to_string(obj).unwrap_or_default()
            );
        }
    }

    Ok(parsed)
}

impl PushSender for ExpoSender {
    fn send(&self, payload: &NotificationPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        let parsed = validate_response(status, &text)?;
        tracing::info!(response = %parsed, "notification accepted by gateway");
        Ok(())
    }
}
