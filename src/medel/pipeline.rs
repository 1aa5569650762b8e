use crate::error::MedelError;
use crate::medel::config::MedelConfig;
use crate::medel::generate::{self, Completion};
use crate::medel::notify::{self, PushSender};
use crate::medel::registry::ProviderConfig;
use crate::medel::rng::Picker;
use crate::medel::store::{LogRecord, MessageStore};
use chrono::Utc;
use tracing::info;

pub struct PipelineDeps<'a> {
    pub config: &'a MedelConfig,
    pub provider: &'a ProviderConfig,
    pub completion: &'a dyn Completion,
    pub store: &'a dyn MessageStore,
    pub sender: &'a dyn PushSender,
    pub picker: &'a mut dyn Picker,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub id: u64,
    pub provider: String,
    pub message: String,
}

/// Run the pipeline once: generate, allocate an id, append the log record,
/// build the payload, send. Linear; the first failure wins. The record is
/// appended *before* the send is attempted, so a failed delivery never
/// loses the generated message.
pub fn run(deps: PipelineDeps<'_>) -> Result<RunReport, MedelError> {
    let message = generate::generate(deps.completion, deps.picker, deps.config.master_prompt)
        .map_err(MedelError::Generation)?;
    info!(provider = deps.provider.key, "message generated");

    let id = deps.store.next_id().map_err(MedelError::Counter)?;
    info!(id, "allocated log id");

    let date = Utc::now()
        .with_timezone(&deps.config.timezone)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let record = LogRecord {
        id,
        date,
        model: deps.provider.display_name.to_string(),
        message: message.clone(),
    };
    deps.store.append(&record).map_err(MedelError::Log)?;
    info!(id, model = %record.model, "log record appended");

    let payload = notify::build_payload(
        &message,
        deps.provider.display_name,
        &deps.config.push_tokens,
        deps.picker,
    );
    deps.sender.send(&payload).map_err(MedelError::Delivery)?;
    info!(id, "notification sent");

    Ok(RunReport {
        id,
        provider: deps.provider.display_name.to_string(),
        message,
    })
}
