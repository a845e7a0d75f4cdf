use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::campaign::assembler::{build_send_request, FieldValues};
use crate::campaign::client::CampaignApi;
use crate::campaign::credential::Credential;
use crate::campaign::fields::FieldDescriptor;
use crate::error::AppError;

/// Operations the adapter exposes to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    #[default]
    SendMessage,
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sendMessage" => Ok(Operation::SendMessage),
            other => Err(AppError::Configuration(format!(
                "The operation \"{other}\" is not supported"
            ))),
        }
    }
}

/// Resource-mapper value as stored by the host: `{ mappingMode, value, schema }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    #[serde(default)]
    pub mapping_mode: Option<String>,
    #[serde(default)]
    pub value: Option<FieldValues>,
    #[serde(default)]
    pub schema: Option<Vec<FieldDescriptor>>,
}

/// One input record: its campaign and the form values mapped for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    /// Missing in the input is a per-record configuration error at send time.
    #[serde(default)]
    pub campaign_name: String,
    #[serde(default)]
    pub message_data: Option<MessageData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output record. `json` is the raw API response, or `{ "error": ... }` when
/// the record failed under continue-on-fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl ExecutionRecord {
    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionOptions {
    pub continue_on_fail: bool,
}

/// Run `operation` over every item, one remote call at a time.
///
/// Without `continue_on_fail` the first failure aborts the batch and is returned.
pub async fn execute(
    api: &dyn CampaignApi,
    credential: &Credential,
    operation: Operation,
    items: &[BatchItem],
    options: ExecutionOptions,
) -> Result<Vec<ExecutionRecord>, AppError> {
    tracing::info!(items = items.len(), ?operation, "Executing AiSensy batch");
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let outcome = match operation {
            Operation::SendMessage => send_message(api, credential, item).await,
        };

        match outcome {
            Ok(json) => records.push(ExecutionRecord {
                json,
                paired_item: PairedItem { item: index },
            }),
            Err(e) if options.continue_on_fail => {
                tracing::warn!(item = index, error = %e, "Record failed, continuing");
                records.push(ExecutionRecord {
                    json: serde_json::json!({ "error": e.to_string() }),
                    paired_item: PairedItem { item: index },
                });
            }
            Err(e) => {
                tracing::error!(item = index, error = %e, "Record failed, aborting batch");
                return Err(e);
            }
        }
    }

    Ok(records)
}

async fn send_message(
    api: &dyn CampaignApi,
    credential: &Credential,
    item: &BatchItem,
) -> Result<Value, AppError> {
    let values = item.message_data.as_ref().and_then(|d| d.value.as_ref());
    let request = build_send_request(&item.campaign_name, values, credential)?;
    api.send_campaign(&request).await
}
