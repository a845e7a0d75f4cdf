use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::campaign::cache::BoundedSchemaCache;
use crate::campaign::client::AiSensyClient;
use crate::campaign::credential;
use crate::campaign::executor::{self, BatchItem, ExecutionOptions, MessageData, Operation};
use crate::campaign::fields::FieldDescriptor;
use crate::campaign::schema::SchemaDeriver;
use crate::config::{self, AdapterConfig};
use crate::error::AppError;

/// Send WhatsApp campaign messages via the AiSensy API.
#[derive(Parser, Debug)]
#[command(name = "aisensy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the configured API key is accepted by AiSensy.
    Verify,
    /// Load the form fields for a campaign.
    Schema {
        #[arg(long)]
        campaign: String,
        /// Previously loaded fields (array or `{ schema: [...] }`), for change detection.
        #[arg(long)]
        previous: Option<PathBuf>,
    },
    /// Send a campaign message for every record in a JSON batch file.
    Send {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "sendMessage")]
        operation: String,
        /// Record failures in the output instead of aborting the batch.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Store the API key in the OS keyring.
    #[cfg(feature = "desktop")]
    StoreKey {
        #[arg(long, env = "AISENSY_API_KEY", hide_env_values = true)]
        api_key: String,
    },
    /// Remove the API key from the OS keyring.
    #[cfg(feature = "desktop")]
    ClearKey,
}

/// Previous field sets arrive either bare or wrapped in the host's message data.
#[derive(Deserialize)]
#[serde(untagged)]
enum PreviousFields {
    Fields(Vec<FieldDescriptor>),
    MessageData(MessageData),
}

impl PreviousFields {
    fn into_fields(self) -> Vec<FieldDescriptor> {
        match self {
            PreviousFields::Fields(f) => f,
            PreviousFields::MessageData(d) => d.schema.unwrap_or_default(),
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Verify => {
            let client = client()?;
            let check = credential::verify(&client, &config::resolve_credential()?).await;
            print_json(&check)
        }
        Command::Schema { campaign, previous } => {
            let previous = match previous {
                Some(path) => Some(read_json::<PreviousFields>(&path).await?.into_fields()),
                None => None,
            };
            let deriver = SchemaDeriver::new(Arc::new(client()?))
                .with_cache(Arc::new(BoundedSchemaCache::default()));
            let result = deriver
                .derive(&campaign, &config::resolve_credential()?, previous.as_deref())
                .await;
            print_json(&result)
        }
        Command::Send {
            input,
            operation,
            continue_on_fail,
        } => {
            let operation: Operation = operation.parse()?;
            let items: Vec<BatchItem> = read_json(&input).await?;
            let client = client()?;
            let records = executor::execute(
                &client,
                &config::resolve_credential()?,
                operation,
                &items,
                ExecutionOptions { continue_on_fail },
            )
            .await?;
            print_json(&records)
        }
        #[cfg(feature = "desktop")]
        Command::StoreKey { api_key } => {
            credential::Credential::new(api_key.as_str())?;
            config::keyring_store::store_api_key(&api_key)?;
            tracing::info!("API key stored in OS keyring");
            Ok(())
        }
        #[cfg(feature = "desktop")]
        Command::ClearKey => {
            config::keyring_store::clear_api_key();
            tracing::info!("API key removed from OS keyring");
            Ok(())
        }
    }
}

fn client() -> Result<AiSensyClient, AppError> {
    AiSensyClient::new(&AdapterConfig::from_env()?)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_send() {
        let cli = Cli::try_parse_from([
            "aisensy",
            "send",
            "--input",
            "batch.json",
            "--continue-on-fail",
        ])
        .unwrap();
        match cli.command {
            Command::Send {
                input,
                operation,
                continue_on_fail,
            } => {
                assert_eq!(input, PathBuf::from("batch.json"));
                assert_eq!(operation, "sendMessage");
                assert!(continue_on_fail);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_previous_fields_accepts_both_shapes() {
        let bare: PreviousFields = serde_json::from_value(serde_json::json!([
            {"id": "__campaignName__", "defaultValue": "A", "display": false}
        ]))
        .unwrap();
        assert_eq!(bare.into_fields().len(), 1);

        let wrapped: PreviousFields = serde_json::from_value(serde_json::json!({
            "mappingMode": "defineBelow",
            "value": null,
            "schema": [{"id": "destination"}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_fields()[0].id, "destination");
    }
}
