pub mod campaign;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use campaign::assembler::{build_send_request, FieldValues, MessageFields};
pub use campaign::cache::{BoundedSchemaCache, NoopSchemaCache, SchemaCache};
pub use campaign::client::{AiSensyClient, CampaignApi};
pub use campaign::credential::{verify, Credential, CredentialCheck};
pub use campaign::executor::{
    execute, BatchItem, ExecutionOptions, ExecutionRecord, MessageData, Operation, PairedItem,
};
pub use campaign::fields::{FieldDescriptor, FieldKey, FieldType};
pub use campaign::schema::{SchemaDeriver, SchemaResult};
pub use campaign::types::{Media, MessageRequest};
pub use config::AdapterConfig;
pub use error::AppError;
