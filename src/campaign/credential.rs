use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::campaign::client::CampaignApi;
use crate::campaign::types::PROBE_CAMPAIGN_NAME;
use crate::error::AppError;
use crate::validation;

/// The AiSensy API key. Wiped from memory on drop and redacted in `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    api_key: String,
}

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into();
        validation::require_setting("API Key", &api_key)?;
        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("api_key", &"***").finish()
    }
}

/// Result of a credential probe.
#[derive(Debug, serde::Serialize)]
pub struct CredentialCheck {
    pub success: bool,
    pub message: String,
}

/// Probe the API key with a campaign-details lookup for the `test` campaign.
/// Any 2xx JSON answer counts as a working key; failures are reported, not raised.
pub async fn verify(api: &dyn CampaignApi, credential: &Credential) -> CredentialCheck {
    match api.campaign_details(credential, PROBE_CAMPAIGN_NAME).await {
        Ok(_) => CredentialCheck {
            success: true,
            message: "Connection successful".into(),
        },
        Err(e) => {
            tracing::warn!(kind = e.kind(), "AiSensy credential probe failed");
            CredentialCheck {
                success: false,
                message: format!("Connection failed: {e}"),
            }
        }
    }
}
