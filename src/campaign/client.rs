use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::campaign::credential::Credential;
use crate::campaign::types::{
    CampaignDetailsBody, MessageRequest, CAMPAIGN_DETAILS_PATH, SEND_CAMPAIGN_PATH,
};
use crate::config::AdapterConfig;
use crate::error::AppError;

/// Longest slice of an error body carried into an error message.
const ERROR_BODY_LIMIT: usize = 500;

// ============================================================================
// CampaignApi
// ============================================================================

/// The two remote calls the adapter makes. `AiSensyClient` is the HTTP
/// implementation; tests substitute their own.
#[async_trait]
pub trait CampaignApi: Send + Sync {
    /// `POST /campaign/t1/api/campaign-details` and return the JSON body as-is.
    async fn campaign_details(
        &self,
        credential: &Credential,
        campaign_name: &str,
    ) -> Result<Value, AppError>;

    /// `POST /campaign/t1/api/v2` and return the JSON body as-is.
    async fn send_campaign(&self, request: &MessageRequest) -> Result<Value, AppError>;
}

// ============================================================================
// AiSensyClient
// ============================================================================

/// HTTP client wrapping the AiSensy campaign endpoints.
pub struct AiSensyClient {
    http: reqwest::Client,
    base_url: String,
}

impl AiSensyClient {
    /// Create a client from configuration. Every request is bounded by
    /// `config.timeout`; expiry surfaces as `AppError::Transport`.
    pub fn new(config: &AdapterConfig) -> Result<Self, AppError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client error: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against a custom base URL with default settings.
    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        Self::new(&AdapterConfig {
            base_url: base_url.to_string(),
            ..AdapterConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --------------------------------------------------------------------
    // Private HTTP helpers
    // --------------------------------------------------------------------

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, AppError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_chars(&body, ERROR_BODY_LIMIT)
            )));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl CampaignApi for AiSensyClient {
    async fn campaign_details(
        &self,
        credential: &Credential,
        campaign_name: &str,
    ) -> Result<Value, AppError> {
        tracing::info!(campaign = %campaign_name, "Fetching AiSensy campaign details");
        let body = CampaignDetailsBody {
            api_key: credential.api_key(),
            campaign_name,
        };
        self.post_json(CAMPAIGN_DETAILS_PATH, &body).await
    }

    async fn send_campaign(&self, request: &MessageRequest) -> Result<Value, AppError> {
        tracing::info!(
            campaign = %request.campaign_name,
            params = request.template_params.len(),
            media = request.media.is_some(),
            "Sending AiSensy campaign message"
        );
        self.post_json(SEND_CAMPAIGN_PATH, request).await
    }
}

/// Truncate to at most `limit` characters without splitting a UTF-8 sequence.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
