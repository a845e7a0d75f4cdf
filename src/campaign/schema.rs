use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::campaign::cache::{NoopSchemaCache, SchemaCache};
use crate::campaign::client::{truncate_chars, CampaignApi};
use crate::campaign::credential::Credential;
use crate::campaign::fields::{FieldDescriptor, FieldKey};
use crate::campaign::types::{is_truthy, RequestBodyDescriptor};

pub const MISSING_CAMPAIGN_NOTICE: &str = "Please provide a Campaign Name first";
pub const UNSUCCESSFUL_RESPONSE_NOTICE: &str =
    "Failed to load campaign schema. Please check the campaign name and API credentials.";

/// How much of an unrecognised response is quoted back in the notice.
const RESPONSE_EXCERPT_CHARS: usize = 200;

// ============================================================================
// Response shape probing
// ============================================================================

/// One place the campaign API has been seen to put `requestBody`.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    path: &'static [&'static str],
}

impl ExtractionStrategy {
    /// Walk the path; a missing, null or otherwise falsy value is "not here".
    pub fn extract<'v>(&self, response: &'v Value) -> Option<&'v Value> {
        let found = self
            .path
            .iter()
            .try_fold(response, |node, key| node.get(*key))?;
        is_truthy(Some(found)).then_some(found)
    }
}

/// Tried in order; the first hit wins.
pub const REQUEST_BODY_STRATEGIES: [ExtractionStrategy; 3] = [
    ExtractionStrategy {
        name: "requestBody",
        path: &["requestBody"],
    },
    ExtractionStrategy {
        name: "data.requestBody",
        path: &["data", "requestBody"],
    },
    ExtractionStrategy {
        name: "campaign.requestBody",
        path: &["campaign", "requestBody"],
    },
];

pub fn extract_request_body(response: &Value) -> Option<(&'static str, &Value)> {
    REQUEST_BODY_STRATEGIES
        .iter()
        .find_map(|s| s.extract(response).map(|body| (s.name, body)))
}

// ============================================================================
// Field set construction
// ============================================================================

/// Fixed order: identity, userName, destination, media pair, template params.
pub fn build_fields(campaign_name: &str, descriptor: &RequestBodyDescriptor) -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::campaign_identity(campaign_name),
        FieldDescriptor::required(FieldKey::UserName),
        FieldDescriptor::required(FieldKey::Destination),
    ];

    if descriptor.media {
        fields.push(FieldDescriptor::required(FieldKey::MediaFileName));
        fields.push(FieldDescriptor::required(FieldKey::MediaUrl));
    }

    fields.extend(
        (0..descriptor.template_param_count)
            .map(|i| FieldDescriptor::required(FieldKey::TemplateParam(i))),
    );

    if fields.is_empty() {
        tracing::warn!("No fields derived, adding destination anyway");
        fields.push(FieldDescriptor::required(FieldKey::Destination));
    }

    fields
}

/// The campaign a previous field set was built for, when it differs from
/// `campaign_name`.
pub fn detect_drift(previous: Option<&[FieldDescriptor]>, campaign_name: &str) -> Option<String> {
    let previous_name = previous?
        .iter()
        .find(|f| f.key() == FieldKey::CampaignIdentity)?
        .default_value
        .as_deref()
        .filter(|v| !v.is_empty())?;

    (previous_name != campaign_name).then(|| previous_name.to_string())
}

fn drift_notice(previous: &str, current: &str) -> String {
    format!(
        "Warning: The Campaign Name has changed from \"{previous}\" to \"{current}\". \
         The fields below have been refreshed for the new campaign. \
         Please review and update your field mappings if needed."
    )
}

// ============================================================================
// SchemaDeriver
// ============================================================================

/// Output of a derivation: the fields to render plus an optional user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResult {
    pub fields: Vec<FieldDescriptor>,
    #[serde(rename = "emptyFieldsNotice", skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SchemaResult {
    fn notice_only(notice: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            notice: Some(notice.into()),
        }
    }
}

/// Turns a campaign's remote parameter schema into form fields.
///
/// Derivation never fails: it feeds a live form, so every failure is reported
/// as an empty field list with a notice.
pub struct SchemaDeriver {
    api: Arc<dyn CampaignApi>,
    cache: Arc<dyn SchemaCache>,
}

impl SchemaDeriver {
    pub fn new(api: Arc<dyn CampaignApi>) -> Self {
        Self {
            api,
            cache: Arc::new(NoopSchemaCache),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn SchemaCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Last raw campaign-details response seen for `campaign_name`, if cached.
    pub fn cached_response(&self, campaign_name: &str) -> Option<Value> {
        self.cache.get(campaign_name)
    }

    #[tracing::instrument(skip(self, credential, previous), fields(previous_fields = previous.map_or(0, |p| p.len())))]
    pub async fn derive(
        &self,
        campaign_name: &str,
        credential: &Credential,
        previous: Option<&[FieldDescriptor]>,
    ) -> SchemaResult {
        if campaign_name.trim().is_empty() {
            tracing::debug!("No campaign name provided");
            return SchemaResult::notice_only(MISSING_CAMPAIGN_NOTICE);
        }

        let response = match self.api.campaign_details(credential, campaign_name).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Loading campaign schema failed");
                return SchemaResult::notice_only(format!("Error loading schema: {e}"));
            }
        };

        self.cache.put(campaign_name, response.clone());

        if !is_truthy(response.get("success")) {
            tracing::warn!("Campaign details response not successful");
            return SchemaResult::notice_only(UNSUCCESSFUL_RESPONSE_NOTICE);
        }

        let Some((location, request_body)) = extract_request_body(&response) else {
            tracing::warn!("Campaign details response has no requestBody");
            let raw = response.to_string();
            return SchemaResult::notice_only(format!(
                "Failed to load campaign schema. The API response does not contain requestBody. Response: {}",
                truncate_chars(&raw, RESPONSE_EXCERPT_CHARS)
            ));
        };

        let descriptor = RequestBodyDescriptor::from_value(request_body);
        let fields = build_fields(campaign_name, &descriptor);
        tracing::debug!(
            location,
            template_params = descriptor.template_param_count,
            media = descriptor.media,
            field_ids = %fields.iter().map(|f| f.id.as_str()).collect::<Vec<_>>().join(", "),
            "Derived campaign fields"
        );

        let notice = detect_drift(previous, campaign_name).map(|prev| {
            tracing::warn!(previous = %prev, current = %campaign_name, "Campaign name changed since fields were loaded");
            drift_notice(&prev, campaign_name)
        });

        SchemaResult { fields, notice }
    }
}
