use serde_json::{Map, Value};

use crate::campaign::credential::Credential;
use crate::campaign::fields::FieldKey;
use crate::campaign::types::{
    scalar_text, Media, MessageRequest, DEFAULT_COUNTRY_CODE, MESSAGE_SOURCE,
};
use crate::error::AppError;
use crate::validation;

/// Raw form values as the host hands them over, keyed by field id.
pub type FieldValues = Map<String, Value>;

pub const MESSAGE_DATA_REQUIRED: &str =
    "Message Data is required. Please configure the resource mapper.";
pub const DESTINATION_REQUIRED: &str = "Destination (Phone Number) is required";

/// Form values after ingestion, keyed by meaning instead of id string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFields {
    pub user_name: Option<String>,
    pub destination: Option<String>,
    pub media_file_name: Option<String>,
    pub media_url: Option<String>,
    /// (index, value) sorted by index; gaps are kept as gaps.
    pub template_params: Vec<(usize, String)>,
}

impl MessageFields {
    pub fn from_values(values: &FieldValues) -> Self {
        let mut fields = Self::default();
        for (id, value) in values {
            let text = scalar_text(value);
            match FieldKey::parse(id) {
                FieldKey::UserName => fields.user_name = text,
                FieldKey::Destination => fields.destination = text,
                FieldKey::MediaFileName => fields.media_file_name = text,
                FieldKey::MediaUrl => fields.media_url = text,
                FieldKey::TemplateParam(index) => {
                    if let Some(text) = text {
                        fields.template_params.push((index, text));
                    }
                }
                FieldKey::CampaignIdentity | FieldKey::Other(_) => {}
            }
        }
        // Stable, so duplicate indices ("[1]" and "[01]") keep insertion order.
        fields.template_params.sort_by_key(|(index, _)| *index);
        fields
    }

    pub fn ordered_template_params(&self) -> Vec<String> {
        self.template_params.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Media is attached when either half is present; the other defaults to "".
    pub fn media(&self) -> Option<Media> {
        let url = self.media_url.as_deref().filter(|s| !s.is_empty());
        let filename = self.media_file_name.as_deref().filter(|s| !s.is_empty());
        if url.is_none() && filename.is_none() {
            return None;
        }
        Some(Media {
            url: url.unwrap_or_default().to_string(),
            filename: filename.unwrap_or_default().to_string(),
        })
    }
}

/// Build the send-campaign body for one record.
pub fn build_send_request(
    campaign_name: &str,
    field_values: Option<&FieldValues>,
    credential: &Credential,
) -> Result<MessageRequest, AppError> {
    validation::require_campaign_name(campaign_name)?;
    let values = field_values.ok_or_else(|| AppError::Validation(MESSAGE_DATA_REQUIRED.into()))?;

    let fields = MessageFields::from_values(values);
    let destination = fields
        .destination
        .clone()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation(DESTINATION_REQUIRED.into()))?;

    Ok(MessageRequest {
        campaign_name: campaign_name.to_string(),
        api_key: credential.api_key().to_string(),
        template_params: fields.ordered_template_params(),
        destination,
        source: MESSAGE_SOURCE.to_string(),
        user_name: fields.user_name.clone(),
        attributes: Map::new(),
        meta_data: Vec::new(),
        default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
        params_fallback_value: Map::new(),
        media: fields.media(),
    })
}
