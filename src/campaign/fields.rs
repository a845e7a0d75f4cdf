use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::campaign::types::scalar_text;

pub const CAMPAIGN_IDENTITY_ID: &str = "__campaignName__";
pub const USER_NAME_ID: &str = "userName";
pub const DESTINATION_ID: &str = "destination";
pub const MEDIA_FILE_NAME_ID: &str = "templateMediaFileName";
pub const MEDIA_URL_ID: &str = "templateMediaURL";
const TEMPLATE_PARAM_PREFIX: &str = "templateParams[";

/// Typed form of a host field id. The `templateParams[i]` string convention only
/// exists at the host boundary; everything inside the crate works on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    CampaignIdentity,
    UserName,
    Destination,
    MediaFileName,
    MediaUrl,
    TemplateParam(usize),
    Other(String),
}

impl FieldKey {
    pub fn parse(id: &str) -> Self {
        match id {
            CAMPAIGN_IDENTITY_ID => FieldKey::CampaignIdentity,
            USER_NAME_ID => FieldKey::UserName,
            DESTINATION_ID => FieldKey::Destination,
            MEDIA_FILE_NAME_ID => FieldKey::MediaFileName,
            MEDIA_URL_ID => FieldKey::MediaUrl,
            _ => parse_template_param(id)
                .map(FieldKey::TemplateParam)
                .unwrap_or_else(|| FieldKey::Other(id.to_string())),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            FieldKey::CampaignIdentity => "Campaign Name (Internal)".into(),
            FieldKey::UserName => "User Name".into(),
            FieldKey::Destination => "Destination (Phone Number)".into(),
            FieldKey::MediaFileName => "File Name".into(),
            FieldKey::MediaUrl => "MediaURL".into(),
            FieldKey::TemplateParam(i) => format!("Template Param {}", i + 1),
            FieldKey::Other(id) => id.clone(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::CampaignIdentity => f.write_str(CAMPAIGN_IDENTITY_ID),
            FieldKey::UserName => f.write_str(USER_NAME_ID),
            FieldKey::Destination => f.write_str(DESTINATION_ID),
            FieldKey::MediaFileName => f.write_str(MEDIA_FILE_NAME_ID),
            FieldKey::MediaUrl => f.write_str(MEDIA_URL_ID),
            FieldKey::TemplateParam(i) => write!(f, "{TEMPLATE_PARAM_PREFIX}{i}]"),
            FieldKey::Other(id) => f.write_str(id),
        }
    }
}

/// `templateParams[<digits>]` -> index. Anything else (signs, spaces, empty
/// brackets, overflow) is not a template parameter.
fn parse_template_param(id: &str) -> Option<usize> {
    let digits = id.strip_prefix(TEMPLATE_PARAM_PREFIX)?.strip_suffix(']')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    /// Any other host type; only carried through from stored field sets.
    #[serde(other)]
    Other,
}

/// One entry of the dynamic form, in the host's resource-mapper shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "display", default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub default_match: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_scalar_string"
    )]
    pub default_value: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl FieldDescriptor {
    /// A visible, required string field.
    pub fn required(key: FieldKey) -> Self {
        Self {
            id: key.to_string(),
            display_name: key.display_name(),
            field_type: FieldType::String,
            required: true,
            visible: true,
            default_match: false,
            default_value: None,
        }
    }

    /// The hidden field that remembers which campaign produced the field set.
    pub fn campaign_identity(campaign_name: &str) -> Self {
        Self {
            required: false,
            visible: false,
            default_value: Some(campaign_name.to_string()),
            ..Self::required(FieldKey::CampaignIdentity)
        }
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::parse(&self.id)
    }
}

/// Hosts may store default values as numbers or booleans; keep their text.
fn de_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        assert_eq!(FieldKey::parse("__campaignName__"), FieldKey::CampaignIdentity);
        assert_eq!(FieldKey::parse("userName"), FieldKey::UserName);
        assert_eq!(FieldKey::parse("destination"), FieldKey::Destination);
        assert_eq!(FieldKey::parse("templateMediaURL"), FieldKey::MediaUrl);
        assert_eq!(FieldKey::parse("templateMediaFileName"), FieldKey::MediaFileName);
        assert_eq!(FieldKey::parse("templateParams[12]"), FieldKey::TemplateParam(12));
    }

    #[test]
    fn test_parse_rejects_malformed_template_params() {
        for id in ["templateParams[]", "templateParams[-1]", "templateParams[a]", "templateParams[1", "templateParams[ 1]"] {
            assert_eq!(FieldKey::parse(id), FieldKey::Other(id.to_string()), "{id}");
        }
    }

    #[test]
    fn test_display_round_trips_id() {
        assert_eq!(FieldKey::TemplateParam(3).to_string(), "templateParams[3]");
        assert_eq!(FieldKey::TemplateParam(3).display_name(), "Template Param 4");
    }

    #[test]
    fn test_identity_field_is_hidden_and_optional() {
        let f = FieldDescriptor::campaign_identity("Promo1");
        assert_eq!(f.id, "__campaignName__");
        assert!(!f.visible);
        assert!(!f.required);
        assert_eq!(f.default_value.as_deref(), Some("Promo1"));
    }

    #[test]
    fn test_deserializes_host_schema_entry() {
        let f: FieldDescriptor = serde_json::from_value(serde_json::json!({
            "id": "__campaignName__",
            "displayName": "Campaign Name (Internal)",
            "type": "string",
            "required": false,
            "display": false,
            "defaultMatch": false,
            "defaultValue": 42
        }))
        .unwrap();
        assert_eq!(f.key(), FieldKey::CampaignIdentity);
        assert_eq!(f.default_value.as_deref(), Some("42"));
    }

    #[test]
    fn test_unknown_host_type_still_deserializes() {
        let f: FieldDescriptor = serde_json::from_value(serde_json::json!({
            "id": "templateParams[0]",
            "type": "number",
            "defaultValue": 7.0
        }))
        .unwrap();
        assert_eq!(f.field_type, FieldType::Other);
        assert_eq!(f.key(), FieldKey::TemplateParam(0));
        assert_eq!(f.default_value.as_deref(), Some("7"));
    }
}
