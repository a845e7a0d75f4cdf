use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

// ============================================================================
// Wire constants
// ============================================================================

pub const CAMPAIGN_DETAILS_PATH: &str = "/campaign/t1/api/campaign-details";
pub const SEND_CAMPAIGN_PATH: &str = "/campaign/t1/api/v2";

/// Campaign name used by the credential probe.
pub const PROBE_CAMPAIGN_NAME: &str = "test";

pub const MESSAGE_SOURCE: &str = "adapter";
pub const DEFAULT_COUNTRY_CODE: &str = "IN";

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CampaignDetailsBody<'a> {
    pub api_key: &'a str,
    pub campaign_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    pub filename: String,
}

/// Outbound send-campaign payload. Field order and names match the
/// `/campaign/t1/api/v2` contract exactly.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub campaign_name: String,
    pub api_key: String,
    pub template_params: Vec<String>,
    pub destination: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub attributes: Map<String, Value>,
    #[serde(rename = "meta_data")]
    pub meta_data: Vec<Value>,
    pub default_country_code: String,
    pub params_fallback_value: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl std::fmt::Debug for MessageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRequest")
            .field("campaign_name", &self.campaign_name)
            .field("api_key", &"***")
            .field("template_params", &self.template_params)
            .field("destination", &self.destination)
            .field("source", &self.source)
            .field("user_name", &self.user_name)
            .field("default_country_code", &self.default_country_code)
            .field("media", &self.media)
            .finish()
    }
}

// ============================================================================
// Campaign details response
// ============================================================================

/// The parameter descriptor found in a campaign-details response, reduced to
/// what the form needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestBodyDescriptor {
    pub template_param_count: usize,
    pub media: bool,
}

impl RequestBodyDescriptor {
    /// `templateParams` that is missing or not an array counts as zero params.
    pub fn from_value(request_body: &Value) -> Self {
        let template_param_count = request_body
            .get("templateParams")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0);
        let media = is_truthy(request_body.get("media"));
        Self {
            template_param_count,
            media,
        }
    }
}

/// JavaScript-style truthiness. The campaign API mixes booleans, objects and
/// strings for flags like `success` and `media`.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Largest float magnitude below which every integer is exactly representable (2^53).
const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Number text as JavaScript's `String(n)` prints it: integral floats drop `.0`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Text form of a scalar form value. Null means "not supplied".
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_floats_print_like_integers() {
        assert_eq!(scalar_text(&json!(10.0)).as_deref(), Some("10"));
        assert_eq!(scalar_text(&json!(919876543210.0)).as_deref(), Some("919876543210"));
        assert_eq!(scalar_text(&json!(-3.0)).as_deref(), Some("-3"));
        assert_eq!(scalar_text(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(scalar_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&Value::Null), None);
    }

    #[test]
    fn test_large_floats_keep_exponent_form() {
        assert_eq!(scalar_text(&json!(1e21)), Some(json!(1e21).to_string()));
    }

    #[test]
    fn test_descriptor_counts_params_and_media() {
        let d = RequestBodyDescriptor::from_value(&json!({
            "templateParams": ["$FirstName", "$Code"],
            "media": {"url": "https://x", "filename": "a.pdf"}
        }));
        assert_eq!(d.template_param_count, 2);
        assert!(d.media);
    }

    #[test]
    fn test_descriptor_tolerates_missing_or_odd_fields() {
        let d = RequestBodyDescriptor::from_value(&json!({"templateParams": "nope"}));
        assert_eq!(d, RequestBodyDescriptor::default());

        let d = RequestBodyDescriptor::from_value(&json!(true));
        assert_eq!(d, RequestBodyDescriptor::default());

        let d = RequestBodyDescriptor::from_value(&json!({"media": false}));
        assert!(!d.media);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!(1))));
    }

    #[test]
    fn test_message_request_wire_shape() {
        let req = MessageRequest {
            campaign_name: "Promo1".into(),
            api_key: "key".into(),
            template_params: vec!["X".into()],
            destination: "+911234".into(),
            source: MESSAGE_SOURCE.into(),
            user_name: None,
            attributes: Map::new(),
            meta_data: Vec::new(),
            default_country_code: DEFAULT_COUNTRY_CODE.into(),
            params_fallback_value: Map::new(),
            media: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["campaignName"], "Promo1");
        assert_eq!(v["meta_data"], json!([]));
        assert_eq!(v["paramsFallbackValue"], json!({}));
        assert_eq!(v["defaultCountryCode"], "IN");
        assert!(v.get("userName").is_none());
        assert!(v.get("media").is_none());
        assert!(!format!("{req:?}").contains("\"key\""));
    }
}
