//! Telemetry record — one flattened visitor event.
//!
//! Every field has an explicit default: text is `""`, counters are `0`,
//! flags are `false`. Measurements where "absent" differs from zero
//! (coordinates, battery level, device hints) are `Option` and serialize as
//! `null`, so a real `0` is never mistaken for "missing".

use serde::{Deserialize, Serialize};

/// Placeholder for identity fields the visitor did not provide.
pub const NOT_PROVIDED: &str = "Not provided";
/// Placeholder for an unset plan category.
pub const NOT_DEFINED: &str = "Not defined";
/// Referrer recorded for direct navigation.
pub const DIRECT_REFERRER: &str = "Direct";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryRecord {
    // Identity
    /// RFC 3339 event time.
    pub timestamp: String,
    /// `dd/mm/yyyy`.
    pub date: String,
    /// `HH:MM:SS`.
    pub time: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(alias = "category")]
    pub selected_plan: String,
    pub selected_plan_name: String,
    pub selected_plan_price: String,
    pub plan_selected_date: String,
    pub action: String,
    pub cookies_accepted: bool,

    // Location
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
    pub address: String,
    pub ip: String,
    pub timezone: String,

    // Browser & device
    pub user_agent: String,
    pub language: String,
    /// `<width>x<height>`.
    pub screen_resolution: String,
    pub referrer: String,
    pub platform: String,
    /// Gigabytes, as reported by the browser.
    pub device_memory: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub max_touch_points: Option<u32>,
    pub pixel_ratio: Option<f64>,

    // Fingerprint (opaque strings produced by the client)
    pub canvas_fingerprint: String,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub audio_fingerprint: String,
    /// JSON-encoded list.
    pub available_fonts: String,
    /// JSON-encoded list.
    pub plugins: String,
    /// Number of registered MIME types.
    pub mime_types: u32,
    pub webdriver: bool,

    // Behavior
    pub clicks_count: u32,
    /// JSON-encoded list of click targets.
    pub clicks_data: String,
    pub scrolls_count: u32,
    /// Percent, 0..=100.
    pub scroll_max_depth: u32,
    pub time_on_page_seconds: u64,
    pub sections_viewed_count: u32,
    /// JSON-encoded list.
    pub sections_viewed: String,
    pub mouse_movements_count: u32,
    pub keystroke_count: u32,
    pub links_clicked_count: u32,
    /// JSON-encoded list.
    pub links_clicked: String,
    pub forms_interacted_count: u32,
    pub hovered_elements_count: u32,
    /// JSON-encoded list.
    pub hovered_elements: String,
    /// Seconds.
    pub page_focus_time: u64,

    // Social
    pub facebook_detected: bool,
    pub twitter_detected: bool,
    pub instagram_detected: bool,
    pub linkedin_detected: bool,

    // Predictions
    pub interest_score: u32,
    pub predicted_intent: String,
    pub engagement_level: String,

    // Battery & media
    /// Fraction, 0.0..=1.0.
    pub battery_level: Option<f64>,
    pub battery_charging: bool,
    pub video_inputs: u32,
    pub audio_inputs: u32,
    pub audio_outputs: u32,

    // Session
    pub session_id: String,
}

impl TelemetryRecord {
    /// Empty record for an action, stamped with the current time.
    pub fn new(action: impl Into<String>) -> Self {
        let now = chrono::Local::now();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            date: now.format("%d/%m/%Y").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            action: action.into(),
            ..Self::default()
        }
    }

    /// Set identity fields, substituting placeholders for blank values.
    pub fn with_identity(mut self, email: &str, name: &str, phone: &str, category: &str) -> Self {
        self.email = or_placeholder(email, NOT_PROVIDED);
        self.name = or_placeholder(name, NOT_PROVIDED);
        self.phone = or_placeholder(phone, NOT_PROVIDED);
        self.selected_plan = or_placeholder(category, NOT_DEFINED);
        self
    }

    /// Replace identity fields with placeholders.
    pub fn strip_identity(&mut self) {
        self.email = NOT_PROVIDED.to_string();
        self.name = NOT_PROVIDED.to_string();
        self.phone = NOT_PROVIDED.to_string();
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Encode a list attribute the way the sink expects it (a JSON string).
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: TelemetryRecord =
            serde_json::from_str(r#"{"action":"Visit","clicksCount":3,"unknownField":1}"#).unwrap();
        assert_eq!(record.action, "Visit");
        assert_eq!(record.clicks_count, 3);
        assert_eq!(record.email, "");
        assert_eq!(record.scrolls_count, 0);
        assert!(!record.webdriver);
        assert_eq!(record.latitude, None);
    }

    #[test]
    fn test_zero_values_survive_serialization() {
        let record = TelemetryRecord {
            latitude: Some(0.0),
            battery_level: Some(0.0),
            max_touch_points: Some(0),
            ..TelemetryRecord::default()
        };
        let json = record.to_json();
        assert_eq!(json["latitude"], serde_json::json!(0.0));
        assert_eq!(json["batteryLevel"], serde_json::json!(0.0));
        assert_eq!(json["maxTouchPoints"], serde_json::json!(0));
        assert!(json["longitude"].is_null());
    }

    #[test]
    fn test_camel_case_keys() {
        let json = TelemetryRecord::default().to_json();
        let obj = json.as_object().unwrap();
        for key in [
            "cookiesAccepted",
            "postalCode",
            "screenResolution",
            "webglVendor",
            "timeOnPageSeconds",
            "linkedinDetected",
            "sessionId",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 66);
    }

    #[test]
    fn test_category_alias() {
        let record: TelemetryRecord = serde_json::from_str(r#"{"category":"Gamers"}"#).unwrap();
        assert_eq!(record.selected_plan, "Gamers");
    }

    #[test]
    fn test_identity_placeholders() {
        let record = TelemetryRecord::new("Cookie Accepted").with_identity("a@b.co", "", " ", "");
        assert_eq!(record.email, "a@b.co");
        assert_eq!(record.name, NOT_PROVIDED);
        assert_eq!(record.phone, NOT_PROVIDED);
        assert_eq!(record.selected_plan, NOT_DEFINED);
        assert!(!record.timestamp.is_empty());
        assert_eq!(record.date.len(), 10);
        assert_eq!(record.time.len(), 8);
    }

    #[test]
    fn test_encode_list() {
        assert_eq!(encode_list(&["hero", "offers"]), r#"["hero","offers"]"#);
        assert_eq!(encode_list::<&str>(&[]), "[]");
    }
}
