use serde::{Deserialize, Deserializer, Serialize};

/// DeviceRecord: one medical device in the hospital inventory.
/// PK = SequenceNumber.
///
/// Field names on the wire and on disk are PascalCase (`ITM` is all caps).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceRecord {
    /// Identity. Assigned on insert when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,

    /// Required, non-empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub device_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Required, non-empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub manufacturer: String,

    /// Required, non-empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_location: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub supplier: String,

    /// Legacy documents store this as a number.
    #[serde(default, rename = "ITM", deserialize_with = "text_or_number")]
    pub itm: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_period: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commissioning_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_form_number: Option<String>,

    /// Reference paths of attached images, in attach order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl DeviceRecord {
    /// Identity, treating 0 as "not assigned".
    pub fn identity(&self) -> Option<u64> {
        self.sequence_number.filter(|&n| n > 0)
    }

    /// Names of required fields that are empty or whitespace-only.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.device_name.trim().is_empty() {
            missing.push("DeviceName");
        }
        if self.manufacturer.trim().is_empty() {
            missing.push("Manufacturer");
        }
        if self.model.trim().is_empty() {
            missing.push("Model");
        }
        missing
    }
}

/// Fields whose observed values feed filter and dropdown options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    DeviceCategory,
    DeviceLocation,
    Manufacturer,
}

impl DistinctField {
    pub fn value_of<'a>(&self, record: &'a DeviceRecord) -> Option<&'a str> {
        match self {
            DistinctField::DeviceCategory => record.device_category.as_deref(),
            DistinctField::DeviceLocation => record.device_location.as_deref(),
            DistinctField::Manufacturer => Some(record.manufacturer.as_str()),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Int(n)) => n.to_string(),
        Some(TextOrNumber::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
