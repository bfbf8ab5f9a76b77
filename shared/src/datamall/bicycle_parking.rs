use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SHELTERED: &str = "Y";

/// Envelope of the `BicycleParkingv2` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ParkingPage {
    #[serde(rename = "odata.metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default)]
    pub value: Vec<ParkingRecord>,
}

/// One bicycle parking site, passed through with the upstream field names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ParkingRecord {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rack_type: String,
    pub rack_count: u32,
    pub shelter_indicator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        rename = "isUserSubmitted",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_user_submitted: bool,
    /// Fields this crate does not model, kept so the output stays verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParkingRecord {
    pub fn is_sheltered(&self) -> bool {
        self.shelter_indicator == SHELTERED
    }
}
