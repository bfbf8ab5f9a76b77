//! The view of the dataset the map renders: official records merged with
//! community submissions, narrowed by the active filters.

use crate::datamall::ParkingRecord;
use serde::{Deserialize, Serialize};

pub const YELLOW_BOX: &str = "Yellow Box";

const RACK_TYPE_LABELS: &[(&str, &str)] = &[
    ("HDB_RACKS", "HDB"),
    ("MRT_RACKS", "MRT"),
    ("LTA_RACKS", "LTA"),
    ("NPARKS_RACKS", "Parks"),
    ("NLB_RACKS", "Library"),
    ("PA_RACKS", "Community Club"),
    ("SPORTSG_RACKS", "Sports"),
    ("JTC_RACKS", "JTC"),
    ("ITE_RACKS", "ITE"),
    ("NANYANG POLY_RACKS", "NYP"),
    ("JBTC_RACKS", "JBTC"),
    (YELLOW_BOX, "Yellow Box"),
    ("SHOPPING_MALL", "Shopping Mall"),
    ("OTHER", "Other"),
];

/// Display label for an upstream rack type code. Unknown codes are returned as-is.
pub fn rack_type_label(rack_type: &str) -> &str {
    RACK_TYPE_LABELS
        .iter()
        .find(|(code, _)| *code == rack_type)
        .map_or(rack_type, |&(_, label)| label)
}

/// Appends the community-curated records to the official ones, tagging each as user submitted.
pub fn merge_user_submitted(
    official: Vec<ParkingRecord>,
    user_submitted: Vec<ParkingRecord>,
) -> Vec<ParkingRecord> {
    let mut merged = official;
    merged.reserve(user_submitted.len());
    merged.extend(user_submitted.into_iter().map(|mut record| {
        record.is_user_submitted = true;
        record
    }));
    merged
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkingFilters {
    pub shelter_only: bool,
    /// Empty means every rack type is allowed.
    pub rack_types: Vec<String>,
    /// Zero disables the capacity filter.
    pub min_capacity: u32,
    pub show_yellow_box: bool,
}

impl ParkingFilters {
    pub fn matches(&self, record: &ParkingRecord) -> bool {
        if self.shelter_only && !record.is_sheltered() {
            return false;
        }

        if !self.rack_types.is_empty() && !self.rack_types.contains(&record.rack_type) {
            return false;
        }

        if self.min_capacity > 0 && record.rack_count < self.min_capacity {
            return false;
        }

        self.show_yellow_box || record.rack_type != YELLOW_BOX
    }

    pub fn apply<'a>(&self, records: &'a [ParkingRecord]) -> Vec<&'a ParkingRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Number of user-facing filters narrowing the view. The Yellow Box toggle is not counted.
    pub fn active_count(&self) -> usize {
        usize::from(self.shelter_only)
            + usize::from(!self.rack_types.is_empty())
            + usize::from(self.min_capacity > 0)
    }
}
