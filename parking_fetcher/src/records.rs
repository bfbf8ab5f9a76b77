//! Run-scoped accumulation of unique parking sites and the summary printed at the end.

use shared::datamall::ParkingRecord;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

/// Identity of a physical site: coordinates plus description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    latitude: u64,
    longitude: u64,
    description: String,
}

impl DedupKey {
    pub fn of(record: &ParkingRecord) -> Self {
        Self {
            latitude: coordinate_bits(record.latitude),
            longitude: coordinate_bits(record.longitude),
            description: record.description.clone(),
        }
    }
}

fn coordinate_bits(value: f64) -> u64 {
    // -0.0 == 0.0 but their bit patterns differ
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// First-seen-wins set of records, in insertion order.
#[derive(Debug, Default)]
pub struct UniqueRecordSet {
    index: HashMap<DedupKey, usize>,
    records: Vec<ParkingRecord>,
    divergent: usize,
}

impl UniqueRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the record was new. Later duplicates are dropped even
    /// when their other fields differ; such divergences are counted and logged.
    pub fn insert(&mut self, record: ParkingRecord) -> bool {
        match self.index.entry(DedupKey::of(&record)) {
            Entry::Occupied(entry) => {
                let kept = &self.records[*entry.get()];
                if diverges(kept, &record) {
                    self.divergent += 1;
                    warn!(
                        description = %record.description,
                        latitude = record.latitude,
                        longitude = record.longitude,
                        kept_rack_count = kept.rack_count,
                        dropped_rack_count = record.rack_count,
                        kept_shelter = %kept.shelter_indicator,
                        dropped_shelter = %record.shelter_indicator,
                        "duplicate site with divergent fields, keeping first seen"
                    );
                }
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Duplicates dropped despite differing from the kept record.
    pub fn divergent_duplicates(&self) -> usize {
        self.divergent
    }

    pub fn records(&self) -> &[ParkingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ParkingRecord> {
        self.records
    }
}

fn diverges(kept: &ParkingRecord, other: &ParkingRecord) -> bool {
    kept.rack_type != other.rack_type
        || kept.rack_count != other.rack_count
        || kept.shelter_indicator != other.shelter_indicator
        || kept.notes != other.notes
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub sheltered: usize,
    pub unsheltered: usize,
    pub sheltered_percent: u32,
    pub unsheltered_percent: u32,
    /// Distinct rack types in first-seen order.
    pub rack_types: Vec<String>,
}

impl RunSummary {
    pub fn from_records(records: &[ParkingRecord]) -> Self {
        let total = records.len();
        let sheltered = records.iter().filter(|r| r.is_sheltered()).count();
        let unsheltered = total - sheltered;

        let mut rack_types: Vec<String> = Vec::new();
        for record in records {
            if !rack_types.contains(&record.rack_type) {
                rack_types.push(record.rack_type.clone());
            }
        }

        Self {
            total,
            sheltered,
            unsheltered,
            sheltered_percent: percent(sheltered, total),
            unsheltered_percent: percent(unsheltered, total),
            rack_types,
        }
    }
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
