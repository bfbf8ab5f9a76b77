#![allow(dead_code)]

use parking_fetcher::error::FetchError;
use parking_fetcher::fetcher::{PaginationOptions, ParkingSource};
use reqwest::StatusCode;
use serde_json::Map;
use shared::datamall::{ParkingRecord, QueryPoint};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const PAGE_SIZE: u32 = 500;

pub fn options(max_pages: u32) -> PaginationOptions {
    PaginationOptions {
        page_size: PAGE_SIZE,
        max_pages,
        delay: Duration::ZERO,
    }
}

pub fn site(description: &str, latitude: f64, longitude: f64) -> ParkingRecord {
    ParkingRecord {
        description: description.to_string(),
        latitude,
        longitude,
        rack_type: "HDB_RACKS".to_string(),
        rack_count: 10,
        shelter_indicator: "Y".to_string(),
        notes: None,
        is_user_submitted: false,
        extra: Map::new(),
    }
}

/// `count` distinct sites named `{prefix} {n}`.
pub fn sites(prefix: &str, count: usize) -> Vec<ParkingRecord> {
    (0..count)
        .map(|n| site(&format!("{prefix} {n}"), 1.3 + n as f64 * 1e-4, 103.8))
        .collect()
}

/// Serves scripted pages per query point; anything past the script is an empty page.
#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<(u64, u64), Vec<Vec<ParkingRecord>>>,
    failure: Option<StatusCode>,
    requests: Mutex<Vec<(QueryPoint, u32)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, point: QueryPoint, pages: Vec<Vec<ParkingRecord>>) -> Self {
        self.pages.insert(key(&point), pages);
        self
    }

    pub fn failing_with(mut self, status: StatusCode) -> Self {
        self.failure = Some(status);
        self
    }

    pub fn requests(&self) -> Vec<(QueryPoint, u32)> {
        self.requests.lock().expect("lock").clone()
    }
}

fn key(point: &QueryPoint) -> (u64, u64) {
    (point.latitude.to_bits(), point.longitude.to_bits())
}

impl ParkingSource for ScriptedSource {
    async fn fetch_page(
        &self,
        point: &QueryPoint,
        skip: u32,
    ) -> Result<Vec<ParkingRecord>, FetchError> {
        self.requests.lock().expect("lock").push((*point, skip));
        if let Some(status) = self.failure {
            return Err(FetchError::Upstream { status });
        }

        let index = (skip / PAGE_SIZE) as usize;
        Ok(self
            .pages
            .get(&key(point))
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default())
    }
}
