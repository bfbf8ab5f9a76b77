use crate::error::FetchError;
use crate::records::{DedupKey, UniqueRecordSet};
use reqwest::Client;
use reqwest::header::ACCEPT;
use shared::DatamallConfig;
use shared::datamall::{ParkingPage, ParkingRecord, QueryPoint};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const ACCOUNT_KEY_HEADER: &str = "AccountKey";

/// One page of a point-radius search, starting `skip` records in.
pub trait ParkingSource {
    fn fetch_page(
        &self,
        point: &QueryPoint,
        skip: u32,
    ) -> impl Future<Output = Result<Vec<ParkingRecord>, FetchError>> + Send;
}

pub struct DatamallClient {
    client: Client,
    base_url: String,
    account_key: String,
}

impl DatamallClient {
    pub fn new(base_url: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            account_key: account_key.into(),
        }
    }

    pub fn page_url(&self, point: &QueryPoint, skip: u32) -> String {
        format!(
            "{}?Lat={}&Long={}&Dist={}&$skip={}",
            self.base_url, point.latitude, point.longitude, point.radius_km, skip
        )
    }
}

impl ParkingSource for DatamallClient {
    async fn fetch_page(
        &self,
        point: &QueryPoint,
        skip: u32,
    ) -> Result<Vec<ParkingRecord>, FetchError> {
        let resp = self
            .client
            .get(self.page_url(point, skip))
            .header(ACCOUNT_KEY_HEADER, &self.account_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Upstream { status });
        }

        let page: ParkingPage = serde_json::from_str(&resp.text().await?)?;
        Ok(page.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    pub page_size: u32,
    pub max_pages: u32,
    pub delay: Duration,
}

impl From<&DatamallConfig> for PaginationOptions {
    fn from(config: &DatamallConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
            delay: Duration::from_millis(config.request_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page was empty.
    EmptyPage,
    /// The last page only repeated records already returned for this point.
    NoNewRecords,
    /// `max_pages` requests were issued; later records for this point, if any, were not fetched.
    PageLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointReport {
    pub point: QueryPoint,
    pub pages: u32,
    pub fetched: usize,
    /// Records not seen at any earlier point or page in the run.
    pub new_records: usize,
    pub stop: StopReason,
}

/// Pages through one query point, merging every record into `records`.
///
/// Stagnation is judged against the keys this point has returned so far, so a
/// point whose first page lies entirely inside an earlier point's circle still
/// walks on to its own later pages.
pub async fn fetch_point<S: ParkingSource>(
    source: &S,
    point: &QueryPoint,
    options: &PaginationOptions,
    records: &mut UniqueRecordSet,
) -> Result<PointReport, FetchError> {
    let mut seen_here: HashSet<DedupKey> = HashSet::new();
    let mut skip = 0;
    let mut report = PointReport {
        point: *point,
        pages: 0,
        fetched: 0,
        new_records: 0,
        stop: StopReason::EmptyPage,
    };

    loop {
        if report.pages >= options.max_pages {
            warn!(
                latitude = point.latitude,
                longitude = point.longitude,
                pages = report.pages,
                "page limit reached, results for this point may be truncated"
            );
            report.stop = StopReason::PageLimit;
            break;
        }

        let page = source.fetch_page(point, skip).await?;
        report.pages += 1;
        if !options.delay.is_zero() {
            sleep(options.delay).await;
        }

        if page.is_empty() {
            report.stop = StopReason::EmptyPage;
            break;
        }

        let fetched = page.len();
        let mut fresh_here = 0;
        let mut new_records = 0;
        for record in page {
            if seen_here.insert(DedupKey::of(&record)) {
                fresh_here += 1;
            }
            if records.insert(record) {
                new_records += 1;
            }
        }
        report.fetched += fetched;
        report.new_records += new_records;

        debug!(
            skip,
            fetched,
            new = new_records,
            unique = records.len(),
            "fetched page"
        );

        if fresh_here == 0 {
            report.stop = StopReason::NoNewRecords;
            break;
        }

        skip += options.page_size;
    }

    Ok(report)
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub records: UniqueRecordSet,
    pub reports: Vec<PointReport>,
}

/// Runs every query point in order against one shared record set.
pub async fn fetch_all<S: ParkingSource>(
    source: &S,
    points: &[QueryPoint],
    options: &PaginationOptions,
) -> Result<FetchOutcome, FetchError> {
    let mut records = UniqueRecordSet::new();
    let mut reports = Vec::with_capacity(points.len());

    for point in points {
        let report = fetch_point(source, point, options, &mut records).await?;
        info!(
            latitude = point.latitude,
            longitude = point.longitude,
            pages = report.pages,
            new = report.new_records,
            total = records.len(),
            "finished query point"
        );
        reports.push(report);
    }

    Ok(FetchOutcome { records, reports })
}
