use crate::error::PipelineError;
use crate::fetcher::{DatamallClient, PaginationOptions, ParkingSource, StopReason, fetch_all};
use crate::query_points::query_points;
use crate::records::RunSummary;
use crate::writer::{read_records, write_records};
use shared::catalog::{ParkingFilters, merge_user_submitted};
use shared::datamall::{ParkingRecord, QueryPoint};
use shared::{Config, OutputConfig};
use std::path::Path;
use tracing::{info, warn};

/// Fetches, deduplicates and writes the dataset. Nothing is written unless every request succeeds.
pub async fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let account_key = config.datamall.account_key()?;
    let client = DatamallClient::new(&config.datamall.base_url, account_key);
    let points = query_points(config.datamall.query_points.as_deref());
    let options = PaginationOptions::from(&config.datamall);

    run_with_source(&client, &points, &options, &config.output).await
}

pub async fn run_with_source<S: ParkingSource>(
    source: &S,
    points: &[QueryPoint],
    options: &PaginationOptions,
    output: &OutputConfig,
) -> Result<RunSummary, PipelineError> {
    info!(points = points.len(), "fetching bicycle parking data from LTA DataMall");
    let outcome = fetch_all(source, points, options).await?;

    let truncated = outcome
        .reports
        .iter()
        .filter(|r| r.stop == StopReason::PageLimit)
        .count();
    let divergent = outcome.records.divergent_duplicates();
    let records = outcome.records.into_records();
    info!(total = records.len(), "collected unique records");

    let path = Path::new(&output.path);
    write_records(path, &records)?;
    info!(path = %path.display(), "data saved");

    let summary = RunSummary::from_records(&records);
    info!(
        sheltered = summary.sheltered,
        sheltered_percent = summary.sheltered_percent,
        unsheltered = summary.unsheltered,
        unsheltered_percent = summary.unsheltered_percent,
        rack_types = %summary.rack_types.join(", "),
        "stats"
    );
    if truncated > 0 {
        warn!(points = truncated, "some query points stopped at the page limit");
    }
    if divergent > 0 {
        warn!(
            duplicates = divergent,
            "dropped duplicates that disagreed with the first-seen record"
        );
    }

    preview_map_view(records, Path::new(&output.user_submitted_path));

    Ok(summary)
}

/// Logs how many spots the map shows with its default filters once the community
/// submissions are merged in. Informational only, so problems are just logged.
fn preview_map_view(official: Vec<ParkingRecord>, user_submitted_path: &Path) {
    let user_submitted = match read_records(user_submitted_path) {
        Ok(Some(records)) => records,
        Ok(None) => {
            info!(path = %user_submitted_path.display(), "no user-submitted data found");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "skipping user-submitted data");
            Vec::new()
        }
    };

    let submitted = user_submitted.len();
    let merged = merge_user_submitted(official, user_submitted);
    let visible = ParkingFilters::default().apply(&merged).len();
    info!(
        merged = merged.len(),
        user_submitted = submitted,
        visible,
        "default map view"
    );
}
