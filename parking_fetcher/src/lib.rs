pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod query_points;
pub mod records;
pub mod writer;
