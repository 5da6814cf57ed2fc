mod aggregator;
mod fetcher;

pub use aggregator::SchemaAggregator;
pub use fetcher::{DefaultFetcher, FileFetcher, ImportFetcher, StaticFetcher, resolve_location};

#[cfg(feature = "http-fetch")]
pub use fetcher::HttpFetcher;
