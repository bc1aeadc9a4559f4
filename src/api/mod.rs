pub mod source;

pub use source::{DataSource, FetchError, Fetcher, parse_feature_collection};
