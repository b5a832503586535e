pub mod types;

pub use types::{EarthquakeFeed, EarthquakeRecord, FeedSource};
