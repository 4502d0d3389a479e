pub mod data_persistance;
pub mod droid;
pub mod field_extractor;
pub mod listing_discovery;
pub mod maps_scraper;
pub mod pacer;
pub mod page;
pub mod review_extractor;

#[cfg(test)]
pub(crate) mod fake_page;

pub use data_persistance::*;
pub use droid::*;
pub use field_extractor::*;
pub use listing_discovery::*;
pub use maps_scraper::*;
pub use pacer::*;
pub use page::*;
pub use review_extractor::*;
