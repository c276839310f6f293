pub mod marketplace;

pub use marketplace::{ApiError, HttpMarketplace, MarketplaceApi, ProfileKind, SaveMode};
