// Core algorithm exports
pub mod category;
pub mod distance;
pub mod feed;
pub mod filters;
pub mod preferences;
pub mod recommender;
pub mod scoring;
pub mod strength;

pub use category::{normalize_category, selectable_categories};
pub use distance::{enrich, filter_by_distance, haversine_distance};
pub use feed::{build_feed, FeedContext};
pub use filters::category_is_compatible;
pub use preferences::derive_preferences;
pub use recommender::{Recommender, DEFAULT_MAX_RESULTS};
pub use scoring::score;
pub use strength::{strength_level, STRENGTH_LEVELS};
