// Core engine exports
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod paginate;

pub use filters::{category_matches, location_matches, matches_price, matches_provider, matches_search_text};
pub use matcher::{FilterError, Matcher};
pub use normalize::normalize;
pub use paginate::paginate;
