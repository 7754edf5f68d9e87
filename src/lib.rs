//! Safari Match - location and category matching engine for travel marketplace listings
//!
//! Given a traveler's requested region/district/area and service category, the
//! engine decides which service listings qualify. Region-level providers appear
//! for every district and area within their region, district-level providers for
//! every area within their district. Strict mode returns empty results honestly;
//! lenient mode walks a fallback ladder instead.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, FilterError, category_matches, location_matches, normalize, paginate};
pub use crate::models::{FilterRequest, FilterResult, LocationQuery, MatchMode, CategoryMatch, ServiceRecord, ServiceLocation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let location = ServiceLocation::new(Some("Mbeya"), None, None);
        let query = LocationQuery::new(Some(" MBEYA "), Some("Mbeya City"), None);
        assert!(location_matches(&location, &query));
    }
}
