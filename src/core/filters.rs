use crate::core::normalize::{normalize, normalized};
use crate::models::{CategoryMatch, LocationQuery, PriceRange, ServiceLocation, ServiceRecord};

/// Outcome of testing a record location against a location query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationVerdict {
    Matched,
    Mismatch,
    /// Record has no region and the query constrains location
    MissingRegion,
}

/// Location query with every level normalized once up front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedLocation {
    pub region: Option<String>,
    pub district: Option<String>,
    pub area: Option<String>,
}

impl PreparedLocation {
    pub fn new(query: &LocationQuery) -> Self {
        Self {
            region: normalized(query.region.as_deref()),
            district: normalized(query.district.as_deref()),
            area: normalized(query.area.as_deref()),
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.region.is_some() || self.district.is_some() || self.area.is_some()
    }
}

/// Hierarchical containment check (region → district → area)
///
/// A region-level record (no district) satisfies any district or area under
/// its region; a district-level record (no area) satisfies any area under its
/// district. Location fields are never compared by substring.
pub fn location_verdict(location: &ServiceLocation, query: &PreparedLocation) -> LocationVerdict {
    if !query.is_constrained() {
        return LocationVerdict::Matched;
    }

    let region = normalize(location.region.as_deref());
    if region.is_empty() {
        return LocationVerdict::MissingRegion;
    }

    let district = normalize(location.district.as_deref());
    let area = normalize(location.area.as_deref());
    let region_level = district.is_empty();
    let district_level = !region_level && area.is_empty();

    if let Some(wanted) = &query.region {
        if &region != wanted {
            return LocationVerdict::Mismatch;
        }
    }

    if let Some(wanted) = &query.district {
        if &district != wanted && !region_level {
            return LocationVerdict::Mismatch;
        }
    }

    if let Some(wanted) = &query.area {
        let area_match = &area == wanted;
        let covering_district = district_level && query.district.as_deref() == Some(district.as_str());
        if !area_match && !covering_district && !region_level {
            return LocationVerdict::Mismatch;
        }
    }

    LocationVerdict::Matched
}

/// Check whether a record location satisfies a traveler location query
#[inline]
pub fn location_matches(location: &ServiceLocation, query: &LocationQuery) -> bool {
    location_verdict(location, &PreparedLocation::new(query)) == LocationVerdict::Matched
}

/// Check a record's category fields against an already-normalized query
///
/// The record's `category`, `business_type` and provider categories are all
/// candidates; any one matching is enough.
pub fn category_matches_normalized(record: &ServiceRecord, query: &str, style: CategoryMatch) -> bool {
    let compare = |field: &str| {
        let field = normalize(Some(field));
        if field.is_empty() {
            return false;
        }
        match style {
            CategoryMatch::Exact => field == query,
            CategoryMatch::Substring => field == query || field.contains(query),
        }
    };

    compare(&record.category)
        || record.business_type.as_deref().is_some_and(|t| compare(t))
        || record.provider_categories.iter().any(|c| compare(c))
}

/// Check whether a record belongs to the requested category
///
/// An unset or blank query places no constraint.
pub fn category_matches(record: &ServiceRecord, query: Option<&str>, style: CategoryMatch) -> bool {
    match normalized(query) {
        Some(q) => category_matches_normalized(record, &q, style),
        None => true,
    }
}

/// Exact provider match; not hierarchical
#[inline]
pub fn matches_provider(record: &ServiceRecord, provider_id: Option<&str>) -> bool {
    match provider_id {
        Some(id) => record.provider_id.as_deref() == Some(id),
        None => true,
    }
}

/// Inclusive price bounds; a record without a price fails any present bound
#[inline]
pub fn matches_price(record: &ServiceRecord, range: Option<&PriceRange>) -> bool {
    let Some(range) = range else {
        return true;
    };
    if range.min.is_none() && range.max.is_none() {
        return true;
    }
    let Some(price) = record.price else {
        return false;
    };
    range.min.map_or(true, |min| price >= min) && range.max.map_or(true, |max| price <= max)
}

/// Case-insensitive substring search over title and description
pub fn matches_search_text(record: &ServiceRecord, needle: Option<&str>) -> bool {
    let Some(needle) = normalized(needle) else {
        return true;
    };
    record.title.to_lowercase().contains(&needle)
        || record
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn create_test_record(category: &str, region: Option<&str>, district: Option<&str>, area: Option<&str>) -> ServiceRecord {
        ServiceRecord {
            id: "svc-1".to_string(),
            provider_id: Some("42".to_string()),
            title: "Lakeview Lodge".to_string(),
            description: Some("Quiet rooms near the crater lake".to_string()),
            category: category.to_string(),
            business_type: None,
            provider_categories: vec![],
            price: Some(120.0),
            active: true,
            location: ServiceLocation::new(region, district, area),
            extra: Map::new(),
        }
    }

    fn query(region: Option<&str>, district: Option<&str>, area: Option<&str>) -> LocationQuery {
        LocationQuery::new(region, district, area)
    }

    #[test]
    fn test_region_level_record_covers_sub_locations() {
        let record = create_test_record("Accommodation", Some("Mbeya"), None, None);

        assert!(location_matches(&record.location, &query(Some("Mbeya"), Some("Mbeya City"), Some("Iyunga"))));
        assert!(location_matches(&record.location, &query(Some("mbeya"), Some("Rungwe"), None)));
        assert!(!location_matches(&record.location, &query(Some("Arusha"), None, None)));
    }

    #[test]
    fn test_district_level_record_covers_areas_in_district() {
        let record = create_test_record("Transportation", Some("Mbeya"), Some("Mbeya City"), None);

        assert!(location_matches(&record.location, &query(Some("Mbeya"), Some("Mbeya City"), Some("Iyunga"))));
        assert!(!location_matches(&record.location, &query(Some("Mbeya"), Some("Rungwe"), Some("Tukuyu"))));
    }

    #[test]
    fn test_area_level_record_requires_exact_area() {
        let record = create_test_record("Food", Some("Mbeya"), Some("Mbeya City"), Some("Ikuti"));

        assert!(location_matches(&record.location, &query(Some("Mbeya"), Some("Mbeya City"), Some("Ikuti"))));
        assert!(!location_matches(&record.location, &query(Some("Mbeya"), Some("Mbeya City"), Some("Iyunga"))));
    }

    #[test]
    fn test_district_mismatch_excluded() {
        let record = create_test_record("Transportation", Some("Mbeya"), Some("Rungwe"), None);

        assert!(!location_matches(&record.location, &query(Some("Mbeya"), Some("Mbeya City"), None)));
    }

    #[test]
    fn test_no_partial_location_text() {
        let record = create_test_record("Tours", Some("Mbeya Rural"), None, None);

        assert!(!location_matches(&record.location, &query(Some("Mbeya"), None, None)));
    }

    #[test]
    fn test_missing_region_never_matches_constrained_query() {
        let record = create_test_record("Tours", None, Some("Mbeya City"), Some("Iyunga"));
        let prepared = PreparedLocation::new(&query(None, Some("Mbeya City"), None));

        assert_eq!(location_verdict(&record.location, &prepared), LocationVerdict::MissingRegion);
        assert!(location_matches(&record.location, &LocationQuery::default()));
    }

    #[test]
    fn test_blank_query_fields_are_unset() {
        let record = create_test_record("Tours", None, None, None);

        assert!(location_matches(&record.location, &query(Some("  "), Some(""), None)));
    }

    #[test]
    fn test_category_exact_vs_substring() {
        let record = create_test_record("Tours & Activities", None, None, None);

        assert!(!category_matches(&record, Some("Tour"), CategoryMatch::Exact));
        assert!(category_matches(&record, Some("Tour"), CategoryMatch::Substring));
        assert!(category_matches(&record, Some(" tours & activities "), CategoryMatch::Exact));
        assert!(category_matches(&record, None, CategoryMatch::Exact));
    }

    #[test]
    fn test_category_considers_business_type() {
        let mut record = create_test_record("", None, None, None);
        record.business_type = Some("Transportation".to_string());
        record.provider_categories = vec!["Car Hire".to_string()];

        assert!(category_matches(&record, Some("transportation"), CategoryMatch::Exact));
        assert!(category_matches(&record, Some("car"), CategoryMatch::Substring));
        assert!(!category_matches(&record, Some("car"), CategoryMatch::Exact));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let record = create_test_record("Accommodation", None, None, None);

        assert!(matches_price(&record, Some(&PriceRange { min: Some(120.0), max: Some(120.0) })));
        assert!(!matches_price(&record, Some(&PriceRange { min: Some(121.0), max: None })));
        assert!(matches_price(&record, None));
    }

    #[test]
    fn test_search_text_case_insensitive() {
        let record = create_test_record("Accommodation", None, None, None);

        assert!(matches_search_text(&record, Some("LAKEVIEW")));
        assert!(matches_search_text(&record, Some("crater")));
        assert!(!matches_search_text(&record, Some("safari")));
    }

    #[test]
    fn test_provider_filter() {
        let record = create_test_record("Accommodation", None, None, None);

        assert!(matches_provider(&record, Some("42")));
        assert!(!matches_provider(&record, Some("7")));
        assert!(matches_provider(&record, None));
    }
}
