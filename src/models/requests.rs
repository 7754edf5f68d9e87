use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::core::{normalize::normalized, Matcher};
use crate::models::domain::{CategoryMatch, FilterRequest, LocationQuery, MatchMode, PriceRange};

/// Query-string values that cannot be turned into a filter request
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid mode '{0}', expected strict or lenient")]
    InvalidMode(String),

    #[error("invalid categoryMatch '{0}', expected exact or substring")]
    InvalidCategoryMatch(String),
}

/// Query for the general service listing endpoint
///
/// GET /api/v1/services?region=&district=&area=&category=&minPrice=&maxPrice=&search=&page=&limit=&mode=
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchServicesQuery {
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    #[validate(length(max = 100))]
    #[serde(alias = "location", alias = "ward")]
    pub area: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    #[serde(alias = "providerId")]
    pub provider_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub mode: Option<String>,
    #[serde(rename = "categoryMatch")]
    pub category_match: Option<String>,
}

impl SearchServicesQuery {
    /// Build an engine request, filling gaps from the endpoint's defaults
    pub fn to_filter_request(
        &self,
        matcher: &Matcher,
        default_mode: MatchMode,
    ) -> Result<FilterRequest, QueryError> {
        let mode = match normalized(self.mode.as_deref()) {
            Some(m) => m.parse::<MatchMode>().map_err(|_| QueryError::InvalidMode(m))?,
            None => default_mode,
        };
        let category_match = match normalized(self.category_match.as_deref()) {
            Some(s) => parse_category_match(&s)?,
            None => mode.into(),
        };
        let (page, limit) = matcher.coerce_paging(self.page, self.limit);

        let price_range = if self.min_price.is_some() || self.max_price.is_some() {
            Some(PriceRange { min: self.min_price, max: self.max_price })
        } else {
            None
        };

        Ok(FilterRequest {
            location: location_query(&self.region, &self.district, &self.area),
            category: category_filter(self.category.as_deref()),
            category_match,
            provider_id: self.provider_id.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            price_range,
            search_text: self.search.clone().filter(|s| !s.trim().is_empty()),
            mode,
            page,
            limit,
        })
    }
}

/// Query for services at an exact location; never falls back
///
/// GET /api/v1/services/by-location?region=&district=&ward=&category=&limit=
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ByLocationQuery {
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    #[validate(length(max = 100))]
    #[serde(alias = "area", alias = "location")]
    pub ward: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ByLocationQuery {
    pub fn to_filter_request(&self, matcher: &Matcher, default_limit: usize) -> FilterRequest {
        let limit = match self.limit {
            Some(l) if l >= 1 => (l as usize).min(matcher.max_limit()),
            _ => default_limit.max(1),
        };

        FilterRequest {
            location: location_query(&self.region, &self.district, &self.ward),
            category: category_filter(self.category.as_deref()),
            category_match: CategoryMatch::Substring,
            limit,
            ..FilterRequest::with_mode(MatchMode::Strict)
        }
    }
}

/// Query for the provider search; falls back rather than returning nothing
///
/// GET /api/v1/providers/search?region=&district=&ward=&categories=&page=&limit=
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProviderSearchQuery {
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    #[validate(length(max = 100))]
    #[serde(alias = "area", alias = "location")]
    pub ward: Option<String>,
    #[validate(length(max = 100))]
    #[serde(alias = "categories")]
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ProviderSearchQuery {
    pub fn to_filter_request(&self, matcher: &Matcher) -> FilterRequest {
        let (page, limit) = matcher.coerce_paging(self.page, self.limit);

        FilterRequest {
            location: location_query(&self.region, &self.district, &self.ward),
            category: category_filter(self.category.as_deref()),
            page,
            limit,
            ..FilterRequest::with_mode(MatchMode::Lenient)
        }
    }
}

fn parse_category_match(value: &str) -> Result<CategoryMatch, QueryError> {
    match value {
        "exact" => Ok(CategoryMatch::Exact),
        "substring" => Ok(CategoryMatch::Substring),
        other => Err(QueryError::InvalidCategoryMatch(other.to_string())),
    }
}

fn location_query(region: &Option<String>, district: &Option<String>, area: &Option<String>) -> LocationQuery {
    LocationQuery::new(region.as_deref(), district.as_deref(), area.as_deref())
}

/// "all" and blank mean no category constraint
fn category_filter(category: Option<&str>) -> Option<String> {
    let raw = category?;
    match normalized(Some(raw)) {
        Some(c) if c != "all" => Some(raw.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_endpoint() {
        let matcher = Matcher::new(20, 100);
        let query = SearchServicesQuery {
            region: Some("Mbeya".to_string()),
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        };

        let req = query.to_filter_request(&matcher, MatchMode::Strict).unwrap();

        assert_eq!(req.mode, MatchMode::Strict);
        assert_eq!(req.category_match, CategoryMatch::Exact);
        assert_eq!((req.page, req.limit), (1, 20));
        assert_eq!(req.location.region.as_deref(), Some("Mbeya"));
        assert!(req.price_range.is_none());
    }

    #[test]
    fn test_mode_and_style_overrides() {
        let matcher = Matcher::default();
        let query = SearchServicesQuery {
            mode: Some(" LENIENT ".to_string()),
            category_match: Some("exact".to_string()),
            ..Default::default()
        };

        let req = query.to_filter_request(&matcher, MatchMode::Strict).unwrap();

        assert_eq!(req.mode, MatchMode::Lenient);
        assert_eq!(req.category_match, CategoryMatch::Exact);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let query = SearchServicesQuery {
            mode: Some("fuzzy".to_string()),
            ..Default::default()
        };

        assert_eq!(
            query.to_filter_request(&Matcher::default(), MatchMode::Strict),
            Err(QueryError::InvalidMode("fuzzy".to_string()))
        );
    }

    #[test]
    fn test_category_all_is_unset() {
        assert_eq!(category_filter(Some("All")), None);
        assert_eq!(category_filter(Some("  ")), None);
        assert_eq!(category_filter(Some(" Food ")), Some("Food".to_string()));
    }

    #[test]
    fn test_by_location_is_strict_substring() {
        let query = ByLocationQuery {
            ward: Some("Iyunga".to_string()),
            ..Default::default()
        };

        let req = query.to_filter_request(&Matcher::default(), 50);

        assert_eq!(req.mode, MatchMode::Strict);
        assert_eq!(req.category_match, CategoryMatch::Substring);
        assert_eq!(req.limit, 50);
        assert_eq!(req.location.area.as_deref(), Some("Iyunga"));
    }

    #[test]
    fn test_price_validation() {
        let query = SearchServicesQuery {
            min_price: Some(-1.0),
            ..Default::default()
        };

        assert!(query.validate().is_err());
    }
}
