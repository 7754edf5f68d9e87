use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Administrative location of a listing or its provider
///
/// Unset fields mean "not specified", never "empty region".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl ServiceLocation {
    pub fn new(region: Option<&str>, district: Option<&str>, area: Option<&str>) -> Self {
        Self {
            country: None,
            region: region.map(str::to_string),
            district: district.map(str::to_string),
            area: area.map(str::to_string),
        }
    }
}

/// Read-only projection of a service listing joined with its provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(rename = "provider_service_categories", default)]
    pub provider_categories: Vec<String>,
    /// Numeric strings such as `"35000.00"` are accepted, blank strings are unset
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(rename = "is_active", default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub location: ServiceLocation,
    /// Provider and listing payload passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool { true }

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Number(price)) => Ok(Some(price)),
        Some(RawPrice::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid price: {:?}", text))),
    }
}

/// Traveler-supplied location filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationQuery {
    pub region: Option<String>,
    pub district: Option<String>,
    pub area: Option<String>,
}

impl LocationQuery {
    pub fn new(region: Option<&str>, district: Option<&str>, area: Option<&str>) -> Self {
        Self {
            region: region.map(str::to_string),
            district: district.map(str::to_string),
            area: area.map(str::to_string),
        }
    }

    /// True when any of region/district/area is non-blank
    pub fn is_constrained(&self) -> bool {
        [&self.region, &self.district, &self.area]
            .into_iter()
            .any(|field| crate::core::normalize::is_set(field.as_deref()))
    }

    pub fn without_area(&self) -> Self {
        Self { area: None, ..self.clone() }
    }

    pub fn region_only(&self) -> Self {
        Self { region: self.region.clone(), district: None, area: None }
    }

    /// District or area given without the region that scopes them
    pub fn lacks_region(&self) -> bool {
        use crate::core::normalize::is_set;

        !is_set(self.region.as_deref()) && (is_set(self.district.as_deref()) || is_set(self.area.as_deref()))
    }
}

/// Whether an empty result is returned as-is or widened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Strict,
    Lenient,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(MatchMode::Strict),
            "lenient" => Ok(MatchMode::Lenient),
            other => Err(format!("unknown match mode: {}", other)),
        }
    }
}

/// How a category query is compared against record category fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMatch {
    Exact,
    Substring,
}

impl From<MatchMode> for CategoryMatch {
    fn from(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Strict => CategoryMatch::Exact,
            MatchMode::Lenient => CategoryMatch::Substring,
        }
    }
}

/// Inclusive price bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Which rung of the fallback ladder produced the returned items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackLevel {
    /// Original constraints matched
    #[default]
    None,
    /// Area constraint dropped
    District,
    /// District and area constraints dropped
    Region,
    /// All location constraints dropped
    Category,
    /// Every active record
    Unfiltered,
}

/// A single filtering request against a record set
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub location: LocationQuery,
    pub category: Option<String>,
    pub category_match: CategoryMatch,
    pub provider_id: Option<String>,
    pub price_range: Option<PriceRange>,
    pub search_text: Option<String>,
    pub mode: MatchMode,
    pub page: usize,
    pub limit: usize,
}

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 20;

impl FilterRequest {
    /// Request with the given mode and its default category style
    pub fn with_mode(mode: MatchMode) -> Self {
        Self {
            location: LocationQuery::default(),
            category: None,
            category_match: mode.into(),
            provider_id: None,
            price_range: None,
            search_text: None,
            mode,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self::with_mode(MatchMode::Strict)
    }
}

/// Filtered, paginated subset of a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub items: Vec<ServiceRecord>,
    /// Pre-pagination count of the returned set, even after fallback
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub fell_back_to_unfiltered: bool,
    pub fallback_level: FallbackLevel,
    pub location_filter_applied: bool,
    pub excluded_missing_region: usize,
}
