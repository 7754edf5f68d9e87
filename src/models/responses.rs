use serde::{Deserialize, Serialize};
use crate::models::domain::{FallbackLevel, FilterRequest, FilterResult, ServiceRecord};

/// Response for the service listing endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchServicesResponse {
    pub success: bool,
    pub services: Vec<ServiceRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub location_filter_applied: bool,
    pub fell_back_to_unfiltered: bool,
    pub fallback_level: FallbackLevel,
    pub excluded_missing_region: usize,
    pub message: String,
    pub filters: AppliedFilters,
}

/// Echo of the constraints the engine was asked to apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub region: Option<String>,
    pub district: Option<String>,
    pub area: Option<String>,
    pub category: Option<String>,
    pub mode: crate::models::MatchMode,
}

impl SearchServicesResponse {
    pub fn new(result: FilterResult, request: &FilterRequest) -> Self {
        let message = describe(&result, request);
        Self {
            success: true,
            services: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
            location_filter_applied: result.location_filter_applied,
            fell_back_to_unfiltered: result.fell_back_to_unfiltered,
            fallback_level: result.fallback_level,
            excluded_missing_region: result.excluded_missing_region,
            message,
            filters: AppliedFilters {
                region: request.location.region.clone(),
                district: request.location.district.clone(),
                area: request.location.area.clone(),
                category: request.category.clone(),
                mode: request.mode,
            },
        }
    }
}

/// Human-readable summary of which rung produced the results
fn describe(result: &FilterResult, request: &FilterRequest) -> String {
    let loc = &request.location;
    let named = |v: &Option<String>| v.clone().unwrap_or_else(|| "the requested location".to_string());

    match result.fallback_level {
        FallbackLevel::None if result.total == 0 => {
            let place = loc.area.as_ref().or(loc.district.as_ref()).or(loc.region.as_ref());
            match place {
                Some(p) => format!("No services available in {}", p),
                None => "No services available".to_string(),
            }
        }
        FallbackLevel::None => "Services found".to_string(),
        FallbackLevel::District => format!(
            "No services in {}. Showing services from {} district",
            named(&loc.area),
            named(&loc.district)
        ),
        FallbackLevel::Region => format!(
            "No services in {}. Showing services from {} region",
            named(&loc.district),
            named(&loc.region)
        ),
        FallbackLevel::Category => "No services at this location. Showing matching services from all locations".to_string(),
        FallbackLevel::Unfiltered => "Showing all available services.".to_string(),
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub catalog_size: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
