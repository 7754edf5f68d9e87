// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CategoryMatch, FallbackLevel, FilterRequest, FilterResult, LocationQuery, MatchMode, PriceRange,
    ServiceLocation, ServiceRecord, DEFAULT_LIMIT, DEFAULT_PAGE,
};
pub use requests::{ByLocationQuery, ProviderSearchQuery, SearchServicesQuery};
pub use responses::{ErrorResponse, HealthResponse, SearchServicesResponse};
