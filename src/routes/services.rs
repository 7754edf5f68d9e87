use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::SearchSettings;
use crate::core::Matcher;
use crate::models::{
    ByLocationQuery, ErrorResponse, FilterRequest, HealthResponse, ProviderSearchQuery,
    SearchServicesQuery, SearchServicesResponse,
};
use crate::services::Catalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub matcher: Matcher,
    pub search: SearchSettings,
}

impl AppState {
    pub fn new(catalog: Catalog, search: SearchSettings) -> Self {
        Self {
            matcher: Matcher::new(search.default_limit, search.max_limit),
            catalog,
            search,
        }
    }
}

/// Configure all search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/services", web::get().to(search_services))
        .route("/services/by-location", web::get().to(services_by_location))
        .route("/providers/search", web::get().to(search_providers));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        catalog_size: state.catalog.len(),
    })
}

/// Search services endpoint
///
/// GET /api/v1/services
///
/// Query parameters: `region`, `district`, `area` (aka `location`), `category`,
/// `minPrice`, `maxPrice`, `search`, `provider_id`, `page`, `limit`,
/// `mode` (strict|lenient), `categoryMatch` (exact|substring).
async fn search_services(
    state: web::Data<AppState>,
    query: web::Query<SearchServicesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let request = match query.to_filter_request(&state.matcher, state.search.default_mode) {
        Ok(request) => request,
        Err(e) => return validation_failed(e.to_string()),
    };

    run_search(&state, request, "services")
}

/// Services at an exact location
///
/// GET /api/v1/services/by-location
///
/// Always strict: an empty result is the honest answer here.
async fn services_by_location(
    state: web::Data<AppState>,
    query: web::Query<ByLocationQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let request = query.to_filter_request(&state.matcher, state.search.by_location_limit);
    run_search(&state, request, "services/by-location")
}

/// Provider search
///
/// GET /api/v1/providers/search
///
/// Always lenient with substring category matching, so travelers get
/// something plausible even when the location has no providers.
async fn search_providers(
    state: web::Data<AppState>,
    query: web::Query<ProviderSearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let request = query.to_filter_request(&state.matcher);
    run_search(&state, request, "providers/search")
}

fn run_search(state: &AppState, request: FilterRequest, endpoint: &str) -> HttpResponse {
    if request.location.lacks_region() {
        tracing::warn!(
            "[{}] district={:?} area={:?} given without a region; results may span regions",
            endpoint,
            request.location.district,
            request.location.area
        );
    }

    match state.matcher.filter(state.catalog.records(), &request) {
        Ok(result) => {
            tracing::info!(
                "[{}] region={:?} district={:?} area={:?} category={:?} mode={:?}: {} total, {} returned, fallback={:?}",
                endpoint,
                request.location.region,
                request.location.district,
                request.location.area,
                request.category,
                request.mode,
                result.total,
                result.items.len(),
                result.fallback_level
            );
            HttpResponse::Ok().json(SearchServicesResponse::new(result, &request))
        }
        Err(e) => {
            tracing::info!("[{}] rejected filter request: {}", endpoint, e);
            validation_failed(e.to_string())
        }
    }
}

fn validation_failed(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}
