use crate::core::{
    filters::{
        category_matches_normalized, location_verdict, matches_price, matches_provider,
        matches_search_text, LocationVerdict, PreparedLocation,
    },
    normalize::normalized,
    paginate::paginate,
};
use crate::models::{
    FallbackLevel, FilterRequest, FilterResult, LocationQuery, MatchMode, ServiceRecord,
    DEFAULT_LIMIT, DEFAULT_PAGE,
};
use thiserror::Error;

/// Structurally invalid filter requests
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("page must be at least 1, got {0}")]
    InvalidPage(usize),

    #[error("limit must be greater than 0")]
    InvalidLimit,

    #[error("minimum price {min} exceeds maximum price {max}")]
    InvalidPriceRange { min: f64, max: f64 },
}

/// Records that survived one pass of the pipeline
struct Pass<'a> {
    records: Vec<&'a ServiceRecord>,
    missing_region: usize,
}

/// Location and category matching engine
///
/// # Pipeline Stages
/// 1. Active flag
/// 2. Provider id
/// 3. Category
/// 4. Hierarchical location
/// 5. Price range
/// 6. Free-text search
///
/// In lenient mode an empty result walks the fallback ladder: drop area,
/// drop district, drop location, then every active record. The engine keeps
/// no state between calls and never reorders its input.
#[derive(Debug, Clone)]
pub struct Matcher {
    default_limit: usize,
    max_limit: usize,
}

impl Matcher {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let default_limit = default_limit.max(1);
        Self {
            default_limit,
            max_limit: max_limit.max(default_limit),
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Coerce raw paging values from a caller into a valid page/limit pair
    ///
    /// Non-positive page becomes 1, non-positive limit becomes the default,
    /// and limit is capped at the configured maximum.
    pub fn coerce_paging(&self, page: Option<i64>, limit: Option<i64>) -> (usize, usize) {
        let page = match page {
            Some(p) if p >= 1 => p as usize,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => (l as usize).min(self.max_limit),
            _ => self.default_limit,
        };
        (page, limit)
    }

    /// Filter, fall back (lenient only) and paginate a record set
    pub fn filter(
        &self,
        records: &[ServiceRecord],
        request: &FilterRequest,
    ) -> Result<FilterResult, FilterError> {
        validate(request)?;

        let active: Vec<&ServiceRecord> = records.iter().filter(|r| r.active).collect();
        let scoped: Vec<&ServiceRecord> = active
            .iter()
            .copied()
            .filter(|r| matches_provider(r, request.provider_id.as_deref()))
            .collect();

        tracing::debug!(
            "Filter input: {} records, {} active, {} after provider filter",
            records.len(),
            active.len(),
            scoped.len()
        );

        let location_filter_applied = request.location.is_constrained();
        let original = run_pass(&scoped, request, &request.location);

        if original.missing_region > 0 {
            tracing::warn!(
                "Excluded {} records without a region from a location-constrained query",
                original.missing_region
            );
        }

        let mut level = FallbackLevel::None;
        let mut matched = original.records;
        let mut page = request.page;

        if matched.is_empty() && request.mode == MatchMode::Lenient {
            match fallback(&scoped, request) {
                Some((rung, records)) => {
                    level = rung;
                    matched = records;
                }
                None if !active.is_empty() => {
                    level = FallbackLevel::Unfiltered;
                    matched = active.clone();
                    page = DEFAULT_PAGE;
                }
                None => {}
            }

            if level != FallbackLevel::None {
                tracing::warn!(
                    "No matches for {:?} / category {:?}; fell back to {:?} ({} records)",
                    request.location,
                    request.category,
                    level,
                    matched.len()
                );
            }
        }

        let total = matched.len();
        let (page_items, total_pages) = paginate(&matched, page, request.limit);

        Ok(FilterResult {
            items: page_items.iter().map(|r| (*r).clone()).collect(),
            total,
            page,
            limit: request.limit,
            total_pages,
            fell_back_to_unfiltered: level != FallbackLevel::None,
            fallback_level: level,
            location_filter_applied,
            excluded_missing_region: original.missing_region,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 100)
    }
}

/// Reject requests the caller should have coerced already
pub fn validate(request: &FilterRequest) -> Result<(), FilterError> {
    if request.page == 0 {
        return Err(FilterError::InvalidPage(request.page));
    }
    if request.limit == 0 {
        return Err(FilterError::InvalidLimit);
    }
    if let Some(range) = &request.price_range {
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(FilterError::InvalidPriceRange { min, max });
            }
        }
    }
    Ok(())
}

/// Steps 3-6 of the pipeline against one location query
fn run_pass<'a>(
    scoped: &[&'a ServiceRecord],
    request: &FilterRequest,
    location: &LocationQuery,
) -> Pass<'a> {
    let category = normalized(request.category.as_deref());
    let location = PreparedLocation::new(location);
    let mut missing_region = 0;

    let records = scoped
        .iter()
        .copied()
        .filter(|r| {
            category
                .as_deref()
                .map_or(true, |c| category_matches_normalized(r, c, request.category_match))
        })
        .filter(|r| match location_verdict(&r.location, &location) {
            LocationVerdict::Matched => true,
            LocationVerdict::Mismatch => false,
            LocationVerdict::MissingRegion => {
                missing_region += 1;
                false
            }
        })
        .filter(|r| matches_price(r, request.price_range.as_ref()))
        .filter(|r| matches_search_text(r, request.search_text.as_deref()))
        .collect();

    Pass { records, missing_region }
}

/// Relaxed location queries tried in order, skipping rungs that change nothing
fn fallback<'a>(
    scoped: &[&'a ServiceRecord],
    request: &FilterRequest,
) -> Option<(FallbackLevel, Vec<&'a ServiceRecord>)> {
    let query = &request.location;
    let mut previous = PreparedLocation::new(query);
    if !previous.is_constrained() {
        return None;
    }

    let mut ladder = Vec::with_capacity(3);

    // A rung is labelled by the narrowest level it still constrains
    for relaxed in [query.without_area(), query.region_only()] {
        let prepared = PreparedLocation::new(&relaxed);
        if !prepared.is_constrained() || prepared == previous {
            continue;
        }
        let level = if prepared.district.is_some() {
            FallbackLevel::District
        } else {
            FallbackLevel::Region
        };
        ladder.push((level, relaxed));
        previous = prepared;
    }
    ladder.push((FallbackLevel::Category, LocationQuery::default()));

    ladder.into_iter().find_map(|(level, relaxed)| {
        let pass = run_pass(scoped, request, &relaxed);
        if pass.records.is_empty() {
            None
        } else {
            tracing::debug!("Fallback rung {:?} matched {} records", level, pass.records.len());
            Some((level, pass.records))
        }
    })
}
