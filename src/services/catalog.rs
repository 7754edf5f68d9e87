use crate::models::ServiceRecord;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading the service catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-memory set of service listings joined with provider data
///
/// Loaded once at startup from a JSON array and shared read-only across
/// request handlers. Every search reads the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<Vec<ServiceRecord>>,
}

impl Catalog {
    pub fn from_records(records: Vec<ServiceRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Parse a catalog from a JSON array of records
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ServiceRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Load a catalog file from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = Self::from_json(&json)?;

        tracing::info!(
            "Loaded {} services ({} active, {} without region) from {}",
            catalog.len(),
            catalog.active_count(),
            catalog.missing_region_count(),
            path.display()
        );

        Ok(catalog)
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.active).count()
    }

    /// Records that can never match a location-constrained search
    pub fn missing_region_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !crate::core::normalize::is_set(r.location.region.as_deref()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "1", "title": "Iyunga Guest House", "category": "Accommodation",
         "region": "Mbeya", "district": "Mbeya City", "area": "Iyunga",
         "price": 35000, "business_name": "Iyunga Stays", "provider_rating": 4.5},
        {"id": "2", "title": "Airport Shuttle", "category": "Transportation",
         "region": "", "is_active": false}
    ]"#;

    #[test]
    fn test_from_json_keeps_passthrough_fields() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.active_count(), 1);
        assert_eq!(catalog.missing_region_count(), 1);

        let first = &catalog.records()[0];
        assert_eq!(first.location.area.as_deref(), Some("Iyunga"));
        assert_eq!(first.price, Some(35000.0));
        assert_eq!(first.extra["business_name"], "Iyunga Stays");
        assert!(!first.extra.contains_key("region"));
    }

    #[test]
    fn test_from_json_accepts_decimal_string_prices() {
        let catalog = Catalog::from_json(
            r#"[{"id": "7", "category": "Accommodation", "region": "Mbeya", "price": "35000.00"},
                {"id": "8", "category": "Tours", "region": "Mbeya", "price": ""}]"#,
        )
        .unwrap();

        assert_eq!(catalog.records()[0].price, Some(35000.0));
        assert_eq!(catalog.records()[1].price, None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Catalog::from_json("{not json"), Err(CatalogError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = Catalog::load("does/not/exist.json").await;

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("safari-catalog-{}.json", std::process::id()));
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let catalog = Catalog::load(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(catalog.len(), 2);
    }
}
