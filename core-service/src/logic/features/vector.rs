//! Engineered Feature Vector
//!
//! **Versioned, layout-ordered output of the feature engineer**
//!
//! Values are typed cells (categorical or numeric) in `FEATURE_LAYOUT` order.
//! Encoding into a numeric matrix happens later, in `logic::encoding`.

use serde::{Deserialize, Serialize};

use super::layout::{feature_index, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
use crate::logic::claim::FeatureValue;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Claim record extended with derived risk indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in order defined by FEATURE_LAYOUT
    values: Vec<FeatureValue>,
}

impl EngineeredFeatures {
    /// Wrap values produced in layout order
    pub(crate) fn from_values(values: Vec<FeatureValue>) -> Self {
        debug_assert_eq!(values.len(), FEATURE_COUNT);
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<&FeatureValue> {
        self.values.get(index)
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<&FeatureValue> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Numeric feature by name
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.get_by_name(name).and_then(FeatureValue::as_f64)
    }

    /// Feature names, in value order
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        FEATURE_LAYOUT.iter().map(|c| c.name)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": format!("{:08x}", self.layout_hash),
            "named_values": self.names()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::claim::ClaimRecord;
    use crate::logic::features::engineer;

    #[test]
    fn test_vector_metadata() {
        let features = engineer(&ClaimRecord::sample());
        assert_eq!(features.version, FEATURE_VERSION);
        assert_eq!(features.layout_hash, layout_hash());
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features.names().count(), FEATURE_COUNT);
    }

    #[test]
    fn test_get_by_name() {
        let features = engineer(&ClaimRecord::sample());
        assert_eq!(
            features.get_by_name("Region"),
            Some(&FeatureValue::Categorical("Khomas".into()))
        );
        assert_eq!(features.numeric("RegionRisk"), Some(1.0));
        assert_eq!(features.numeric("Region"), None);
        assert!(features.get_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_log_entry() {
        let entry = engineer(&ClaimRecord::sample()).to_log_entry();
        assert_eq!(entry["feature_version"], FEATURE_VERSION);
        assert_eq!(entry["named_values"]["AgeGroup"], "26-35");
        assert_eq!(entry["named_values"]["VehicleAgeRisk"], 0.0);
    }
}
