//! Join configuration.
//!
//! ```rust
//! use polysum::{AggregateMode, JoinConfig};
//!
//! let config = JoinConfig::new("population").with_aggregate(AggregateMode::Round);
//! assert_eq!(config.count_field, "NUMPOINTS");
//!
//! let json = r#"{ "weight_field": "population", "count_field": "POP" }"#;
//! let config = JoinConfig::from_json(json).unwrap();
//! assert_eq!(config.count_field, "POP");
//! ```
use crate::error::{PolysumError, Result};
use crate::types::FieldType;
use serde::{Deserialize, Serialize};

/// How the floating point sum is stored in the output column.
///
/// Sums that overflow, or do not fit an integer column, are written as NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// Integer column, fractional part dropped (toward zero).
    #[default]
    Truncate,
    /// Integer column, rounded half away from zero.
    Round,
    /// Real column holding the exact sum.
    Float,
}

impl AggregateMode {
    /// Type declared for a newly appended output column.
    pub fn field_type(self) -> FieldType {
        match self {
            AggregateMode::Truncate | AggregateMode::Round => FieldType::Integer,
            AggregateMode::Float => FieldType::Real,
        }
    }
}

/// Parameters of a weighted points-in-polygon join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinConfig {
    /// Numeric attribute on the point layer whose values are summed.
    pub weight_field: String,

    /// Output column on the polygon layer receiving the sum.
    #[serde(default = "JoinConfig::default_count_field")]
    pub count_field: String,

    #[serde(default)]
    pub aggregate: AggregateMode,

    /// Report the index candidate count as status text for each polygon.
    #[serde(default = "JoinConfig::default_report_candidates")]
    pub report_candidates: bool,
}

impl JoinConfig {
    pub const DEFAULT_COUNT_FIELD: &'static str = "NUMPOINTS";

    fn default_count_field() -> String {
        Self::DEFAULT_COUNT_FIELD.to_string()
    }

    const fn default_report_candidates() -> bool {
        true
    }

    pub fn new(weight_field: impl Into<String>) -> Self {
        Self {
            weight_field: weight_field.into(),
            count_field: Self::default_count_field(),
            aggregate: AggregateMode::default(),
            report_candidates: Self::default_report_candidates(),
        }
    }

    pub fn with_count_field(mut self, name: impl Into<String>) -> Self {
        self.count_field = name.into();
        self
    }

    pub fn with_aggregate(mut self, mode: AggregateMode) -> Self {
        self.aggregate = mode;
        self
    }

    pub fn with_report_candidates(mut self, enabled: bool) -> Self {
        self.report_candidates = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.weight_field.trim().is_empty() {
            return Err(PolysumError::InvalidConfig(
                "Weight field name must not be empty".to_string(),
            ));
        }

        if self.count_field.trim().is_empty() {
            return Err(PolysumError::InvalidConfig(
                "Count field name must not be empty".to_string(),
            ));
        }

        if self.count_field == self.weight_field {
            log::warn!(
                "Count field '{}' has the same name as the weight field",
                self.count_field
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: JoinConfig = serde_json::from_str(json)
            .map_err(|e| PolysumError::Serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PolysumError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: JoinConfig = toml::from_str(toml_str)
            .map_err(|e| PolysumError::Serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PolysumError::Serialization(format!("Failed to serialize config: {}", e)))
    }
}
