//! Join builder for fluent configuration

use crate::compute::join::PointsInPolygon;
use crate::config::{AggregateMode, JoinConfig};
use crate::error::Result;

/// Builder for a [`PointsInPolygon`] join.
#[derive(Debug)]
pub struct JoinBuilder {
    config: JoinConfig,
}

impl JoinBuilder {
    /// Start a builder summing `weight_field`, with default settings otherwise.
    pub fn new(weight_field: impl Into<String>) -> Self {
        Self {
            config: JoinConfig::new(weight_field),
        }
    }

    /// Name of the output column on the polygon layer.
    pub fn count_field(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_count_field(name);
        self
    }

    pub fn aggregate(mut self, mode: AggregateMode) -> Self {
        self.config = self.config.with_aggregate(mode);
        self
    }

    pub fn report_candidates(mut self, enabled: bool) -> Self {
        self.config = self.config.with_report_candidates(enabled);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: JoinConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the join.
    pub fn build(self) -> Result<PointsInPolygon> {
        PointsInPolygon::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolysumError;

    #[test]
    fn test_builder_defaults() {
        let join = JoinBuilder::new("pop").build().unwrap();
        assert_eq!(join.config().weight_field, "pop");
        assert_eq!(join.config().count_field, JoinConfig::DEFAULT_COUNT_FIELD);
    }

    #[test]
    fn test_builder_overrides() {
        let join = JoinBuilder::new("pop")
            .count_field("TOTAL")
            .aggregate(AggregateMode::Round)
            .report_candidates(false)
            .build()
            .unwrap();

        assert_eq!(join.config().count_field, "TOTAL");
        assert_eq!(join.config().aggregate, AggregateMode::Round);
        assert!(!join.config().report_candidates);
    }

    #[test]
    fn test_builder_validates() {
        let result = JoinBuilder::new("pop").count_field(" ").build();
        assert!(matches!(result, Err(PolysumError::InvalidConfig(_))));
    }
}
