//! Weighted points-in-polygon join.
//!
//! For every polygon, in source order:
//!
//! 1. Prepare a containment predicate for the polygon and take its bounding box.
//! 2. Query the point index with the box to get candidate identifiers.
//! 3. Fetch the candidates with only the weight column populated.
//! 4. Keep candidates the polygon actually contains and sum their weights,
//!    treating unparsable weights as zero.
//! 5. Write the polygon with the sum in the output column to the sink and
//!    report progress.
//!
//! The output column and the point index are set up once before the loop.
//! Cancellation is polled between polygons; features already written stay in
//! the sink.

use crate::compute::schema::{
    OutputField, output_descriptor, resolve_output_field, resolve_weight_field,
};
use crate::compute::spatial::{PointIndex, PreparedPolygon};
use crate::compute::weight::Accumulator;
use crate::config::JoinConfig;
use crate::error::{PolysumError, Result};
use crate::feedback::Feedback;
use crate::storage::{FeatureSink, PointSource, PolygonSource};
use crate::types::{Feature, FieldIndex, Value};

/// Counters describing a finished (or cancelled) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    /// Polygons written to the sink.
    pub polygons_processed: usize,
    pub points_indexed: usize,
    /// Contained (polygon, point) pairs, including ones with unusable weights.
    pub points_matched: usize,
    /// Contained points whose weight could not be parsed.
    pub weights_skipped: usize,
    pub cancelled: bool,
}

/// Join engine holding a validated [`JoinConfig`].
#[derive(Debug, Clone)]
pub struct PointsInPolygon {
    config: JoinConfig,
}

impl PointsInPolygon {
    pub fn new(config: JoinConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Run the join, streaming one output feature per polygon into `sink`.
    ///
    /// Configuration problems (unknown weight field, wrong layer geometry
    /// kinds, unindexable points) fail before the sink is opened. The sink is
    /// closed when the loop ends, including on cancellation.
    pub fn run<Q, P, S, F>(
        &self,
        polygons: &Q,
        points: &P,
        sink: &mut S,
        feedback: &mut F,
    ) -> Result<JoinSummary>
    where
        Q: PolygonSource + ?Sized,
        P: PointSource + ?Sized,
        S: FeatureSink + ?Sized,
        F: Feedback + ?Sized,
    {
        let polygon_layer = polygons.descriptor();
        let point_layer = points.descriptor();

        if !polygon_layer.geometry_kind.is_polygonal() {
            return Err(PolysumError::InvalidInput(format!(
                "Polygon layer has {:?} geometry",
                polygon_layer.geometry_kind
            )));
        }
        if !point_layer.geometry_kind.is_point_like() {
            return Err(PolysumError::InvalidInput(format!(
                "Point layer has {:?} geometry",
                point_layer.geometry_kind
            )));
        }

        let weight = resolve_weight_field(&point_layer.schema, &self.config.weight_field)?;
        let output = resolve_output_field(
            &polygon_layer.schema,
            &self.config.count_field,
            self.config.aggregate,
        )?;

        let index = PointIndex::build(points)?;
        let total = polygons.feature_count();

        log::info!(
            "Joining {} polygons with {} points (weight '{}', output '{}' {})",
            total,
            index.len(),
            self.config.weight_field,
            output.name(),
            if output.is_appended() {
                "appended"
            } else {
                "overwritten"
            }
        );

        sink.open(&output_descriptor(polygon_layer, &output))?;

        let mut summary = JoinSummary {
            points_indexed: index.len(),
            ..JoinSummary::default()
        };

        for (current, polygon) in polygons.features().enumerate() {
            if feedback.is_cancelled() {
                log::warn!(
                    "Join cancelled after {} of {} polygons",
                    summary.polygons_processed,
                    total
                );
                summary.cancelled = true;
                break;
            }

            let polygon = polygon?;
            let acc = self.aggregate(&polygon, &index, points, weight, feedback)?;
            summary.points_matched += acc.matched();
            summary.weights_skipped += acc.skipped();

            sink.add_feature(Self::output_feature(polygon, &output, &acc)?)?;
            summary.polygons_processed += 1;

            feedback.report_progress(progress(current, total));
        }

        if !summary.cancelled {
            feedback.report_progress(100);
        }
        sink.close()?;

        log::info!(
            "Join finished: {} polygons, {} matched points, {} skipped weights",
            summary.polygons_processed,
            summary.points_matched,
            summary.weights_skipped
        );

        Ok(summary)
    }

    /// Sum the weights of all indexed points contained by `polygon`.
    fn aggregate<P, F>(
        &self,
        polygon: &Feature,
        index: &PointIndex,
        points: &P,
        weight: FieldIndex,
        feedback: &mut F,
    ) -> Result<Accumulator>
    where
        P: PointSource + ?Sized,
        F: Feedback + ?Sized,
    {
        let prepared = PreparedPolygon::new(polygon.id, &polygon.geometry)?;
        let candidates = index.query(&prepared.bounds());

        let mut acc = Accumulator::new();
        if candidates.is_empty() {
            return Ok(acc);
        }

        if self.config.report_candidates {
            feedback.report_status(&format!(
                "Polygon {}: {} candidate points",
                polygon.id,
                candidates.len()
            ));
        }

        for point in points.fetch_features(&candidates, &[weight])? {
            if !prepared.contains(&point.geometry) {
                continue;
            }

            let value = point.attribute(weight).unwrap_or(&Value::Null);
            if !acc.add(value) {
                log::debug!(
                    "Ignoring non-numeric weight '{}' on point {}",
                    value,
                    point.id
                );
            }
        }

        Ok(acc)
    }

    fn output_feature(
        polygon: Feature,
        output: &OutputField,
        acc: &Accumulator,
    ) -> Result<Feature> {
        let attributes = output.apply(polygon.attributes, output.encode(acc))?;
        Ok(Feature {
            id: polygon.id,
            geometry: polygon.geometry,
            attributes,
        })
    }
}

/// Integer percentage after finishing polygon `current` (0-based) of `total`.
fn progress(current: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((current as u64 * 100) / total as u64).min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_steps() {
        assert_eq!(progress(0, 4), 0);
        assert_eq!(progress(1, 4), 25);
        assert_eq!(progress(3, 4), 75);
        assert_eq!(progress(2, 3), 66);
        assert_eq!(progress(0, 0), 100);
        assert_eq!(progress(9, 4), 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            PointsInPolygon::new(JoinConfig::new("")),
            Err(PolysumError::InvalidConfig(_))
        ));
    }
}
