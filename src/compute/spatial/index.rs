//! Bounding-box index over a point collection.
//!
//! The index is bulk loaded once into an R*-tree and is read-only afterwards.
//! Each entry stores the point feature's bounding box (degenerate for a single
//! point) together with its identifier, so a query answers "which features
//! have a bounding box intersecting Q" in O(log n + k).

use crate::compute::validation::validate_point_geometry;
use crate::error::Result;
use crate::storage::FeatureSource;
use crate::types::FeatureId;
use geo::Rect;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};
use smallvec::SmallVec;

type IndexedEnvelope = GeomWithData<Rectangle<[f64; 2]>, FeatureId>;

/// Candidate identifiers returned by a bounding-box query, in ascending order.
pub type Candidates = SmallVec<[FeatureId; 16]>;

/// Read-only R*-tree of point feature envelopes.
#[derive(Debug)]
pub struct PointIndex {
    tree: RTree<IndexedEnvelope>,
}

impl PointIndex {
    /// Build the index from every feature of `source`.
    ///
    /// Fails on the first feature whose geometry is not point-like, empty, or
    /// non-finite; no feature is ever skipped. An empty source yields an
    /// empty index.
    pub fn build<S: FeatureSource + ?Sized>(source: &S) -> Result<Self> {
        let mut entries = Vec::with_capacity(source.feature_count());

        for feature in source.features() {
            let feature = feature?;
            let bounds = validate_point_geometry(feature.id, &feature.geometry)?;
            entries.push(GeomWithData::new(to_rectangle(&bounds), feature.id));
        }

        log::debug!("Indexed {} point features", entries.len());

        Ok(Self {
            tree: RTree::bulk_load(entries),
        })
    }

    /// Identifiers of all features whose bounding box intersects `query`.
    ///
    /// - Returns an empty result if coordinates are non-finite.
    pub fn query(&self, query: &Rect<f64>) -> Candidates {
        let (min, max) = (query.min(), query.max());

        if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
            log::warn!("Rejecting bounding box query with non-finite coordinates");
            return Candidates::new();
        }

        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);

        let mut ids: Candidates = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn to_rectangle(bounds: &Rect<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners(
        [bounds.min().x, bounds.min().y],
        [bounds.max().x, bounds.max().y],
    )
}
