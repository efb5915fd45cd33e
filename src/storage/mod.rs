//! Collaborator contracts for feature input and output.
//!
//! The join only talks to these traits. [`MemoryLayer`] and [`MemorySink`]
//! are the in-process implementations used by tests and embedders that already
//! hold their features in memory.

use crate::error::Result;
use crate::types::{Feature, FeatureId, FieldIndex, LayerDescriptor};

mod memory;

pub use memory::{MemoryLayer, MemorySink};

/// A finite, sequentially iterable feature collection.
pub trait FeatureSource {
    /// Geometry kind, spatial reference and schema of the collection.
    fn descriptor(&self) -> &LayerDescriptor;

    fn feature_count(&self) -> usize;

    /// Iterate all features in collection order.
    fn features(&self) -> Box<dyn Iterator<Item = Result<Feature>> + '_>;
}

/// Point collection, randomly queryable by identifier.
pub trait PointSource: FeatureSource {
    /// Fetch the given features, in ascending identifier order.
    ///
    /// Only the columns listed in `subset` are populated; every other
    /// attribute is returned as [`Value::Null`](crate::Value::Null). An empty
    /// `subset` fetches geometry only.
    fn fetch_features(&self, ids: &[FeatureId], subset: &[FieldIndex]) -> Result<Vec<Feature>>;
}

/// Polygon collection consumed by the join in iteration order.
///
/// Implemented explicitly by collections that may be joined as the polygon
/// side; every feature yielded by [`FeatureSource::features`] becomes exactly
/// one output feature.
pub trait PolygonSource: FeatureSource {}

/// Destination of the join output.
///
/// Lifecycle: `open` once, `add_feature` any number of times, `close` once.
pub trait FeatureSink {
    fn open(&mut self, descriptor: &LayerDescriptor) -> Result<()>;

    fn add_feature(&mut self, feature: Feature) -> Result<()>;

    /// Finalize the output. No features may be added afterwards.
    fn close(&mut self) -> Result<()>;
}
