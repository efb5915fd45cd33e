//! Weighted points-in-polygon spatial join with R*-tree candidate pruning.
//!
//! For every polygon of one layer, the weights of all points of another layer
//! lying inside it are summed and written to an output column. Points are
//! indexed once; each polygon queries the index with its bounding box, then
//! filters candidates by exact containment.
//!
//! ```rust
//! use geo::{Point, polygon};
//! use polysum::prelude::*;
//!
//! let points = MemoryLayer::new(
//!     GeometryKind::Point,
//!     None,
//!     Schema::new(vec![Field::new("weight", FieldType::Text)]),
//! )
//! .with_features(vec![
//!     Feature::new(1, Point::new(0.5, 0.5), vec![Value::from("3")]),
//!     Feature::new(2, Point::new(1.5, 0.5), vec![Value::from("5")]),
//! ])?;
//!
//! let square = polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 1.0, y: 0.0),
//!     (x: 1.0, y: 1.0),
//!     (x: 0.0, y: 1.0),
//!     (x: 0.0, y: 0.0),
//! ];
//! let polygons = MemoryLayer::new(GeometryKind::Polygon, None, Schema::default())
//!     .with_features(vec![Feature::new(1, square, vec![])])?;
//!
//! let mut sink = MemorySink::new();
//! let join = JoinBuilder::new("weight").build()?;
//! join.run(&polygons, &points, &mut sink, &mut SilentFeedback)?;
//!
//! assert_eq!(sink.features()[0].attributes, vec![Value::Int(3)]);
//! # Ok::<(), polysum::PolysumError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod feedback;
pub mod storage;
pub mod types;

pub use builder::JoinBuilder;
pub use compute::join::{JoinSummary, PointsInPolygon};
pub use compute::schema::{OutputField, OutputSlot};
pub use compute::spatial::{PointIndex, PreparedPolygon};
pub use config::{AggregateMode, JoinConfig};
pub use error::{PolysumError, Result};
pub use feedback::{CancellationToken, Feedback, LogFeedback, SilentFeedback};
pub use storage::{FeatureSink, FeatureSource, MemoryLayer, MemorySink, PointSource, PolygonSource};
pub use types::{
    Crs, Feature, FeatureId, Field, FieldIndex, FieldType, GeometryKind, LayerDescriptor, Schema,
    Value,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{JoinBuilder, JoinConfig, JoinSummary, PointsInPolygon, PolysumError, Result};

    pub use crate::{AggregateMode, CancellationToken, Feedback, LogFeedback, SilentFeedback};

    pub use crate::{FeatureSink, FeatureSource, MemoryLayer, MemorySink, PointSource, PolygonSource};

    pub use crate::{Crs, Feature, FeatureId, Field, FieldType, GeometryKind, Schema, Value};
}
