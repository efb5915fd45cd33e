//! In-memory feature layer and sink.

use super::{FeatureSink, FeatureSource, PointSource, PolygonSource};
use crate::error::{PolysumError, Result};
use crate::types::{
    Crs, Feature, FeatureId, FieldIndex, GeometryKind, LayerDescriptor, Schema, Value,
};
use rustc_hash::FxHashMap;

/// Feature collection held in a `Vec`, with an id lookup table.
#[derive(Debug, Clone)]
pub struct MemoryLayer {
    descriptor: LayerDescriptor,
    features: Vec<Feature>,
    positions: FxHashMap<FeatureId, usize>,
}

impl MemoryLayer {
    pub fn new(geometry_kind: GeometryKind, crs: Option<Crs>, schema: Schema) -> Self {
        Self {
            descriptor: LayerDescriptor {
                geometry_kind,
                crs,
                schema,
            },
            features: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    pub fn from_descriptor(descriptor: LayerDescriptor) -> Self {
        Self {
            descriptor,
            features: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    /// Append a feature.
    ///
    /// Rejects rows whose length differs from the schema and duplicate ids.
    pub fn push(&mut self, feature: Feature) -> Result<()> {
        let expected = self.descriptor.schema.len();
        if feature.attributes.len() != expected {
            return Err(PolysumError::InvalidInput(format!(
                "Feature {} has {} attributes, schema has {}",
                feature.id,
                feature.attributes.len(),
                expected
            )));
        }

        if self.positions.contains_key(&feature.id) {
            return Err(PolysumError::InvalidInput(format!(
                "Duplicate feature id {}",
                feature.id
            )));
        }

        self.positions.insert(feature.id, self.features.len());
        self.features.push(feature);
        Ok(())
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Result<Self> {
        for feature in features {
            self.push(feature)?;
        }
        Ok(self)
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.positions.get(&id).map(|&pos| &self.features[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureSource for MemoryLayer {
    fn descriptor(&self) -> &LayerDescriptor {
        &self.descriptor
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn features(&self) -> Box<dyn Iterator<Item = Result<Feature>> + '_> {
        Box::new(self.features.iter().cloned().map(Ok))
    }
}

impl PolygonSource for MemoryLayer {}

impl PointSource for MemoryLayer {
    fn fetch_features(&self, ids: &[FeatureId], subset: &[FieldIndex]) -> Result<Vec<Feature>> {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let width = self.descriptor.schema.len();
        let mut fetched = Vec::with_capacity(ordered.len());

        for id in ordered {
            let source = self.get(id).ok_or(PolysumError::FeatureNotFound(id))?;

            let mut attributes = vec![Value::Null; width];
            for index in subset {
                if let Some(value) = source.attributes.get(index.get()) {
                    attributes[index.get()] = value.clone();
                }
            }

            fetched.push(Feature {
                id,
                geometry: source.geometry.clone(),
                attributes,
            });
        }

        Ok(fetched)
    }
}

/// Sink collecting output features in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    descriptor: Option<LayerDescriptor>,
    features: Vec<Feature>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(&self) -> Option<&LayerDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Turn a closed sink into a layer, e.g. to feed it into another join.
    pub fn into_layer(self) -> Result<MemoryLayer> {
        if !self.closed {
            return Err(PolysumError::Sink("Sink has not been closed".to_string()));
        }
        let descriptor = self
            .descriptor
            .ok_or_else(|| PolysumError::Sink("Sink was never opened".to_string()))?;
        MemoryLayer::from_descriptor(descriptor).with_features(self.features)
    }
}

impl FeatureSink for MemorySink {
    fn open(&mut self, descriptor: &LayerDescriptor) -> Result<()> {
        if self.descriptor.is_some() {
            return Err(PolysumError::Sink("Sink is already open".to_string()));
        }
        self.descriptor = Some(descriptor.clone());
        Ok(())
    }

    fn add_feature(&mut self, feature: Feature) -> Result<()> {
        if self.closed {
            return Err(PolysumError::Sink("Sink is closed".to_string()));
        }
        let Some(descriptor) = &self.descriptor else {
            return Err(PolysumError::Sink("Sink is not open".to_string()));
        };

        if feature.attributes.len() != descriptor.schema.len() {
            return Err(PolysumError::Sink(format!(
                "Feature {} has {} attributes, sink schema has {}",
                feature.id,
                feature.attributes.len(),
                descriptor.schema.len()
            )));
        }

        self.features.push(feature);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.descriptor.is_none() {
            return Err(PolysumError::Sink("Sink is not open".to_string()));
        }
        self.closed = true;
        Ok(())
    }
}
