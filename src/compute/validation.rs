//! Geometry validation for indexing and containment preparation.

use crate::error::{PolysumError, Result};
use crate::types::FeatureId;
use geo::{BoundingRect, CoordsIter, Geometry, Rect};

/// Validates that a point feature's geometry can be indexed.
///
/// Accepts `Point` and non-empty `MultiPoint` with finite coordinates and
/// returns the bounding box used as its index envelope.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, Point};
/// use polysum::compute::validation::validate_point_geometry;
///
/// let geom = Geometry::Point(Point::new(1.0, 2.0));
/// assert!(validate_point_geometry(1, &geom).is_ok());
///
/// let nan = Geometry::Point(Point::new(f64::NAN, 2.0));
/// assert!(validate_point_geometry(2, &nan).is_err());
/// ```
pub fn validate_point_geometry(id: FeatureId, geometry: &Geometry<f64>) -> Result<Rect<f64>> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        other => {
            return Err(PolysumError::InvalidGeometry(format!(
                "Point feature {} has non point geometry ({})",
                id,
                geometry_name(other)
            )));
        }
    }

    ensure_finite(id, geometry)?;

    geometry.bounding_rect().ok_or_else(|| {
        PolysumError::InvalidGeometry(format!("Point feature {} has empty geometry", id))
    })
}

/// Validates that a polygon feature's geometry can back a containment predicate.
///
/// Accepts `Polygon`, `MultiPolygon`, `Rect` and `Triangle` with at least one
/// finite coordinate and returns the bounding box.
pub fn validate_polygon_geometry(id: FeatureId, geometry: &Geometry<f64>) -> Result<Rect<f64>> {
    match geometry {
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => {}
        other => {
            return Err(PolysumError::InvalidGeometry(format!(
                "Polygon feature {} has non polygonal geometry ({})",
                id,
                geometry_name(other)
            )));
        }
    }

    ensure_finite(id, geometry)?;

    geometry.bounding_rect().ok_or_else(|| {
        PolysumError::InvalidGeometry(format!("Polygon feature {} has empty geometry", id))
    })
}

fn ensure_finite(id: FeatureId, geometry: &Geometry<f64>) -> Result<()> {
    if let Some(coord) = geometry
        .coords_iter()
        .find(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(PolysumError::InvalidGeometry(format!(
            "Feature {} has non-finite coordinate ({}, {})",
            id, coord.x, coord.y
        )));
    }
    Ok(())
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
