//! Prepared containment predicate for one polygon.
//!
//! Building the geometry graph of a polygon is the expensive part of a
//! relate test, so it is done once per polygon and reused for every candidate
//! point. The predicate borrows the polygon and lives for one iteration of the
//! join loop.

use crate::compute::validation::validate_polygon_geometry;
use crate::error::Result;
use crate::types::FeatureId;
use geo::{Geometry, PreparedGeometry, Rect, Relate};

pub struct PreparedPolygon<'a> {
    bounds: Rect<f64>,
    prepared: PreparedGeometry<'a, &'a Geometry<f64>>,
}

impl<'a> PreparedPolygon<'a> {
    /// Prepare `geometry` for repeated containment tests.
    ///
    /// Fails if the geometry is not polygonal, empty, or has non-finite
    /// coordinates.
    pub fn new(id: FeatureId, geometry: &'a Geometry<f64>) -> Result<Self> {
        let bounds = validate_polygon_geometry(id, geometry)?;
        Ok(Self {
            bounds,
            prepared: PreparedGeometry::from(geometry),
        })
    }

    /// Bounding box of the polygon, used as the index query window.
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// True when `geometry` lies in the polygon and not entirely on its boundary.
    ///
    /// Points on the boundary are not contained.
    pub fn contains(&self, geometry: &Geometry<f64>) -> bool {
        self.prepared.relate(geometry).is_contains()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolysumError;
    use geo::{MultiPoint, Point, polygon};

    fn unit_square() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ])
    }

    #[test]
    fn test_contains_inside_and_outside() {
        let square = unit_square();
        let prepared = PreparedPolygon::new(1, &square).unwrap();

        assert!(prepared.contains(&Geometry::Point(Point::new(0.5, 0.5))));
        assert!(!prepared.contains(&Geometry::Point(Point::new(1.5, 0.5))));
        assert!(!prepared.contains(&Geometry::Point(Point::new(1.0, 0.5))));
    }

    #[test]
    fn test_polygon_with_hole() {
        let donut = Geometry::Polygon(polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
                (x: 0.0, y: 0.0),
            ],
            interiors: [
                [
                    (x: 4.0, y: 4.0),
                    (x: 6.0, y: 4.0),
                    (x: 6.0, y: 6.0),
                    (x: 4.0, y: 6.0),
                    (x: 4.0, y: 4.0),
                ],
            ],
        ));
        let prepared = PreparedPolygon::new(1, &donut).unwrap();

        assert!(prepared.contains(&Geometry::Point(Point::new(2.0, 2.0))));
        assert!(!prepared.contains(&Geometry::Point(Point::new(5.0, 5.0))));
    }

    #[test]
    fn test_multipoint_needs_all_members_inside() {
        let square = unit_square();
        let prepared = PreparedPolygon::new(1, &square).unwrap();

        let inside = MultiPoint::from(vec![Point::new(0.2, 0.2), Point::new(0.8, 0.8)]);
        let straddling = MultiPoint::from(vec![Point::new(0.2, 0.2), Point::new(1.8, 0.8)]);

        assert!(prepared.contains(&Geometry::MultiPoint(inside)));
        assert!(!prepared.contains(&Geometry::MultiPoint(straddling)));
    }

    #[test]
    fn test_bounds_and_rejection() {
        let square = unit_square();
        let prepared = PreparedPolygon::new(1, &square).unwrap();
        assert_eq!(prepared.bounds().width(), 1.0);

        let point = Geometry::Point(Point::new(0.0, 0.0));
        assert!(matches!(
            PreparedPolygon::new(2, &point),
            Err(PolysumError::InvalidGeometry(_))
        ));
    }
}
