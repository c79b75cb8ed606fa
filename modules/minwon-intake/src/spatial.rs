//! Point-feature construction from reported coordinates.

use minwon_common::{IntakeError, Point, SpatialFeature};

use crate::payload::ScalarValue;

/// Feature kind stored in the `feature_type` column. Only points here.
pub const FEATURE_TYPE_POINT: &str = "POINT";

/// Builds point features with an explicit spatial reference id.
///
/// The SRID is construction-time configuration (EPSG:4326 by default via
/// `IntakeOptions`), not a process-wide singleton.
#[derive(Debug, Clone, Copy)]
pub struct SpatialFeatureBuilder {
    srid: i32,
}

impl SpatialFeatureBuilder {
    pub fn new(srid: i32) -> Self {
        Self { srid }
    }

    /// Coerce the raw coordinate pair and produce a point feature.
    ///
    /// Ordinate order is (longitude, latitude). No range validation: values
    /// outside [-180,180]/[-90,90] pass through unchanged.
    pub fn build(
        &self,
        lat: &ScalarValue,
        lng: &ScalarValue,
        addr_text: Option<&str>,
    ) -> Result<SpatialFeature, IntakeError> {
        let lat = lat.to_coordinate()?;
        let lng = lng.to_coordinate()?;
        Ok(SpatialFeature {
            feature_type: FEATURE_TYPE_POINT.to_string(),
            addr_text: addr_text.map(str::to_owned),
            geom: Point::new(lng, lat, self.srid),
        })
    }
}
