//! GeoJSON point type used for property locations and proximity search

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Equatorial earth radius used for spherical distance calculations.
///
/// Matches the radius the document store uses when converting
/// `$centerSphere` radians, so in-memory and server-side proximity
/// filters agree.
pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

/// Invalid coordinate errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Unsupported GeoJSON type: {0}")]
    UnsupportedType(String),
}

/// A point on the earth's surface, serialized as a GeoJSON `Point`
/// (`{"type": "Point", "coordinates": [lon, lat]}`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJsonPoint", try_from = "GeoJsonPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Create a point, validating coordinate ranges
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        Ok(Self { longitude, latitude })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance in meters (haversine)
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

/// Wire shape of a GeoJSON point
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: String::from("Point"),
            coordinates: [point.longitude, point.latitude],
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(GeoError::UnsupportedType(value.kind));
        }
        let [longitude, latitude] = value.coordinates;
        GeoPoint::new(longitude, latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_shape() {
        let austin = GeoPoint::new(-97.7431, 30.2672).unwrap();
        let json = serde_json::to_value(austin).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], -97.7431);
        assert_eq!(json["coordinates"][1], 30.2672);

        let back: GeoPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, austin);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(GeoPoint::new(200.0, 0.0), Err(GeoError::LongitudeOutOfRange(200.0)));
        assert_eq!(GeoPoint::new(0.0, -91.0), Err(GeoError::LatitudeOutOfRange(-91.0)));

        let polygon = serde_json::json!({"type": "Polygon", "coordinates": [0.0, 0.0]});
        assert!(serde_json::from_value::<GeoPoint>(polygon).is_err());
    }

    #[test]
    fn test_distance_austin_dallas() {
        let austin = GeoPoint::new(-97.7431, 30.2672).unwrap();
        let dallas = GeoPoint::new(-96.7970, 32.7767).unwrap();
        let km = austin.distance_meters(&dallas) / 1000.0;
        // Roughly 292 km apart
        assert!(km > 280.0 && km < 305.0, "unexpected distance {km}");
        assert!(austin.distance_meters(&austin) < 1e-6);
    }
}
