use crate::models::Coordinates;

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Miles per degree of latitude, rounded down so boxes err on the large side
const MILES_PER_DEGREE: f64 = 69.0;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Great-circle distance in miles
#[inline]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Distance in miles between two coordinate pairs
#[inline]
pub fn distance_between(a: &Coordinates, b: &Coordinates) -> f64 {
    distance_miles(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Geospatial bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// None when the box reaches a pole and every longitude qualifies
    pub lon_range: Option<(f64, f64)>,
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than Haversine, so it runs first and only throws away points
/// that are certainly outside the radius. Longitude spread is taken at the
/// edge of the box furthest from the equator, where a mile spans the most
/// degrees.
pub fn bounding_box_miles(center: &Coordinates, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles / MILES_PER_DEGREE;
    let min_lat = center.latitude - lat_delta;
    let max_lat = center.latitude + lat_delta;

    let widest_lat = min_lat.abs().max(max_lat.abs());
    let lon_range = if widest_lat >= 90.0 {
        None
    } else {
        let lon_delta = radius_miles / (MILES_PER_DEGREE * widest_lat.to_radians().cos());
        if lon_delta >= 180.0 {
            None
        } else {
            Some((center.longitude - lon_delta, center.longitude + lon_delta))
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        lon_range,
    }
}

/// Check if a point is within a bounding box
///
/// Longitudes are compared on the circle, so a box spanning the antimeridian
/// still contains points on the other side of it.
#[inline]
pub fn is_within_bounding_box(point: &Coordinates, bbox: &BoundingBox) -> bool {
    if point.latitude < bbox.min_lat || point.latitude > bbox.max_lat {
        return false;
    }

    match bbox.lon_range {
        None => true,
        Some((min_lon, max_lon)) => {
            let center = (min_lon + max_lon) / 2.0;
            let half_width = (max_lon - min_lon) / 2.0;
            let mut offset = (point.longitude - center).rem_euclid(360.0);
            if offset > 180.0 {
                offset = 360.0 - offset;
            }
            offset <= half_width
        }
    }
}
