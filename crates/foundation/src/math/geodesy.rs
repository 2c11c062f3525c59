use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

/// Wraps a longitude into `[-180, 180]`, leaving in-range values untouched.
pub fn wrap_lon_deg(lon: f64) -> f64 {
    if lon.abs() <= 180.0 {
        return lon;
    }
    lon - (lon / 360.0).round() * 360.0
}

#[cfg(test)]
mod tests {
    use super::wrap_lon_deg;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn in_range_longitudes_are_untouched() {
        assert_eq!(wrap_lon_deg(180.0), 180.0);
        assert_eq!(wrap_lon_deg(-180.0), -180.0);
        assert_eq!(wrap_lon_deg(12.5), 12.5);
    }

    #[test]
    fn out_of_range_longitudes_wrap() {
        assert_close(wrap_lon_deg(190.0), -170.0, 1e-12);
        assert_close(wrap_lon_deg(-190.0), 170.0, 1e-12);
        assert_close(wrap_lon_deg(540.0 + 10.0), -170.0, 1e-12);
    }
}
