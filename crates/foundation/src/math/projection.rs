//! Natural Earth I pseudo-cylindrical projection fitted to a container.

use super::geodesy::{wrap_lon_deg, GeoPoint};
use super::vec::ScreenPoint;

/// Default divisor in `scale = width / divisor / PI`.
pub const DEFAULT_SCALE_DIVISOR: f64 = 1.55;

const INVERSE_MAX_ITERATIONS: u32 = 25;
const INVERSE_EPSILON: f64 = 1e-6;

/// Unit-sphere forward mapping. Inputs in radians; `y` grows northwards.
pub fn natural_earth1_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226
            + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

/// Newton iteration on the latitude polynomial. `None` if it does not converge.
pub fn natural_earth1_raw_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let mut phi = y;
    let mut converged = false;
    for _ in 0..INVERSE_MAX_ITERATIONS {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let f = phi
            * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
            - y;
        let df = 1.007226
            + phi2
                * (0.015085 * 3.0
                    + phi4 * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4));
        let delta = f / df;
        phi -= delta;
        if !phi.is_finite() {
            return None;
        }
        if delta.abs() <= INVERSE_EPSILON {
            converged = true;
            break;
        }
    }
    if !converged {
        return None;
    }
    let phi2 = phi * phi;
    let lambda = x
        / (0.8707
            + phi2 * (-0.131979 + phi2 * (-0.013791 + phi2 * phi2 * phi2 * (0.003971 - 0.001529 * phi2))));
    Some((lambda, phi))
}

/// Natural Earth I scaled to `width / divisor / PI` and centred in the container.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    width: f64,
    height: f64,
    scale: f64,
}

impl Projection {
    pub fn fit(width: f64, height: f64) -> Self {
        Self::with_divisor(width, height, DEFAULT_SCALE_DIVISOR)
    }

    pub fn with_divisor(width: f64, height: f64, divisor: f64) -> Self {
        Self {
            width,
            height,
            scale: width / divisor / std::f64::consts::PI,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn forward(&self, geo: GeoPoint) -> Option<ScreenPoint> {
        if !geo.is_finite() || geo.lat.abs() > 90.0 {
            return None;
        }
        let lambda = wrap_lon_deg(geo.lon).to_radians();
        let phi = geo.lat.to_radians();
        let (x, y) = natural_earth1_raw(lambda, phi);
        let c = self.center();
        let p = ScreenPoint::new(c.x + self.scale * x, c.y - self.scale * y);
        p.is_finite().then_some(p)
    }

    /// Screen points outside the projected world outline yield `None`.
    pub fn inverse(&self, p: ScreenPoint) -> Option<GeoPoint> {
        if !p.is_finite() || self.scale <= 0.0 || !self.scale.is_finite() {
            return None;
        }
        let c = self.center();
        let x = (p.x - c.x) / self.scale;
        let y = (c.y - p.y) / self.scale;
        let (lambda, phi) = natural_earth1_raw_invert(x, y)?;
        let geo = GeoPoint::new(lambda.to_degrees(), phi.to_degrees());
        if !geo.is_finite() || geo.lon.abs() > 180.0 || geo.lat.abs() > 90.0 {
            return None;
        }
        Some(geo)
    }
}
