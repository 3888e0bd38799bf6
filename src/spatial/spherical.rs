use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ops::Mul;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SphericalError {
    #[error("{what} {value} is out of bounds")]
    Domain { what: &'static str, value: f64 },
    #[error("angle index {index} is out of range for {len} angles")]
    Index { index: usize, len: usize },
    #[error("points lie on spheres of different radius ({left} vs {right})")]
    Incomparable { left: f64, right: f64 },
}

/// Point on a sphere embedded in `ANGLES + 1` dimensional space.
///
/// Every angle is kept in `[0, π)`. Rotations that would leave that range
/// are folded back by reflecting the other angles and, depending on the
/// dimension, negating the radius, so the same point always has the same
/// representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalPoint<const ANGLES: usize> {
    radius: f64,
    angles: [f64; ANGLES],
}

/// Point in ordinary 3D space: a polar angle and an azimuth.
pub type SurfacePoint = SphericalPoint<2>;

impl<const ANGLES: usize> Default for SphericalPoint<ANGLES> {
    fn default() -> Self {
        SphericalPoint {
            radius: 0.0,
            angles: [0.0; ANGLES],
        }
    }
}

fn check_angle(angle: f64) -> Result<f64, SphericalError> {
    if (0.0..PI).contains(&angle) {
        Ok(angle)
    } else {
        Err(SphericalError::Domain {
            what: "angle",
            value: angle,
        })
    }
}

impl<const ANGLES: usize> SphericalPoint<ANGLES> {
    /// Dimension of the embedding space.
    pub const DIMENSION: usize = ANGLES + 1;

    pub fn new(radius: f64, angles: [f64; ANGLES]) -> Result<Self, SphericalError> {
        for &angle in &angles {
            check_angle(angle)?;
        }
        Ok(SphericalPoint { radius, angles })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn angles(&self) -> &[f64; ANGLES] {
        &self.angles
    }

    pub fn angle(&self, i: usize) -> Result<f64, SphericalError> {
        self.check_index(i)?;
        Ok(self.angles[i])
    }

    pub fn set_angle(&mut self, i: usize, angle: f64) -> Result<(), SphericalError> {
        self.check_index(i)?;
        self.angles[i] = check_angle(angle)?;
        Ok(())
    }

    /// Rotates angle `i` by `delta` radians and restores canonical form.
    pub fn rotate(&mut self, i: usize, delta: f64) -> Result<(), SphericalError> {
        self.check_index(i)?;
        self.rotate_unchecked(i, delta);
        Ok(())
    }

    /// Applies one rotation per angle, in index order. Each step may reflect
    /// the remaining angles, so the outcome depends on that order.
    pub fn rotate_all(&mut self, deltas: [f64; ANGLES]) {
        for (i, delta) in deltas.into_iter().enumerate() {
            self.rotate_unchecked(i, delta);
        }
    }

    pub fn norm(&self) -> f64 {
        self.radius.abs()
    }

    /// `i` must be below `ANGLES`.
    fn rotate_unchecked(&mut self, i: usize, delta: f64) {
        let mut angle = (self.angles[i] + delta % TAU).rem_euclid(TAU);
        if angle >= TAU {
            // rem_euclid rounds tiny negatives up to TAU
            angle = 0.0;
        }
        if angle >= PI {
            self.angles[i] = angle - PI;
            self.reflect_all_except(i);
        } else {
            self.angles[i] = angle;
        }
    }

    fn check_index(&self, i: usize) -> Result<(), SphericalError> {
        if i < ANGLES {
            Ok(())
        } else {
            Err(SphericalError::Index {
                index: i,
                len: ANGLES,
            })
        }
    }

    /// Switches to the antipodal parameterization after angle `i` crossed π.
    fn reflect_all_except(&mut self, i: usize) {
        let mut negate = Self::DIMENSION % 2 == 1;
        for (j, angle) in self.angles.iter_mut().enumerate() {
            if j == i {
                continue;
            }
            if reflect(angle) {
                negate = !negate;
            }
        }
        if negate {
            self.radius = -self.radius;
        }
    }
}

/// Mirrors `angle` about π/2. A result of exactly π is folded to 0 and
/// reported so the caller can account for the extra sign change.
fn reflect(angle: &mut f64) -> bool {
    *angle = PI - *angle;
    if *angle >= PI {
        *angle = 0.0;
        true
    } else {
        false
    }
}

impl<const ANGLES: usize> Mul<f64> for SphericalPoint<ANGLES> {
    type Output = SphericalPoint<ANGLES>;

    /// Scales the radius only; a negative factor is not canonicalized.
    fn mul(self, factor: f64) -> Self::Output {
        SphericalPoint {
            radius: self.radius * factor,
            angles: self.angles,
        }
    }
}

impl<const ANGLES: usize> Mul<SphericalPoint<ANGLES>> for f64 {
    type Output = SphericalPoint<ANGLES>;

    fn mul(self, point: SphericalPoint<ANGLES>) -> Self::Output {
        point * self
    }
}

/// Latitude/longitude view of a point in 3D space.
///
/// `angle(0)` is the polar angle measured from the north pole and
/// `angle(1)` the longitude.
pub trait Geographic: Sized {
    fn from_lat_lon(radius: f64, latitude: f64, longitude: f64) -> Result<Self, SphericalError>;
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
    fn set_latitude(&mut self, latitude: f64) -> Result<(), SphericalError>;
    fn set_longitude(&mut self, longitude: f64) -> Result<(), SphericalError>;
}

impl Geographic for SurfacePoint {
    fn from_lat_lon(radius: f64, latitude: f64, longitude: f64) -> Result<Self, SphericalError> {
        let mut point = SurfacePoint {
            radius,
            ..Default::default()
        };
        point.set_latitude(latitude)?;
        point.set_longitude(longitude)?;
        Ok(point)
    }

    fn latitude(&self) -> f64 {
        FRAC_PI_2 - self.angles[0]
    }

    fn longitude(&self) -> f64 {
        self.angles[1]
    }

    fn set_latitude(&mut self, latitude: f64) -> Result<(), SphericalError> {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            return Err(SphericalError::Domain {
                what: "latitude",
                value: latitude,
            });
        }
        let polar = FRAC_PI_2 - latitude;
        if polar >= PI {
            // south pole: polar angle 0 seen through a negative radius
            self.radius = -self.radius.abs();
            self.angles[0] = 0.0;
        } else {
            if polar == 0.0 {
                self.radius = self.radius.abs();
            }
            self.angles[0] = polar;
        }
        Ok(())
    }

    fn set_longitude(&mut self, longitude: f64) -> Result<(), SphericalError> {
        if !(longitude > -PI && longitude < TAU) {
            return Err(SphericalError::Domain {
                what: "longitude",
                value: longitude,
            });
        }
        let shifted = if longitude < 0.0 {
            longitude + PI
        } else if longitude >= PI {
            longitude - PI
        } else {
            self.angles[1] = longitude;
            return Ok(());
        };
        if shifted >= PI {
            // -ε + π rounds onto π; (-r, π - θ, π) is (r, θ, 0)
            self.angles[1] = 0.0;
            return Ok(());
        }
        self.radius = -self.radius;
        if reflect(&mut self.angles[0]) {
            self.radius = -self.radius;
        }
        self.angles[1] = shifted;
        Ok(())
    }
}
