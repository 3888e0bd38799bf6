use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::spatial::spherical::{Geographic, SphericalError, SurfacePoint};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub fn to_cartesian(p: &SurfacePoint) -> Cartesian {
    let [polar, azimuth] = *p.angles();
    let r = p.radius();
    Cartesian {
        x: r * polar.sin() * azimuth.cos(),
        y: r * polar.sin() * azimuth.sin(),
        z: r * polar.cos(),
    }
}

/// Surface distance between two points on the same sphere, haversine form.
///
/// A negative radius encodes the antipodal parameterization, which shows up
/// here as a latitude shifted by π.
pub fn great_circle_distance(p1: &SurfacePoint, p2: &SurfacePoint) -> Result<f64, SphericalError> {
    let r = p1.norm();
    if r != p2.norm() {
        return Err(SphericalError::Incomparable {
            left: p1.radius(),
            right: p2.radius(),
        });
    }

    let lat1 = effective_latitude(p1);
    let lat2 = effective_latitude(p2);
    let half_dlat = ((lat1 - lat2) / 2.0).sin();
    let half_dlon = ((p1.longitude() - p2.longitude()) / 2.0).sin();
    let a = (half_dlat * half_dlat + lat1.cos() * lat2.cos() * half_dlon * half_dlon).clamp(0.0, 1.0);
    Ok(r * 2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}

fn effective_latitude(p: &SurfacePoint) -> f64 {
    if p.radius() < 0.0 {
        p.latitude() + PI
    } else {
        p.latitude()
    }
}

/// Point on the Earth's surface from latitude/longitude in degrees.
pub fn earth_coords(latitude_deg: f64, longitude_deg: f64) -> Result<SurfacePoint, SphericalError> {
    SurfacePoint::from_lat_lon(
        EARTH_RADIUS_M,
        latitude_deg.to_radians(),
        longitude_deg.to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn assert_relative(value: f64, reference: f64, tolerance: f64) {
        assert!(
            (value - reference).abs() <= reference.abs() * tolerance,
            "{value} not within {tolerance} of {reference}"
        );
    }

    #[test]
    fn cartesian_conversion() {
        let p = SurfacePoint::new(-1.0, [FRAC_PI_4, 3.0 * FRAC_PI_4]).unwrap();
        let c = to_cartesian(&p);
        assert_approx_eq!(c.x, 0.5);
        assert_approx_eq!(c.y, -0.5);
        assert_approx_eq!(c.z, -(2.0_f64.sqrt()) / 2.0);
    }

    #[test]
    fn antipodes_are_half_a_circumference_apart() {
        let p1 = SurfacePoint::new(1.0, [FRAC_PI_4, FRAC_PI_4]).unwrap();
        let mut p2 = SurfacePoint::new(-1.0, [FRAC_PI_4, FRAC_PI_4]).unwrap();
        assert_approx_eq!(great_circle_distance(&p1, &p2).unwrap(), PI);

        p2.set_angle(0, 3.0 * FRAC_PI_4).unwrap();
        assert_approx_eq!(great_circle_distance(&p1, &p2).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn distance_is_zero_to_self_and_symmetric() {
        let a = earth_coords(38.725267, -9.150019).unwrap();
        let b = earth_coords(-18.933333, 47.516667).unwrap();
        assert_eq!(great_circle_distance(&a, &a).unwrap(), 0.0);
        assert_approx_eq!(
            great_circle_distance(&a, &b).unwrap(),
            great_circle_distance(&b, &a).unwrap()
        );
    }

    #[test]
    fn different_spheres_are_incomparable() {
        let p1 = SurfacePoint::new(1.0, [0.5, 0.5]).unwrap();
        let p2 = SurfacePoint::new(2.0, [0.5, 0.5]).unwrap();
        assert!(matches!(
            great_circle_distance(&p1, &p2),
            Err(SphericalError::Incomparable { .. })
        ));
        // same sphere, opposite parameterization
        let p3 = SurfacePoint::new(-1.0, [0.5, 0.5]).unwrap();
        assert!(great_circle_distance(&p1, &p3).is_ok());
    }

    #[test]
    fn earth_city_distances() {
        let paris = earth_coords(48.856613, 2.352222).unwrap();
        let london = earth_coords(51.507222, -0.1275).unwrap();
        let bristol = earth_coords(51.45, -2.583333).unwrap();
        let antananarivo = earth_coords(-18.933333, 47.516667).unwrap();
        assert_relative(great_circle_distance(&paris, &london).unwrap(), 343_680.0, 0.001);
        assert_relative(great_circle_distance(&paris, &bristol).unwrap(), 454_440.0, 0.001);
        assert_relative(
            great_circle_distance(&paris, &antananarivo).unwrap(),
            8_757_070.0,
            0.001,
        );
    }

    #[test]
    fn earth_coords_reject_out_of_range() {
        assert!(earth_coords(91.0, 0.0).is_err());
        assert!(earth_coords(0.0, -181.0).is_err());
        assert!(earth_coords(-90.0, 10.0).is_ok());
        assert!(earth_coords(0.0, 180.0).is_ok());
    }

    #[test]
    fn longitude_just_west_of_greenwich() {
        let west = earth_coords(10.0, -1e-15).unwrap();
        let greenwich = earth_coords(10.0, 0.0).unwrap();
        assert!(great_circle_distance(&west, &greenwich).unwrap() < 1e-6);
    }
}
