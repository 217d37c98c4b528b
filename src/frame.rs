use crate::geodetic::{meridional_radius, prime_vertical_radius};
use crate::{EnuPoint, GpsPoint, Matrix3};
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Horizontal distance from a [`LocalFrame`]'s origin within which its conversions are
/// considered accurate, in meters.
///
/// Beyond it the frame still converts, but the error of the flat-earth approximation grows
/// quadratically (see [`LocalFrame::approximation_error`]).
pub const ACCURATE_RANGE_IN_METERS: f64 = 10_000.;

/// A local East-North-Up tangent plane anchored at an origin [`GpsPoint`].
///
/// The frame precomputes the WGS84 radii of curvature at the origin's latitude and from those the
/// number of meters spanned by one degree of latitude and of longitude there. Conversions in
/// either direction are then plain scalings of the latitude/longitude/altitude deltas. That makes
/// them fast and exactly invertible, but it is a flat-earth approximation: it is only accurate
/// for points within about [10 km](ACCURATE_RANGE_IN_METERS) of the origin.
///
/// Frames built from different origins are not interchangeable. An [`EnuPoint`] produced by one
/// frame must only be handed back to that same frame.
///
/// ```rust
/// use skyframe::{EnuPoint, GpsPoint, LocalFrame};
/// use uom::si::f64::Length;
/// use uom::si::length::meter;
///
/// // create a frame centered on the target
/// let target = GpsPoint::from_degrees(37.7897, -122.3972);
/// let frame = LocalFrame::at(target);
///
/// // GPS to local meters
/// let enu = frame.gps_to_enu(&GpsPoint::from_degrees(37.7900, -122.3970).with_altitude(50.));
/// assert!(enu.east().get::<meter>() > 0.);
/// assert!(enu.north().get::<meter>() > 0.);
/// assert_eq!(enu.up().get::<meter>(), 50.);
///
/// // and local meters to GPS
/// let gps = frame.enu_to_gps(&EnuPoint::from_cartesian(
///     Length::new::<meter>(100.),
///     Length::new::<meter>(200.),
///     Length::new::<meter>(50.),
/// ));
/// assert!(gps.latitude() > target.latitude());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// the radii are derived, so only the origin goes over the wire
#[cfg_attr(feature = "serde", serde(from = "GpsPoint", into = "GpsPoint"))]
pub struct LocalFrame {
    origin: GpsPoint,
    prime_vertical_radius: f64,
    meridional_radius: f64,
    meters_per_degree_latitude: f64,
    meters_per_degree_longitude: f64,
}

impl LocalFrame {
    /// Constructs the tangent plane at `origin`.
    ///
    /// `origin` becomes (0, 0, 0) in the frame. The frame degenerates as the origin's latitude
    /// approaches ±90°, where a degree of longitude spans no distance at all.
    #[must_use]
    pub fn at(origin: GpsPoint) -> Self {
        let latitude = origin.latitude.to_radians();
        let prime_vertical_radius = prime_vertical_radius(latitude);
        let meridional_radius = meridional_radius(latitude);
        let one_degree = 1_f64.to_radians();

        tracing::trace!(%origin, "constructing local tangent plane");

        Self {
            origin,
            prime_vertical_radius,
            meridional_radius,
            meters_per_degree_latitude: one_degree * meridional_radius,
            meters_per_degree_longitude: one_degree * prime_vertical_radius * latitude.cos(),
        }
    }

    /// The point that is (0, 0, 0) in this frame.
    #[must_use]
    pub fn origin(&self) -> GpsPoint {
        self.origin
    }

    /// The WGS84 radius of curvature in the prime vertical (east-west) at the origin.
    #[doc(alias = "N")]
    #[must_use]
    pub fn prime_vertical_radius(&self) -> Length {
        Length::new::<meter>(self.prime_vertical_radius)
    }

    /// The WGS84 radius of curvature in the meridian (north-south) at the origin.
    #[doc(alias = "M")]
    #[must_use]
    pub fn meridional_radius(&self) -> Length {
        Length::new::<meter>(self.meridional_radius)
    }

    /// How many meters north one degree of latitude spans at the origin.
    #[must_use]
    pub fn meters_per_degree_latitude(&self) -> f64 {
        self.meters_per_degree_latitude
    }

    /// How many meters east one degree of longitude spans at the origin.
    #[must_use]
    pub fn meters_per_degree_longitude(&self) -> f64 {
        self.meters_per_degree_longitude
    }

    /// Converts a GPS location into meters east, north, and up of this frame's origin.
    #[must_use]
    pub fn gps_to_enu(&self, point: &GpsPoint) -> EnuPoint {
        let enu = self.offset_of(point);
        self.note_if_beyond_range(&enu);
        enu
    }

    /// Converts meters east, north, and up of this frame's origin into a GPS location.
    ///
    /// This is the exact inverse of [`LocalFrame::gps_to_enu`]. `point` must have been expressed
    /// relative to this frame's origin.
    #[must_use]
    pub fn enu_to_gps(&self, point: &EnuPoint) -> GpsPoint {
        self.note_if_beyond_range(point);
        GpsPoint {
            latitude: self.origin.latitude + point.north / self.meters_per_degree_latitude,
            longitude: self.origin.longitude + point.east / self.meters_per_degree_longitude,
            altitude: self.origin.altitude + point.up,
        }
    }

    /// Returns `true` if `point` is horizontally within [`ACCURATE_RANGE_IN_METERS`] of the
    /// origin.
    #[must_use]
    pub fn is_within_accurate_range(&self, point: &GpsPoint) -> bool {
        self.offset_of(point).horizontal_distance().get::<meter>() <= ACCURATE_RANGE_IN_METERS
    }

    /// Converts a GPS location into this frame without the flat-earth approximation.
    ///
    /// Both points are taken to ECEF on the WGS84 ellipsoid and the difference is rotated into
    /// the plane tangent to the ellipsoid at the origin. Unlike [`LocalFrame::gps_to_enu`],
    /// this accounts for the curvature of the earth, so a point at the same altitude as the
    /// origin but some distance away ends up slightly _below_ the plane.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Local_tangent_plane_coordinates#Local_east,_north,_up_(ENU)_coordinates>
    #[must_use]
    pub fn exact_gps_to_enu(&self, point: &GpsPoint) -> EnuPoint {
        let delta = point.ecef_point() - self.origin.ecef_point();
        EnuPoint::from_nalgebra_vector(self.ecef_to_enu_rotation() * delta)
    }

    /// How far [`LocalFrame::gps_to_enu`] places `point` from where
    /// [`LocalFrame::exact_gps_to_enu`] does.
    ///
    /// At 10 km this is dominated by the curvature drop of roughly 7.84 m, plus a horizontal term
    /// that grows with the origin's latitude for points north or south of it.
    #[must_use]
    pub fn approximation_error(&self, point: &GpsPoint) -> Length {
        let approximate = self.offset_of(point).to_nalgebra_vector();
        let exact = self.exact_gps_to_enu(point).to_nalgebra_vector();
        Length::new::<meter>((approximate - exact).norm())
    }

    fn offset_of(&self, point: &GpsPoint) -> EnuPoint {
        EnuPoint {
            east: (point.longitude - self.origin.longitude) * self.meters_per_degree_longitude,
            north: (point.latitude - self.origin.latitude) * self.meters_per_degree_latitude,
            up: point.altitude - self.origin.altitude,
        }
    }

    fn note_if_beyond_range(&self, enu: &EnuPoint) {
        let horizontal = enu.horizontal_distance().get::<meter>();
        if horizontal > ACCURATE_RANGE_IN_METERS {
            tracing::debug!(
                origin = %self.origin,
                horizontal,
                "point is beyond the accurate range of the local tangent plane"
            );
        }
    }

    /// Rows are the East, North, and Up axes at the origin, expressed in ECEF.
    fn ecef_to_enu_rotation(&self) -> Matrix3 {
        let phi = self.origin.latitude.to_radians();
        let lambda = self.origin.longitude.to_radians();

        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let sin_lambda = lambda.sin();
        let cos_lambda = lambda.cos();

        Matrix3::new(
            -sin_lambda,
            cos_lambda,
            0.,
            -sin_phi * cos_lambda,
            -sin_phi * sin_lambda,
            cos_phi,
            cos_phi * cos_lambda,
            cos_phi * sin_lambda,
            sin_phi,
        )
    }
}

impl From<GpsPoint> for LocalFrame {
    fn from(origin: GpsPoint) -> Self {
        Self::at(origin)
    }
}

impl From<LocalFrame> for GpsPoint {
    fn from(frame: LocalFrame) -> Self {
        frame.origin
    }
}

/// Computes the straight-line distance between two locations.
///
/// This goes through the tangent plane at `from`, so it is neither a great-circle nor a
/// geodesic distance, and is only accurate when the points are within about 10 km of each other.
///
/// ```rust
/// use skyframe::{distance_between, GpsPoint};
/// use uom::si::length::meter;
///
/// let p1 = GpsPoint::from_degrees(37.79, -122.40);
/// let p2 = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(100.);
/// let distance = distance_between(&p1, &p2).get::<meter>();
/// assert!((distance - 268.2).abs() < 0.1);
/// ```
#[must_use]
pub fn distance_between(from: &GpsPoint, to: &GpsPoint) -> Length {
    LocalFrame::at(*from).gps_to_enu(to).distance_from_origin()
}

#[cfg(test)]
mod tests {
    use super::{distance_between, LocalFrame, ACCURATE_RANGE_IN_METERS};
    use crate::geodetic::tests::arbitrary_in;
    use crate::geodetic::SEMI_MAJOR_AXIS;
    use crate::{EnuPoint, GpsPoint};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::{quickcheck, Arbitrary};
    use rstest::rstest;
    use uom::si::f64::Length;
    use uom::si::length::meter;

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }

    /// A frame origin together with a point no more than a few km away from it.
    #[derive(Debug, Clone)]
    struct Nearby {
        origin: GpsPoint,
        point: GpsPoint,
    }

    impl quickcheck::Arbitrary for Nearby {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let origin = GpsPoint::arbitrary(g);
            // ±0.08° is under 9 km north-south, and less east-west
            let point = GpsPoint {
                latitude: origin.latitude + arbitrary_in(g, -0.08, 0.16),
                longitude: origin.longitude + arbitrary_in(g, -0.08, 0.16),
                altitude: origin.altitude + arbitrary_in(g, -300., 600.),
            };
            Self { origin, point }
        }
    }

    fn try_roundtrip(Nearby { origin, point }: Nearby) {
        let frame = LocalFrame::at(origin);
        let back = frame.enu_to_gps(&frame.gps_to_enu(&point));

        assert_abs_diff_eq!(back.latitude, point.latitude, epsilon = 1e-6);
        assert_abs_diff_eq!(back.longitude, point.longitude, epsilon = 1e-6);
        assert_abs_diff_eq!(back.altitude, point.altitude, epsilon = 1e-6);
    }

    quickcheck! {
        fn gps_enu_roundtrip(nearby: Nearby) -> () {
            try_roundtrip(nearby);
        }

        fn origin_is_zero(origin: GpsPoint) -> bool {
            LocalFrame::at(origin).gps_to_enu(&origin) == EnuPoint::origin()
        }

        fn distance_is_symmetric_enough(nearby: Nearby) -> () {
            let there = distance_between(&nearby.origin, &nearby.point);
            let back = distance_between(&nearby.point, &nearby.origin);
            // the two frames scale longitude slightly differently
            assert_relative_eq!(there.get::<meter>(), back.get::<meter>(), max_relative = 0.02);
        }
    }

    #[test]
    fn radii_at_equator() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(0., 0.));

        // at the equator, the prime vertical is the equatorial radius
        assert_eq!(frame.prime_vertical_radius(), m(SEMI_MAJOR_AXIS));
        assert_relative_eq!(
            frame.meridional_radius().get::<meter>(),
            6_335_439.298_898,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            frame.meters_per_degree_latitude(),
            110_574.275_326,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            frame.meters_per_degree_longitude(),
            111_319.490_793,
            epsilon = 1e-5
        );
    }

    #[test]
    fn radii_in_san_francisco() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(37.79, -122.40));

        assert_relative_eq!(
            frame.prime_vertical_radius().get::<meter>(),
            6_386_168.338_948,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            frame.meridional_radius().get::<meter>(),
            6_359_402.169_820,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            frame.meters_per_degree_latitude(),
            110_992.506_322,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            frame.meters_per_degree_longitude(),
            88_082.334_040,
            epsilon = 1e-5
        );
    }

    #[test]
    fn known_gps_to_enu() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(37.79, -122.40));
        let enu = frame.gps_to_enu(&GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(100.));

        assert_relative_eq!(
            enu,
            EnuPoint::from_meters(246.630_535, -33.297_752, 100.),
            epsilon = m(1e-5)
        );
    }

    #[test]
    fn known_enu_to_gps() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(37.7897, -122.3972));
        let gps = frame.enu_to_gps(&EnuPoint::from_meters(100., 200., 50.));

        assert_relative_eq!(gps.latitude, 37.791_501_923_543, epsilon = 1e-10);
        assert_relative_eq!(gps.longitude, -122.396_064_703_158, epsilon = 1e-10);
        assert_eq!(gps.altitude, 50.);
    }

    #[test]
    fn altitude_is_relative_to_origin() {
        let origin = GpsPoint::from_degrees(37.79, -122.40).with_altitude(100.);
        let frame = LocalFrame::at(origin);

        assert_eq!(frame.gps_to_enu(&origin.with_altitude(40.)).up, -60.);
        assert_eq!(frame.enu_to_gps(&EnuPoint::from_meters(0., 0., 15.)).altitude, 115.);
    }

    #[rstest]
    #[case(GpsPoint::from_degrees(0., 0.))]
    #[case(GpsPoint::from_degrees(37.7897, -122.3972))]
    #[case(GpsPoint::from_degrees(-33.8688, 151.2093).with_altitude(58.))]
    #[case(GpsPoint::from_degrees(64.1466, -21.9426))]
    #[case(GpsPoint::from_degrees(1.3521, 179.99))]
    fn known_roundtrips(#[case] origin: GpsPoint) {
        let frame = LocalFrame::at(origin);
        for (east, north, up) in [
            (0., 0., 0.),
            (9_000., 0., 0.),
            (0., -9_000., 120.),
            (-5_000., 5_000., -30.),
            (0.001, 0.001, 0.001),
        ] {
            let enu = EnuPoint::from_meters(east, north, up);
            let gps = frame.enu_to_gps(&enu);
            assert_relative_eq!(frame.gps_to_enu(&gps), enu, epsilon = m(1e-6));

            try_roundtrip(Nearby { origin, point: gps });
        }
    }

    #[test]
    fn distance_example() {
        let p1 = GpsPoint::from_degrees(37.79, -122.40);
        let p2 = GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(100.);
        assert_relative_eq!(
            distance_between(&p1, &p2).get::<meter>(),
            268.207_683,
            epsilon = 1e-4
        );
    }

    #[test]
    fn distance_is_straight_line() {
        let origin = GpsPoint::from_degrees(37.79, -122.40);
        let frame = LocalFrame::at(origin);
        let point = frame.enu_to_gps(&EnuPoint::from_meters(30., 40., 120.));

        // 30-40-50 horizontally, then 50-120-130
        assert_relative_eq!(
            distance_between(&origin, &point).get::<meter>(),
            130.,
            epsilon = 1e-6
        );
        assert_eq!(distance_between(&origin, &origin), m(0.));
    }

    #[test]
    fn accurate_range() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(37.79, -122.40));

        let inside = frame.enu_to_gps(&EnuPoint::from_meters(ACCURATE_RANGE_IN_METERS - 1., 0., 0.));
        let corner = frame.enu_to_gps(&EnuPoint::from_meters(8_000., 8_000., 0.));
        let outside = frame.enu_to_gps(&EnuPoint::from_meters(0., ACCURATE_RANGE_IN_METERS + 1., 0.));

        assert!(frame.is_within_accurate_range(&frame.origin()));
        assert!(frame.is_within_accurate_range(&inside));
        assert!(!frame.is_within_accurate_range(&corner));
        assert!(!frame.is_within_accurate_range(&outside));
        // altitude does not count
        assert!(frame.is_within_accurate_range(&frame.origin().with_altitude(50_000.)));
    }

    #[test]
    fn exact_enu_at_origin_is_zero() {
        let origin = GpsPoint::from_degrees(37.79, -122.40).with_altitude(12.);
        assert_relative_eq!(
            LocalFrame::at(origin).exact_gps_to_enu(&origin),
            EnuPoint::origin(),
            epsilon = m(1e-6)
        );
    }

    #[test]
    fn exact_enu_accounts_for_curvature() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(0., 0.));
        let point = frame.enu_to_gps(&EnuPoint::from_meters(10_000., 0., 0.));
        let exact = frame.exact_gps_to_enu(&point);

        // sagitta of a 10 km arc, d^2 / 2N, where N is the equatorial radius at the equator
        let sagitta = -(10_000f64.powi(2)) / (2. * SEMI_MAJOR_AXIS);
        assert_relative_eq!(sagitta, -7.839, epsilon = 0.001);
        assert_relative_eq!(exact.up, sagitta, epsilon = 0.001);
        assert_relative_eq!(exact.east, 10_000., epsilon = 0.01);
        assert_abs_diff_eq!(exact.north, 0., epsilon = 1e-6);
    }

    #[test]
    fn exact_enu_matches_nav_types() {
        let origin = GpsPoint::from_degrees(47.9948211, 7.8211606).with_altitude(1000.);
        let frame = LocalFrame::at(origin);
        let point = frame.enu_to_gps(&EnuPoint::from_meters(1_200., -800., 35.));

        let to_nav = |p: &GpsPoint| {
            nav_types::ECEF::from(nav_types::WGS84::from_degrees_and_meters(
                p.latitude,
                p.longitude,
                p.altitude,
            ))
        };
        let exact = frame.exact_gps_to_enu(&point);

        // walk the exact offset from the origin in nav_types, and we should land on the point
        let offset = nav_types::NED::new(exact.north, exact.east, -exact.up);
        let landed = to_nav(&origin) + offset;
        let expected = to_nav(&point);

        assert_relative_eq!(landed.x(), expected.x(), epsilon = 0.01);
        assert_relative_eq!(landed.y(), expected.y(), epsilon = 0.01);
        assert_relative_eq!(landed.z(), expected.z(), epsilon = 0.01);
    }

    #[rstest]
    #[case(0.)]
    #[case(37.79)]
    #[case(-45.)]
    #[case(60.)]
    fn approximation_error_stays_small_in_range(#[case] latitude: f64) {
        let frame = LocalFrame::at(GpsPoint::from_degrees(latitude, -122.40));
        for bearing in [0_f64, 45., 90., 135., 225., 300.] {
            let (sin, cos) = bearing.to_radians().sin_cos();
            let at = |distance: f64| {
                frame.enu_to_gps(&EnuPoint::from_meters(distance * cos, distance * sin, 0.))
            };

            let near = frame.approximation_error(&at(1_000.)).get::<meter>();
            let far = frame.approximation_error(&at(ACCURATE_RANGE_IN_METERS)).get::<meter>();

            assert!(near < 0.2, "{near}m off at 1 km from {latitude}° bearing {bearing}°");
            assert!(far < 20., "{far}m off at 10 km from {latitude}° bearing {bearing}°");
            // the earth curves away from the plane in every direction
            assert!(far > 7.5, "{far}m off at 10 km from {latitude}° bearing {bearing}°");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn frame_serializes_as_origin() {
        let frame = LocalFrame::at(GpsPoint::from_degrees(37.7897, -122.3972).with_altitude(12.));

        let ser = serde_yaml::to_string(&frame).unwrap();
        let origin = serde_yaml::from_str::<GpsPoint>(&ser).unwrap();
        assert_eq!(origin, frame.origin());

        let de = serde_yaml::from_str::<LocalFrame>(&ser).unwrap();
        assert_eq!(frame, de);
    }
}
